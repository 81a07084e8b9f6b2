/*
[INPUT]:  QRNG_API_KEY environment variable
[OUTPUT]: Live entropy chunks printed to stdout
[POS]:    Examples - WebSocket stream handling
[UPDATE]: When stream client API changes
*/

use qrng_api::*;
use tokio::sync::mpsc;

/// Example: read ten chunks from the live stream, then disconnect
#[tokio::main]
async fn main() {
    let api_key = std::env::var("QRNG_API_KEY").unwrap_or_default();
    let mut stream = QrngStreamClient::new(api_key);

    let (tx, mut rx) = mpsc::unbounded_channel();
    stream
        .connect(StreamOptions::default().with_chunk_size(16), tx)
        .await;

    let mut received = 0;
    while let Some(event) = rx.recv().await {
        match event {
            StreamEvent::Data(chunk) => {
                received += 1;
                println!("{received:>2}: {chunk}");
                if received == 10 {
                    break;
                }
            }
            StreamEvent::Error(err) => eprintln!("stream error: {err}"),
            StreamEvent::Closed => break,
        }
    }

    stream.disconnect().await;
    println!("state: {:?}", stream.state());
}
