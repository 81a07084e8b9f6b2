/*
[INPUT]:  Resolved client configuration and subcommand arguments
[OUTPUT]: Entropy, health JSON or streamed chunks written to an output sink
[POS]:    Command layer - one function per subcommand
[UPDATE]: When adding subcommands or changing output format
*/

use anyhow::{Context, Result};
use qrng_api::{
    GenerateOptions, QrngClient, QrngError, QrngStreamClient, StreamEvent, StreamOptions,
};
use std::io::Write;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Why a `stream` run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamExit {
    CountReached,
    ServerClosed,
    Shutdown,
}

pub async fn generate(
    client: &QrngClient,
    options: &GenerateOptions,
    as_json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let result = client.generate(options).await.context("generate entropy")?;
    info!(proof_id = %result.proof_id, signature_type = %result.signature_type, "entropy generated");

    if as_json {
        serde_json::to_writer_pretty(&mut *out, &result).context("encode entropy result")?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", result.data)?;
    }
    Ok(())
}

pub async fn health(client: &QrngClient, out: &mut impl Write) -> Result<()> {
    let status = client.health().await.context("query health")?;
    serde_json::to_writer_pretty(&mut *out, &status).context("encode health status")?;
    writeln!(out)?;
    Ok(())
}

/// Print chunks until `count` is reached, the server closes, or `shutdown` fires
///
/// Stream errors are logged and do not end the run.
pub async fn stream(
    client: &mut QrngStreamClient,
    options: StreamOptions,
    count: Option<usize>,
    shutdown: CancellationToken,
    out: &mut impl Write,
) -> Result<StreamExit> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    client.connect(options, tx).await;

    let mut received = 0usize;
    let exit = loop {
        if count.is_some_and(|limit| received >= limit) {
            break StreamExit::CountReached;
        }

        let event = tokio::select! {
            _ = shutdown.cancelled() => break StreamExit::Shutdown,
            event = rx.recv() => event,
        };

        match event {
            Some(StreamEvent::Data(data)) => {
                writeln!(out, "{data}")?;
                received += 1;
            }
            Some(StreamEvent::Error(err)) => log_stream_error(&err),
            Some(StreamEvent::Closed) | None => break StreamExit::ServerClosed,
        }
    };

    client.disconnect().await;
    info!(received, ?exit, "stream finished");
    Ok(exit)
}

fn log_stream_error(err: &QrngError) {
    warn!(error = %err, kind = ?err.kind(), "stream error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrng_api::ClientConfig;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entropy_body() -> serde_json::Value {
        json!({
            "data": "0badc0de",
            "proofId": "proof-9",
            "signature": "sig",
            "publicKey": "pk",
            "signatureType": "dilithium2"
        })
    }

    async fn client_for(server: &MockServer) -> QrngClient {
        QrngClient::with_config(ClientConfig::new("cli-key").with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_generate_prints_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/random"))
            .and(query_param("bytes", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(entropy_body()))
            .mount(&server)
            .await;

        let mut out = Vec::new();
        assert_ok!(
            generate(
                &client_for(&server).await,
                &GenerateOptions::default().with_bytes(4),
                false,
                &mut out,
            )
            .await
        );

        assert_eq!(String::from_utf8(out).unwrap(), "0badc0de\n");
    }

    #[tokio::test]
    async fn test_generate_json_output() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/random"))
            .respond_with(ResponseTemplate::new(200).set_body_json(entropy_body()))
            .mount(&server)
            .await;

        let mut out = Vec::new();
        let client = client_for(&server).await;
        assert_ok!(generate(&client, &GenerateOptions::default(), true, &mut out).await);

        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["proofId"], "proof-9");
        assert_eq!(printed["metadata"], json!({}));
    }

    #[tokio::test]
    async fn test_generate_error_has_context() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/random"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut out = Vec::new();
        let err = assert_err!(
            generate(&client_for(&server).await, &GenerateOptions::default(), false, &mut out).await
        );

        assert_eq!(err.to_string(), "generate entropy");
        let source = err.downcast_ref::<QrngError>().expect("QrngError source");
        assert!(source.is_auth_error());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_health_prints_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "metrics": {"queue": 3},
                "timestamp": "2026-01-01T00:00:00Z"
            })))
            .mount(&server)
            .await;

        let mut out = Vec::new();
        assert_ok!(health(&client_for(&server).await, &mut out).await);

        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["status"], "ok");
        assert_eq!(printed["metrics"]["queue"], 3);
    }

    #[tokio::test]
    async fn test_stream_stops_on_shutdown() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut client = QrngStreamClient::with_base_url("cli-key", format!("ws://127.0.0.1:{port}"));
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let mut out = Vec::new();
        let exit =
            assert_ok!(stream(&mut client, StreamOptions::default(), None, shutdown, &mut out).await);

        // Either the refused connection or the pre-cancelled token ends the run.
        assert!(matches!(exit, StreamExit::Shutdown | StreamExit::ServerClosed));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_stream_zero_count_returns_immediately() {
        let mut client = QrngStreamClient::with_base_url("cli-key", "ws://127.0.0.1:9");
        let mut out = Vec::new();
        let exit = assert_ok!(
            stream(
                &mut client,
                StreamOptions::default(),
                Some(0),
                CancellationToken::new(),
                &mut out,
            )
            .await
        );
        assert_eq!(exit, StreamExit::CountReached);
    }
}
