/*
[INPUT]:  QRNG_API_KEY environment variable
[OUTPUT]: Signed entropy and service health printed to stdout
[POS]:    Examples - request/response usage
[UPDATE]: When request client API changes
*/

use qrng_api::*;

/// Example: fetch signed entropy and check service health
#[tokio::main]
async fn main() -> Result<()> {
    let api_key = std::env::var("QRNG_API_KEY").unwrap_or_default();
    let client = QrngClient::new(api_key)?;

    let health = client.health().await?;
    println!("service status: {} at {}", health.status, health.timestamp);

    let options = GenerateOptions::default()
        .with_bytes(64)
        .with_format(Format::Base64)
        .with_signature_type(SignatureType::Dilithium3);

    match client.generate(&options).await {
        Ok(result) => {
            println!("data:       {}", result.data);
            println!("proof id:   {}", result.proof_id);
            println!("signed by:  {} ({})", result.public_key, result.signature_type);
        }
        Err(err) => match err.kind() {
            ErrorKind::Authentication => eprintln!("check QRNG_API_KEY: {err}"),
            ErrorKind::RateLimit | ErrorKind::QuotaExceeded => eprintln!("slow down: {err}"),
            ErrorKind::General => return Err(err),
        },
    }

    Ok(())
}
