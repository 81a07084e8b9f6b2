/*
[INPUT]:  GenerateOptions and API key
[OUTPUT]: EntropyResult or typed status error
[POS]:    HTTP layer - random generation endpoint
[UPDATE]: When changing query parameters or status mapping
*/

use crate::error::{QrngError, Result};
use crate::http::QrngClient;
use crate::types::{EntropyResult, GenerateOptions};
use tracing::{debug, warn};

impl QrngClient {
    /// Generate random entropy
    ///
    /// GET /api/random?bytes={bytes}&format={format}[&method={method}][&signatureType={type}]
    pub async fn generate(&self, options: &GenerateOptions) -> Result<EntropyResult> {
        let mut url = self.endpoint_url("/api/random").map_err(QrngError::request)?;
        url.query_pairs_mut().extend_pairs(options.query_pairs());

        debug!(
            bytes = options.bytes,
            format = options.format.as_str(),
            method = options.method.map(|method| method.as_str()),
            signature_type = options.signature_type.map(|signature| signature.as_str()),
            "requesting entropy"
        );

        let response = self
            .authed_get(url)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "entropy request failed");
                QrngError::request(err)
            })?;

        let status = response.status();
        if let Some(err) = QrngError::from_typed_status(status) {
            warn!(status = status.as_u16(), error = %err, "entropy request rejected");
            return Err(err);
        }

        if !status.is_success() {
            // An unreadable error body is treated like an unparseable one.
            let body = response.bytes().await.unwrap_or_default();
            let err = QrngError::from_status(status, &body);
            warn!(status = status.as_u16(), error = %err, "entropy request rejected");
            return Err(err);
        }

        let body = response.bytes().await.map_err(QrngError::request)?;

        let result: EntropyResult = serde_json::from_slice(&body).map_err(QrngError::request)?;
        debug!(proof_id = %result.proof_id, "entropy received");
        Ok(result)
    }
}
