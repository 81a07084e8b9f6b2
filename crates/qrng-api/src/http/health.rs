/*
[INPUT]:  API key
[OUTPUT]: HealthStatus from the service
[POS]:    HTTP layer - health endpoint
[UPDATE]: When health response format changes
*/

use crate::error::{QrngError, Result};
use crate::http::QrngClient;
use crate::types::HealthStatus;
use tracing::{debug, warn};

impl QrngClient {
    /// Get system health status
    ///
    /// GET /api/health
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self
            .endpoint_url("/api/health")
            .map_err(QrngError::health_transport)?;

        debug!("requesting health status");
        let response = self.authed_get(url).send().await.map_err(|err| {
            warn!(error = %err, "health request failed");
            QrngError::health_transport(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "health check rejected");
            return Err(QrngError::health_status(status));
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(QrngError::health_transport)
    }
}
