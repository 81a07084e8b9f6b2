/*
[INPUT]:  JSON bodies from /api/random and /api/health
[OUTPUT]: Typed response structs
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entropy payload plus the server's signed proof
///
/// Fields the server leaves out decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntropyResult {
    pub data: String,
    pub proof_id: String,
    pub signature: String,
    pub public_key: String,
    pub signature_type: String,
    #[serde(default, deserialize_with = "null_as_empty_map")]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty_map")]
    pub metrics: Map<String, Value>,
    pub timestamp: String,
}

fn null_as_empty_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Map<String, Value>>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_result_camel_case() {
        let raw = r#"{
            "data": "a1b2",
            "proofId": "proof-1",
            "signature": "sig",
            "publicKey": "pk",
            "signatureType": "ed25519",
            "metadata": {"method": "photon"}
        }"#;
        let result: EntropyResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.proof_id, "proof-1");
        assert_eq!(result.public_key, "pk");
        assert_eq!(
            result.metadata.get("method").and_then(Value::as_str),
            Some("photon")
        );
    }

    #[test]
    fn test_metadata_missing_or_null_is_empty() {
        let missing = r#"{"data":"00","proofId":"p","signature":"s","publicKey":"k","signatureType":"ed25519"}"#;
        let result: EntropyResult = serde_json::from_str(missing).unwrap();
        assert!(result.metadata.is_empty());

        let null = r#"{"data":"00","proofId":"p","signature":"s","publicKey":"k","signatureType":"ed25519","metadata":null}"#;
        let result: EntropyResult = serde_json::from_str(null).unwrap();
        assert!(result.metadata.is_empty());
    }

    #[test]
    fn test_health_status() {
        let raw = r#"{"status":"healthy","metrics":{"uptime":99.9},"timestamp":"2026-01-01T00:00:00Z"}"#;
        let health: HealthStatus = serde_json::from_str(raw).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(
            health.metrics.get("uptime").and_then(Value::as_f64),
            Some(99.9)
        );
    }

    #[test]
    fn test_entropy_result_partial_body() {
        let result: EntropyResult = serde_json::from_str(r#"{"data":"ff00"}"#).unwrap();
        assert_eq!(result.data, "ff00");
        assert!(result.proof_id.is_empty());
        assert!(result.signature_type.is_empty());
        assert!(result.metadata.is_empty());
    }

    #[test]
    fn test_health_status_without_timestamp() {
        let health: HealthStatus = serde_json::from_str(r#"{"status":"degraded"}"#).unwrap();
        assert_eq!(health.status, "degraded");
        assert!(health.timestamp.is_empty());
        assert!(health.metrics.is_empty());
    }
}
