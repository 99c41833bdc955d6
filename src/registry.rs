//! # Registry Client
//!
//! Talks to the remote spreadsheet-backed registry through its GET-style
//! API: one endpoint, `action=add` to persist a submitted label and
//! `action=list` to fetch everything back. Writes are best-effort and
//! attempted exactly once — a failed add never retracts the locally
//! rendered label.

use reqwest::Url;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::EtiquetaError;
use crate::label::{LabelRecord, RegistryEntry, epoch_millis};

/// Registry endpoint configuration, validated once at client construction
/// rather than per call.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base endpoint URL (e.g. an Apps Script exec URL).
    pub base_url: String,
}

/// Response envelope for `action=list`.
#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    data: Vec<RegistryEntry>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the remote registry.
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: Url,
    /// Last `_ts` handed out; the next one is always strictly greater.
    last_ts: AtomicU64,
}

impl RegistryClient {
    /// Build a client, validating the endpoint URL (scheme and host) once.
    pub fn new(config: &RegistryConfig) -> Result<Self, EtiquetaError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| EtiquetaError::Config(format!("invalid registry URL: {}", e)))?;

        if !matches!(base_url.scheme(), "http" | "https") || !base_url.has_host() {
            return Err(EtiquetaError::Config(format!(
                "registry URL must be http(s) with a host: {}",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("etiqueta/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EtiquetaError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            last_ts: AtomicU64::new(0),
        })
    }

    /// Persist a submitted label.
    ///
    /// One parameterized GET, one attempt, no retry. Any 2xx response counts
    /// as acceptance; no structured body is required. The `_ts` parameter is
    /// purely a cache buster — the backend assigns ids and ordering.
    pub async fn add(&self, record: &LabelRecord) -> Result<(), EtiquetaError> {
        let ts = self.next_ts().to_string();
        let response = self
            .http
            .get(self.base_url.clone())
            .query(&[
                ("action", "add"),
                ("pedido", record.order_id.as_str()),
                ("quadro", record.frame_code.as_str()),
                ("link", record.link.as_str()),
                ("data", record.display_date.as_str()),
                ("_ts", ts.as_str()),
            ])
            .send()
            .await
            .map_err(|e| EtiquetaError::Registry(format!("add request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(EtiquetaError::Registry(format!(
                "add rejected: HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Fetch all registry entries.
    ///
    /// Network failure, non-2xx status, unparsable body, and `ok != true`
    /// all collapse into one failure kind; the message comes from the body's
    /// `message` field when present, else the raw body text. No retry, no
    /// caching between calls.
    pub async fn list(&self) -> Result<Vec<RegistryEntry>, EtiquetaError> {
        let buster = epoch_millis().to_string();
        let response = self
            .http
            .get(self.base_url.clone())
            .query(&[("action", "list"), ("_", buster.as_str())])
            .send()
            .await
            .map_err(|e| EtiquetaError::Registry(format!("list request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EtiquetaError::Registry(format!("list body unreadable: {}", e)))?;

        let envelope: Option<ListEnvelope> = serde_json::from_str(&body).ok();
        match envelope {
            Some(env) if status.is_success() && env.ok => Ok(env.data),
            env => {
                let message = env.and_then(|e| e.message).unwrap_or(body);
                Err(EtiquetaError::Registry(message))
            }
        }
    }

    /// Monotonically increasing client timestamp: wall-clock millis, bumped
    /// past the previous value when the clock stalls or steps back.
    fn next_ts(&self) -> u64 {
        let now = epoch_millis();
        let mut prev = self.last_ts.load(Ordering::SeqCst);
        loop {
            let next = now.max(prev + 1);
            match self.last_ts.compare_exchange(
                prev,
                next,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client() -> RegistryClient {
        RegistryClient::new(&RegistryConfig {
            base_url: "https://script.example.com/macros/s/abc/exec".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(client().base_url.has_host());

        for bad in ["", "not a url", "file:///tmp/x", "https://"] {
            let result = RegistryClient::new(&RegistryConfig {
                base_url: bad.to_string(),
            });
            assert!(result.is_err(), "accepted invalid URL: {:?}", bad);
        }
    }

    #[test]
    fn test_ts_strictly_increases() {
        let client = client();
        let mut prev = 0;
        for _ in 0..100 {
            let ts = client.next_ts();
            assert!(ts > prev);
            prev = ts;
        }
    }

    #[test]
    fn test_list_envelope_parsing() {
        let env: ListEnvelope = serde_json::from_str(
            r#"{"ok": true, "data": [{"id": 1, "pedido": "p", "quadro": "q", "link": "l", "data": "2024-03-05T00:00:00Z"}]}"#,
        )
        .unwrap();
        assert!(env.ok);
        assert_eq!(env.data.len(), 1);
        assert_eq!(env.data[0].id, "1");

        let env: ListEnvelope =
            serde_json::from_str(r#"{"ok": false, "message": "quota exceeded"}"#).unwrap();
        assert!(!env.ok);
        assert_eq!(env.message.as_deref(), Some("quota exceeded"));
        assert!(env.data.is_empty());
    }
}
