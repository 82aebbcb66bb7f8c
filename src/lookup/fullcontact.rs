//! `FullContact` person lookups over HTTPS.
//!
//! One `GET /v2/person.json?<kind>=<identifier>` per lookup, authenticated
//! with the `X-FullContact-APIKey` header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{LookupClient, LookupError, ProviderResponse};
use crate::config::ConfigError;
use crate::model::LookupKind;

/// Provider base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.fullcontact.com";

const API_KEY_HEADER: &str = "X-FullContact-APIKey";

/// HTTP lookup client for the `FullContact` person API.
#[derive(Clone)]
pub struct FullContactClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl FullContactClient {
    /// Builds a client against `base_url` with a per-request timeout.
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("enrich/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let endpoint = format!("{}/v2/person.json", base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl LookupClient for FullContactClient {
    async fn lookup(
        &self,
        kind: LookupKind,
        identifier: &str,
    ) -> Result<ProviderResponse, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[(kind.as_str(), identifier)])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        interpret(status, &body)
    }
}

/// JSON shape of a provider error body.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Map a status and body to a decoded response or a lookup error.
///
/// Only 200 carries person data. 202 means the search was queued and
/// nothing is available yet, which is reported like any other status.
fn interpret(status: StatusCode, body: &str) -> Result<ProviderResponse, LookupError> {
    if status == StatusCode::OK {
        return serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()));
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string()
        });

    Err(LookupError::Provider {
        status: status.as_u16(),
        message,
    })
}
