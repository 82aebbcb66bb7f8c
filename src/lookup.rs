//! Lookups: one identifier in, one provider response out.
//!
//! The batch runner only knows the [`LookupClient`] contract. The HTTP
//! adapter for the provider lives in its own submodule and can be swapped
//! for a test double.

mod fullcontact;

pub use fullcontact::{DEFAULT_BASE_URL, FullContactClient};

use async_trait::async_trait;
use serde::Deserialize;

use crate::model::LookupKind;

/// Why a single lookup failed.
///
/// Always recovered by the batch runner into a failure outcome.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Performs one identifier lookup against the provider.
#[async_trait]
pub trait LookupClient: Send + Sync {
    async fn lookup(
        &self,
        kind: LookupKind,
        identifier: &str,
    ) -> Result<ProviderResponse, LookupError>;
}

// ── Provider response shape ──
//
// Every section is optional. Unknown fields are ignored so new provider
// fields never break decoding.

/// A person record as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderResponse {
    pub contact_info: Option<ContactInfo>,
    pub demographics: Option<Demographics>,
    pub social_profiles: Option<Vec<SocialProfile>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Demographics {
    pub location_deduced: Option<DeducedLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeducedLocation {
    pub normalized_location: Option<String>,
    pub country: Option<Country>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Country {
    pub name: Option<String>,
}

/// One social network profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SocialProfile {
    #[serde(rename = "type")]
    pub profile_type: String,
    pub url: Option<String>,
    pub bio: Option<String>,
}
