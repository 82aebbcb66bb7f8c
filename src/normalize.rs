//! Normalization: reduce a provider response to the flat record shape.
//!
//! Never fails. Sections the provider left out become [`MISSING`] columns,
//! and profile types outside the known network set are dropped.

use crate::lookup::{ProviderResponse, SocialProfile};
use crate::model::{CITY, COUNTRY, FULL_NAME, LookupKind, MISSING, Network, Record};

/// Build the record for `identifier` from the provider's response.
pub fn normalize(kind: LookupKind, identifier: &str, response: &ProviderResponse) -> Record {
    let mut record = Record::blank(kind, identifier);

    let full_name = response
        .contact_info
        .as_ref()
        .and_then(|c| c.full_name.as_deref());
    record.set(FULL_NAME, full_name.unwrap_or(MISSING));

    let location = response
        .demographics
        .as_ref()
        .and_then(|d| d.location_deduced.as_ref());
    let city = location.and_then(|l| l.normalized_location.as_deref());
    let country = location
        .and_then(|l| l.country.as_ref())
        .and_then(|c| c.name.as_deref());
    record.set(CITY, city.unwrap_or(MISSING));
    record.set(COUNTRY, country.unwrap_or(MISSING));

    // Later entries for the same network overwrite earlier ones.
    for profile in response.social_profiles.iter().flatten() {
        let Some(network) = Network::from_type(&profile.profile_type) else {
            tracing::debug!(
                profile_type = profile.profile_type.as_str(),
                "dropping unknown profile type"
            );
            continue;
        };
        apply_profile(&mut record, network, profile);
    }

    record
}

fn apply_profile(record: &mut Record, network: Network, profile: &SocialProfile) {
    record.set(
        network.url_field(),
        profile.url.as_deref().unwrap_or(MISSING),
    );
    if let Some(bio_field) = network.bio_field() {
        record.set(bio_field, profile.bio.as_deref().unwrap_or(MISSING));
    }
}
