//! Record: the flat, normalized shape of one enriched identifier.

use super::LookupKind;

/// Placeholder for a field the provider did not return.
///
/// Every field of a record is present; missing data is spelled as this
/// value so serialized rows keep a uniform shape.
pub const MISSING: &str = "";

/// Column holding the person's full name.
pub const FULL_NAME: &str = "fullName";

/// Column holding the deduced city (normalized location).
pub const CITY: &str = "City";

/// Column holding the deduced country name.
pub const COUNTRY: &str = "Country";

/// Column holding the `LinkedIn` biography.
pub const LINKEDIN_BIO: &str = "LIBio";

/// A social network the record keeps a first-class column for.
///
/// Networks outside this set are dropped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Twitter,
    Linkedin,
    Facebook,
    AngelList,
    Klout,
    Youtube,
}

impl Network {
    /// All known networks, in column order.
    pub const ALL: [Network; 6] = [
        Self::Twitter,
        Self::Linkedin,
        Self::Facebook,
        Self::AngelList,
        Self::Klout,
        Self::Youtube,
    ];

    /// Match a provider profile type (case-insensitive).
    pub fn from_type(profile_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|n| n.type_name().eq_ignore_ascii_case(profile_type.trim()))
    }

    /// The provider's type name for this network.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
            Self::Facebook => "facebook",
            Self::AngelList => "angellist",
            Self::Klout => "klout",
            Self::Youtube => "youtube",
        }
    }

    /// The record column holding this network's profile URL.
    pub fn url_field(self) -> &'static str {
        match self {
            Self::Twitter => "TwitterURL",
            Self::Linkedin => "LinkedinURL",
            Self::Facebook => "FacebookURL",
            Self::AngelList => "AngelListURL",
            Self::Klout => "KloutURL",
            Self::Youtube => "YoutubeURL",
        }
    }

    /// The record column holding this network's biography, for networks that expose one.
    pub fn bio_field(self) -> Option<&'static str> {
        match self {
            Self::Linkedin => Some(LINKEDIN_BIO),
            _ => None,
        }
    }
}

/// Normalized profile data for one identifier.
///
/// An ordered mapping of column name to value. Columns keep insertion
/// order so every record of a batch serializes with the same layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// A record with every known column set to [`MISSING`], except the
    /// lookup kind's column, which echoes the queried identifier.
    pub fn blank(kind: LookupKind, identifier: &str) -> Self {
        let mut fields = vec![
            (FULL_NAME.to_string(), MISSING.to_string()),
            (CITY.to_string(), MISSING.to_string()),
            (COUNTRY.to_string(), MISSING.to_string()),
            (LINKEDIN_BIO.to_string(), MISSING.to_string()),
            (kind.as_str().to_string(), identifier.to_string()),
        ];
        fields.extend(
            Network::ALL
                .iter()
                .map(|n| (n.url_field().to_string(), MISSING.to_string())),
        );
        Self { fields }
    }

    /// Set a column, replacing its value in place or appending it.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((field.to_string(), value)),
        }
    }

    /// Look up a column's value.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Columns in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether every column other than `keep` holds [`MISSING`].
    #[cfg(test)]
    pub fn is_blank_except(&self, keep: &str) -> bool {
        self.fields
            .iter()
            .filter(|(name, _)| name != keep)
            .all(|(_, value)| value == MISSING)
    }
}
