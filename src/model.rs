//! Core data model for enrich.
//!
//! These types describe one batch: the identifiers read from input,
//! the records the provider returned, and the per-identifier outcomes
//! that make up the batch result.

mod identifier;
mod outcome;
mod record;

pub use identifier::{Identifier, LookupKind};
pub use outcome::{BatchResult, Outcome};
pub use record::{CITY, COUNTRY, FULL_NAME, MISSING, Network, Record};

#[cfg(test)]
pub use record::LINKEDIN_BIO;
