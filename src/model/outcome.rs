//! Outcomes: what happened to each identifier in a batch.

use super::{Identifier, Record};

/// The result of one lookup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The provider answered; the response was normalized into a record.
    Success(Record),

    /// The lookup failed. The identifier is kept so the failure can still
    /// be rendered in its input position.
    Failure {
        reason: String,
        identifier: Identifier,
    },
}

impl Outcome {
    pub fn failure(reason: impl Into<String>, identifier: Identifier) -> Self {
        Self::Failure {
            reason: reason.into(),
            identifier,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Order-preserving aggregate of a batch.
///
/// Position `i` holds the outcome for input identifier `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    outcomes: Vec<Outcome>,
}

impl BatchResult {
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }
}
