//! Flatten outcomes into a rectangular table.
//!
//! Both encoders work from the same table, so JSON and CSV always agree on
//! which rows exist and what each column holds.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::FailureRendering;
use crate::model::{MISSING, Outcome, Record};

/// Column carrying the failure reason on sentinel-rendered failure rows.
pub const ERROR_FIELD: &str = "error";

/// Rows of string cells under a shared header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build the table for the given outcomes.
    ///
    /// The header is the union of every emitted record's columns, in the
    /// order they are first seen. Cells a record lacks hold [`MISSING`].
    pub fn from_outcomes(outcomes: &[Outcome], failures: FailureRendering) -> Self {
        let records: Vec<Record> = outcomes
            .iter()
            .filter_map(|outcome| render_outcome(outcome, failures))
            .collect();

        let mut header: Vec<String> = Vec::new();
        for record in &records {
            for (name, _) in record.fields() {
                if !header.iter().any(|h| h == name) {
                    header.push(name.to_string());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                header
                    .iter()
                    .map(|h| record.get(h).unwrap_or(MISSING).to_string())
                    .collect()
            })
            .collect();

        Self { header, rows }
    }

    /// Rows as ordered maps, for serialization as JSON objects.
    pub fn objects(&self) -> impl Iterator<Item = RowObject<'_>> {
        self.rows.iter().map(|row| RowObject {
            header: &self.header,
            cells: row,
        })
    }
}

fn render_outcome(outcome: &Outcome, failures: FailureRendering) -> Option<Record> {
    match outcome {
        Outcome::Success(record) => Some(record.clone()),
        Outcome::Failure { reason, identifier } => match failures {
            FailureRendering::Omit => None,
            FailureRendering::Sentinel => {
                let mut record = Record::blank(identifier.kind(), identifier.value());
                record.set(ERROR_FIELD, reason.as_str());
                Some(record)
            }
        },
    }
}

/// One row, serialized as a map in header order.
pub(super) struct RowObject<'a> {
    header: &'a [String],
    cells: &'a [String],
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.header.len()))?;
        for (name, cell) in self.header.iter().zip(self.cells) {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{FULL_NAME, Identifier, LookupKind};

    fn success(email: &str, name: &str) -> Outcome {
        let mut record = Record::blank(LookupKind::Email, email);
        record.set(FULL_NAME, name);
        Outcome::Success(record)
    }

    fn failure(email: &str) -> Outcome {
        Outcome::failure(
            "provider returned 404: not found",
            Identifier::new(LookupKind::Email, email),
        )
    }

    #[test]
    fn sentinel_rendering_keeps_failure_rows() {
        let outcomes = [success("a@x.com", "Jane Doe"), failure("bad@y.com")];
        let table = Table::from_outcomes(&outcomes, FailureRendering::Sentinel);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.header.last().map(String::as_str), Some(ERROR_FIELD));

        let error_col = table.header.len() - 1;
        let email_col = table.header.iter().position(|h| h == "email").unwrap();
        assert_eq!(table.rows[0][error_col], MISSING);
        assert_eq!(table.rows[1][email_col], "bad@y.com");
        assert_eq!(table.rows[1][error_col], "provider returned 404: not found");
    }

    #[test]
    fn omit_rendering_drops_failure_rows() {
        let outcomes = [failure("bad@y.com"), success("a@x.com", "Jane Doe")];
        let table = Table::from_outcomes(&outcomes, FailureRendering::Omit);

        assert_eq!(table.rows.len(), 1);
        assert!(!table.header.iter().any(|h| h == ERROR_FIELD));
        assert_eq!(table.rows[0][0], "Jane Doe");
    }

    #[test]
    fn empty_outcomes_give_empty_table() {
        let table = Table::from_outcomes(&[], FailureRendering::Sentinel);
        assert!(table.header.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn row_objects_keep_header_order() {
        let outcomes = [success("a@x.com", "Jane Doe")];
        let table = Table::from_outcomes(&outcomes, FailureRendering::Sentinel);

        let json = serde_json::to_string(&table.objects().next().unwrap()).unwrap();
        assert!(json.starts_with(r#"{"fullName":"Jane Doe","City":"#));
    }
}
