//! Output formatting for CLI display.

use crate::model::{BatchResult, LookupKind, Outcome};
use crate::sink::{Destination, FailureRendering};

/// One-line summary of a finished batch.
pub(super) fn format_summary(
    result: &BatchResult,
    kind: LookupKind,
    destination: &Destination,
    failures: FailureRendering,
) -> String {
    let total = result.len();
    let failed = result.failed();
    let mut line = format!(
        "Enriched {total} {} ({} succeeded, {failed} failed) → {destination}",
        noun(kind, total),
        result.succeeded(),
    );
    if failed > 0 && failures == FailureRendering::Omit {
        line.push_str(" (failures omitted)");
    }
    line
}

/// One line per failed identifier, in input order.
pub(super) fn format_failures(result: &BatchResult) -> Vec<String> {
    result
        .outcomes()
        .iter()
        .filter_map(|outcome| match outcome {
            Outcome::Success(_) => None,
            Outcome::Failure { reason, identifier } => Some(format!("  ✗ {identifier}: {reason}")),
        })
        .collect()
}

fn noun(kind: LookupKind, count: usize) -> &'static str {
    if count != 1 {
        return kind.plural();
    }
    match kind {
        LookupKind::Email => "email",
        LookupKind::Phone => "phone number",
        LookupKind::Twitter => "handle",
    }
}
