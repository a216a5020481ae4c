//! Operation counters.
//!
//! Recorded through the `metrics` facade. The library installs no
//! recorder; without one every call is a no-op.

use crate::error::TokenError;

/// `zkt_operations_total{operation, outcome}`.
pub const OPERATIONS_TOTAL: &str = "zkt_operations_total";

/// `zkt_proof_admissions_total{operation, outcome}`.
pub const PROOF_ADMISSIONS_TOTAL: &str = "zkt_proof_admissions_total";

fn outcome<T>(result: &Result<T, TokenError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.category(),
    }
}

/// Count one contract operation.
pub fn record_operation<T>(operation: &'static str, result: &Result<T, TokenError>) {
    metrics::counter!(OPERATIONS_TOTAL, "operation" => operation, "outcome" => outcome(result))
        .increment(1);
}

/// Count one proof admission decision.
pub fn record_admission<T>(operation: &'static str, result: &Result<T, TokenError>) {
    metrics::counter!(PROOF_ADMISSIONS_TOTAL, "operation" => operation, "outcome" => outcome(result))
        .increment(1);
}
