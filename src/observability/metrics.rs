//! Metrics collection.
//!
//! # Metrics
//! - `drips_planned_calls_total` (counter): calls emitted by collection plans
//! - `drips_claim_steps_total` (counter): claim steps by `step` and `outcome`
//! - `drips_rpc_failures_total` (counter): failed RPC requests by `method`

/// Record the number of calls in a collection plan.
pub fn record_planned_calls(count: usize) {
    ::metrics::counter!("drips_planned_calls_total").increment(count as u64);
}

/// Record the outcome of one claim step.
pub fn record_claim_step(step: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!("drips_claim_steps_total", "step" => step, "outcome" => outcome).increment(1);
}

/// Record a failed RPC request.
pub fn record_rpc_failure(method: &'static str) {
    ::metrics::counter!("drips_rpc_failures_total", "method" => method).increment(1);
}
