//! Per-request trace id, carried in a Tokio task-local.
//!
//! Set by the `RequestTrace` middleware and read when rendering problem
//! details, so an error body always names the request it came from. Work
//! spawned off a request (bot dispatch, auto calls) runs outside the scope
//! and reports "unknown".

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

const UNKNOWN: &str = "unknown";

pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// Run `future` with `trace_id` visible to [`trace_id()`].
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
