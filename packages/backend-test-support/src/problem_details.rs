//! Assertions for the backend's problem+json error contract.
//!
//! Kept free of backend types so the contract is checked from the outside.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Check status, content type, code and trace-id parity, then hand the
/// parsed body back for anything more specific.
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
) -> ProblemDetailsLike {
    assert_eq!(status, expected_status, "body: {}", String::from_utf8_lossy(body));

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(content_type, "application/problem+json");

    let problem: ProblemDetailsLike =
        serde_json::from_slice(body).expect("body should be problem+json");
    let header_trace = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id should be ASCII");

    assert_eq!(problem.trace_id, header_trace, "body trace_id must match header");
    assert_eq!(problem.code, expected_code, "detail: {}", problem.detail);
    assert_eq!(problem.status, expected_status.as_u16());
    assert!(
        problem.type_.ends_with(expected_code),
        "type {} should end with the code",
        problem.type_
    );
    problem
}

pub async fn assert_problem_details_from_service_response(
    resp: ServiceResponse<BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
) -> ProblemDetailsLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;
    assert_problem_details_from_parts(status, &headers, &body, expected_code, expected_status)
}
