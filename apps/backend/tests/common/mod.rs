#![allow(dead_code)]

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use serde_json::Value;

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Read a JSON body, failing with the raw text if it does not parse.
pub async fn json_body(resp: ServiceResponse<BoxBody>) -> Value {
    let bytes = test::read_body(resp).await;
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("invalid JSON ({e}): {}", String::from_utf8_lossy(&bytes)))
}
