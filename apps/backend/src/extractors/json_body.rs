//! JSON request bodies that fail as problem+json instead of actix's plain
//! text error.

use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::trace_ctx;

/// Body limit for room requests. Claims are the largest and stay well under.
const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for JsonBody<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for JsonBody<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Bytes::from_request(req, payload);

        Box::pin(async move {
            let body = body.await.map_err(|e| {
                debug!(trace_id = %trace_ctx::trace_id(), error = %e, "Failed to read request body");
                AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
            })?;
            if body.len() > MAX_BODY_BYTES {
                return Err(AppError::bad_request(
                    ErrorCode::BadRequest,
                    format!("Request body exceeds {MAX_BODY_BYTES} bytes"),
                ));
            }

            serde_json::from_slice::<T>(&body).map(JsonBody).map_err(|e| {
                debug!(
                    trace_id = %trace_ctx::trace_id(),
                    body_size = body.len(),
                    line = e.line(),
                    column = e.column(),
                    "JSON body rejected"
                );
                AppError::bad_request(ErrorCode::BadRequest, describe(&e))
            })
        })
    }
}

/// Short, client-safe description. Field names from serde's data errors are
/// kept because they come from our own request types.
fn describe(error: &serde_json::Error) -> String {
    match error.classify() {
        Category::Syntax => format!("Invalid JSON at line {}", error.line()),
        Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        Category::Data => format!("Invalid request body: {error}"),
        Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}
