//! One structured log line per completed request, tagged with the room the
//! request touched when the path names one.
//!
//! Register it before `RequestTrace` (so it runs inside it) and the trace id
//! is already in the request extensions when this middleware reads it.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use super::request_trace::TraceId;

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, trace_id, room_id) = match &result {
                Ok(res) => (
                    res.status(),
                    res.request()
                        .extensions()
                        .get::<TraceId>()
                        .map_or_else(|| "unknown".to_string(), |t| t.0.clone()),
                    res.request().match_info().get("room_id").map(str::to_string),
                ),
                Err(err) => (
                    err.as_response_error().status_code(),
                    "unknown".to_string(),
                    None,
                ),
            };
            let status_code = status.as_u16();
            let duration_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
            let room_id = room_id.as_deref();

            if status.is_server_error() {
                error!(http.method = %method, url.path = %path, http.status_code = status_code, duration_us, room_id, trace_id = %trace_id, "request_completed");
            } else if status.is_client_error() {
                warn!(http.method = %method, url.path = %path, http.status_code = status_code, duration_us, room_id, trace_id = %trace_id, "request_completed");
            } else {
                info!(http.method = %method, url.path = %path, http.status_code = status_code, duration_us, room_id, trace_id = %trace_id, "request_completed");
            }

            result
        })
    }
}
