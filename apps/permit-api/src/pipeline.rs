//! Admission stages that run before any route handler
//!
//! Order matters: the rate limiter runs first so rejected requests never
//! reach the fault injector, and the fault injector runs before routing so an
//! injected failure leaves no partial work behind.

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Reserved query flags that let test suites skip admission stages
#[derive(Debug, Default, Deserialize)]
struct BypassFlags {
    #[serde(rename = "_bypass_rate_limit")]
    rate_limit: Option<String>,
    #[serde(rename = "_bypass_random_error")]
    random_error: Option<String>,
}

impl BypassFlags {
    fn from_request(state: &AppState, req: &Request) -> Self {
        if !state.allow_test_bypass {
            return Self::default();
        }
        Query::<BypassFlags>::try_from_uri(req.uri())
            .map(|Query(flags)| flags)
            .unwrap_or_default()
    }

    fn skip_rate_limit(&self) -> bool {
        self.rate_limit.as_deref() == Some("true")
    }

    fn skip_fault_injection(&self) -> bool {
        self.random_error.as_deref() == Some("true")
    }
}

pub async fn rate_limit(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    if BypassFlags::from_request(&state, &req).skip_rate_limit() {
        return next.run(req).await;
    }

    if !state.rate_limiter.check().is_admitted() {
        tracing::warn!(
            path = %req.uri().path(),
            limit = state.rate_limiter.capacity(),
            "Rate limit exceeded"
        );
        return ApiError::RateLimitExceeded(state.rate_limiter.rejection_message()).into_response();
    }

    next.run(req).await
}

pub async fn inject_faults(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if !BypassFlags::from_request(&state, &req).skip_fault_injection()
        && state.fault_injector.should_fail()
    {
        tracing::debug!(path = %req.uri().path(), "Injecting random server error");
        return ApiError::InjectedFault.into_response();
    }

    next.run(req).await
}

/// Last-resort handler for panics raised anywhere below the catch-panic layer
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}
