//! Application state for the permit API

use std::sync::Arc;

use permit_core::{FaultInjector, PermitSource, RateLimiter};

/// Shared by every request. Built once at startup.
pub struct AppState {
    pub source: Arc<dyn PermitSource>,
    pub rate_limiter: RateLimiter,
    pub fault_injector: FaultInjector,
    /// Honour the `_bypass_rate_limit` / `_bypass_random_error` query flags
    pub allow_test_bypass: bool,
}

impl AppState {
    pub fn new(source: Arc<dyn PermitSource>) -> Self {
        Self {
            source,
            rate_limiter: RateLimiter::default(),
            fault_injector: FaultInjector::default(),
            allow_test_bypass: true,
        }
    }

    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    pub fn with_fault_injector(mut self, fault_injector: FaultInjector) -> Self {
        self.fault_injector = fault_injector;
        self
    }

    pub fn with_test_bypass(mut self, allow: bool) -> Self {
        self.allow_test_bypass = allow;
        self
    }
}
