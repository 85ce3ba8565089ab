//! Probabilistic failure injection for exercising client retry paths

use std::sync::Arc;

use rand::Rng;

pub const DEFAULT_FAULT_RATE: f64 = 0.2;

/// Uniform samples in `[0, 1)`
pub trait RandomSource: Send + Sync {
    fn sample(&self) -> f64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Always returns the same sample
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn sample(&self) -> f64 {
        self.0
    }
}

pub struct FaultInjector {
    rate: f64,
    random: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for FaultInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultInjector")
            .field("rate", &self.rate)
            .finish()
    }
}

impl Default for FaultInjector {
    fn default() -> Self {
        Self::new(DEFAULT_FAULT_RATE)
    }
}

impl FaultInjector {
    /// `rate` is clamped into `[0, 1]`; NaN disables injection.
    pub fn new(rate: f64) -> Self {
        Self::with_random(rate, Arc::new(ThreadRandom))
    }

    pub fn with_random(rate: f64, random: Arc<dyn RandomSource>) -> Self {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        Self { rate, random }
    }

    pub fn disabled() -> Self {
        Self::new(0.0)
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// True when this request should be failed
    pub fn should_fail(&self) -> bool {
        self.rate > 0.0 && self.random.sample() < self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_samples_decide_outcome() {
        let failing = FaultInjector::with_random(0.2, Arc::new(FixedRandom(0.19)));
        assert!(failing.should_fail());

        let passing = FaultInjector::with_random(0.2, Arc::new(FixedRandom(0.2)));
        assert!(!passing.should_fail());
    }

    #[test]
    fn test_disabled_never_fails() {
        let injector = FaultInjector::with_random(0.0, Arc::new(FixedRandom(0.0)));
        assert!(!injector.should_fail());
        assert!(!FaultInjector::disabled().should_fail());
    }

    #[test]
    fn test_rate_is_clamped() {
        assert_eq!(FaultInjector::new(1.5).rate(), 1.0);
        assert_eq!(FaultInjector::new(-0.5).rate(), 0.0);
        assert_eq!(FaultInjector::new(f64::NAN).rate(), 0.0);
    }

    #[test]
    fn test_full_rate_always_fails() {
        let injector = FaultInjector::new(1.0);
        assert!((0..100).all(|_| injector.should_fail()));
    }

    #[test]
    fn test_default_rate_is_roughly_one_in_five() {
        let injector = FaultInjector::default();
        let failures = (0..10_000).filter(|_| injector.should_fail()).count();
        assert!((1500..2500).contains(&failures), "failures = {}", failures);
    }
}
