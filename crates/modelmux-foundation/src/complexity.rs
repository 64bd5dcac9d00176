//! Complexity analysis seam.

use crate::classify::Complexity;
use async_trait::async_trait;

/// Below this many request characters a request with no code or reasoning
/// signal counts as simple.
pub const SIMPLE_MAX_CONTEXT: usize = 400;
/// At or above this many request characters a request counts as complex.
pub const COMPLEX_MIN_CONTEXT: usize = 4000;

/// Signals derived from the request that accompany the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComplexitySignals {
    pub requires_code: bool,
    pub requires_reasoning: bool,
    /// Total length of all message contents.
    pub context_length: usize,
}

/// Estimates request complexity when the caller did not state one.
///
/// Implementations may call out to an external analysis service; the router
/// only needs the final tier.
#[async_trait]
pub trait ComplexityAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str, signals: &ComplexitySignals) -> Complexity;
}

/// Threshold-based analyzer used when no external analysis service is wired
/// in. Deterministic, so classification stays reproducible in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

#[async_trait]
impl ComplexityAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, _text: &str, signals: &ComplexitySignals) -> Complexity {
        if signals.context_length >= COMPLEX_MIN_CONTEXT
            || (signals.requires_code && signals.requires_reasoning)
        {
            Complexity::Complex
        } else if signals.context_length < SIMPLE_MAX_CONTEXT
            && !signals.requires_code
            && !signals.requires_reasoning
        {
            Complexity::Simple
        } else {
            Complexity::Medium
        }
    }
}
