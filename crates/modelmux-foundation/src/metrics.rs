//! In-process dispatch metrics.
//!
//! Counters for the operator-facing picture: how many requests arrived, how
//! many were shed at admission, and how dispatches ended, plus per-model
//! usage. Everything is cheap enough to record inline on the dispatch path.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Terminal outcome of one dispatch unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Completed,
    Failed,
    TimedOut,
}

/// Aggregated usage for one qualified model name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelUsage {
    pub calls: u64,
    pub tokens: u64,
    pub cost_cents: f64,
}

/// Router-wide counters. All methods take `&self`; share behind an `Arc`.
#[derive(Debug, Default)]
pub struct RouterMetrics {
    received: AtomicU64,
    skipped: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
    total_dispatch_ms: AtomicU64,
    model_usage: RwLock<HashMap<String, ModelUsage>>,
}

impl RouterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A message arrived on the pull loop.
    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    /// A message was shed at admission.
    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// A dispatch unit finished.
    pub async fn record_dispatch(
        &self,
        model: &str,
        duration: Duration,
        outcome: DispatchOutcome,
        tokens: Option<u32>,
        cost_cents: Option<f64>,
    ) {
        match outcome {
            DispatchOutcome::Completed => self.completed.fetch_add(1, Ordering::Relaxed),
            DispatchOutcome::Failed => self.failed.fetch_add(1, Ordering::Relaxed),
            DispatchOutcome::TimedOut => self.timed_out.fetch_add(1, Ordering::Relaxed),
        };
        self.total_dispatch_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);

        let mut usage = self.model_usage.write().await;
        let entry = usage.entry(model.to_string()).or_default();
        entry.calls += 1;
        if let Some(tokens) = tokens {
            entry.tokens += u64::from(tokens);
        }
        if let Some(cost) = cost_cents {
            entry.cost_cents += cost;
        }
    }

    /// Point-in-time copy of all counters.
    pub async fn snapshot(&self) -> MetricsSnapshot {
        let model_usage = self.model_usage.read().await.clone();
        MetricsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            total_dispatch_ms: self.total_dispatch_ms.load(Ordering::Relaxed),
            model_usage,
        }
    }
}

/// Snapshot of [`RouterMetrics`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub received: u64,
    pub skipped: u64,
    pub completed: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub total_dispatch_ms: u64,
    pub model_usage: HashMap<String, ModelUsage>,
}
