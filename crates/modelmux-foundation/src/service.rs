//! Router service loop.
//!
//! [`RouterService`] subscribes to the request topic and runs one pull loop.
//! Admission happens on that loop, in arrival order: a semaphore permit is
//! taken with `try_acquire_owned` before a unit is spawned, and a message
//! that finds no permit is skipped outright, never queued and never replied
//! to. Each admitted unit validates, classifies, routes, dispatches, and
//! publishes exactly one reply.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, oneshot};
use tokio::task::{JoinHandle, JoinSet};

use modelmux_kernel::bus::{BusMessage, MessageBus};

use crate::classify::classify;
use crate::complexity::{ComplexityAnalyzer, HeuristicAnalyzer};
use crate::config::RouterConfig;
use crate::credentials::{CredentialStore, EnvCredentialStore};
use crate::dispatch::Dispatcher;
use crate::error::{RouterError, RouterResult};
use crate::metrics::RouterMetrics;
use crate::provider::AdapterRegistry;
use crate::reply::{ErrorEnvelope, ReplyEmitter};
use crate::request::RawRequest;
use crate::routing::resolve;

/// Handle to a started router. Dropping it also stops the service.
pub struct ServiceHandle {
    stop: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl ServiceHandle {
    /// Stops pulling new requests and waits for in-flight units to finish.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        let _ = self.join.await;
    }
}

pub struct RouterService {
    bus: Arc<dyn MessageBus>,
    registry: Arc<AdapterRegistry>,
    credentials: Arc<dyn CredentialStore>,
    analyzer: Arc<dyn ComplexityAnalyzer>,
    metrics: Arc<RouterMetrics>,
    config: RouterConfig,
}

impl RouterService {
    pub fn new(
        bus: Arc<dyn MessageBus>,
        registry: Arc<AdapterRegistry>,
        config: RouterConfig,
    ) -> Self {
        Self {
            bus,
            registry,
            credentials: Arc::new(EnvCredentialStore),
            analyzer: Arc::new(HeuristicAnalyzer),
            metrics: Arc::new(RouterMetrics::new()),
            config,
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn ComplexityAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn metrics(&self) -> Arc<RouterMetrics> {
        self.metrics.clone()
    }

    /// Subscribes to the request topic and spawns the pull loop.
    pub async fn start(self) -> RouterResult<ServiceHandle> {
        let mut subscription = self
            .bus
            .subscribe(&self.config.topics.request)
            .await
            .map_err(|e| RouterError::internal(format!("failed to subscribe: {e}")))?;

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let max_concurrent = self.config.max_concurrent;
        let limiter = Arc::new(Semaphore::new(max_concurrent));

        let inner = Arc::new(ServiceInner {
            dispatcher: Dispatcher::new(
                self.registry.clone(),
                self.metrics.clone(),
                Duration::from_millis(self.config.request_timeout_ms),
            ),
            emitter: ReplyEmitter::new(self.bus.clone(), self.config.topics.clone()),
            credentials: self.credentials.clone(),
            analyzer: self.analyzer.clone(),
            metrics: self.metrics.clone(),
        });

        tracing::info!(
            topic = %self.config.topics.request,
            max_concurrent,
            timeout_ms = self.config.request_timeout_ms,
            "router service started"
        );

        let join = tokio::spawn(async move {
            let mut units = JoinSet::new();
            loop {
                tokio::select! {
                    // Operator-initiated shutdown.
                    _ = &mut stop_rx => {
                        tracing::info!("router service stopping");
                        break;
                    }
                    // Next inbound request, admitted in arrival order.
                    maybe_message = subscription.next() => {
                        let Some(message) = maybe_message else {
                            tracing::info!("request topic closed, stopping");
                            break;
                        };
                        inner.metrics.record_received();
                        match limiter.clone().try_acquire_owned() {
                            Ok(permit) => {
                                let inner = inner.clone();
                                units.spawn(async move {
                                    inner.handle_message(message).await;
                                    drop(permit);
                                });
                            }
                            Err(_) => {
                                inner.metrics.record_skipped();
                                tracing::warn!(
                                    message_id = %message.message_id,
                                    max_concurrent,
                                    "at capacity, skipping request"
                                );
                            }
                        }
                        // Reap finished units without blocking the loop.
                        while units.try_join_next().is_some() {}
                    }
                }
            }
            // Stop pulling, then let in-flight units run to completion.
            drop(subscription);
            while units.join_next().await.is_some() {}
        });

        Ok(ServiceHandle {
            stop: stop_tx,
            join,
        })
    }
}

struct ServiceInner {
    dispatcher: Dispatcher,
    emitter: ReplyEmitter,
    credentials: Arc<dyn CredentialStore>,
    analyzer: Arc<dyn ComplexityAnalyzer>,
    metrics: Arc<RouterMetrics>,
}

impl ServiceInner {
    /// Full pipeline for one admitted message. Every exit path publishes
    /// exactly one reply.
    async fn handle_message(&self, message: BusMessage) {
        let reply_to = message.reply_to.clone();

        let raw: RawRequest = match message.decode() {
            Ok(raw) => raw,
            Err(e) => {
                let error = RouterError::validation(format!("invalid request payload: {e}"));
                tracing::warn!(message_id = %message.message_id, error = %error, "rejected request");
                self.emitter
                    .emit_error(
                        reply_to.as_deref(),
                        &ErrorEnvelope::from_error(&error, message.correlation_id.clone()),
                    )
                    .await;
                return;
            }
        };

        // Payload correlation wins; the envelope's is a fallback for replies
        // to payloads that never parsed far enough to carry one.
        let correlation_id = raw
            .correlation_id
            .clone()
            .or_else(|| message.correlation_id.clone());

        let request = match raw.validate() {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(message_id = %message.message_id, error = %error, "rejected request");
                self.emitter
                    .emit_error(
                        reply_to.as_deref(),
                        &ErrorEnvelope::from_error(&error, correlation_id),
                    )
                    .await;
                return;
            }
        };

        let classification = classify(&request, self.analyzer.as_ref()).await;
        let selection = match resolve(&request, classification, self.credentials.as_ref()) {
            Ok(selection) => selection,
            Err(error) => {
                tracing::warn!(message_id = %message.message_id, error = %error, "routing failed");
                self.emitter
                    .emit_error(
                        reply_to.as_deref(),
                        &ErrorEnvelope::from_error(&error, correlation_id),
                    )
                    .await;
                return;
            }
        };

        tracing::info!(
            message_id = %message.message_id,
            task = %classification.task_type,
            complexity = %classification.complexity,
            model = %selection.qualified_name(),
            reason = selection.reason,
            "dispatching request"
        );

        match self.dispatcher.dispatch(&request, &selection).await {
            Ok(response) => {
                self.emitter
                    .emit_response(reply_to.as_deref(), &response)
                    .await;
            }
            Err(error) => {
                self.emitter
                    .emit_error(
                        reply_to.as_deref(),
                        &ErrorEnvelope::from_error(&error, correlation_id),
                    )
                    .await;
            }
        }
    }
}
