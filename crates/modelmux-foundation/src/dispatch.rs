//! Single-request dispatch.
//!
//! A dispatch unit races one provider call against the configured deadline.
//! The call runs on its own task; when the deadline wins, the task is
//! abandoned, not aborted, so a slow provider can finish on its own without
//! a reply ever being published for it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{RouterError, RouterResult};
use crate::metrics::{DispatchOutcome, RouterMetrics};
use crate::pricing::estimate_cost_cents;
use crate::provider::{AdapterRegistry, ProviderCall, translate_tools};
use crate::reply::Response;
use crate::request::Request;
use crate::routing::Selection;

pub struct Dispatcher {
    registry: Arc<AdapterRegistry>,
    metrics: Arc<RouterMetrics>,
    request_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<AdapterRegistry>,
        metrics: Arc<RouterMetrics>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            metrics,
            request_timeout,
        }
    }

    /// Runs one provider call for an already-routed request.
    pub async fn dispatch(&self, request: &Request, selection: &Selection) -> RouterResult<Response> {
        if request.stream {
            return Err(RouterError::internal("streaming is not implemented"));
        }

        let adapter = self
            .registry
            .get(selection.provider)
            .await
            .ok_or_else(|| {
                RouterError::provider(
                    selection.provider.as_str(),
                    format!("no adapter registered for provider '{}'", selection.provider),
                )
            })?;

        let call = ProviderCall {
            model: selection.model.clone(),
            messages: request.messages.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tools: translate_tools(&request.tools),
        };

        let qualified = selection.qualified_name();
        let timeout_ms = self.request_timeout.as_millis() as u64;
        let started = Instant::now();

        let handle = tokio::spawn(async move { adapter.generate(call).await });

        match tokio::time::timeout(self.request_timeout, handle).await {
            Err(_elapsed) => {
                // Dropping the join handle leaves the provider task running
                // to completion; its result is discarded.
                tracing::warn!(model = %qualified, timeout_ms, "provider call exceeded deadline");
                self.metrics
                    .record_dispatch(
                        &qualified,
                        started.elapsed(),
                        DispatchOutcome::TimedOut,
                        None,
                        None,
                    )
                    .await;
                Err(RouterError::Timeout(timeout_ms))
            }
            Ok(Err(join_error)) => {
                tracing::error!(model = %qualified, error = %join_error, "provider task failed");
                self.metrics
                    .record_dispatch(
                        &qualified,
                        started.elapsed(),
                        DispatchOutcome::Failed,
                        None,
                        None,
                    )
                    .await;
                Err(RouterError::internal("provider task failed"))
            }
            Ok(Ok(Err(error))) => {
                tracing::warn!(model = %qualified, error = %error, "provider call failed");
                self.metrics
                    .record_dispatch(
                        &qualified,
                        started.elapsed(),
                        DispatchOutcome::Failed,
                        None,
                        None,
                    )
                    .await;
                Err(error)
            }
            Ok(Ok(Ok(output))) => {
                let cost_cents =
                    estimate_cost_cents(selection.provider, &selection.model, output.tokens_used);
                self.metrics
                    .record_dispatch(
                        &qualified,
                        started.elapsed(),
                        DispatchOutcome::Completed,
                        output.tokens_used,
                        cost_cents,
                    )
                    .await;

                let mut response = Response::new(output.text, qualified);
                if let Some(tokens) = output.tokens_used {
                    response = response.with_tokens_used(tokens);
                }
                if let Some(cost) = cost_cents {
                    response = response.with_cost_cents(cost);
                }
                if let Some(correlation_id) = &request.correlation_id {
                    response = response.with_correlation_id(correlation_id.clone());
                }
                Ok(response)
            }
        }
    }
}
