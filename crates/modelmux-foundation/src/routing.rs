//! Final (provider, model) resolution.
//!
//! Two paths out of classification:
//!
//! - **Explicit model**: the owning provider comes from the provider hint
//!   when it names a known provider, otherwise from the model name prefix.
//!   The chosen provider must have credentials.
//! - **Auto-select**: walk the preference row for the classification,
//!   filtered by provider hint and re-ranked by capability hints, and take
//!   the first provider with credentials.
//!
//! Resolution is pure: all side effects live with the caller.

use crate::candidates::{self, Provider};
use crate::capability;
use crate::classify::{Classification, Complexity};
use crate::credentials::CredentialStore;
use crate::error::{RouterError, RouterResult};
use crate::request::Request;

/// Where a request will be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub provider: Provider,
    pub model: String,
    /// Complexity tier the request was routed at.
    pub complexity: Complexity,
    /// Short tag explaining how the selection was made.
    pub reason: &'static str,
}

impl Selection {
    /// Reply-facing name, `provider:model`.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.provider, self.model)
    }
}

/// Resolve the final selection for a classified request.
///
/// A model of `"auto"` is the same as no model at all.
pub fn resolve(
    request: &Request,
    classification: Classification,
    credentials: &dyn CredentialStore,
) -> RouterResult<Selection> {
    match request.model.as_deref() {
        Some(model) if model != "auto" => resolve_explicit(
            model,
            request.provider.as_deref(),
            classification.complexity,
            credentials,
        ),
        _ => resolve_auto(request, classification, credentials),
    }
}

fn resolve_explicit(
    model: &str,
    provider_hint: Option<&str>,
    complexity: Complexity,
    credentials: &dyn CredentialStore,
) -> RouterResult<Selection> {
    let provider = provider_hint
        .and_then(Provider::from_str_opt)
        .or_else(|| Provider::infer_from_model(model))
        .ok_or_else(|| {
            RouterError::provider(
                "model_selection",
                format!("cannot determine provider for model '{model}'"),
            )
        })?;

    if !credentials.is_available(provider) {
        let missing = credentials.missing_credentials(provider).join(", ");
        return Err(RouterError::provider(
            provider.as_str(),
            format!("provider unavailable, missing credentials: {missing}"),
        ));
    }

    Ok(Selection {
        provider,
        model: model.to_string(),
        complexity,
        reason: "explicit-model",
    })
}

fn resolve_auto(
    request: &Request,
    classification: Classification,
    credentials: &dyn CredentialStore,
) -> RouterResult<Selection> {
    let row = candidates::candidates_for(classification.task_type, classification.complexity);
    let filtered = candidates::filter_by_provider(row, request.provider.as_deref());
    let ranked = capability::rerank(filtered, &request.capabilities);

    for candidate in ranked {
        if credentials.is_available(candidate.provider) {
            tracing::debug!(
                provider = %candidate.provider,
                model = %candidate.model,
                task = %classification.task_type,
                complexity = %classification.complexity,
                "auto-selected candidate"
            );
            return Ok(Selection {
                provider: candidate.provider,
                model: candidate.model,
                complexity: classification.complexity,
                reason: "auto-select",
            });
        }
    }

    Err(RouterError::provider(
        "auto_select",
        format!(
            "no available provider for task {} at {} complexity",
            classification.task_type, classification.complexity
        ),
    ))
}
