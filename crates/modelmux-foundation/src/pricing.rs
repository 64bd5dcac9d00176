//! Completion cost estimation.
//!
//! A static price table keyed on `(provider, model)`. Metered models carry a
//! blended USD rate per 1 000 tokens; subscription providers always price at
//! zero. Models missing from the table yield no estimate rather than a
//! guess. Dated model variants (`claude-sonnet-4-20250514`) price as their
//! base name.

use crate::candidates::Provider;

/// How access to a model is billed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Billing {
    /// Metered API billing at a blended USD rate per 1 000 tokens.
    Metered { usd_per_1k_tokens: f64 },
    /// Flat-rate subscription; per-request cost reports as zero.
    Subscription,
}

impl Billing {
    /// Estimated cost in cents for `tokens` total tokens.
    pub fn estimate_cents(&self, tokens: u32) -> f64 {
        match self {
            Self::Metered { usd_per_1k_tokens } => {
                f64::from(tokens) / 1000.0 * usd_per_1k_tokens * 100.0
            }
            Self::Subscription => 0.0,
        }
    }
}

/// Billing entry for one (provider, model) pair, or `None` when unpriced.
pub fn billing_for(provider: Provider, model: &str) -> Option<Billing> {
    let model = base_model(model);
    match provider {
        // Copilot and Codex ride on seat subscriptions, not token metering.
        Provider::Copilot | Provider::Codex => Some(Billing::Subscription),
        Provider::Claude => match model {
            "claude-opus-4" => Some(Billing::Metered {
                usd_per_1k_tokens: 0.045,
            }),
            "claude-sonnet-4" => Some(Billing::Metered {
                usd_per_1k_tokens: 0.009,
            }),
            "claude-3-5-haiku" => Some(Billing::Metered {
                usd_per_1k_tokens: 0.0024,
            }),
            _ => None,
        },
        Provider::Gemini => match model {
            "gemini-2.5-pro" => Some(Billing::Metered {
                usd_per_1k_tokens: 0.00625,
            }),
            "gemini-2.5-flash" => Some(Billing::Metered {
                usd_per_1k_tokens: 0.0011,
            }),
            _ => None,
        },
    }
}

/// Cost in cents for a completed call, when it can be priced.
///
/// Subscription providers report zero whether or not usage came back.
/// Metered models need reported usage; without it there is no estimate.
pub fn estimate_cost_cents(
    provider: Provider,
    model: &str,
    tokens_used: Option<u32>,
) -> Option<f64> {
    let billing = billing_for(provider, model)?;
    match billing {
        Billing::Subscription => Some(0.0),
        Billing::Metered { .. } => tokens_used.map(|tokens| billing.estimate_cents(tokens)),
    }
}

/// Strip a trailing `-YYYYMMDD` date suffix so dated snapshots price as
/// their base model.
fn base_model(model: &str) -> &str {
    if let Some(idx) = model.rfind('-') {
        let suffix = &model[idx + 1..];
        if suffix.len() == 8 && suffix.chars().all(|c| c.is_ascii_digit()) {
            return &model[..idx];
        }
    }
    model
}
