//! Candidate generation.
//!
//! A static preference matrix keyed on `(task type, complexity)` yields an
//! ordered list of `(provider, model)` candidates, best first. Rows are
//! curated: strong expensive models sit at the top of complex tiers, cheap
//! fast models at the top of simple tiers. Task types without a dedicated
//! row share the general row.

use crate::classify::{Complexity, TaskType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider the router can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Claude,
    Gemini,
    Copilot,
    Codex,
}

impl Provider {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "claude" => Some(Self::Claude),
            "gemini" => Some(Self::Gemini),
            "copilot" => Some(Self::Copilot),
            "codex" => Some(Self::Codex),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Gemini => "gemini",
            Self::Copilot => "copilot",
            Self::Codex => "codex",
        }
    }

    /// Infer the owning provider from a model name prefix.
    ///
    /// `claude*` is Anthropic, `gemini*` is Google, `gpt-*` ships through
    /// Copilot, `o3*` through Codex. Returns `None` for anything else.
    pub fn infer_from_model(model: &str) -> Option<Self> {
        let model = model.to_lowercase();
        if model.starts_with("claude") {
            Some(Self::Claude)
        } else if model.starts_with("gemini") {
            Some(Self::Gemini)
        } else if model.starts_with("gpt-") {
            Some(Self::Copilot)
        } else if model.starts_with("o3") {
            Some(Self::Codex)
        } else {
            None
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a preference row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub provider: Provider,
    pub model: String,
}

impl Candidate {
    fn new(provider: Provider, model: &str) -> Self {
        Self {
            provider,
            model: model.to_string(),
        }
    }
}

/// Ordered candidates for a `(task, complexity)` pair. Never empty.
pub fn candidates_for(task: TaskType, complexity: Complexity) -> Vec<Candidate> {
    preference_row(task, complexity)
        .iter()
        .map(|(provider, model)| Candidate::new(*provider, model))
        .collect()
}

/// Filter candidates to the hinted provider, preserving order.
///
/// The filter is skipped when the hint is absent, unknown, or would leave
/// the list empty; a stray hint must not strand the request.
pub fn filter_by_provider(candidates: Vec<Candidate>, hint: Option<&str>) -> Vec<Candidate> {
    let Some(provider) = hint.and_then(Provider::from_str_opt) else {
        return candidates;
    };
    let filtered: Vec<Candidate> = candidates
        .iter()
        .filter(|c| c.provider == provider)
        .cloned()
        .collect();
    if filtered.is_empty() { candidates } else { filtered }
}

fn preference_row(task: TaskType, complexity: Complexity) -> &'static [(Provider, &'static str)] {
    use Complexity::*;
    use Provider::*;

    match task {
        TaskType::Coder | TaskType::Refactoring | TaskType::Pseudocode => match complexity {
            Simple => &[
                (Claude, "claude-3-5-haiku"),
                (Copilot, "gpt-4o-mini"),
                (Gemini, "gemini-2.5-flash"),
            ],
            Medium => &[
                (Claude, "claude-sonnet-4"),
                (Codex, "o3-mini"),
                (Copilot, "gpt-4o"),
            ],
            Complex => &[
                (Claude, "claude-opus-4"),
                (Codex, "o3"),
                (Claude, "claude-sonnet-4"),
            ],
        },
        TaskType::Architect | TaskType::Planning | TaskType::Decomposition => match complexity {
            Simple => &[
                (Claude, "claude-sonnet-4"),
                (Gemini, "gemini-2.5-flash"),
                (Copilot, "gpt-4o"),
            ],
            Medium => &[
                (Claude, "claude-sonnet-4"),
                (Codex, "o3-mini"),
                (Gemini, "gemini-2.5-pro"),
            ],
            Complex => &[
                (Claude, "claude-opus-4"),
                (Codex, "o3"),
                (Gemini, "gemini-2.5-pro"),
            ],
        },
        TaskType::CodeAnalysis | TaskType::PatternAnalyzer => match complexity {
            Simple => &[
                (Claude, "claude-3-5-haiku"),
                (Gemini, "gemini-2.5-flash"),
                (Copilot, "gpt-4o-mini"),
            ],
            Medium => &[
                (Claude, "claude-sonnet-4"),
                (Gemini, "gemini-2.5-pro"),
                (Codex, "o3-mini"),
            ],
            Complex => &[
                (Claude, "claude-opus-4"),
                (Claude, "claude-sonnet-4"),
                (Codex, "o3"),
            ],
        },
        TaskType::Qa => match complexity {
            Simple => &[
                (Claude, "claude-3-5-haiku"),
                (Gemini, "gemini-2.5-flash"),
                (Copilot, "gpt-4o-mini"),
            ],
            Medium => &[
                (Claude, "claude-sonnet-4"),
                (Copilot, "gpt-4o"),
                (Gemini, "gemini-2.5-pro"),
            ],
            Complex => &[
                (Claude, "claude-opus-4"),
                (Codex, "o3"),
                (Gemini, "gemini-2.5-pro"),
            ],
        },
        TaskType::Classifier | TaskType::Parser => match complexity {
            Simple => &[
                (Gemini, "gemini-2.5-flash"),
                (Claude, "claude-3-5-haiku"),
                (Copilot, "gpt-4o-mini"),
            ],
            Medium => &[
                (Gemini, "gemini-2.5-flash"),
                (Claude, "claude-3-5-haiku"),
                (Copilot, "gpt-4o"),
            ],
            Complex => &[
                (Claude, "claude-sonnet-4"),
                (Gemini, "gemini-2.5-pro"),
                (Copilot, "gpt-4o"),
            ],
        },
        TaskType::SimpleChat => match complexity {
            Simple => &[
                (Claude, "claude-3-5-haiku"),
                (Copilot, "gpt-4o-mini"),
                (Gemini, "gemini-2.5-flash"),
            ],
            Medium => &[
                (Claude, "claude-3-5-haiku"),
                (Copilot, "gpt-4o"),
                (Gemini, "gemini-2.5-flash"),
            ],
            Complex => &[
                (Claude, "claude-sonnet-4"),
                (Copilot, "gpt-4o"),
                (Gemini, "gemini-2.5-pro"),
            ],
        },
        TaskType::WebSearch => match complexity {
            Simple => &[
                (Gemini, "gemini-2.5-flash"),
                (Copilot, "gpt-4o-mini"),
                (Claude, "claude-3-5-haiku"),
            ],
            Medium => &[
                (Gemini, "gemini-2.5-pro"),
                (Gemini, "gemini-2.5-flash"),
                (Copilot, "gpt-4o"),
            ],
            Complex => &[
                (Gemini, "gemini-2.5-pro"),
                (Claude, "claude-sonnet-4"),
                (Copilot, "gpt-4o"),
            ],
        },
        // General and any future task type share the general row.
        _ => match complexity {
            Simple => &[
                (Claude, "claude-3-5-haiku"),
                (Gemini, "gemini-2.5-flash"),
                (Copilot, "gpt-4o-mini"),
            ],
            Medium => &[
                (Claude, "claude-sonnet-4"),
                (Copilot, "gpt-4o"),
                (Gemini, "gemini-2.5-pro"),
            ],
            Complex => &[
                (Claude, "claude-opus-4"),
                (Gemini, "gemini-2.5-pro"),
                (Codex, "o3"),
            ],
        },
    }
}
