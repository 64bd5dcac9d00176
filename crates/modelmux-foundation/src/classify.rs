//! Task and complexity classification.
//!
//! Turns a validated request into the `(task type, complexity)` pair the
//! candidate tables are keyed on. Task resolution is pure; complexity falls
//! back to a [`ComplexityAnalyzer`] when the caller did not state one.

use crate::complexity::{ComplexityAnalyzer, ComplexitySignals};
use crate::request::Request;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of work a request represents.
///
/// Wire values are the snake_case names. [`TaskType::from_str_opt`] also
/// accepts a small set of role synonyms used by older callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TaskType {
    General,
    Architect,
    Coder,
    Qa,
    Classifier,
    Parser,
    SimpleChat,
    Decomposition,
    Planning,
    Pseudocode,
    CodeAnalysis,
    Refactoring,
    PatternAnalyzer,
    WebSearch,
}

impl TaskType {
    /// Parse a task type from the wire vocabulary.
    ///
    /// Accepts canonical names plus role synonyms (`planner`, `analysis`,
    /// `developer`, `implementation`, `tester`, `validation`). Returns `None`
    /// for unrecognised strings.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "general" => Some(Self::General),
            "architect" | "planner" | "analysis" => Some(Self::Architect),
            "coder" | "developer" | "implementation" => Some(Self::Coder),
            "qa" | "tester" | "validation" => Some(Self::Qa),
            "classifier" => Some(Self::Classifier),
            "parser" => Some(Self::Parser),
            "simple_chat" => Some(Self::SimpleChat),
            "decomposition" => Some(Self::Decomposition),
            "planning" => Some(Self::Planning),
            "pseudocode" => Some(Self::Pseudocode),
            "code_analysis" => Some(Self::CodeAnalysis),
            "refactoring" => Some(Self::Refactoring),
            "pattern_analyzer" => Some(Self::PatternAnalyzer),
            "web_search" => Some(Self::WebSearch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Architect => "architect",
            Self::Coder => "coder",
            Self::Qa => "qa",
            Self::Classifier => "classifier",
            Self::Parser => "parser",
            Self::SimpleChat => "simple_chat",
            Self::Decomposition => "decomposition",
            Self::Planning => "planning",
            Self::Pseudocode => "pseudocode",
            Self::CodeAnalysis => "code_analysis",
            Self::Refactoring => "refactoring",
            Self::PatternAnalyzer => "pattern_analyzer",
            Self::WebSearch => "web_search",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty tier driving model tier selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "medium" => Some(Self::Medium),
            "complex" => Some(Self::Complex),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered capability preference stated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityHint {
    Code,
    Reasoning,
    Creativity,
    Speed,
    Cost,
}

impl CapabilityHint {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "code" => Some(Self::Code),
            "reasoning" => Some(Self::Reasoning),
            "creativity" => Some(Self::Creativity),
            "speed" => Some(Self::Speed),
            "cost" => Some(Self::Cost),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Reasoning => "reasoning",
            Self::Creativity => "creativity",
            Self::Speed => "speed",
            Self::Cost => "cost",
        }
    }
}

impl fmt::Display for CapabilityHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved routing class of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub task_type: TaskType,
    pub complexity: Complexity,
}

/// Classify a validated request.
///
/// Task type precedence: explicit value, then a `code` hint (coder), then a
/// `reasoning` hint (architect), then general. An explicit complexity wins
/// outright and the analyzer is never consulted; otherwise the analyzer
/// decides from the request text and derived signals.
pub async fn classify(request: &Request, analyzer: &dyn ComplexityAnalyzer) -> Classification {
    let task_type = resolve_task_type(request);
    let complexity = match request.complexity {
        Some(complexity) => complexity,
        None => {
            let signals = ComplexitySignals {
                requires_code: task_type == TaskType::Coder,
                requires_reasoning: task_type == TaskType::Architect,
                context_length: request.content_len(),
            };
            analyzer.analyze(&request.content_text(), &signals).await
        }
    };
    Classification {
        task_type,
        complexity,
    }
}

fn resolve_task_type(request: &Request) -> TaskType {
    if let Some(task) = request.task_type {
        return task;
    }
    if request.capabilities.contains(&CapabilityHint::Code) {
        return TaskType::Coder;
    }
    if request.capabilities.contains(&CapabilityHint::Reasoning) {
        return TaskType::Architect;
    }
    TaskType::General
}
