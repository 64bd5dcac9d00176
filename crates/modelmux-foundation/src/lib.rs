// error module
pub mod error;

// request module - inbound payload shapes and validation
pub mod request;

// classify module - task type and complexity resolution
pub mod classify;

// complexity module - analyzer seam and heuristic default
pub mod complexity;

// candidates module - static (task, complexity) preference matrix
pub mod candidates;

// capability module - capability-hint re-ranking
pub mod capability;

// credentials module - provider credential checks
pub mod credentials;

// routing module - candidate selection
pub mod routing;

// provider module - adapter seam and registry
pub mod provider;

// pricing module - static price table and cost estimation
pub mod pricing;

// dispatch module - deadline-raced provider calls
pub mod dispatch;

// reply module - response and error publishing
pub mod reply;

// metrics module
pub mod metrics;

// config module
pub mod config;

// service module - bus-facing pull loop
pub mod service;

// Re-export error types
pub use error::{RouterError, RouterResult};

// Re-export request types
pub use request::{ChatMessage, RawRequest, Request, Role, ToolSpec};

// Re-export classification types
pub use classify::{CapabilityHint, Classification, Complexity, TaskType, classify};

// Re-export complexity types
pub use complexity::{ComplexityAnalyzer, ComplexitySignals, HeuristicAnalyzer};

// Re-export routing types
pub use candidates::{Candidate, Provider, candidates_for};
pub use routing::{Selection, resolve};

// Re-export credential types
pub use credentials::{CredentialStore, EnvCredentialStore, StaticCredentialStore, required_env};

// Re-export provider types
pub use provider::{AdapterRegistry, GenerateOutput, ProviderAdapter, ProviderCall};

// Re-export dispatch and reply types
pub use dispatch::Dispatcher;
pub use reply::{ErrorEnvelope, ReplyEmitter, Response};

// Re-export metrics types
pub use metrics::{DispatchOutcome, MetricsSnapshot, ModelUsage, RouterMetrics};

// Re-export config types
pub use config::{RouterConfig, TopicConfig};

// Re-export service types
pub use service::{RouterService, ServiceHandle};
