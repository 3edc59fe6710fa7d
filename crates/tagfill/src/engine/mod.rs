//! Placeholder resolution engine.
//!
//! This module provides the runtime half of the crate: the provider
//! registry, the per-call resolution context, the engine that turns
//! templates plus live game state into final strings, and the lint checks
//! tooling runs over templates.

mod cache;
mod config;
mod context;
mod error;
pub mod lint;
mod registry;
mod resolver;

pub use config::{EngineConfig, ResolveOptions, UnknownFallback};
pub use context::{ResolutionContext, Subject};
pub use error::{compute_suggestions, ProviderError};
pub use lint::{lint_template, lint_with_registry, LintWarning};
pub use registry::{Provider, ProviderRegistry};
pub use resolver::Engine;
