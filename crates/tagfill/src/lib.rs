//! Placeholder resolution for game-server plugin text.
//!
//! Parses tokens like `%player_name%` out of arbitrary strings, resolves
//! them against a registry of providers bound to live game state, and
//! reassembles the final string. Resolution is total: malformed templates,
//! unknown tokens, absent values, and failing providers all degrade to
//! configured fallbacks, never errors — and the engine is safe to share
//! across every event-loop worker that formats text.
//!
//! # Example
//!
//! ```
//! use tagfill::{Engine, EngineConfig, ProviderKey, ResolutionContext};
//!
//! let engine = Engine::new(EngineConfig::default());
//! let registry = engine.registry();
//! registry.register_value(ProviderKey::namespaced("player", "name"), "Ash");
//! registry.register_value(ProviderKey::namespaced("stats", "kills"), 17);
//!
//! let ctx = ResolutionContext::detached();
//! let out = engine.resolve("Hello, %player_name%! You have %stats_kills% kills.", &ctx);
//! assert_eq!(out, "Hello, Ash! You have 17 kills.");
//! ```

pub mod engine;
pub mod format;
pub mod parser;
pub mod types;

pub use engine::{
    compute_suggestions, lint_template, lint_with_registry, Engine, EngineConfig, LintWarning,
    Provider, ProviderError, ProviderRegistry, ResolutionContext, ResolveOptions, Subject,
    UnknownFallback,
};
pub use format::{format_value, FormatHints};
pub use parser::{parse_template, Segment, Syntax, SyntaxError, Template, Token};
pub use types::{ProviderKey, Value};
