//! Engine configuration and per-call options.

use std::time::Duration;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::parser::Syntax;

/// What to substitute when no provider is registered for a token.
///
/// Distinct from the absent-value case: an unknown token usually means a
/// typo or a feature that is not loaded, so the default renders the token
/// back verbatim to aid debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownFallback {
    /// Render the token back verbatim, delimiters included.
    #[default]
    Verbatim,

    /// Substitute a fixed text.
    Text(String),
}

/// Engine-wide configuration.
///
/// Everything a host tunes lives here: delimiter syntax, the two fallback
/// texts, the result-cache lifetime, the re-resolution depth, and the
/// per-provider time budget. The types derive serde, so hosts can load the
/// whole block from a plugin config file.
///
/// # Example
///
/// ```
/// use tagfill::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .fallback_absent("-")
///     .cache_ttl_ticks(1)
///     .build();
/// assert_eq!(config.fallback_absent(), "-");
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct EngineConfig {
    /// Placeholder delimiter syntax.
    #[builder(default)]
    #[serde(default)]
    syntax: Syntax,

    /// Substitution for tokens with no registered provider.
    #[builder(default)]
    #[serde(default)]
    fallback_unknown: UnknownFallback,

    /// Substitution for absent values and failed providers.
    #[builder(default)]
    #[serde(default)]
    fallback_absent: String,

    /// Result-cache lifetime in game ticks; 0 disables caching.
    #[builder(default)]
    #[serde(default)]
    cache_ttl_ticks: u64,

    /// Re-resolution depth for resolved values that contain placeholder
    /// syntax; 0 disables, values above the hard cap are clamped.
    #[builder(default)]
    #[serde(default)]
    max_recursion_depth: usize,

    /// Per-provider wall-clock budget. A provider that exceeds it has its
    /// result discarded and is treated as absent.
    #[serde(default)]
    time_budget: Option<Duration>,
}

impl EngineConfig {
    /// The delimiter syntax.
    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// The unknown-token fallback.
    pub fn fallback_unknown(&self) -> &UnknownFallback {
        &self.fallback_unknown
    }

    /// The absent-value fallback.
    pub fn fallback_absent(&self) -> &str {
        &self.fallback_absent
    }

    /// The result-cache lifetime in ticks.
    pub fn cache_ttl_ticks(&self) -> u64 {
        self.cache_ttl_ticks
    }

    /// The configured re-resolution depth.
    pub fn max_recursion_depth(&self) -> usize {
        self.max_recursion_depth
    }

    /// The per-provider time budget, if any.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Per-call overrides for a single resolution.
///
/// Any override makes the call bypass the result cache, so option-sensitive
/// output never poisons entries shared with default-option callers.
///
/// # Example
///
/// ```
/// use tagfill::ResolveOptions;
///
/// let options = ResolveOptions::builder()
///     .fallback_absent("N/A".to_string())
///     .build();
/// assert_eq!(options.fallback_absent(), Some("N/A"));
/// ```
#[derive(Debug, Clone, Default, Builder)]
pub struct ResolveOptions {
    /// Override the unknown-token fallback for this call.
    fallback_unknown: Option<UnknownFallback>,

    /// Override the absent-value fallback for this call.
    fallback_absent: Option<String>,

    /// Override the re-resolution depth for this call (still hard-capped).
    max_recursion_depth: Option<usize>,
}

impl ResolveOptions {
    /// The unknown-token fallback override, if any.
    pub fn fallback_unknown(&self) -> Option<&UnknownFallback> {
        self.fallback_unknown.as_ref()
    }

    /// The absent-value fallback override, if any.
    pub fn fallback_absent(&self) -> Option<&str> {
        self.fallback_absent.as_deref()
    }

    /// The re-resolution depth override, if any.
    pub fn max_recursion_depth(&self) -> Option<usize> {
        self.max_recursion_depth
    }

    pub(crate) fn is_default(&self) -> bool {
        self.fallback_unknown.is_none()
            && self.fallback_absent.is_none()
            && self.max_recursion_depth.is_none()
    }
}
