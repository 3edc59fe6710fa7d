//! Error types for providers and resolution.
//!
//! Resolution itself is total — `resolve` always returns a string — so
//! these types surface at the provider boundary and in logs, never to the
//! caller of `resolve`.

use thiserror::Error;

/// An error raised by a placeholder provider.
///
/// Caught at the engine boundary and converted into the absent-value
/// fallback; one misbehaving provider never breaks the whole template.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A free-form failure description.
    #[error("{0}")]
    Message(String),

    /// A wrapped source error.
    #[error(transparent)]
    Source(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl ProviderError {
    /// Create an error from any message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Why a guarded provider call produced no value.
#[derive(Debug, Error)]
pub(crate) enum CallFailure {
    #[error("provider failed: {0}")]
    Failed(ProviderError),

    #[error("provider panicked: {0}")]
    Panicked(String),

    #[error("provider exceeded its time budget ({elapsed_ms}ms > {budget_ms}ms)")]
    TimedOut { elapsed_ms: u128, budget_ms: u128 },
}

/// Rank candidates by similarity to `input`, returning up to three close
/// matches (Jaro-Winkler above 0.85). Used for "did you mean" hints when a
/// token has no registered provider.
pub fn compute_suggestions(input: &str, candidates: &[String]) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = candidates
        .iter()
        .map(|candidate| (strsim::jaro_winkler(input, candidate), candidate))
        .filter(|(score, _)| *score > 0.85)
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}
