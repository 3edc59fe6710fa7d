//! The resolver engine: parse, look up, invoke, fall back, reassemble.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::engine::cache::{template_hash, ResultCache, ResultKey, TemplateCache};
use crate::engine::config::{EngineConfig, ResolveOptions, UnknownFallback};
use crate::engine::context::ResolutionContext;
use crate::engine::error::{compute_suggestions, CallFailure};
use crate::engine::registry::{Provider, ProviderRegistry};
use crate::format::format_value;
use crate::parser::{Segment, Template, Token};
use crate::types::{ProviderKey, Value};

/// Placeholder resolution engine.
///
/// Orchestrates parsing, registry lookup, context propagation, per-call
/// caching, and fallback substitution. The resolution contract is total:
/// every call to [`Engine::resolve`] returns a string, never an error —
/// unknown tokens, absent values, and failing providers all degrade to
/// configured fallbacks.
///
/// The engine is `Send + Sync`; hosts share one instance behind an `Arc`
/// across every event-loop worker that formats text.
///
/// # Example
///
/// ```
/// use tagfill::{Engine, EngineConfig, ProviderKey, ResolutionContext};
///
/// let engine = Engine::new(EngineConfig::default());
/// engine
///     .registry()
///     .register_value(ProviderKey::namespaced("player", "name"), "Ash");
///
/// let ctx = ResolutionContext::detached();
/// assert_eq!(engine.resolve("Hello, %player_name%!", &ctx), "Hello, Ash!");
/// ```
pub struct Engine {
    config: EngineConfig,
    registry: Arc<ProviderRegistry>,
    templates: TemplateCache,
    results: ResultCache,
    tick: AtomicU64,
}

impl Engine {
    /// Re-resolution never exceeds this depth, whatever the configuration
    /// asks for.
    pub const RECURSION_CAP: usize = 8;

    /// Create an engine with a fresh registry.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_registry(config, Arc::new(ProviderRegistry::new()))
    }

    /// Create an engine over an existing registry — shared between engines,
    /// or handed out to plugin features before the engine exists.
    pub fn with_registry(config: EngineConfig, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            config,
            registry,
            templates: TemplateCache::default(),
            results: ResultCache::default(),
            tick: AtomicU64::new(0),
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The provider registry. Clone the `Arc` to hand registration access
    /// to plugin features.
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// The current game tick as seen by the result cache.
    pub fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::Relaxed)
    }

    /// Advance the tick counter and drop expired cache entries. Called by
    /// the host once per scheduling quantum.
    pub fn advance_tick(&self) -> u64 {
        let now = self.tick.fetch_add(1, Ordering::Relaxed) + 1;
        let ttl = self.config.cache_ttl_ticks();
        if ttl > 0 {
            self.results.prune(now, ttl);
        }
        now
    }

    /// Drop all cached results and parsed templates.
    pub fn clear_caches(&self) {
        self.templates.clear();
        self.results.clear();
    }

    /// Number of cached parsed templates.
    pub fn template_cache_len(&self) -> usize {
        self.templates.len()
    }

    /// Number of cached resolved results, expired entries included.
    pub fn result_cache_len(&self) -> usize {
        self.results.len()
    }

    /// Resolve every placeholder in `template` against `ctx`.
    pub fn resolve(&self, template: &str, ctx: &ResolutionContext<'_>) -> String {
        self.resolve_with(template, ctx, &ResolveOptions::default())
    }

    /// Resolve with per-call overrides. A call that overrides anything
    /// bypasses the result cache.
    pub fn resolve_with(
        &self,
        template: &str,
        ctx: &ResolutionContext<'_>,
        options: &ResolveOptions,
    ) -> String {
        let ttl = self.config.cache_ttl_ticks();
        let cacheable = ttl > 0 && options.is_default();
        let key = ResultKey {
            template: template_hash(template),
            context: ctx.cache_identity(),
        };

        if cacheable {
            if let Some(hit) = self.results.get(&key, self.current_tick(), ttl) {
                debug!(template, "resolved from cache");
                return hit;
            }
        }

        let parsed = self.templates.get_or_parse(template, self.config.syntax());
        let output = self.render(&parsed, ctx, options, 0);

        if cacheable {
            self.results.insert(key, self.current_tick(), output.clone());
        }
        output
    }

    /// Walk segments left to right, substituting placeholders in template
    /// order.
    fn render(
        &self,
        template: &Template,
        ctx: &ResolutionContext<'_>,
        options: &ResolveOptions,
        depth: usize,
    ) -> String {
        let mut output = String::new();
        for segment in &template.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder(token) => {
                    output.push_str(&self.substitute(token, ctx, options, depth));
                }
            }
        }
        output
    }

    /// Substitute one token: lookup, guarded invocation, formatting, and
    /// fallback selection.
    fn substitute(
        &self,
        token: &Token,
        ctx: &ResolutionContext<'_>,
        options: &ResolveOptions,
        depth: usize,
    ) -> String {
        let key = ProviderKey::from(token);

        let Some(provider) = self.registry.lookup(&key) else {
            self.log_unknown(&key);
            let fallback = options
                .fallback_unknown()
                .unwrap_or_else(|| self.config.fallback_unknown());
            return match fallback {
                UnknownFallback::Verbatim => token.source().to_string(),
                UnknownFallback::Text(text) => text.clone(),
            };
        };

        match self.invoke(provider.as_ref(), &key, ctx, token.arguments()) {
            Some(value) => {
                let text = format_value(&value, ctx.hints());
                self.reresolve(text, ctx, options, depth)
            }
            None => options
                .fallback_absent()
                .unwrap_or_else(|| self.config.fallback_absent())
                .to_string(),
        }
    }

    /// Invoke a provider behind the failure boundary: errors, panics, and
    /// time-budget overruns all collapse to "absent" and are logged with
    /// the offending key. Nothing a provider does propagates to the caller.
    fn invoke(
        &self,
        provider: &dyn Provider,
        key: &ProviderKey,
        ctx: &ResolutionContext<'_>,
        args: &[String],
    ) -> Option<Value> {
        let started = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| provider.resolve(ctx, args)));
        let elapsed = started.elapsed();

        let failure = match outcome {
            Ok(Ok(value)) => match self.config.time_budget() {
                Some(budget) if elapsed > budget => CallFailure::TimedOut {
                    elapsed_ms: elapsed.as_millis(),
                    budget_ms: budget.as_millis(),
                },
                _ => return value,
            },
            Ok(Err(error)) => CallFailure::Failed(error),
            Err(panic) => CallFailure::Panicked(panic_message(panic.as_ref())),
        };

        warn!(provider = %key, error = %failure, "placeholder provider produced no value");
        None
    }

    /// Resolved values are not templates by default; re-resolution is an
    /// explicit opt-in, and always depth-capped so a provider emitting its
    /// own token cannot expand forever.
    fn reresolve(
        &self,
        text: String,
        ctx: &ResolutionContext<'_>,
        options: &ResolveOptions,
        depth: usize,
    ) -> String {
        let limit = options
            .max_recursion_depth()
            .unwrap_or_else(|| self.config.max_recursion_depth())
            .min(Self::RECURSION_CAP);
        if depth >= limit || !text.contains(self.config.syntax().open()) {
            return text;
        }

        let parsed = self.templates.get_or_parse(&text, self.config.syntax());
        self.render(&parsed, ctx, options, depth + 1)
    }

    fn log_unknown(&self, key: &ProviderKey) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        let candidates: Vec<String> = self
            .registry
            .keys()
            .iter()
            .map(ToString::to_string)
            .collect();
        let suggestions = compute_suggestions(&key.to_string(), &candidates);
        if suggestions.is_empty() {
            debug!(token = %key, "no provider registered for token");
        } else {
            debug!(token = %key, ?suggestions, "no provider registered for token");
        }
    }
}

/// Extract a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
