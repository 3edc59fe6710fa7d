//! Integration tests for tick-based result caching.
//!
//! Caching is opt-in (`cache_ttl_ticks` 0 disables it), entries are keyed
//! by template and context identity, and they expire by time only — the
//! host advances the engine tick once per scheduling quantum.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use tagfill::{
    Engine, EngineConfig, ProviderKey, ResolutionContext, ResolveOptions, Subject, Value,
};

struct TestPlayer(u64);

impl Subject for TestPlayer {
    fn identity(&self) -> u64 {
        self.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Engine whose single provider counts its invocations.
fn counting_engine(ttl: u64) -> (Engine, Arc<AtomicUsize>) {
    let engine = Engine::new(EngineConfig::builder().cache_ttl_ticks(ttl).build());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    engine
        .registry()
        .register_fn(ProviderKey::namespaced("stats", "kills"), move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(Value::from(17))
        });
    (engine, calls)
}

// =============================================================================
// TTL behavior
// =============================================================================

#[test]
fn caching_disabled_calls_provider_every_time() {
    let (engine, calls) = counting_engine(0);
    let ctx = ResolutionContext::detached();
    engine.resolve("%stats_kills%", &ctx);
    engine.resolve("%stats_kills%", &ctx);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(engine.result_cache_len(), 0);
}

#[test]
fn repeated_resolution_within_the_window_hits_the_cache() {
    let (engine, calls) = counting_engine(2);
    let ctx = ResolutionContext::detached();
    assert_eq!(engine.resolve("%stats_kills%", &ctx), "17");
    assert_eq!(engine.resolve("%stats_kills%", &ctx), "17");
    assert_eq!(engine.resolve("%stats_kills%", &ctx), "17");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn entries_expire_after_the_ttl_window() {
    let (engine, calls) = counting_engine(2);
    let ctx = ResolutionContext::detached();
    engine.resolve("%stats_kills%", &ctx);

    // Still inside the window after one tick
    engine.advance_tick();
    engine.resolve("%stats_kills%", &ctx);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Expired after the second tick
    engine.advance_tick();
    engine.resolve("%stats_kills%", &ctx);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn advance_tick_prunes_expired_entries() {
    let (engine, _) = counting_engine(1);
    let ctx = ResolutionContext::detached();
    engine.resolve("%stats_kills%", &ctx);
    assert_eq!(engine.result_cache_len(), 1);

    engine.advance_tick();
    assert_eq!(engine.result_cache_len(), 0);
}

#[test]
fn contexts_with_different_subjects_cache_separately() {
    let (engine, calls) = counting_engine(4);
    let red = TestPlayer(1);
    let blue = TestPlayer(2);
    engine.resolve("%stats_kills%", &ResolutionContext::for_subject(&red));
    engine.resolve("%stats_kills%", &ResolutionContext::for_subject(&blue));
    engine.resolve("%stats_kills%", &ResolutionContext::for_subject(&red));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Staleness bounds
// =============================================================================

#[test]
fn unregistration_is_visible_once_the_window_passes() {
    let (engine, _) = counting_engine(1);
    let ctx = ResolutionContext::detached();
    assert_eq!(engine.resolve("%stats_kills%", &ctx), "17");

    engine
        .registry()
        .unregister(&ProviderKey::namespaced("stats", "kills"));

    // Within the window the cached value may still surface
    assert_eq!(engine.resolve("%stats_kills%", &ctx), "17");

    // Beyond it, the token is unknown — not the old value
    engine.advance_tick();
    assert_eq!(engine.resolve("%stats_kills%", &ctx), "%stats_kills%");
}

#[test]
fn per_call_options_bypass_the_cache() {
    let (engine, calls) = counting_engine(4);
    let ctx = ResolutionContext::detached();
    let options = ResolveOptions::builder()
        .fallback_absent("-".to_string())
        .build();

    engine.resolve_with("%stats_kills%", &ctx, &options);
    engine.resolve_with("%stats_kills%", &ctx, &options);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(engine.result_cache_len(), 0);
}

#[test]
fn clear_caches_empties_both_caches() {
    let (engine, _) = counting_engine(4);
    let ctx = ResolutionContext::detached();
    engine.resolve("%stats_kills%", &ctx);
    assert!(engine.template_cache_len() > 0);
    assert!(engine.result_cache_len() > 0);

    engine.clear_caches();
    assert_eq!(engine.template_cache_len(), 0);
    assert_eq!(engine.result_cache_len(), 0);
}
