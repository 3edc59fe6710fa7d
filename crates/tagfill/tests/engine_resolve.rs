//! Integration tests for engine resolution.
//!
//! The resolution contract is total: every call returns a string. These
//! tests cover substitution, the two distinct fallbacks, provider failure
//! isolation, per-call option overrides, formatting hints, subject access,
//! and depth-bounded re-resolution.

use std::any::Any;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tagfill::{
    Engine, EngineConfig, FormatHints, ProviderError, ProviderKey, ResolutionContext,
    ResolveOptions, Subject, UnknownFallback, Value,
};

/// Engine with the two providers most tests use.
fn engine() -> Engine {
    let engine = Engine::new(EngineConfig::default());
    let registry = engine.registry();
    registry.register_value(ProviderKey::namespaced("player", "name"), "Ash");
    registry.register_value(ProviderKey::namespaced("stats", "kills"), 17);
    engine
}

// =============================================================================
// Basic substitution
// =============================================================================

#[test]
fn literal_template_is_identity() {
    let engine = engine();
    let ctx = ResolutionContext::detached();
    assert_eq!(engine.resolve("no placeholders here", &ctx), "no placeholders here");
    assert_eq!(engine.resolve("", &ctx), "");
}

#[test]
fn substitutes_registered_tokens() {
    let engine = engine();
    let ctx = ResolutionContext::detached();
    assert_eq!(
        engine.resolve("Hello, %player_name%! You have %stats_kills% kills.", &ctx),
        "Hello, Ash! You have 17 kills."
    );
}

#[test]
fn constant_provider_ignores_context() {
    let engine = engine();
    let detached = ResolutionContext::detached();
    let player = TestPlayer::new(9, "Misty");
    let scoped = ResolutionContext::for_subject(&player);
    assert_eq!(engine.resolve("%stats_kills%", &detached), "17");
    assert_eq!(engine.resolve("%stats_kills%", &scoped), "17");
}

#[test]
fn malformed_template_passes_through() {
    let engine = engine();
    let ctx = ResolutionContext::detached();
    assert_eq!(
        engine.resolve("Score: %stats_kills", &ctx),
        "Score: %stats_kills"
    );
}

#[test]
fn bool_and_float_values_render() {
    let engine = engine();
    let registry = engine.registry();
    registry.register_value(ProviderKey::namespaced("player", "alive"), true);
    registry.register_value(ProviderKey::namespaced("player", "health"), 19.5);
    let ctx = ResolutionContext::detached();
    assert_eq!(engine.resolve("%player_alive%/%player_health%", &ctx), "true/19.5");
}

// =============================================================================
// Unknown tokens vs absent values
// =============================================================================

#[test]
fn unknown_token_renders_verbatim_by_default() {
    let engine = engine();
    let ctx = ResolutionContext::detached();
    assert_eq!(
        engine.resolve("You have %stats_deaths% deaths.", &ctx),
        "You have %stats_deaths% deaths."
    );
}

#[test]
fn unknown_token_uses_configured_text() {
    let config = EngineConfig::builder()
        .fallback_unknown(UnknownFallback::Text("N/A".to_string()))
        .build();
    let engine = Engine::new(config);
    engine
        .registry()
        .register_value(ProviderKey::namespaced("player", "name"), "Ash");
    let ctx = ResolutionContext::detached();
    assert_eq!(
        engine.resolve("Hello, %player_name%! You have %stats_kills% kills.", &ctx),
        "Hello, Ash! You have N/A kills."
    );
}

#[test]
fn absent_value_defaults_to_empty() {
    let engine = engine();
    engine
        .registry()
        .register_fn(ProviderKey::namespaced("stats", "streak"), |_, _| None);
    let ctx = ResolutionContext::detached();
    assert_eq!(engine.resolve("streak:[%stats_streak%]", &ctx), "streak:[]");
}

#[test]
fn absent_value_uses_configured_text() {
    let config = EngineConfig::builder().fallback_absent("-").build();
    let engine = Engine::new(config);
    engine
        .registry()
        .register_fn(ProviderKey::namespaced("stats", "streak"), |_, _| None);
    let ctx = ResolutionContext::detached();
    assert_eq!(engine.resolve("streak:[%stats_streak%]", &ctx), "streak:[-]");
}

// =============================================================================
// Failure isolation
// =============================================================================

#[test]
fn failing_provider_only_affects_its_own_token() {
    let engine = engine();
    engine.registry().register(
        ProviderKey::namespaced("stats", "deaths"),
        |_: &ResolutionContext<'_>, _: &[String]| -> Result<Option<Value>, ProviderError> {
            Err(ProviderError::msg("stat store offline"))
        },
    );
    let ctx = ResolutionContext::detached();
    assert_eq!(
        engine.resolve("%player_name%: %stats_kills% kills, %stats_deaths% deaths", &ctx),
        "Ash: 17 kills,  deaths"
    );
}

#[test]
fn panicking_provider_is_contained() {
    let engine = engine();
    engine.registry().register(
        ProviderKey::namespaced("stats", "deaths"),
        |_: &ResolutionContext<'_>, _: &[String]| -> Result<Option<Value>, ProviderError> {
            panic!("stat store corrupted")
        },
    );
    let ctx = ResolutionContext::detached();
    assert_eq!(
        engine.resolve("%stats_deaths% and %player_name%", &ctx),
        " and Ash"
    );
}

#[test]
fn over_budget_provider_is_treated_as_absent() {
    let config = EngineConfig::builder()
        .fallback_absent("?")
        .time_budget(Duration::from_millis(1))
        .build();
    let engine = Engine::new(config);
    engine
        .registry()
        .register_fn(ProviderKey::namespaced("db", "lookup"), |_, _| {
            std::thread::sleep(Duration::from_millis(25));
            Some(Value::from("slow"))
        });
    let ctx = ResolutionContext::detached();
    assert_eq!(engine.resolve("%db_lookup%", &ctx), "?");
}

#[test]
fn provider_within_budget_resolves_normally() {
    let config = EngineConfig::builder()
        .time_budget(Duration::from_secs(5))
        .build();
    let engine = Engine::new(config);
    engine
        .registry()
        .register_value(ProviderKey::namespaced("player", "name"), "Ash");
    let ctx = ResolutionContext::detached();
    assert_eq!(engine.resolve("%player_name%", &ctx), "Ash");
}

// =============================================================================
// Per-call options
// =============================================================================

#[test]
fn options_override_absent_fallback() {
    let engine = engine();
    engine
        .registry()
        .register_fn(ProviderKey::namespaced("stats", "streak"), |_, _| None);
    let ctx = ResolutionContext::detached();
    let options = ResolveOptions::builder()
        .fallback_absent("N/A".to_string())
        .build();
    assert_eq!(
        engine.resolve_with("[%stats_streak%]", &ctx, &options),
        "[N/A]"
    );
    // The engine default is untouched
    assert_eq!(engine.resolve("[%stats_streak%]", &ctx), "[]");
}

#[test]
fn options_override_unknown_fallback() {
    let engine = engine();
    let ctx = ResolutionContext::detached();
    let options = ResolveOptions::builder()
        .fallback_unknown(UnknownFallback::Text("???".to_string()))
        .build();
    assert_eq!(
        engine.resolve_with("%stats_deaths%", &ctx, &options),
        "???"
    );
}

// =============================================================================
// Arguments and subjects
// =============================================================================

#[test]
fn arguments_reach_the_provider_verbatim() {
    let engine = engine();
    engine
        .registry()
        .register_fn(ProviderKey::namespaced("fmt", "join"), |_, args| {
            Some(Value::from(args.join("+")))
        });
    let ctx = ResolutionContext::detached();
    assert_eq!(engine.resolve("%fmt_join_a_b_c%", &ctx), "a+b+c");
}

struct TestPlayer {
    id: u64,
    name: String,
}

impl TestPlayer {
    fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

impl Subject for TestPlayer {
    fn identity(&self) -> u64 {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn display_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

#[test]
fn providers_downcast_the_subject() {
    let engine = Engine::new(EngineConfig::default());
    engine
        .registry()
        .register_fn(ProviderKey::namespaced("player", "name"), |ctx, _| {
            let player = ctx.subject_as::<TestPlayer>()?;
            Some(Value::from(player.name.clone()))
        });

    let player = TestPlayer::new(7, "Brock");
    let ctx = ResolutionContext::for_subject(&player);
    assert_eq!(engine.resolve("Hi %player_name%", &ctx), "Hi Brock");

    // Without a subject the provider reports absence
    let detached = ResolutionContext::detached();
    assert_eq!(engine.resolve("Hi %player_name%", &detached), "Hi ");
}

// =============================================================================
// Formatting hints
// =============================================================================

#[test]
fn hints_affect_numeric_rendering() {
    let engine = Engine::new(EngineConfig::default());
    let registry = engine.registry();
    registry.register_value(ProviderKey::namespaced("stats", "coins"), 1234567);
    registry.register_value(ProviderKey::namespaced("stats", "ratio"), 0.98765);

    let hints = FormatHints::new()
        .with_group_separator('.')
        .with_decimal_separator(',')
        .with_max_fraction_digits(2);
    let ctx = ResolutionContext::detached().with_hints(hints);

    assert_eq!(engine.resolve("%stats_coins%", &ctx), "1.234.567");
    assert_eq!(engine.resolve("%stats_ratio%", &ctx), "0,99");
}

#[test]
fn default_hints_match_plain_display() {
    let engine = Engine::new(EngineConfig::default());
    engine
        .registry()
        .register_value(ProviderKey::namespaced("stats", "coins"), -1234);
    let ctx = ResolutionContext::detached();
    assert_eq!(engine.resolve("%stats_coins%", &ctx), "-1234");
}

// =============================================================================
// Re-resolution
// =============================================================================

#[test]
fn resolved_values_are_not_templates_by_default() {
    let engine = engine();
    engine
        .registry()
        .register_value(ProviderKey::namespaced("msg", "motd"), "Welcome, %player_name%!");
    let ctx = ResolutionContext::detached();
    assert_eq!(
        engine.resolve("%msg_motd%", &ctx),
        "Welcome, %player_name%!"
    );
}

#[test]
fn recursion_is_an_explicit_opt_in() {
    let config = EngineConfig::builder().max_recursion_depth(2).build();
    let engine = Engine::new(config);
    let registry = engine.registry();
    registry.register_value(ProviderKey::namespaced("player", "name"), "Ash");
    registry.register_value(ProviderKey::namespaced("msg", "motd"), "Welcome, %player_name%!");
    let ctx = ResolutionContext::detached();
    assert_eq!(engine.resolve("%msg_motd%", &ctx), "Welcome, Ash!");
}

#[test]
fn self_expanding_provider_hits_the_depth_cap() {
    let config = EngineConfig::builder().max_recursion_depth(3).build();
    let engine = Engine::new(config);
    engine
        .registry()
        .register_value(ProviderKey::bare("echo"), "%echo%");
    let ctx = ResolutionContext::detached();
    // Terminates at the depth limit with the token still unexpanded.
    assert_eq!(engine.resolve("%echo%", &ctx), "%echo%");
}

#[test]
fn configured_depth_is_clamped_to_the_hard_cap() {
    let config = EngineConfig::builder()
        .max_recursion_depth(usize::MAX)
        .build();
    let engine = Engine::new(config);
    engine
        .registry()
        .register_value(ProviderKey::bare("echo"), "x%echo%");
    let ctx = ResolutionContext::detached();
    let out = engine.resolve("%echo%", &ctx);
    // One "x" per provider invocation: the original pass plus one per
    // capped expansion level.
    assert_eq!(
        out,
        format!("{}%echo%", "x".repeat(Engine::RECURSION_CAP + 1))
    );
}
