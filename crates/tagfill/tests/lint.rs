//! Integration tests for template lints.

use pretty_assertions::assert_eq;
use tagfill::{lint_template, lint_with_registry, LintWarning, ProviderKey, ProviderRegistry, Syntax};

// =============================================================================
// Syntax lints
// =============================================================================

#[test]
fn clean_template_has_no_warnings() {
    let warnings = lint_template("Hello, %player_name%!", &Syntax::percent());
    assert_eq!(warnings, vec![]);
}

#[test]
fn unclosed_delimiter_is_flagged_with_its_span() {
    let template = "Score: %stats_kills";
    let warnings = lint_template(template, &Syntax::percent());
    assert_eq!(
        warnings,
        vec![LintWarning::UnclosedDelimiter {
            delimiter: "%".to_string(),
            span: (7, template.len() - 7),
        }]
    );
}

#[test]
fn empty_body_is_flagged() {
    let warnings = lint_template("100%% complete", &Syntax::percent());
    assert_eq!(
        warnings,
        vec![LintWarning::EmptyBody {
            token: "%%".to_string(),
            span: (3, 2),
        }]
    );
}

#[test]
fn missing_identifier_is_flagged() {
    let warnings = lint_template("%player_%", &Syntax::percent());
    assert_eq!(
        warnings,
        vec![LintWarning::MissingIdentifier {
            token: "%player_%".to_string(),
            span: (0, 9),
        }]
    );
}

#[test]
fn multiple_findings_are_reported_in_order() {
    let warnings = lint_template("%% then %stats", &Syntax::percent());
    assert_eq!(warnings.len(), 2);
    assert!(matches!(warnings[0], LintWarning::EmptyBody { .. }));
    assert!(matches!(warnings[1], LintWarning::UnclosedDelimiter { .. }));
}

// =============================================================================
// Registry-aware lints
// =============================================================================

#[test]
fn registered_tokens_are_not_flagged() {
    let registry = ProviderRegistry::new();
    registry.register_value(ProviderKey::namespaced("player", "name"), "Ash");
    let warnings = lint_with_registry("Hi %player_name%", &Syntax::percent(), &registry);
    assert_eq!(warnings, vec![]);
}

#[test]
fn unknown_tokens_are_flagged_with_suggestions() {
    let registry = ProviderRegistry::new();
    registry.register_value(ProviderKey::namespaced("player", "name"), "Ash");

    let warnings = lint_with_registry("Hi %player_nmae%", &Syntax::percent(), &registry);
    assert_eq!(warnings.len(), 1);
    match &warnings[0] {
        LintWarning::UnknownProvider {
            key, suggestions, ..
        } => {
            assert_eq!(key, &ProviderKey::namespaced("player", "nmae"));
            assert_eq!(suggestions, &["player:name".to_string()]);
        }
        other => panic!("expected UnknownProvider, got {other:?}"),
    }
}

#[test]
fn unknown_token_without_near_miss_has_no_suggestions() {
    let registry = ProviderRegistry::new();
    registry.register_value(ProviderKey::namespaced("player", "name"), "Ash");

    let warnings = lint_with_registry("%world_time%", &Syntax::percent(), &registry);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].suggestions().is_empty());
}

#[test]
fn syntax_lints_still_apply_with_a_registry() {
    let registry = ProviderRegistry::new();
    let warnings = lint_with_registry("broken %tail", &Syntax::percent(), &registry);
    assert!(matches!(
        warnings[0],
        LintWarning::UnclosedDelimiter { .. }
    ));
}
