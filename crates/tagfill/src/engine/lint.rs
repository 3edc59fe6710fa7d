//! Static lint checks for placeholder templates.
//!
//! Analyzes raw template text without resolving anything, flagging spots
//! where the total parser will silently degrade to literal text — and,
//! given a registry, tokens nothing is registered for. Each warning
//! carries a byte span so tooling can point at the offending text.

use thiserror::Error;

use crate::engine::error::compute_suggestions;
use crate::engine::registry::ProviderRegistry;
use crate::parser::{split_body, BodySplit, Syntax};
use crate::types::ProviderKey;

/// A non-fatal finding in a template. Spans are `(byte offset, length)`
/// into the template text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LintWarning {
    /// An open delimiter with no later close; the remainder is literal.
    #[error("unclosed '{delimiter}': the remainder is treated as literal text")]
    UnclosedDelimiter { delimiter: String, span: (usize, usize) },

    /// An empty token body; renders as the delimiter text itself.
    #[error("'{token}' has an empty body and renders as literal text")]
    EmptyBody { token: String, span: (usize, usize) },

    /// A token body without an identifier; renders as literal text.
    #[error("'{token}' has no identifier and renders as literal text")]
    MissingIdentifier { token: String, span: (usize, usize) },

    /// A well-formed token nothing is registered for.
    #[error("no provider registered for '{key}'{}", suggestion_suffix(suggestions))]
    UnknownProvider {
        key: ProviderKey,
        suggestions: Vec<String>,
        span: (usize, usize),
    },
}

impl LintWarning {
    /// The `(byte offset, length)` span of the finding.
    pub fn span(&self) -> (usize, usize) {
        match self {
            LintWarning::UnclosedDelimiter { span, .. }
            | LintWarning::EmptyBody { span, .. }
            | LintWarning::MissingIdentifier { span, .. }
            | LintWarning::UnknownProvider { span, .. } => *span,
        }
    }

    /// Near-miss suggestions, when the warning carries any.
    pub fn suggestions(&self) -> &[String] {
        match self {
            LintWarning::UnknownProvider { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}

fn suggestion_suffix(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean '{}'?)", suggestions.join("', '"))
    }
}

/// Run syntax lints over a template.
pub fn lint_template(template: &str, syntax: &Syntax) -> Vec<LintWarning> {
    lint_inner(template, syntax, None)
}

/// Run syntax lints plus unknown-provider checks against a registry.
pub fn lint_with_registry(
    template: &str,
    syntax: &Syntax,
    registry: &ProviderRegistry,
) -> Vec<LintWarning> {
    lint_inner(template, syntax, Some(registry))
}

fn lint_inner(
    template: &str,
    syntax: &Syntax,
    registry: Option<&ProviderRegistry>,
) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    let open = syntax.open();
    let close = syntax.close();
    if open.is_empty() || close.is_empty() {
        return warnings;
    }

    let candidates: Vec<String> = registry
        .map(|r| r.keys().iter().map(ToString::to_string).collect())
        .unwrap_or_default();

    let mut pos = 0;
    while let Some(found) = template[pos..].find(open) {
        let start = pos + found;
        let body_start = start + open.len();

        let Some(rel) = template[body_start..].find(close) else {
            warnings.push(LintWarning::UnclosedDelimiter {
                delimiter: open.to_string(),
                span: (start, template.len() - start),
            });
            break;
        };

        let body = &template[body_start..body_start + rel];
        let end = body_start + rel + close.len();
        let source = &template[start..end];
        let span = (start, end - start);

        match split_body(body, syntax.separator()) {
            BodySplit::Empty => warnings.push(LintWarning::EmptyBody {
                token: source.to_string(),
                span,
            }),
            BodySplit::MissingIdentifier => warnings.push(LintWarning::MissingIdentifier {
                token: source.to_string(),
                span,
            }),
            BodySplit::Token {
                namespace,
                identifier,
                ..
            } => {
                if let Some(registry) = registry {
                    let key = ProviderKey::new(namespace, identifier);
                    if !registry.contains(&key) {
                        let suggestions = compute_suggestions(&key.to_string(), &candidates);
                        warnings.push(LintWarning::UnknownProvider {
                            key,
                            suggestions,
                            span,
                        });
                    }
                }
            }
        }

        pos = end;
    }

    warnings
}
