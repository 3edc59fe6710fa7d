//! Template string parser using winnow.
//!
//! Scans an input string into literal and placeholder segments. Handles:
//! - Configurable open/close delimiters and body separator
//! - Unmatched open delimiter: the remainder becomes literal text
//! - Empty token body (`%%`): a literal of the delimiter text itself
//! - Single pass, non-recursive: the first close delimiter after an open
//!   terminates the token
//!
//! Parsing is total and side-effect-free; re-parsing the same template is
//! idempotent.

use winnow::combinator::delimited;
use winnow::prelude::*;
use winnow::token::{literal, take_until};

use super::ast::{Segment, Template, Token};
use super::syntax::Syntax;

/// Parse a template string into segments.
///
/// Never fails: anything that does not form a complete placeholder token is
/// literal text.
///
/// # Example
///
/// ```
/// use tagfill::{parse_template, Segment, Syntax};
///
/// let t = parse_template("Hello, %player_name%!", &Syntax::percent());
/// assert_eq!(t.segments.len(), 3);
/// assert_eq!(t.segments[0], Segment::Literal("Hello, ".to_string()));
/// ```
pub fn parse_template(input: &str, syntax: &Syntax) -> Template {
    // An empty delimiter can never match; the whole input is one literal.
    if syntax.open().is_empty() || syntax.close().is_empty() {
        let segments = if input.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Literal(input.to_string())]
        };
        return Template { segments };
    }

    let mut remaining = input;
    let mut segments = Vec::new();
    while !remaining.is_empty() {
        segments.push(segment(&mut remaining, syntax));
    }

    Template {
        segments: merge_literals(segments),
    }
}

/// Parse one segment: a placeholder, literal text up to the next open
/// delimiter, or (when neither applies) the rest of the input.
fn segment(input: &mut &str, syntax: &Syntax) -> Segment {
    if let Ok(seg) = placeholder(input, syntax) {
        return seg;
    }
    if let Ok(seg) = literal_text(input, syntax) {
        return seg;
    }
    // Open delimiter with no later close: the remainder is literal text.
    Segment::Literal(std::mem::take(input).to_string())
}

/// Parse a delimited placeholder token.
fn placeholder(input: &mut &str, syntax: &Syntax) -> ModalResult<Segment> {
    let start = *input;
    let body: &str = delimited(
        literal(syntax.open()),
        take_until(0.., syntax.close()),
        literal(syntax.close()),
    )
    .parse_next(input)?;

    let consumed = start.len() - input.len();
    let source = &start[..consumed];
    Ok(token_segment(body, source, syntax))
}

/// Parse literal text up to (not including) the next open delimiter.
fn literal_text(input: &mut &str, syntax: &Syntax) -> ModalResult<Segment> {
    let text: &str = take_until(1.., syntax.open()).parse_next(input)?;
    Ok(Segment::Literal(text.to_string()))
}

/// Build a segment from a token body, degrading to a literal where the body
/// does not form a valid token.
fn token_segment(body: &str, source: &str, syntax: &Syntax) -> Segment {
    match split_body(body, syntax.separator()) {
        BodySplit::Token {
            namespace,
            identifier,
            arguments,
        } => Segment::Placeholder(Token::new(namespace, identifier, arguments, source.to_string())),
        BodySplit::Empty | BodySplit::MissingIdentifier => Segment::Literal(source.to_string()),
    }
}

/// The outcome of splitting a token body on the separator.
pub(crate) enum BodySplit {
    /// Empty body: the token stands for the delimiter text itself.
    Empty,
    /// The identifier part is empty; not a token.
    MissingIdentifier,
    /// A well-formed token body.
    Token {
        namespace: Option<String>,
        identifier: String,
        arguments: Vec<String>,
    },
}

/// Split a token body into namespace, identifier, and arguments.
///
/// One part means the default namespace; with two or more, the first part is
/// the namespace (empty falls back to default), the second the identifier,
/// and the rest are arguments passed verbatim.
pub(crate) fn split_body(body: &str, separator: char) -> BodySplit {
    if body.is_empty() {
        return BodySplit::Empty;
    }

    let mut parts = body.split(separator);
    let first = parts.next().unwrap_or_default();
    let (namespace, identifier) = match parts.next() {
        None => (None, first),
        Some(second) => {
            let namespace = if first.is_empty() { None } else { Some(first) };
            (namespace, second)
        }
    };
    if identifier.is_empty() {
        return BodySplit::MissingIdentifier;
    }

    BodySplit::Token {
        namespace: namespace.map(str::to_string),
        identifier: identifier.to_string(),
        arguments: parts.map(str::to_string).collect(),
    }
}

/// Merge adjacent Literal segments into single segments.
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Segment::Literal(text));
                }
            }
            other => result.push(other),
        }
    }

    result
}
