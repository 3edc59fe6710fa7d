//! Public AST types for parsed placeholder templates.

/// A parsed template: an ordered sequence of segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    /// Iterate over the placeholder tokens in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Token> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(token) => Some(token),
            Segment::Literal(_) => None,
        })
    }

    /// Whether the template contains no placeholders at all.
    pub fn is_literal(&self) -> bool {
        self.placeholders().next().is_none()
    }
}

/// A segment within a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text, passed through unchanged.
    Literal(String),
    /// A placeholder token to be resolved.
    Placeholder(Token),
}

/// A placeholder token: one requested substitution.
///
/// Tokens are immutable once parsed; the `source` field keeps the token
/// exactly as written, delimiters included, so templates can be reassembled
/// losslessly and unknown tokens can be rendered back verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    namespace: Option<String>,
    identifier: String,
    arguments: Vec<String>,
    source: String,
}

impl Token {
    /// Create a token. The identifier must be non-empty; the parser never
    /// produces tokens that violate this.
    pub fn new(
        namespace: Option<String>,
        identifier: String,
        arguments: Vec<String>,
        source: String,
    ) -> Self {
        Self {
            namespace,
            identifier,
            arguments,
            source,
        }
    }

    /// The owning provider group, or `None` for the default namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The specific value requested.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Arguments passed verbatim to the resolver.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// The token as written, including delimiters.
    pub fn source(&self) -> &str {
        &self.source
    }
}
