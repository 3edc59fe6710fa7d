use serde::{Deserialize, Serialize};

use crate::parser::Token;

/// The composite key a provider is registered under.
///
/// A key pairs an optional namespace (the owning feature, e.g. `player` or
/// `stats`) with a required identifier. Two providers never share a key at
/// the same instant; re-registering a key replaces the previous provider.
///
/// # Example
///
/// ```
/// use tagfill::ProviderKey;
///
/// let kills = ProviderKey::namespaced("stats", "kills");
/// assert_eq!(kills.namespace(), Some("stats"));
/// assert_eq!(kills.identifier(), "kills");
/// assert_eq!(kills.to_string(), "stats:kills");
///
/// let online = ProviderKey::bare("online");
/// assert_eq!(online.namespace(), None);
/// assert_eq!(online.to_string(), "online");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderKey {
    namespace: Option<String>,
    identifier: String,
}

impl ProviderKey {
    /// Create a key with an explicit optional namespace.
    pub fn new(namespace: Option<impl Into<String>>, identifier: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(Into::into),
            identifier: identifier.into(),
        }
    }

    /// Create a namespaced key.
    pub fn namespaced(namespace: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::new(Some(namespace), identifier)
    }

    /// Create a key in the default namespace.
    pub fn bare(identifier: impl Into<String>) -> Self {
        Self {
            namespace: None,
            identifier: identifier.into(),
        }
    }

    /// Parse a key from token-body form: `player_name` with separator `'_'`
    /// becomes `player:name`, a single part becomes a bare key.
    ///
    /// Returns `None` for an empty identifier part or for bodies with more
    /// than two parts (those extra parts are token arguments, which do not
    /// belong in a key).
    pub fn parse(body: &str, separator: char) -> Option<Self> {
        let mut parts = body.split(separator);
        let first = parts.next().unwrap_or_default();
        let key = match parts.next() {
            None => {
                if first.is_empty() {
                    return None;
                }
                Self::bare(first)
            }
            Some(second) => {
                if second.is_empty() {
                    return None;
                }
                let namespace = if first.is_empty() { None } else { Some(first) };
                Self::new(namespace, second)
            }
        };
        if parts.next().is_some() {
            return None;
        }
        Some(key)
    }

    /// The namespace, or `None` for the default namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The identifier within the namespace.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl From<&Token> for ProviderKey {
    fn from(token: &Token) -> Self {
        Self::new(token.namespace(), token.identifier())
    }
}

impl std::fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{namespace}:{}", self.identifier),
            None => write!(f, "{}", self.identifier),
        }
    }
}
