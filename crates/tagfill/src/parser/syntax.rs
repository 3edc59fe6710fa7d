use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid delimiter configuration.
#[derive(Debug, Error)]
pub enum SyntaxError {
    /// The opening delimiter is empty.
    #[error("open delimiter must not be empty")]
    EmptyOpen,

    /// The closing delimiter is empty.
    #[error("close delimiter must not be empty")]
    EmptyClose,

    /// The body separator collides with a delimiter.
    #[error("separator '{separator}' must not appear in the open or close delimiter")]
    SeparatorInDelimiter { separator: char },
}

/// Placeholder delimiter configuration.
///
/// A syntax brackets each token body between an open and a close marker and
/// splits the body into namespace, identifier, and arguments on a secondary
/// separator. The exact markers are a configuration value, not a fixed
/// grammar; two common presets are provided.
///
/// # Example
///
/// ```
/// use tagfill::Syntax;
///
/// // `%player_name%` — the default
/// let percent = Syntax::percent();
/// assert_eq!(percent.open(), "%");
/// assert_eq!(percent.separator(), '_');
///
/// // `{player:name}`
/// let braces = Syntax::braces();
/// assert_eq!(braces.open(), "{");
/// assert_eq!(braces.separator(), ':');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syntax {
    open: String,
    close: String,
    separator: char,
}

impl Syntax {
    /// Create a syntax from arbitrary markers, validating them.
    pub fn new(
        open: impl Into<String>,
        close: impl Into<String>,
        separator: char,
    ) -> Result<Self, SyntaxError> {
        let open = open.into();
        let close = close.into();
        if open.is_empty() {
            return Err(SyntaxError::EmptyOpen);
        }
        if close.is_empty() {
            return Err(SyntaxError::EmptyClose);
        }
        if open.contains(separator) || close.contains(separator) {
            return Err(SyntaxError::SeparatorInDelimiter { separator });
        }
        Ok(Self {
            open,
            close,
            separator,
        })
    }

    /// The `%namespace_identifier_arg%` preset.
    pub fn percent() -> Self {
        Self {
            open: "%".to_string(),
            close: "%".to_string(),
            separator: '_',
        }
    }

    /// The `{namespace:identifier:arg}` preset.
    pub fn braces() -> Self {
        Self {
            open: "{".to_string(),
            close: "}".to_string(),
            separator: ':',
        }
    }

    /// The opening delimiter.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// The closing delimiter.
    pub fn close(&self) -> &str {
        &self.close
    }

    /// The token-body separator.
    pub fn separator(&self) -> char {
        self.separator
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Self::percent()
    }
}
