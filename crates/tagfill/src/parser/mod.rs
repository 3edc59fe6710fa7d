//! Placeholder template parser.
//!
//! Turns arbitrary strings into sequences of literal-text and
//! placeholder-token segments, driven by a configurable delimiter
//! [`Syntax`]. Parsing is total: malformed input degrades to literal text
//! instead of failing. The parser never touches the provider registry or
//! game state.

pub mod ast;
mod syntax;
mod template;

pub use ast::{Segment, Template, Token};
pub use syntax::{Syntax, SyntaxError};
pub use template::parse_template;

pub(crate) use template::{split_body, BodySplit};
