//! Parsers for everything the compiler reads.
//!
//! This module provides parsers for the three input grammars:
//! - `text`: translation text (interpolations, function invocations)
//! - `constraint`: branch constraints (comparisons over parameters)
//! - `locale`: YAML locale files and the `meta.yml` declaration file

use thiserror::Error;

pub mod constraint;
pub mod locale;
pub mod text;

/// A syntax error from the text or constraint grammar.
///
/// Carries no location on its own; the locale loader wraps it with the
/// offending key and locale.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct GrammarError(String);

impl GrammarError {
    pub fn new(message: impl Into<String>) -> Self {
        GrammarError(message.into())
    }
}
