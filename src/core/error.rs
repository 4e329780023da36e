//! Error and warning types for the compilation pipeline.
//!
//! Every failure is fatal to the current run: a single malformed key blocks the
//! whole batch, because partially localized output is worse than a failed build.
//! Warnings (unreachable branches) never fail a run.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::registry::ParamType;

/// A fatal error raised by any stage of the pipeline.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Invalid type declarations in `meta.yml`.
    #[error("config error: {message}")]
    Config { message: String },

    /// A locale file that could not be read as a YAML mapping at all.
    #[error("invalid locale file '{locale}': {message}")]
    Locale { locale: String, message: String },

    /// A malformed entry within an otherwise readable locale file.
    #[error("parse error in locale '{locale}', key '{key}': {message}")]
    Parse {
        locale: String,
        key: String,
        message: String,
    },

    /// The same parameter is used with irreconcilable types across a key's
    /// locale family. Never resolved automatically.
    #[error(
        "type conflict for parameter '{param}' of key '{key}': cannot reconcile '{existing}' with '{incoming}'"
    )]
    TypeConflict {
        key: String,
        param: String,
        existing: ParamType,
        incoming: ParamType,
    },

    /// Joint analysis failed for a reason other than a type conflict.
    #[error("analysis failed for key '{key}': {message}")]
    Analysis { key: String, message: String },

    /// Filesystem failure, with the path that caused it.
    #[error("io error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CompileError {
    pub fn config(message: impl Into<String>) -> Self {
        CompileError::Config {
            message: message.into(),
        }
    }

    pub fn parse(
        locale: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CompileError::Parse {
            locale: locale.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CompileError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A non-fatal diagnostic attached to a successful run.
///
/// Currently only produced for branches made unreachable by an identical
/// earlier branch (first match wins, so the later one can never fire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileWarning {
    pub locale: String,
    pub key: String,
    pub message: String,
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "locale '{}', key '{}': {}",
            self.locale, self.key, self.message
        )
    }
}
