//! Core compilation engine.
//!
//! The pipeline, leaf to root:
//!
//! - `registry`: per-key parameter type records, freezable
//! - `parsers`: text/constraint grammars and YAML file loaders
//! - `aggregate`: groups raw entries by key across locales
//! - `analyze`: joint type inference per key family
//! - `emit`: JavaScript module generation with shared helper dedup
//! - `pipeline`: sequences one atomic load→…→persist run

pub mod aggregate;
pub mod analyze;
pub mod emit;
pub mod error;
pub mod parsers;
pub mod pipeline;
pub mod registry;
pub mod translation;

pub use error::{CompileError, CompileWarning};
pub use pipeline::{CompileSummary, compile};
pub use registry::{ParamType, TypeMap, TypeRegistry};
pub use translation::{
    CompiledModule, LocaleEntries, RawTranslationEntry, TranslationBody, TranslationBranch,
    TypedTranslation,
};
