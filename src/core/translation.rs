//! Core data model for translations moving through the pipeline.
//!
//! A [`RawTranslationEntry`] is one locale's authored value for one key,
//! already run through the text/constraint grammars but not yet typed. Joint
//! analysis consumes raw entries and produces one [`TypedTranslation`] per
//! (key, locale) pair; emission turns a locale's typed set into one
//! [`CompiledModule`].

use super::parsers::constraint::ConstraintAst;
use super::parsers::text::TextAst;

/// The parsed body of one translation value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationBody {
    /// A single text value: `greeting: "Hello, {name}!"`.
    Simple(TextAst),
    /// An ordered set of guarded alternatives, evaluated in authored order
    /// at render time; the first matching constraint wins.
    Branched(Vec<TranslationBranch>),
}

/// One `(constraint, text)` alternative of a branched translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationBranch {
    /// The constraint exactly as authored, kept for diagnostics.
    pub raw_constraint: String,
    pub constraint: ConstraintAst,
    pub text: TextAst,
}

/// One locale's authored value for one key, pre-analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTranslationEntry {
    pub key: String,
    pub body: TranslationBody,
}

/// Every entry one locale file defines, in authored order.
#[derive(Debug, Clone)]
pub struct LocaleEntries {
    pub locale: String,
    pub entries: Vec<RawTranslationEntry>,
}

/// Analyzer output for one (key, locale) pair.
///
/// The tree itself is the parsed body; its typing lives in the key's registry
/// entry, which is frozen before emission reads it. Deterministic for
/// identical (text, registry-state) input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedTranslation {
    pub key: String,
    pub locale: String,
    pub body: TranslationBody,
}

/// One rendered output module for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    pub locale: String,
    pub source: String,
}

impl CompiledModule {
    /// Output file name for this module.
    pub fn file_name(&self) -> String {
        format!("{}.js", self.locale)
    }
}
