//! Loaders for locale files and the `meta.yml` declaration file.
//!
//! A locale file is a YAML mapping from translation key to either a literal
//! string or a mapping from constraint string to literal string. Values are
//! read failsafe-style: plain scalars (numbers, booleans) are taken as their
//! literal text, anything structured where a string is expected is an error.
//!
//! `meta.yml` maps keys to declared parameter types:
//!
//! ```yaml
//! cart.items:
//!   parameters:
//!     count:
//!       type: number
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_norway::Value;

use crate::core::error::CompileError;
use crate::core::registry::{ParamType, TypeRegistry};
use crate::core::translation::{
    LocaleEntries, RawTranslationEntry, TranslationBody, TranslationBranch,
};

use super::constraint::parse_constraint;
use super::text::parse_text;

/// Name of the required type-declaration file.
pub const META_FILE_NAME: &str = "meta.yml";

/// One locale file discovered in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFile {
    pub locale: String,
    pub path: PathBuf,
}

/// The input directory's contents: the meta file plus locale files sorted by
/// locale name, so downstream ordering never depends on directory iteration.
#[derive(Debug, Clone)]
pub struct InputLayout {
    pub meta_path: PathBuf,
    pub locale_files: Vec<LocaleFile>,
}

/// Discover `meta.yml` and the locale files of an input directory.
pub fn scan_input_dir(dir: &Path) -> Result<InputLayout, CompileError> {
    let meta_path = dir.join(META_FILE_NAME);
    if !meta_path.is_file() {
        return Err(CompileError::config(format!(
            "no {} file in input directory '{}'",
            META_FILE_NAME,
            dir.display()
        )));
    }

    let mut locale_files = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| CompileError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| CompileError::io(dir, e))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') || name == META_FILE_NAME {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some("yml")
            && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
        {
            locale_files.push(LocaleFile {
                locale: stem.to_string(),
                path,
            });
        }
    }

    locale_files.sort_by(|a, b| a.locale.cmp(&b.locale));

    Ok(InputLayout {
        meta_path,
        locale_files,
    })
}

/// Read one locale file into raw translation entries, in authored order.
pub fn read_locale_file(path: &Path, locale: &str) -> Result<LocaleEntries, CompileError> {
    let contents = fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;

    let doc: Value =
        serde_norway::from_str(&contents).map_err(|e| CompileError::Locale {
            locale: locale.to_string(),
            message: e.to_string(),
        })?;

    let map = match doc {
        Value::Mapping(map) => map,
        // An empty locale file contributes nothing but is not an error.
        Value::Null => Default::default(),
        _ => {
            return Err(CompileError::Locale {
                locale: locale.to_string(),
                message: "expected a mapping from translation key to value".to_string(),
            });
        }
    };

    let mut entries: Vec<RawTranslationEntry> = Vec::with_capacity(map.len());

    for (key, value) in &map {
        let key = scalar_text(key).ok_or_else(|| CompileError::Locale {
            locale: locale.to_string(),
            message: "translation keys must be strings".to_string(),
        })?;

        // Duplicate keys are rejected outright, never last-write-wins. The
        // YAML layer already refuses exact duplicates; this also catches
        // scalars that collapse to the same key text.
        if entries.iter().any(|e| e.key == key) {
            return Err(CompileError::parse(locale, &key, "duplicate translation key"));
        }

        let body = map_body(locale, &key, value)?;
        entries.push(RawTranslationEntry { key, body });
    }

    Ok(LocaleEntries {
        locale: locale.to_string(),
        entries,
    })
}

/// Turn one authored value into a parsed translation body.
fn map_body(locale: &str, key: &str, value: &Value) -> Result<TranslationBody, CompileError> {
    if let Some(text) = scalar_text(value) {
        let ast = parse_text(&text)
            .map_err(|e| CompileError::parse(locale, key, e.to_string()))?;
        return Ok(TranslationBody::Simple(ast));
    }

    let Value::Mapping(branches) = value else {
        return Err(CompileError::parse(
            locale,
            key,
            "value must be a string or a mapping of constraint to string",
        ));
    };

    let mut parsed = Vec::with_capacity(branches.len());
    for (constraint, text) in branches {
        let raw_constraint = scalar_text(constraint).ok_or_else(|| {
            CompileError::parse(locale, key, "constraint must be a string")
        })?;
        let text = scalar_text(text).ok_or_else(|| {
            CompileError::parse(
                locale,
                key,
                format!("branch '{raw_constraint}' value is not a string"),
            )
        })?;

        let constraint = parse_constraint(&raw_constraint).map_err(|e| {
            CompileError::parse(locale, key, format!("constraint '{raw_constraint}': {e}"))
        })?;
        let text = parse_text(&text)
            .map_err(|e| CompileError::parse(locale, key, e.to_string()))?;

        parsed.push(TranslationBranch {
            raw_constraint,
            constraint,
            text,
        });
    }

    Ok(TranslationBody::Branched(parsed))
}

/// One key's declarations in `meta.yml`.
#[derive(Debug, Deserialize)]
struct KeyDeclaration {
    #[serde(default)]
    parameters: BTreeMap<String, ParameterDeclaration>,
}

#[derive(Debug, Deserialize)]
struct ParameterDeclaration {
    #[serde(rename = "type")]
    type_token: String,
}

/// Read `meta.yml` into a registry holding only declarations.
pub fn read_meta_file(path: &Path) -> Result<TypeRegistry, CompileError> {
    let contents = fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;

    // An empty meta file is valid: every type gets inferred.
    let declarations: Option<BTreeMap<String, KeyDeclaration>> =
        serde_norway::from_str(&contents)
            .map_err(|e| CompileError::config(format!("invalid {META_FILE_NAME}: {e}")))?;

    let mut registry = TypeRegistry::new();
    for (key, decl) in declarations.unwrap_or_default() {
        registry.ensure(&key);
        for (param, config) in decl.parameters {
            let ty = ParamType::parse_token(&config.type_token).ok_or_else(|| {
                CompileError::config(format!(
                    "unrecognized type '{}' for parameter '{param}' of key '{key}'",
                    config.type_token
                ))
            })?;
            registry.declare(&key, &param, ty);
        }
    }

    Ok(registry)
}

/// The literal text of a scalar value, failsafe-style.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
