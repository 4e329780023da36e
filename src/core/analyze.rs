//! Joint analysis of a key's locale family.
//!
//! Type inference runs across all locale variants of a key at once, against
//! the key's single registry entry, never from one locale alone. The entry
//! stays locked for the whole family, so two locales can never race to
//! divergent types for the same parameter, and distinct keys still analyze
//! in parallel.

use std::sync::Mutex;

use crate::core::aggregate::KeyFamily;
use crate::core::error::{CompileError, CompileWarning};
use crate::core::parsers::constraint::{Comparison, Operand};
use crate::core::parsers::text::{CallArg, TextAst, TextNode};
use crate::core::registry::{ParamType, TypeMap, TypeUsage, UsageConflict};
use crate::core::translation::{TranslationBody, TypedTranslation};

/// Analyze one key family against its registry entry.
///
/// Returns one [`TypedTranslation`] per (key, locale) pair in locale-supply
/// order, plus warnings for branches made unreachable by an identical
/// earlier branch (first match wins, so they can never fire).
pub fn analyze_family(
    family: KeyFamily,
    entry: &Mutex<TypeMap>,
) -> Result<(Vec<TypedTranslation>, Vec<CompileWarning>), CompileError> {
    let key = family.key;
    let mut warnings = Vec::new();

    let mut map = entry.lock().expect("type map lock poisoned");

    for (locale, body) in &family.variants {
        match body {
            TranslationBody::Simple(text) => {
                infer_text(&mut map, text).map_err(|c| conflict_error(&key, c))?;
            }
            TranslationBody::Branched(branches) => {
                for (index, branch) in branches.iter().enumerate() {
                    let shadowed = branches[..index]
                        .iter()
                        .any(|earlier| earlier.constraint == branch.constraint);
                    if shadowed {
                        warnings.push(CompileWarning {
                            locale: locale.clone(),
                            key: key.clone(),
                            message: format!(
                                "branch '{}' repeats an earlier constraint and can never match",
                                branch.raw_constraint
                            ),
                        });
                    }

                    for comparison in &branch.constraint {
                        infer_comparison(&mut map, comparison)
                            .map_err(|c| conflict_error(&key, c))?;
                    }
                    infer_text(&mut map, &branch.text).map_err(|c| conflict_error(&key, c))?;
                }
            }
        }
    }

    drop(map);

    let typed = family
        .variants
        .into_iter()
        .map(|(locale, body)| TypedTranslation {
            key: key.clone(),
            locale,
            body,
        })
        .collect();

    Ok((typed, warnings))
}

fn conflict_error(key: &str, conflict: UsageConflict) -> CompileError {
    CompileError::TypeConflict {
        key: key.to_string(),
        param: conflict.param,
        existing: conflict.existing,
        incoming: conflict.incoming,
    }
}

/// Record usages from translation text: interpolations and function
/// arguments are printable contexts.
fn infer_text(map: &mut TypeMap, text: &TextAst) -> Result<(), UsageConflict> {
    for node in text {
        match node {
            TextNode::Literal(_) => {}
            TextNode::Interpolation(param) => {
                map.add_usage(param, TypeUsage::Printable)?;
            }
            TextNode::Call { args, .. } => {
                for arg in args {
                    if let CallArg::Param(param) = arg {
                        map.add_usage(param, TypeUsage::Printable)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Record the usage a comparison pins on its parameter.
fn infer_comparison(map: &mut TypeMap, comparison: &Comparison) -> Result<(), UsageConflict> {
    let ty = if comparison.op.is_ordering() {
        ParamType::Number
    } else {
        match &comparison.operand {
            Operand::Number(_) => ParamType::Number,
            Operand::Str(_) => ParamType::String,
            Operand::Word(_) => ParamType::Enum,
        }
    };
    map.add_usage(&comparison.param, TypeUsage::Exact(ty))
}
