//! The compilation pipeline driver.
//!
//! One run sequences load → aggregate → analyze → freeze → emit → persist.
//! Loading fans out per locale file (joined with the meta file load),
//! analysis fans out per key family, emission fans out per locale once the
//! registry is frozen. Any stage failure aborts the whole run before
//! anything lands in the output directory: either every locale module plus
//! the shared helper are written, or none are.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::core::aggregate::aggregate;
use crate::core::analyze::analyze_family;
use crate::core::emit::{EmissionContext, HELPER_FILE_NAME, emit_helper_module, emit_module};
use crate::core::error::{CompileError, CompileWarning};
use crate::core::parsers::locale::{read_locale_file, read_meta_file, scan_input_dir};
use crate::core::translation::{CompiledModule, TypedTranslation};

/// Scratch directory used while staging a batch inside the destination.
const STAGING_DIR_NAME: &str = ".parlance-staging";

/// What a successful run produced.
#[derive(Debug, Clone, Default)]
pub struct CompileSummary {
    pub locales: usize,
    pub keys: usize,
    pub warnings: Vec<CompileWarning>,
}

/// Run the whole pipeline once: read `input_dir`, write `output_dir`.
pub fn compile(input_dir: &Path, output_dir: &Path) -> Result<CompileSummary, CompileError> {
    let layout = scan_input_dir(input_dir)?;

    // Locale loads are I/O bound and independent of the meta file.
    let (registry, locales) = rayon::join(
        || read_meta_file(&layout.meta_path),
        || {
            layout
                .locale_files
                .par_iter()
                .map(|file| read_locale_file(&file.path, &file.locale))
                .collect::<Result<Vec<_>, _>>()
        },
    );
    let mut registry = registry?;
    let locales = locales?;

    let aggregated = aggregate(locales);
    for family in &aggregated.families {
        registry.ensure(&family.key);
    }
    let key_count = aggregated.families.len();

    // Joint analysis per key family; each family mutates only its own
    // registry entry, serialized by that entry's mutex.
    let analyzed = aggregated
        .families
        .into_par_iter()
        .map(|family| {
            let entry = registry
                .entry(&family.key)
                .expect("registry entry created during aggregation");
            analyze_family(family, entry)
        })
        .collect::<Result<Vec<_>, _>>()?;

    registry.freeze();

    let mut warnings = Vec::new();
    let mut typed_by_locale_key: HashMap<(String, String), TypedTranslation> = HashMap::new();
    for (typed, family_warnings) in analyzed {
        warnings.extend(family_warnings);
        for translation in typed {
            typed_by_locale_key.insert(
                (translation.locale.clone(), translation.key.clone()),
                translation,
            );
        }
    }

    // Emission fans out per locale against the frozen registry; the shared
    // context is the only synchronization point.
    let ctx = EmissionContext::new();
    let modules: Vec<CompiledModule> = aggregated
        .locale_keys
        .par_iter()
        .map(|(locale, keys)| {
            let ordered: Vec<TypedTranslation> = keys
                .iter()
                .map(|key| {
                    typed_by_locale_key
                        .get(&(locale.clone(), key.clone()))
                        .expect("every authored key was analyzed")
                        .clone()
                })
                .collect();
            emit_module(locale, &ordered, &registry, &ctx)
        })
        .collect();

    let helper = emit_helper_module(&ctx);
    persist(output_dir, &modules, &helper)?;

    Ok(CompileSummary {
        locales: modules.len(),
        keys: key_count,
        warnings,
    })
}

/// Write the batch into the destination directory.
///
/// Everything is staged in a scratch directory first and renamed into place
/// only after every file wrote successfully, so a failed run never leaves a
/// half-written output directory behind. The renames themselves are not one
/// transaction; the swap order keeps the destination importable if one of
/// them fails partway.
fn persist(
    output_dir: &Path,
    modules: &[CompiledModule],
    helper: &str,
) -> Result<(), CompileError> {
    fs::create_dir_all(output_dir).map_err(|e| CompileError::io(output_dir, e))?;

    let staging = output_dir.join(STAGING_DIR_NAME);
    if staging.exists() {
        fs::remove_dir_all(&staging).map_err(|e| CompileError::io(&staging, e))?;
    }
    fs::create_dir(&staging).map_err(|e| CompileError::io(&staging, e))?;

    let result = stage_and_swap(output_dir, &staging, modules, helper);
    let _ = fs::remove_dir_all(&staging);
    result
}

fn stage_and_swap(
    output_dir: &Path,
    staging: &Path,
    modules: &[CompiledModule],
    helper: &str,
) -> Result<(), CompileError> {
    let helper_staged = staging.join(HELPER_FILE_NAME);
    fs::write(&helper_staged, helper).map_err(|e| CompileError::io(&helper_staged, e))?;
    for module in modules {
        let staged = staging.join(module.file_name());
        fs::write(&staged, &module.source).map_err(|e| CompileError::io(&staged, e))?;
    }

    // Same-filesystem renames after every write succeeded. Locale modules
    // move first and the helper they import moves last, so a rename failure
    // mid-swap never leaves a module pointing at a missing or stale helper.
    for module in modules {
        let staged = staging.join(module.file_name());
        fs::rename(&staged, output_dir.join(module.file_name()))
            .map_err(|e| CompileError::io(&staged, e))?;
    }
    fs::rename(&helper_staged, output_dir.join(HELPER_FILE_NAME))
        .map_err(|e| CompileError::io(&helper_staged, e))?;

    Ok(())
}
