//! Module-level code generation.
//!
//! One output module per locale, exporting a static `translations` mapping
//! from key to string-or-function, plus one shared helper module imported by
//! the locale modules that reference a helper. Output is plain rendered
//! text; re-emitting identical typed translations under an identical frozen
//! registry byte-matches prior output.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::core::registry::TypeRegistry;
use crate::core::translation::{CompiledModule, TypedTranslation};

use super::context::EmissionContext;
use super::translation::{emit_translation, js_string};

/// Name of the shared helper module.
pub const HELPER_FILE_NAME: &str = "helper.js";

const GENERATED_HEADER: &str = "// Generated by parlance. Do not edit by hand.\n";

/// Render one locale's typed translations into its output module.
///
/// `typed` must already be in the locale's authored key order; the registry
/// must be frozen.
pub fn emit_module(
    locale: &str,
    typed: &[TypedTranslation],
    registry: &TypeRegistry,
    ctx: &EmissionContext,
) -> CompiledModule {
    let mut used = BTreeSet::new();
    let mut properties = String::new();

    for translation in typed {
        let entry = registry
            .entry(&translation.key)
            .expect("registry entry exists for every aggregated key");
        let map = entry.lock().expect("type map lock poisoned");
        debug_assert!(map.is_frozen(), "emission requires a frozen registry");

        let value = emit_translation(&translation.body, &translation.key, &map, ctx, &mut used);
        let _ = writeln!(
            properties,
            "    {}: {},",
            js_string(&translation.key),
            value
        );
    }

    let mut source = String::from(GENERATED_HEADER);
    if !used.is_empty() {
        let imports: Vec<&str> = used.iter().map(|h| h.export_name()).collect();
        let _ = writeln!(
            source,
            "import {{ {} }} from \"./{}\";",
            imports.join(", "),
            HELPER_FILE_NAME
        );
    }
    source.push('\n');
    source.push_str("export const translations = {\n");
    source.push_str(&properties);
    source.push_str("};\n");

    CompiledModule {
        locale: locale.to_string(),
        source,
    }
}

/// Render the shared helper module from the batch-wide emission context.
///
/// Flushed once per batch, after every locale module emitted.
pub fn emit_helper_module(ctx: &EmissionContext) -> String {
    let mut source = String::from(GENERATED_HEADER);
    for helper in ctx.used_helpers() {
        source.push('\n');
        source.push_str(helper.source());
    }
    source
}
