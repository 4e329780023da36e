//! Key aggregation across locales.
//!
//! Loading fans out per locale file; aggregation joins the per-locale entry
//! lists back into per-key families so joint analysis can see every locale's
//! variant of a key at once. Keys missing from some locales are valid partial
//! localization, never an error. Duplicate keys within one file were already
//! rejected at load time.

use crate::core::translation::{LocaleEntries, TranslationBody};

/// Every locale's variant of one key, in locale-supply order.
#[derive(Debug, Clone)]
pub struct KeyFamily {
    pub key: String,
    pub variants: Vec<(String, TranslationBody)>,
}

/// Aggregation output: families for analysis plus each locale's authored key
/// order, which emission follows when laying out module properties.
#[derive(Debug, Clone, Default)]
pub struct Aggregated {
    /// Key families, ordered by first appearance across the supplied locales.
    pub families: Vec<KeyFamily>,
    /// `(locale, authored key order)` per supplied locale.
    pub locale_keys: Vec<(String, Vec<String>)>,
}

/// Group per-locale entry lists by key.
///
/// Locales are consumed in the order supplied (the pipeline sorts them by
/// locale name beforehand), so the family order is deterministic regardless
/// of how the parallel loads finished.
pub fn aggregate(locales: Vec<LocaleEntries>) -> Aggregated {
    let mut families: Vec<KeyFamily> = Vec::new();
    let mut index_by_key: std::collections::HashMap<String, usize> =
        std::collections::HashMap::new();
    let mut locale_keys = Vec::with_capacity(locales.len());

    for locale in locales {
        let mut keys = Vec::with_capacity(locale.entries.len());
        for entry in locale.entries {
            keys.push(entry.key.clone());
            let idx = *index_by_key.entry(entry.key.clone()).or_insert_with(|| {
                families.push(KeyFamily {
                    key: entry.key.clone(),
                    variants: Vec::new(),
                });
                families.len() - 1
            });
            families[idx]
                .variants
                .push((locale.locale.clone(), entry.body));
        }
        locale_keys.push((locale.locale, keys));
    }

    Aggregated {
        families,
        locale_keys,
    }
}
