//! Shared per-batch emission context.
//!
//! Per-key emission decides independently whether it needs a runtime helper,
//! and per-locale emission runs in parallel, so helper declarations are
//! deduplicated through one content-addressed record: a set keyed by helper
//! identity, populated during emission and flushed once per batch into the
//! shared helper module.

use std::collections::BTreeSet;
use std::sync::Mutex;

/// A runtime helper that generated code may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Helper {
    /// Encodes plain strings, converts safe strings, stringifies the rest.
    EncodeIfString,
}

impl Helper {
    /// The name the helper module exports and generated modules import.
    pub fn export_name(&self) -> &'static str {
        match self {
            Helper::EncodeIfString => "encodeIfString",
        }
    }

    /// The helper's JavaScript definition.
    pub fn source(&self) -> &'static str {
        match self {
            Helper::EncodeIfString => {
                r#"export function encodeIfString(ctx, value) {
    if (typeof value === "string") {
        return ctx.encode(value);
    }
    if (ctx.isSafeString(value)) {
        return ctx.convertSafeString(value);
    }
    return String(value);
}
"#
            }
        }
    }
}

/// Batch-wide record of which helpers any module referenced.
///
/// The only synchronization point of the parallel emission fan-out.
#[derive(Debug, Default)]
pub struct EmissionContext {
    used: Mutex<BTreeSet<Helper>>,
}

impl EmissionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a helper reference and hand back its import name.
    pub fn require(&self, helper: Helper) -> &'static str {
        self.used
            .lock()
            .expect("emission context lock poisoned")
            .insert(helper);
        helper.export_name()
    }

    /// The helpers referenced so far, in stable order.
    pub fn used_helpers(&self) -> Vec<Helper> {
        self.used
            .lock()
            .expect("emission context lock poisoned")
            .iter()
            .copied()
            .collect()
    }
}
