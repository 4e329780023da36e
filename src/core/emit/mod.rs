//! JavaScript emission.
//!
//! This module turns typed translations into output modules:
//! - `context`: batch-wide helper deduplication
//! - `translation`: per-translation expression generation
//! - `module`: per-locale module layout and the shared helper module

pub mod context;
pub mod module;
pub mod translation;

pub use context::{EmissionContext, Helper};
pub use module::{HELPER_FILE_NAME, emit_helper_module, emit_module};
pub use translation::emit_translation;
