#![deny(missing_docs)]

//! UTXO standard script SDK.
//!
//! Re-exports the primitives, script types and template engine for
//! convenient single-crate usage.

pub use utxo_primitives as primitives;
pub use utxo_script as script;
pub use utxo_templates as templates;
