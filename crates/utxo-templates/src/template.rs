//! The two-phase check protocol shared by every template.

use utxo_script::{Network, Script, ScriptChunk};

use crate::TxOutType;

/// Outcome of the cheap byte-pattern phase of a check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FastCheck {
    /// The bytes cannot match; no parsing needed.
    Rejected,
    /// The byte pattern alone proves a match.
    Matched,
    /// Plausible; the parsed ops must be inspected.
    NeedsCore,
}

/// A recognizer for one standard script shape.
///
/// Implementors provide a fast check on raw bytes and, when that returns
/// [`FastCheck::NeedsCore`], a structural check on the parsed ops. The
/// provided `check_*` methods combine the two; a script whose pushes are
/// truncated never matches.
///
/// Typed extraction and generation are inherent methods on each template,
/// since every template has its own parameter types.
pub trait ScriptTemplate {
    /// The classification tag of scripts this template matches.
    fn tx_out_type(&self) -> TxOutType;

    /// Byte-pattern phase over the raw locking script.
    fn fast_check_locking_script(&self, script: &Script) -> FastCheck;

    /// Structural phase, run only after [`FastCheck::NeedsCore`].
    fn check_locking_script_core(&self, _script: &Script, _ops: &[ScriptChunk]) -> bool {
        false
    }

    /// Byte-pattern phase over the raw unlocking script.
    fn fast_check_unlocking_script(&self, unlocking: &Script) -> FastCheck;

    /// Structural phase for unlocking scripts, with the optional paired
    /// locking script for cross-checks.
    fn check_unlocking_script_core(
        &self,
        _network: &Network,
        _unlocking: &Script,
        _ops: &[ScriptChunk],
        _locking: Option<&Script>,
    ) -> bool {
        false
    }

    /// `true` if `script` is a locking script of this template's shape.
    fn check_locking_script(&self, script: &Script) -> bool {
        match self.fast_check_locking_script(script) {
            FastCheck::Rejected => false,
            FastCheck::Matched => true,
            FastCheck::NeedsCore => match script.chunks() {
                Ok(ops) => self.check_locking_script_core(script, &ops),
                Err(_) => false,
            },
        }
    }

    /// `true` if `unlocking` is an unlocking script of this template's
    /// shape under the network's signature rules.
    ///
    /// When `locking` is supplied the two scripts are cross-checked as well,
    /// for templates that have something to compare.
    fn check_unlocking_script(
        &self,
        network: &Network,
        unlocking: &Script,
        locking: Option<&Script>,
    ) -> bool {
        match self.fast_check_unlocking_script(unlocking) {
            FastCheck::Rejected => false,
            FastCheck::Matched => true,
            FastCheck::NeedsCore => match unlocking.chunks() {
                Ok(ops) => self.check_unlocking_script_core(network, unlocking, &ops, locking),
                Err(_) => false,
            },
        }
    }
}
