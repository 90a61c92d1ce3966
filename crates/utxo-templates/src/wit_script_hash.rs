//! Version 0 witness script hash: `OP_0 <32 bytes>`.

use utxo_script::opcodes::*;
use utxo_script::{Script, WitScriptId, Witness};

use crate::witness::empty_unlocking;
use crate::{FastCheck, ScriptTemplate, TemplateError, TxOutType};

const P2WSH_LEN: usize = 34;

/// The parts of a witness script-hash witness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WitScriptHashParams {
    /// The items preceding the redeem script.
    pub pushes: Vec<Vec<u8>>,
    /// The final item, interpreted as a script.
    pub redeem_script: Script,
}

/// Version 0 witness script-hash outputs and their witnesses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WitScriptHashTemplate;

impl WitScriptHashTemplate {
    /// Stateless; equivalent to `WitScriptHashTemplate`.
    pub fn new() -> Self {
        WitScriptHashTemplate
    }

    /// The 32-byte program of a version 0 script-hash script.
    pub fn extract_locking_script_parameters(&self, script: &Script) -> Option<WitScriptId> {
        if !self.check_locking_script(script) {
            return None;
        }
        WitScriptId::from_bytes(&script.to_bytes()[2..]).ok()
    }

    /// `OP_0 <script_id>`.
    pub fn generate_locking_script(&self, script_id: &WitScriptId) -> Script {
        script_id.locking_script()
    }

    /// Lock to the sha256 of `redeem_script`.
    pub fn generate_locking_script_for_redeem(&self, redeem_script: &Script) -> Script {
        redeem_script.wit_hash().locking_script()
    }

    /// `true` if `witness` ends in a redeem script.
    ///
    /// When `locking` is supplied the redeem script must hash to its program.
    pub fn check_witness(&self, witness: &Witness, locking: Option<&Script>) -> bool {
        let Some(redeem) = witness.last() else {
            return false;
        };
        let Some(locking) = locking else {
            return true;
        };
        let Some(expected) = self.extract_locking_script_parameters(locking) else {
            tracing::debug!("paired locking script is not a witness script hash");
            return false;
        };
        let actual = WitScriptId::from_script(&Script::from_bytes(redeem));
        if actual != expected {
            tracing::debug!("witness script hash {} does not match {}", actual, expected);
            return false;
        }
        true
    }

    /// Redeem script and the items before it.
    pub fn extract_witness_parameters(
        &self,
        witness: &Witness,
        locking: Option<&Script>,
    ) -> Option<WitScriptHashParams> {
        if !self.check_witness(witness, locking) {
            return None;
        }
        let (redeem, pushes) = witness.items().split_last()?;
        Some(WitScriptHashParams {
            pushes: pushes.to_vec(),
            redeem_script: Script::from_bytes(redeem),
        })
    }

    /// `pushes` followed by the redeem script.
    pub fn generate_witness<D: AsRef<[u8]>>(&self, pushes: &[D], redeem_script: &Script) -> Witness {
        let mut witness: Witness = pushes
            .iter()
            .map(|p| p.as_ref().to_vec())
            .collect::<Vec<_>>()
            .into();
        witness.push(redeem_script.to_bytes());
        witness
    }

    /// Witness from the pushes of a legacy-style unlocking script.
    ///
    /// # Errors
    /// `NotPushOnly` if `unlocking` has non-push ops or does not parse.
    pub fn generate_witness_from_script(
        &self,
        unlocking: &Script,
        redeem_script: &Script,
    ) -> Result<Witness, TemplateError> {
        let pushes = unlocking.push_datas().ok_or(TemplateError::NotPushOnly)?;
        Ok(self.generate_witness(&pushes, redeem_script))
    }
}

impl ScriptTemplate for WitScriptHashTemplate {
    fn tx_out_type(&self) -> TxOutType {
        TxOutType::Segwit
    }

    fn fast_check_locking_script(&self, script: &Script) -> FastCheck {
        let b = script.to_bytes();
        if b.len() == P2WSH_LEN && b[0] == OP_0 && b[1] == OP_DATA_32 {
            FastCheck::Matched
        } else {
            FastCheck::Rejected
        }
    }

    fn fast_check_unlocking_script(&self, unlocking: &Script) -> FastCheck {
        empty_unlocking(unlocking)
    }
}
