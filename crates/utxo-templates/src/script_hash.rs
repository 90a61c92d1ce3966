//! Pay-to-script-hash: `OP_HASH160 <20 bytes> OP_EQUAL`.

use utxo_script::opcodes::*;
use utxo_script::{
    Address, AddressKind, Network, Script, ScriptChunk, ScriptId, TransactionSignature,
};

use crate::{FastCheck, MultisigTemplate, ScriptTemplate, TemplateError, TxOutType};

/// Largest redeem script that fits in a single push.
pub const MAX_REDEEM_SCRIPT_SIZE: usize = 520;

const P2SH_LEN: usize = 23;

/// The parts of a pay-to-script-hash unlocking script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptHashSigParams {
    /// The pushes preceding the redeem script.
    pub pushes: Vec<Vec<u8>>,
    /// The final push, interpreted as a script.
    pub redeem_script: Script,
}

impl ScriptHashSigParams {
    /// Read `pushes` as the unlocking script of a multisig redeem script.
    pub fn multisig_signatures(&self, network: &Network) -> Option<Vec<Option<TransactionSignature>>> {
        let unlocking = Script::from_chunks(self.pushes.iter().map(|p| ScriptChunk::push(p)));
        MultisigTemplate.extract_unlocking_script_parameters(network, &unlocking, None)
    }
}

/// Pay-to-script-hash outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScriptHashTemplate;

impl ScriptHashTemplate {
    /// Stateless; equivalent to `ScriptHashTemplate`.
    pub fn new() -> Self {
        ScriptHashTemplate
    }

    /// The redeem script hash of a pay-to-script-hash script.
    pub fn extract_locking_script_parameters(&self, script: &Script) -> Option<ScriptId> {
        if !self.check_locking_script(script) {
            return None;
        }
        ScriptId::from_bytes(&script.to_bytes()[2..22]).ok()
    }

    /// `OP_HASH160 <script_id> OP_EQUAL`.
    pub fn generate_locking_script(&self, script_id: &ScriptId) -> Script {
        script_id.locking_script()
    }

    /// Lock to the hash of `redeem_script`.
    pub fn generate_locking_script_for_redeem(&self, redeem_script: &Script) -> Script {
        redeem_script.hash().locking_script()
    }

    /// # Errors
    /// `AddressKindMismatch` if `address` is a pubkey-hash address.
    pub fn generate_locking_script_for_address(&self, address: &Address) -> Result<Script, TemplateError> {
        match address.kind {
            AddressKind::ScriptHash => Ok(address.locking_script()),
            AddressKind::PubKeyHash => Err(TemplateError::AddressKindMismatch(
                address.to_string(),
                "script-hash",
            )),
        }
    }

    /// Split an unlocking script into its redeem script and the pushes
    /// before it.
    ///
    /// The pushes are not checked against the redeem script's own template.
    pub fn extract_unlocking_script_parameters(
        &self,
        network: &Network,
        unlocking: &Script,
        locking: Option<&Script>,
    ) -> Option<ScriptHashSigParams> {
        if !self.check_unlocking_script(network, unlocking, locking) {
            return None;
        }
        let mut pushes = unlocking.push_datas()?;
        let redeem = pushes.pop()?;
        Some(ScriptHashSigParams {
            pushes,
            redeem_script: Script::from(redeem),
        })
    }

    /// The minimal push of each blob followed by the push of the redeem script.
    ///
    /// # Errors
    /// `RedeemScriptTooLarge` above 520 bytes.
    pub fn generate_unlocking_script<D: AsRef<[u8]>>(
        &self,
        pushes: &[D],
        redeem_script: &Script,
    ) -> Result<Script, TemplateError> {
        if redeem_script.len() > MAX_REDEEM_SCRIPT_SIZE {
            tracing::debug!("redeem script of {} bytes is too large", redeem_script.len());
            return Err(TemplateError::RedeemScriptTooLarge(redeem_script.len()));
        }
        let chunks = pushes
            .iter()
            .map(|p| ScriptChunk::push(p.as_ref()))
            .chain(std::iter::once(ScriptChunk::push(redeem_script.to_bytes())));
        Ok(Script::from_chunks(chunks))
    }

    /// Unlocking script for a redeem script satisfied by signatures.
    ///
    /// Absent signatures become OP_0. When the redeem script is multisig the
    /// leading OP_0 its unlocking script needs is added.
    pub fn generate_unlocking_script_for_redeem(
        &self,
        signatures: &[Option<TransactionSignature>],
        redeem_script: &Script,
    ) -> Result<Script, TemplateError> {
        let mut pushes: Vec<Vec<u8>> = Vec::with_capacity(signatures.len() + 1);
        if MultisigTemplate.check_locking_script(redeem_script) {
            pushes.push(Vec::new());
        }
        pushes.extend(
            signatures
                .iter()
                .map(|sig| sig.as_ref().map(|s| s.to_bytes().to_vec()).unwrap_or_default()),
        );
        self.generate_unlocking_script(&pushes, redeem_script)
    }
}

impl ScriptTemplate for ScriptHashTemplate {
    fn tx_out_type(&self) -> TxOutType {
        TxOutType::ScriptHash
    }

    // The fixed 23-byte pattern is unambiguous; no op parsing needed.
    fn fast_check_locking_script(&self, script: &Script) -> FastCheck {
        let b = script.to_bytes();
        if b.len() == P2SH_LEN && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL {
            FastCheck::Matched
        } else {
            FastCheck::Rejected
        }
    }

    fn fast_check_unlocking_script(&self, unlocking: &Script) -> FastCheck {
        if unlocking.is_empty() {
            FastCheck::Rejected
        } else {
            FastCheck::NeedsCore
        }
    }

    fn check_unlocking_script_core(
        &self,
        _network: &Network,
        _unlocking: &Script,
        ops: &[ScriptChunk],
        locking: Option<&Script>,
    ) -> bool {
        if ops.is_empty() || !ops.iter().all(ScriptChunk::is_push) {
            return false;
        }
        let Some(redeem) = ops[ops.len() - 1].push_data() else {
            return false;
        };
        let redeem = Script::from(redeem);
        if let Some(locking) = locking {
            let Some(expected) = self.extract_locking_script_parameters(locking) else {
                tracing::debug!("paired locking script is not pay-to-script-hash");
                return false;
            };
            if redeem.hash() != expected {
                tracing::debug!("redeem script hash {} does not match {}", redeem.hash(), expected);
                return false;
            }
        }
        redeem.len() <= MAX_REDEEM_SCRIPT_SIZE && redeem.is_valid()
    }
}
