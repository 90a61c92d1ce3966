//! Pay-to-pubkey-hash: `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`.

use utxo_primitives::ec::PubKey;
use utxo_script::opcodes::*;
use utxo_script::{
    Address, AddressKind, KeyId, Network, Script, ScriptChunk, ScriptFlags,
    TransactionSignature, WitKeyId,
};

use crate::{FastCheck, ScriptTemplate, TemplateError, TxOutType};

const P2PKH_LEN: usize = 25;

/// A signature (or its absence) and the key it is checked against.
///
/// Shared by pay-to-pubkey-hash unlocking scripts and version 0 witness
/// key-hash witnesses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PubKeyHashSigParams {
    /// `None` when the slot holds a placeholder.
    pub signature: Option<TransactionSignature>,
    pub pub_key: PubKey,
}

impl PubKeyHashSigParams {
    /// Hash160 of the key.
    pub fn key_id(&self) -> KeyId {
        KeyId::from_pubkey(&self.pub_key)
    }

    /// The same hash, as a version 0 witness program.
    pub fn wit_key_id(&self) -> WitKeyId {
        WitKeyId::from_pubkey(&self.pub_key)
    }

    /// The pay-to-pubkey-hash locking script this key can spend.
    pub fn locking_script(&self) -> Script {
        self.key_id().locking_script()
    }
}

/// Checks shared with the witness key-hash template: a signature slot
/// holding either a placeholder or signature-length bytes, and a key push
/// that passes the prefix/length check.
///
/// The signature bytes are not parsed here, so a slot of the right length
/// that is not DER passes the check and fails extraction.
pub(crate) fn check_sig_and_key(signature: Option<&[u8]>, pub_key: &[u8]) -> bool {
    let sig_ok = match signature {
        None => true,
        Some(sig) => {
            TransactionSignature::valid_length(sig.len())
                && TransactionSignature::is_valid(sig, ScriptFlags::NONE)
        }
    };
    sig_ok && PubKey::check(pub_key, false)
}

/// Parse a signature slot and key; `None` if either fails to parse.
pub(crate) fn parse_sig_and_key(signature: Option<&[u8]>, pub_key: &[u8]) -> Option<PubKeyHashSigParams> {
    let signature = match signature {
        None => None,
        Some(sig) => Some(TransactionSignature::from_bytes(sig).ok()?),
    };
    Some(PubKeyHashSigParams {
        signature,
        pub_key: PubKey::from_bytes_unchecked(pub_key).ok()?,
    })
}

/// Pay-to-pubkey-hash outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PubKeyHashTemplate;

impl PubKeyHashTemplate {
    /// Stateless; equivalent to `PubKeyHashTemplate`.
    pub fn new() -> Self {
        PubKeyHashTemplate
    }

    /// The key hash of a pay-to-pubkey-hash script.
    pub fn extract_locking_script_parameters(&self, script: &Script) -> Option<KeyId> {
        if !self.check_locking_script(script) {
            return None;
        }
        KeyId::from_bytes(&script.to_bytes()[3..23]).ok()
    }

    /// The 25-byte script paying to `key_id`.
    pub fn generate_locking_script(&self, key_id: &KeyId) -> Script {
        key_id.locking_script()
    }

    /// The 25-byte script paying to the hash of `pub_key`.
    pub fn generate_locking_script_for_pubkey(&self, pub_key: &PubKey) -> Script {
        KeyId::from_pubkey(pub_key).locking_script()
    }

    /// # Errors
    /// `AddressKindMismatch` if `address` is a script-hash address.
    pub fn generate_locking_script_for_address(&self, address: &Address) -> Result<Script, TemplateError> {
        match address.kind {
            AddressKind::PubKeyHash => Ok(address.locking_script()),
            AddressKind::ScriptHash => Err(TemplateError::AddressKindMismatch(
                address.to_string(),
                "pubkey-hash",
            )),
        }
    }

    /// Signature and key of `<sig> <pubkey>`; `None` if either does not parse.
    pub fn extract_unlocking_script_parameters(
        &self,
        network: &Network,
        unlocking: &Script,
        locking: Option<&Script>,
    ) -> Option<PubKeyHashSigParams> {
        if !self.check_unlocking_script(network, unlocking, locking) {
            return None;
        }
        let ops = unlocking.chunks().ok()?;
        let pub_key = ops[1].push_data()?;
        parse_sig_and_key(signature_slot(&ops[0]), &pub_key)
    }

    /// `<sig> <pubkey>`, with OP_0 standing in for an absent signature.
    pub fn generate_unlocking_script(
        &self,
        signature: Option<&TransactionSignature>,
        pub_key: &PubKey,
    ) -> Script {
        let sig = match signature {
            Some(sig) => ScriptChunk::push(sig.to_bytes()),
            None => ScriptChunk::opcode(OP_0),
        };
        Script::from_chunks([sig, ScriptChunk::push(pub_key.to_bytes())])
    }
}

/// The signature bytes of the first op, `None` for the OP_0 placeholder.
fn signature_slot(op: &ScriptChunk) -> Option<&[u8]> {
    match op.op {
        OP_0 => None,
        _ => op.data.as_deref(),
    }
}

impl ScriptTemplate for PubKeyHashTemplate {
    fn tx_out_type(&self) -> TxOutType {
        TxOutType::PubkeyHash
    }

    // The fixed 25-byte pattern is unambiguous; no op parsing needed.
    fn fast_check_locking_script(&self, script: &Script) -> FastCheck {
        let b = script.to_bytes();
        if b.len() == P2PKH_LEN
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
        {
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
        let [sig, key] = ops else {
            return false;
        };
        if sig.op != OP_0 && sig.data.is_none() {
            return false;
        }
        let Some(pub_key) = key.data.as_deref() else {
            return false;
        };
        if !check_sig_and_key(signature_slot(sig), pub_key) {
            return false;
        }
        if let Some(locking) = locking {
            let Some(expected) = self.extract_locking_script_parameters(locking) else {
                tracing::debug!("paired locking script is not pay-to-pubkey-hash");
                return false;
            };
            let actual = KeyId::new(utxo_primitives::hash::hash160(pub_key));
            if actual != expected {
                tracing::debug!("public key hash {} does not match {}", actual, expected);
                return false;
            }
        }
        true
    }
}
