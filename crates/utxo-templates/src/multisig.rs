//! Bare multisig: `<M> <pubkey>... <N> OP_CHECKMULTISIG`.

use utxo_primitives::ec::PubKey;
use utxo_script::opcodes::*;
use utxo_script::{Network, Script, ScriptChunk, TransactionSignature};

use crate::{FastCheck, ScriptTemplate, TemplateError, TxOutType};

/// Most keys a bare multisig locking script may declare.
pub const MAX_PUBKEYS_PER_MULTISIG: i64 = 20;

/// Parameters of a multisig locking script.
///
/// Keys must decode on the curve to land in `pub_keys`. Hybrid keys
/// (0x06/0x07 prefix) pass the format check but are not decoded, so they
/// always end up in `invalid_pub_keys`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigParams {
    /// Signatures required (M).
    pub signature_count: usize,
    /// Key pushes that parse as public keys, in script order.
    pub pub_keys: Vec<PubKey>,
    /// Key pushes that do not, in script order.
    pub invalid_pub_keys: Vec<Vec<u8>>,
}

impl MultisigParams {
    /// Number of keys declared (N).
    pub fn key_count(&self) -> usize {
        self.pub_keys.len() + self.invalid_pub_keys.len()
    }
}

/// Bare M-of-N multisig outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MultisigTemplate;

impl MultisigTemplate {
    /// Stateless; equivalent to `MultisigTemplate`.
    pub fn new() -> Self {
        MultisigTemplate
    }

    /// Split the key pushes of a multisig locking script into valid and
    /// invalid keys.
    pub fn extract_locking_script_parameters(&self, script: &Script) -> Option<MultisigParams> {
        let ops = script.chunks().ok()?;
        if !self.check_locking_script_core(script, &ops) {
            return None;
        }
        let signature_count = usize::try_from(ops[0].as_int()?).ok()?;
        let mut pub_keys = Vec::new();
        let mut invalid_pub_keys = Vec::new();
        for op in &ops[1..ops.len() - 2] {
            let bytes = op.push_data()?;
            match PubKey::check(&bytes, false).then(|| PubKey::from_bytes(&bytes).ok()).flatten() {
                Some(key) => pub_keys.push(key),
                None => invalid_pub_keys.push(bytes),
            }
        }
        Some(MultisigParams {
            signature_count,
            pub_keys,
            invalid_pub_keys,
        })
    }

    /// `<M> <key>... <N> OP_CHECKMULTISIG`.
    ///
    /// # Errors
    /// M and N must each fit a small-integer opcode (0..=16), and M may not
    /// exceed N.
    pub fn generate_locking_script(
        &self,
        signature_count: usize,
        keys: &[PubKey],
    ) -> Result<Script, TemplateError> {
        let m = small_int_op("signature count", signature_count)?;
        let n = small_int_op("key count", keys.len())?;
        if signature_count > keys.len() {
            tracing::debug!(
                "multisig requires {} signatures from {} keys",
                signature_count,
                keys.len()
            );
            return Err(TemplateError::SignatureCountExceedsKeys {
                required: signature_count,
                keys: keys.len(),
            });
        }
        let mut chunks = vec![ScriptChunk::opcode(m)];
        chunks.extend(keys.iter().map(|key| ScriptChunk::push(key.to_bytes())));
        chunks.push(ScriptChunk::opcode(n));
        chunks.push(ScriptChunk::opcode(OP_CHECKMULTISIG));
        Ok(Script::from_chunks(chunks))
    }

    /// The signature slots of a multisig unlocking script, `None` marking
    /// an OP_0 placeholder.
    pub fn extract_unlocking_script_parameters(
        &self,
        network: &Network,
        unlocking: &Script,
        locking: Option<&Script>,
    ) -> Option<Vec<Option<TransactionSignature>>> {
        if !self.check_unlocking_script(network, unlocking, locking) {
            return None;
        }
        let ops = unlocking.chunks().ok()?;
        ops[1..]
            .iter()
            .map(|op| match op.op {
                OP_0 => Some(None),
                _ => TransactionSignature::from_bytes(op.data.as_deref()?).ok().map(Some),
            })
            .collect()
    }

    /// `OP_0 <sig or OP_0>...`, one slot per entry.
    ///
    /// An empty list gives the bare `OP_0` that spends a 0-of-N script.
    pub fn generate_unlocking_script(&self, signatures: &[Option<TransactionSignature>]) -> Script {
        let chunks = std::iter::once(ScriptChunk::opcode(OP_0)).chain(signatures.iter().map(
            |sig| match sig {
                Some(sig) => ScriptChunk::push(sig.to_bytes()),
                None => ScriptChunk::opcode(OP_0),
            },
        ));
        Script::from_chunks(chunks)
    }
}

fn small_int_op(what: &'static str, value: usize) -> Result<u8, TemplateError> {
    u8::try_from(value)
        .ok()
        .and_then(encode_small_int)
        .ok_or_else(|| {
            tracing::debug!("{} {} does not fit a small integer", what, value);
            TemplateError::SmallIntegerOutOfRange { what, value }
        })
}

impl ScriptTemplate for MultisigTemplate {
    fn tx_out_type(&self) -> TxOutType {
        TxOutType::Multisig
    }

    fn fast_check_locking_script(&self, _script: &Script) -> FastCheck {
        FastCheck::NeedsCore
    }

    fn check_locking_script_core(&self, _script: &Script, ops: &[ScriptChunk]) -> bool {
        if ops.len() < 3 {
            return false;
        }
        let (Some(m), Some(n)) = (ops[0].as_int(), ops[ops.len() - 2].as_int()) else {
            return false;
        };
        if !(0..=MAX_PUBKEYS_PER_MULTISIG).contains(&n) || !(0..=n).contains(&m) {
            return false;
        }
        if ops.len() as i64 != n + 3 {
            return false;
        }
        ops[1..ops.len() - 2].iter().all(|op| op.push_data().is_some())
            && ops[ops.len() - 1].op == OP_CHECKMULTISIG
    }

    fn fast_check_unlocking_script(&self, unlocking: &Script) -> FastCheck {
        match unlocking.to_bytes().first() {
            Some(&OP_0) => FastCheck::NeedsCore,
            _ => FastCheck::Rejected,
        }
    }

    fn check_unlocking_script_core(
        &self,
        _network: &Network,
        _unlocking: &Script,
        ops: &[ScriptChunk],
        locking: Option<&Script>,
    ) -> bool {
        if !ops.iter().all(ScriptChunk::is_push) {
            return false;
        }
        if ops.first().map(|op| op.op) != Some(OP_0) {
            return false;
        }
        let slots_ok = ops[1..].iter().all(|op| {
            op.op == OP_0
                || op
                    .data
                    .as_ref()
                    .is_some_and(|data| TransactionSignature::valid_length(data.len()))
        });
        if !slots_ok {
            return false;
        }
        // A lone placeholder only spends a 0-of-N script, which needs the
        // locking script to tell.
        let Some(locking) = locking else {
            return ops.len() >= 2;
        };
        let Some(params) = self.extract_locking_script_parameters(locking) else {
            tracing::debug!("paired locking script is not multisig");
            return false;
        };
        if params.signature_count != ops.len() - 1 {
            tracing::debug!(
                "multisig unlocking script has {} slots, locking script requires {}",
                ops.len() - 1,
                params.signature_count
            );
            return false;
        }
        true
    }
}
