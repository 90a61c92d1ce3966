//! Pay-to-pubkey: `<pubkey> OP_CHECKSIG`.

use utxo_primitives::ec::PubKey;
use utxo_script::opcodes::*;
use utxo_script::{Network, Script, ScriptChunk, TransactionSignature};

use crate::{FastCheck, ScriptTemplate, TemplateError, TxOutType};

/// Pay-to-pubkey outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PubKeyTemplate;

impl PubKeyTemplate {
    /// Stateless; equivalent to `PubKeyTemplate`.
    pub fn new() -> Self {
        PubKeyTemplate
    }

    /// The embedded key.
    ///
    /// With `deep` the key must also lie on the curve; otherwise only its
    /// prefix and length are checked.
    pub fn extract_locking_script_parameters(&self, script: &Script, deep: bool) -> Option<PubKey> {
        if !self.check_locking_script(script) {
            return None;
        }
        let bytes = script.to_bytes();
        let key = &bytes[1..bytes.len() - 1];
        if deep {
            PubKey::from_bytes(key).ok()
        } else {
            PubKey::from_bytes_unchecked(key).ok()
        }
    }

    /// `<pubkey> OP_CHECKSIG`.
    pub fn generate_locking_script(&self, pub_key: &PubKey) -> Script {
        Script::from_chunks([
            ScriptChunk::push(pub_key.to_bytes()),
            ScriptChunk::opcode(OP_CHECKSIG),
        ])
    }

    /// # Errors
    /// `Script(Primitives(..))` if `key` is not a well-formed encoded key.
    pub fn generate_locking_script_for_bytes(&self, key: &[u8]) -> Result<Script, TemplateError> {
        let pub_key = PubKey::from_bytes_unchecked(key).map_err(utxo_script::ScriptError::from)?;
        Ok(self.generate_locking_script(&pub_key))
    }

    /// The signature of a pay-to-pubkey unlocking script, if it parses.
    pub fn extract_unlocking_script_parameters(
        &self,
        network: &Network,
        unlocking: &Script,
    ) -> Option<TransactionSignature> {
        if !self.check_unlocking_script(network, unlocking, None) {
            return None;
        }
        let data = unlocking.push_datas()?.pop()?;
        if !TransactionSignature::valid_length(data.len()) {
            return None;
        }
        TransactionSignature::from_bytes(&data).ok()
    }

    /// A single push of the signature.
    pub fn generate_unlocking_script(&self, signature: &TransactionSignature) -> Script {
        Script::from_chunks([ScriptChunk::push(signature.to_bytes())])
    }
}

impl ScriptTemplate for PubKeyTemplate {
    fn tx_out_type(&self) -> TxOutType {
        TxOutType::Pubkey
    }

    // Keys are 33 or 65 bytes, always a direct push, so the key can be
    // validated in place without parsing ops.
    fn fast_check_locking_script(&self, script: &Script) -> FastCheck {
        let b = script.to_bytes();
        if b.len() > 3
            && b[0] as usize == b.len() - 2
            && PubKey::check_range(b, 1, b.len() - 2, false)
            && b[b.len() - 1] == OP_CHECKSIG
        {
            FastCheck::Matched
        } else {
            FastCheck::Rejected
        }
    }

    fn fast_check_unlocking_script(&self, unlocking: &Script) -> FastCheck {
        let len = unlocking.len();
        if (68..=82).contains(&len) || len == 10 {
            FastCheck::NeedsCore
        } else {
            FastCheck::Rejected
        }
    }

    fn check_unlocking_script_core(
        &self,
        network: &Network,
        _unlocking: &Script,
        ops: &[ScriptChunk],
        _locking: Option<&Script>,
    ) -> bool {
        match ops {
            [op] => op
                .data
                .as_deref()
                .is_some_and(|sig| TransactionSignature::is_valid(sig, network.signature_flags)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utxo_script::ScriptFlags;

    const KEY: &str = "02ce0b14fb842b1ba549fdd675c98075f12e9c510f8ef52bd021a9a1f4809d3b4d";
    const SIG: &str = "304402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd410220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d0901";

    fn key() -> PubKey {
        PubKey::from_hex(KEY).unwrap()
    }

    fn sig() -> TransactionSignature {
        TransactionSignature::from_hex(SIG).unwrap()
    }

    // -----------------------------------------------------------------------
    // Locking script
    // -----------------------------------------------------------------------

    /// A compressed key script matches and round-trips.
    #[test]
    fn test_locking_roundtrip() {
        let script = PubKeyTemplate.generate_locking_script(&key());
        assert_eq!(script.to_hex(), format!("21{}ac", KEY));
        assert!(PubKeyTemplate.check_locking_script(&script));
        assert_eq!(PubKeyTemplate.extract_locking_script_parameters(&script, true), Some(key()));
        let from_bytes = PubKeyTemplate
            .generate_locking_script_for_bytes(&hex::decode(KEY).unwrap())
            .unwrap();
        assert_eq!(from_bytes, script);
        assert!(PubKeyTemplate.generate_locking_script_for_bytes(&[0x02; 20]).is_err());
    }

    /// An off-curve key with a valid prefix passes only the shallow extraction.
    #[test]
    fn test_deep_extraction() {
        let mut bytes = vec![33, 0x02];
        bytes.extend([0xff; 32]);
        bytes.push(OP_CHECKSIG);
        let script = Script::from_bytes(&bytes);
        assert!(PubKeyTemplate.check_locking_script(&script));
        assert!(PubKeyTemplate.extract_locking_script_parameters(&script, false).is_some());
        assert_eq!(PubKeyTemplate.extract_locking_script_parameters(&script, true), None);
    }

    /// Wrong prefixes, lengths and final opcodes are rejected.
    #[test]
    fn test_locking_rejections() {
        let good = PubKeyTemplate.generate_locking_script(&key()).to_bytes().to_vec();

        let mut bad_prefix = good.clone();
        bad_prefix[1] = 0x05;
        assert!(!PubKeyTemplate.check_locking_script(&Script::from_bytes(&bad_prefix)));

        let mut bad_op = good.clone();
        *bad_op.last_mut().unwrap() = OP_CHECKSIGVERIFY;
        assert!(!PubKeyTemplate.check_locking_script(&Script::from_bytes(&bad_op)));

        let mut pushdata1 = vec![OP_PUSHDATA1];
        pushdata1.extend_from_slice(&good);
        assert!(!PubKeyTemplate.check_locking_script(&Script::from_bytes(&pushdata1)));

        assert!(!PubKeyTemplate.check_locking_script(&Script::from_bytes(&[OP_CHECKSIG])));
    }

    // -----------------------------------------------------------------------
    // Unlocking script
    // -----------------------------------------------------------------------

    /// A single strict-DER signature push is a pay-to-pubkey unlocking script.
    #[test]
    fn test_unlocking_roundtrip() {
        let network = Network::mainnet();
        let unlocking = PubKeyTemplate.generate_unlocking_script(&sig());
        assert_eq!(unlocking.len(), 72);
        assert!(PubKeyTemplate.check_unlocking_script(&network, &unlocking, None));
        assert_eq!(
            PubKeyTemplate.extract_unlocking_script_parameters(&network, &unlocking),
            Some(sig())
        );
    }

    /// Signature strictness comes from the network.
    #[test]
    fn test_unlocking_network_flags() {
        let mut bytes = hex::decode(SIG).unwrap();
        *bytes.last_mut().unwrap() = 0x04;
        let unlocking = Script::from_chunks([ScriptChunk::push(&bytes)]);
        assert!(!PubKeyTemplate.check_unlocking_script(&Network::mainnet(), &unlocking, None));

        let mut lax = Network::mainnet();
        lax.signature_flags = ScriptFlags::DER_SIGNATURES;
        assert!(PubKeyTemplate.check_unlocking_script(&lax, &unlocking, None));
    }

    /// A correctly sized push that is not a signature yields no parameters.
    #[test]
    fn test_malformed_signature() {
        let mut lax = Network::mainnet();
        lax.signature_flags = ScriptFlags::NONE;
        let unlocking = Script::from_chunks([ScriptChunk::push(&[0x42; 71])]);
        assert!(PubKeyTemplate.check_unlocking_script(&lax, &unlocking, None));
        assert_eq!(PubKeyTemplate.extract_unlocking_script_parameters(&lax, &unlocking), None);
        assert!(!PubKeyTemplate.check_unlocking_script(&Network::mainnet(), &unlocking, None));
    }

    /// Lengths outside the signature window are rejected before parsing.
    #[test]
    fn test_unlocking_length_window() {
        let network = Network::mainnet();
        let two_pushes = Script::from_bytes(&[OP_0, OP_0]);
        assert!(!PubKeyTemplate.check_unlocking_script(&network, &two_pushes, None));
        let short = Script::from_chunks([ScriptChunk::push(&[0x30; 40])]);
        assert!(!PubKeyTemplate.check_unlocking_script(&network, &short, None));
    }
}
