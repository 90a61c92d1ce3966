//! Version 0 witness key hash: `OP_0 <20 bytes>`.

use utxo_primitives::ec::PubKey;
use utxo_script::opcodes::*;
use utxo_script::{Network, Script, TransactionSignature, WitKeyId, Witness};

use crate::pubkey_hash::{check_sig_and_key, parse_sig_and_key};
use crate::witness::empty_unlocking;
use crate::{FastCheck, PubKeyHashSigParams, ScriptTemplate, TxOutType};

const P2WPKH_LEN: usize = 22;

/// Version 0 witness key-hash outputs and their witnesses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WitPubKeyHashTemplate;

impl WitPubKeyHashTemplate {
    /// Stateless; equivalent to `WitPubKeyHashTemplate`.
    pub fn new() -> Self {
        WitPubKeyHashTemplate
    }

    /// The 20-byte program of a version 0 key-hash script.
    pub fn extract_locking_script_parameters(&self, script: &Script) -> Option<WitKeyId> {
        if !self.check_locking_script(script) {
            return None;
        }
        WitKeyId::from_bytes(&script.to_bytes()[2..]).ok()
    }

    /// `OP_0 <key_id>`.
    pub fn generate_locking_script(&self, key_id: &WitKeyId) -> Script {
        key_id.locking_script()
    }

    /// `OP_0 <hash160(pub_key)>`.
    pub fn generate_locking_script_for_pubkey(&self, pub_key: &PubKey) -> Script {
        WitKeyId::from_pubkey(pub_key).locking_script()
    }

    /// `true` if `witness` is `[<sig or placeholder>, <pubkey>]`.
    ///
    /// When `locking` is supplied the key must hash to its program.
    pub fn check_witness(&self, _network: &Network, witness: &Witness, locking: Option<&Script>) -> bool {
        let [sig, pub_key] = witness.items() else {
            return false;
        };
        if !check_sig_and_key(signature_item(sig), pub_key) {
            return false;
        }
        if let Some(locking) = locking {
            let Some(expected) = self.extract_locking_script_parameters(locking) else {
                tracing::debug!("paired locking script is not a witness key hash");
                return false;
            };
            let actual = WitKeyId::new(utxo_primitives::hash::hash160(pub_key));
            if actual != expected {
                tracing::debug!("witness key hash {} does not match {}", actual, expected);
                return false;
            }
        }
        true
    }

    /// Signature and key of a checked witness; a placeholder gives `None`.
    pub fn extract_witness_parameters(
        &self,
        network: &Network,
        witness: &Witness,
        locking: Option<&Script>,
    ) -> Option<PubKeyHashSigParams> {
        if !self.check_witness(network, witness, locking) {
            return None;
        }
        let [sig, pub_key] = witness.items() else {
            return None;
        };
        parse_sig_and_key(signature_item(sig), pub_key)
    }

    /// `[<sig>, <pubkey>]`, with an empty item for an absent signature.
    pub fn generate_witness(&self, signature: Option<&TransactionSignature>, pub_key: &PubKey) -> Witness {
        let sig = signature.map(|s| s.to_bytes().to_vec()).unwrap_or_default();
        Witness::from(vec![sig, pub_key.to_bytes().to_vec()])
    }
}

/// The signature bytes of the first item; an empty item or a lone 0x00 is
/// the placeholder.
fn signature_item(item: &[u8]) -> Option<&[u8]> {
    match item {
        [] | [0x00] => None,
        _ => Some(item),
    }
}

impl ScriptTemplate for WitPubKeyHashTemplate {
    fn tx_out_type(&self) -> TxOutType {
        TxOutType::Segwit
    }

    fn fast_check_locking_script(&self, script: &Script) -> FastCheck {
        let b = script.to_bytes();
        if b.len() == P2WPKH_LEN && b[0] == OP_0 && b[1] == OP_DATA_20 {
            FastCheck::Matched
        } else {
            FastCheck::Rejected
        }
    }

    fn fast_check_unlocking_script(&self, unlocking: &Script) -> FastCheck {
        empty_unlocking(unlocking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WitnessTemplate;

    const KEY: &str = "026cf33373a9f3f6c676b75b543180703df225f7f8edbffedc417718a8ad4e89ce";
    const KEY_HASH: &str = "00ac6144c4db7b5790f343cf0477a65fb8a02eb7";
    const SIG: &str = "304402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd410220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d0901";

    fn key() -> PubKey {
        PubKey::from_hex(KEY).unwrap()
    }

    fn sig() -> TransactionSignature {
        TransactionSignature::from_hex(SIG).unwrap()
    }

    /// The locking script is `OP_0 OP_DATA_20 <hash160(key)>`.
    #[test]
    fn test_locking_roundtrip() {
        let script = WitPubKeyHashTemplate.generate_locking_script_for_pubkey(&key());
        assert_eq!(script.to_hex(), format!("0014{}", KEY_HASH));
        assert!(WitPubKeyHashTemplate.check_locking_script(&script));
        let id = WitPubKeyHashTemplate.extract_locking_script_parameters(&script).unwrap();
        assert_eq!(id.to_hex(), KEY_HASH);
        assert_eq!(WitPubKeyHashTemplate.generate_locking_script(&id), script);
    }

    /// Programs of other lengths or versions are generic witness only.
    #[test]
    fn test_locking_specialization() {
        let v1 = Script::from_hex(&format!("5114{}", KEY_HASH)).unwrap();
        assert!(WitnessTemplate.check_locking_script(&v1));
        assert!(!WitPubKeyHashTemplate.check_locking_script(&v1));

        let long = Script::from_hex(&format!("0015{}00", KEY_HASH)).unwrap();
        assert!(WitnessTemplate.check_locking_script(&long));
        assert!(!WitPubKeyHashTemplate.check_locking_script(&long));
    }

    /// A signed witness round-trips and is bound to the locking script.
    #[test]
    fn test_witness_roundtrip() {
        let network = Network::mainnet();
        let locking = WitPubKeyHashTemplate.generate_locking_script_for_pubkey(&key());
        let witness = WitPubKeyHashTemplate.generate_witness(Some(&sig()), &key());
        assert_eq!(witness.len(), 2);
        let params = WitPubKeyHashTemplate
            .extract_witness_parameters(&network, &witness, Some(&locking))
            .expect("p2wpkh witness");
        assert_eq!(params.signature, Some(sig()));
        assert_eq!(params.wit_key_id().to_hex(), KEY_HASH);
        assert_eq!(
            WitPubKeyHashTemplate.generate_witness(params.signature.as_ref(), &params.pub_key),
            witness
        );
    }

    /// An empty first item is the placeholder for a missing signature.
    #[test]
    fn test_witness_placeholder() {
        let network = Network::mainnet();
        let witness = WitPubKeyHashTemplate.generate_witness(None, &key());
        assert!(witness.items()[0].is_empty());
        let params = WitPubKeyHashTemplate
            .extract_witness_parameters(&network, &witness, None)
            .expect("p2wpkh witness");
        assert_eq!(params.signature, None);
        assert_eq!(params.pub_key, key());
    }

    /// A lone 0x00 item is read as the placeholder too.
    #[test]
    fn test_witness_zero_byte_placeholder() {
        let network = Network::mainnet();
        let witness = Witness::from(vec![vec![0x00], key().to_bytes().to_vec()]);
        assert!(WitPubKeyHashTemplate.check_witness(&network, &witness, None));
        let params = WitPubKeyHashTemplate
            .extract_witness_parameters(&network, &witness, None)
            .expect("p2wpkh witness");
        assert_eq!(params.signature, None);
        assert_eq!(params.pub_key, key());
    }

    /// Signature items outside the signature length range are rejected.
    #[test]
    fn test_witness_signature_length() {
        let network = Network::mainnet();
        for item in [vec![0xde, 0xad], vec![0x30; 66], vec![0x30; 81]] {
            let witness = Witness::from(vec![item, key().to_bytes().to_vec()]);
            assert!(!WitPubKeyHashTemplate.check_witness(&network, &witness, None));
            assert_eq!(WitPubKeyHashTemplate.extract_witness_parameters(&network, &witness, None), None);
        }
    }

    /// Item count, key format and the hash cross-check are enforced.
    #[test]
    fn test_witness_rejections() {
        let network = Network::mainnet();
        let one_item = Witness::from(vec![key().to_bytes().to_vec()]);
        assert!(!WitPubKeyHashTemplate.check_witness(&network, &one_item, None));

        let bad_key = Witness::from(vec![sig().to_bytes().to_vec(), vec![0x04; 33]]);
        assert!(!WitPubKeyHashTemplate.check_witness(&network, &bad_key, None));

        let witness = WitPubKeyHashTemplate.generate_witness(Some(&sig()), &key());
        let other = WitPubKeyHashTemplate.generate_locking_script(&WitKeyId::new([9; 20]));
        assert!(!WitPubKeyHashTemplate.check_witness(&network, &witness, Some(&other)));
    }

    /// The spending script of a witness output is empty.
    #[test]
    fn test_unlocking_script_empty() {
        let network = Network::mainnet();
        assert!(WitPubKeyHashTemplate.check_unlocking_script(&network, &Script::new(), None));
        let non_empty = Script::from_bytes(&[OP_0]);
        assert!(!WitPubKeyHashTemplate.check_unlocking_script(&network, &non_empty, None));
    }
}
