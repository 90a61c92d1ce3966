//! Null-data outputs: `OP_RETURN <push>*`.

use utxo_script::network::DEFAULT_MAX_OP_RETURN_RELAY;
use utxo_script::opcodes::OP_RETURN;
use utxo_script::{Network, Script, ScriptChunk};

use crate::{FastCheck, ScriptTemplate, TemplateError, TxOutType};

/// Provably unspendable outputs carrying pushed data.
///
/// The size limit is the whole locking script, marker included, and is
/// normally the network's relay policy limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NullDataTemplate {
    max_script_size: usize,
}

impl NullDataTemplate {
    /// A template accepting scripts of at most `max_script_size` bytes.
    pub fn new(max_script_size: usize) -> Self {
        NullDataTemplate { max_script_size }
    }

    /// Sized by the network's OP_RETURN relay limit.
    pub fn for_network(network: &Network) -> Self {
        Self::new(network.max_op_return_relay)
    }

    /// Largest accepted script, marker included.
    pub fn max_script_size(&self) -> usize {
        self.max_script_size
    }

    /// The pushed blobs, in order, or `None` if `script` is not null-data.
    pub fn extract_locking_script_parameters(&self, script: &Script) -> Option<Vec<Vec<u8>>> {
        if self.fast_check_locking_script(script) == FastCheck::Rejected {
            return None;
        }
        let ops = script.chunks().ok()?;
        if !self.check_locking_script_core(script, &ops) {
            return None;
        }
        ops[1..].iter().map(ScriptChunk::push_data).collect()
    }

    /// `OP_RETURN` followed by the minimal push of each blob.
    ///
    /// # Errors
    /// `NullDataTooLarge` if the script would exceed the size limit.
    pub fn generate_locking_script<D: AsRef<[u8]>>(&self, data: &[D]) -> Result<Script, TemplateError> {
        let chunks = std::iter::once(ScriptChunk::opcode(OP_RETURN))
            .chain(data.iter().map(|d| ScriptChunk::push(d.as_ref())));
        let script = Script::from_chunks(chunks);
        if script.len() > self.max_script_size {
            tracing::debug!(
                "null-data script of {} bytes exceeds limit {}",
                script.len(),
                self.max_script_size
            );
            return Err(TemplateError::NullDataTooLarge {
                size: script.len(),
                max: self.max_script_size,
            });
        }
        Ok(script)
    }
}

impl Default for NullDataTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OP_RETURN_RELAY)
    }
}

impl ScriptTemplate for NullDataTemplate {
    fn tx_out_type(&self) -> TxOutType {
        TxOutType::NullData
    }

    fn fast_check_locking_script(&self, script: &Script) -> FastCheck {
        let bytes = script.to_bytes();
        if bytes.first() != Some(&OP_RETURN) || bytes.len() > self.max_script_size {
            return FastCheck::Rejected;
        }
        FastCheck::NeedsCore
    }

    fn check_locking_script_core(&self, _script: &Script, ops: &[ScriptChunk]) -> bool {
        match ops.split_first() {
            Some((first, rest)) if first.op == OP_RETURN => {
                rest.iter().all(|op| op.push_data().is_some())
            }
            _ => false,
        }
    }

    fn fast_check_unlocking_script(&self, _unlocking: &Script) -> FastCheck {
        FastCheck::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utxo_script::opcodes::*;

    fn script(hex_str: &str) -> Script {
        Script::from_hex(hex_str).expect("valid hex")
    }

    // -----------------------------------------------------------------------
    // Locking script checks
    // -----------------------------------------------------------------------

    /// A bare OP_RETURN is well formed.
    #[test]
    fn test_bare_op_return() {
        let template = NullDataTemplate::default();
        assert!(template.check_locking_script(&script("6a")));
        assert_eq!(template.extract_locking_script_parameters(&script("6a")), Some(vec![]));
    }

    /// Any push form is allowed after the marker, small integers included.
    #[test]
    fn test_pushes_after_marker() {
        let template = NullDataTemplate::default();
        let s = script("6a0474657374004c0201025f");
        assert!(template.check_locking_script(&s));
        assert_eq!(
            template.extract_locking_script_parameters(&s),
            Some(vec![b"test".to_vec(), vec![], vec![1, 2], vec![15]])
        );
    }

    /// Non-push opcodes and truncated pushes are rejected.
    #[test]
    fn test_rejects_non_push_and_truncated() {
        let template = NullDataTemplate::default();
        assert!(!template.check_locking_script(&script("6a76")));
        assert!(!template.check_locking_script(&script("6a50")));
        assert!(!template.check_locking_script(&script("6a05aabb")));
        assert!(!template.check_locking_script(&script("006a")));
        assert!(!template.check_locking_script(&Script::new()));
        assert_eq!(template.extract_locking_script_parameters(&script("6a76")), None);
    }

    /// 83 bytes passes with the default limit, 84 fails.
    #[test]
    fn test_size_boundary() {
        let template = NullDataTemplate::default();
        let mut bytes = vec![OP_RETURN, OP_PUSHDATA1, 80];
        bytes.extend_from_slice(&[0u8; 80]);
        assert_eq!(bytes.len(), 83);
        assert!(template.check_locking_script(&Script::from_bytes(&bytes)));

        let mut bytes = vec![OP_RETURN, OP_PUSHDATA1, 81];
        bytes.extend_from_slice(&[0u8; 81]);
        assert_eq!(bytes.len(), 84);
        assert!(!template.check_locking_script(&Script::from_bytes(&bytes)));
    }

    /// The limit is a property of the instance.
    #[test]
    fn test_custom_limit() {
        let template = NullDataTemplate::new(3);
        assert!(template.check_locking_script(&script("6a0101")));
        assert!(!template.check_locking_script(&script("6a0201ff")));

        let mut network = Network::testnet();
        network.max_op_return_relay = 223;
        assert_eq!(NullDataTemplate::for_network(&network).max_script_size(), 223);
    }

    /// Null-data has no unlocking script.
    #[test]
    fn test_never_unlockable() {
        let template = NullDataTemplate::default();
        assert!(!template.check_unlocking_script(&Network::mainnet(), &Script::new(), None));
        assert!(!template.check_unlocking_script(&Network::mainnet(), &script("00"), None));
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Generation uses minimal pushes and round-trips through extraction.
    #[test]
    fn test_generate_roundtrip() {
        let template = NullDataTemplate::default();
        let data = vec![b"hello".to_vec(), vec![], vec![7], vec![0x81]];
        let generated = template.generate_locking_script(&data).expect("fits");
        assert_eq!(generated.to_hex(), "6a0568656c6c6f00574f");
        assert_eq!(template.extract_locking_script_parameters(&generated), Some(data));
    }

    /// Oversized payloads are a caller error.
    #[test]
    fn test_generate_too_large() {
        let template = NullDataTemplate::default();
        let result = template.generate_locking_script(&[vec![0xAA; 81]]);
        assert!(matches!(
            result,
            Err(TemplateError::NullDataTooLarge { size: 84, max: 83 })
        ));
        assert!(template.generate_locking_script(&[vec![0xAA; 80]]).is_ok());
    }
}
