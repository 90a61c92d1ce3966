//! Segregated witness programs: `<version> <program>`.

use utxo_script::opcodes::*;
use utxo_script::{Script, ScriptChunk, TxDestination, WitKeyId, WitScriptId};

use crate::{FastCheck, ScriptTemplate, TemplateError, TxOutType};

/// Shortest program a generated locking script may carry.
pub const MIN_PROGRAM_LEN: usize = 2;
/// Longest program a generated locking script may carry.
pub const MAX_PROGRAM_LEN: usize = 32;

/// Version and payload of a witness program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WitProgramParams {
    /// 0..=16.
    pub version: u8,
    pub program: Vec<u8>,
}

/// Matches any witness program of any version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WitnessTemplate;

impl WitnessTemplate {
    /// Stateless; equivalent to `WitnessTemplate`.
    pub fn new() -> Self {
        WitnessTemplate
    }

    /// Version and program of any witness program script.
    pub fn extract_locking_script_parameters(&self, script: &Script) -> Option<WitProgramParams> {
        if !self.check_locking_script(script) {
            return None;
        }
        let b = script.to_bytes();
        Some(WitProgramParams {
            version: decode_small_int(b[0])?,
            program: b[2..].to_vec(),
        })
    }

    /// The destination of a version 0 key-hash or script-hash program.
    ///
    /// Other versions and lengths have no destination type.
    pub fn extract_destination(&self, script: &Script) -> Option<TxDestination> {
        let params = self.extract_locking_script_parameters(script)?;
        if params.version != 0 {
            return None;
        }
        match params.program.len() {
            WitKeyId::LEN => WitKeyId::from_bytes(&params.program).ok().map(TxDestination::from),
            WitScriptId::LEN => WitScriptId::from_bytes(&params.program).ok().map(TxDestination::from),
            _ => None,
        }
    }

    /// # Errors
    /// `InvalidWitnessVersion` above 16, `InvalidWitnessProgramLength`
    /// outside 2..=32.
    pub fn generate_locking_script(&self, version: u8, program: &[u8]) -> Result<Script, TemplateError> {
        let Some(version_op) = encode_small_int(version) else {
            tracing::debug!("witness version {} out of range", version);
            return Err(TemplateError::InvalidWitnessVersion(version));
        };
        if !(MIN_PROGRAM_LEN..=MAX_PROGRAM_LEN).contains(&program.len()) {
            tracing::debug!("witness program of {} bytes out of range", program.len());
            return Err(TemplateError::InvalidWitnessProgramLength(program.len()));
        }
        Ok(Script::from_chunks([
            ScriptChunk::opcode(version_op),
            ScriptChunk::push(program),
        ]))
    }
}

impl ScriptTemplate for WitnessTemplate {
    fn tx_out_type(&self) -> TxOutType {
        TxOutType::Segwit
    }

    fn fast_check_locking_script(&self, script: &Script) -> FastCheck {
        let b = script.to_bytes();
        if (4..=34).contains(&b.len()) && is_small_int_op(b[0]) && b[1] as usize + 2 == b.len() {
            FastCheck::Matched
        } else {
            FastCheck::Rejected
        }
    }

    // Spending data lives in the witness; the script itself must be empty.
    fn fast_check_unlocking_script(&self, unlocking: &Script) -> FastCheck {
        empty_unlocking(unlocking)
    }
}

pub(crate) fn empty_unlocking(unlocking: &Script) -> FastCheck {
    if unlocking.is_empty() {
        FastCheck::Matched
    } else {
        FastCheck::Rejected
    }
}
