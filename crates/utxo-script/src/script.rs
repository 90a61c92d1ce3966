//! Raw scripts.
//!
//! A `Script` is only bytes; whether they parse is asked separately, since
//! locking scripts on chain may be arbitrary garbage.

use std::fmt;

use crate::chunk::{decode_script, push_data_prefix, ScriptChunk};
use crate::destination::{ScriptId, WitScriptId};
use crate::opcodes::*;
use crate::ScriptError;

/// A locking or unlocking script, held as its serialized bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    pub fn new() -> Self {
        Script(Vec::new())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Ok(Script(hex::decode(hex_str)?))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Serialize a sequence of chunks into a script.
    ///
    /// Each chunk is written with the exact push opcode it carries, so
    /// `Script::from_chunks(s.chunks()?)` reproduces `s` byte for byte.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = ScriptChunk>,
    {
        Script(chunks.into_iter().flat_map(|c| c.to_bytes()).collect())
    }

    /// Parse space-separated ASM: opcode names, or hex for pushed data.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        for token in asm.split_whitespace() {
            match string_to_opcode(token) {
                Some(op) => script.append_opcodes(&[op])?,
                None => script.append_push_data_hex(token)?,
            }
        }
        Ok(script)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// ASM rendering; empty if the script does not parse.
    pub fn to_asm(&self) -> String {
        match self.chunks() {
            Ok(chunks) => chunks
                .iter()
                .map(ScriptChunk::to_asm_string)
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => String::new(),
        }
    }

    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    /// Parse into ops.
    ///
    /// # Errors
    /// `DataTooSmall` if a push is truncated.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    /// `true` if every push in the script is complete.
    pub fn is_valid(&self) -> bool {
        self.chunks().is_ok()
    }

    /// `true` if the script parses and contains only push operations.
    pub fn is_push_only(&self) -> bool {
        match self.chunks() {
            Ok(chunks) => chunks.iter().all(ScriptChunk::is_push),
            Err(_) => false,
        }
    }

    /// The data pushed by every op, or `None` if any op is not a data push.
    pub fn push_datas(&self) -> Option<Vec<Vec<u8>>> {
        self.chunks()
            .ok()?
            .iter()
            .map(ScriptChunk::push_data)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Hashing
    // -----------------------------------------------------------------------

    /// The P2SH identifier of this script: `hash160(script)`.
    pub fn hash(&self) -> ScriptId {
        ScriptId::from_script(self)
    }

    /// The P2WSH identifier of this script: `sha256(script)`.
    pub fn wit_hash(&self) -> WitScriptId {
        WitScriptId::from_script(self)
    }

    // -----------------------------------------------------------------------
    // Mutation / building
    // -----------------------------------------------------------------------

    /// Append `data` behind the shortest length prefix.
    ///
    /// Single bytes are never rewritten to OP_1..OP_16; build from
    /// [`ScriptChunk::push`] for that.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    pub fn append_push_data_hex(&mut self, hex_str: &str) -> Result<(), ScriptError> {
        let data = hex::decode(hex_str).map_err(|_| ScriptError::InvalidOpcodeData)?;
        self.append_push_data(&data)
    }

    /// Append bare opcodes.
    ///
    /// # Errors
    /// `InvalidOpcodeType` for a push opcode, which would need data.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<(), ScriptError> {
        if let Some(&op) = opcodes.iter().find(|op| (OP_DATA_1..=OP_PUSHDATA4).contains(*op)) {
            return Err(ScriptError::InvalidOpcodeType(opcode_to_string(op).to_string()));
        }
        self.0.extend_from_slice(opcodes);
        Ok(())
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
