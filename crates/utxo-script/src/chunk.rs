//! Ops: the unit a script is parsed into.
//!
//! An op is an opcode byte plus, for data pushes, the pushed bytes. A push
//! whose length runs past the end of the script makes the whole script
//! unparseable.

use crate::opcodes::*;
use crate::ScriptError;

/// Maximum byte length of a script number accepted by [`ScriptChunk::as_int`].
const MAX_SCRIPT_NUM_LEN: usize = 4;

/// One parsed op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// For direct pushes this is also the data length.
    pub op: u8,
    /// Set for OP_DATA_1..=OP_PUSHDATA4 only.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    pub fn opcode(op: u8) -> Self {
        ScriptChunk { op, data: None }
    }

    /// Create the minimal push chunk for `data`.
    ///
    /// Empty data becomes OP_0, a single byte 1..=16 becomes OP_1..OP_16,
    /// 0x81 becomes OP_1NEGATE, anything else a direct or PUSHDATA push.
    pub fn push(data: &[u8]) -> Self {
        match data {
            [] => ScriptChunk::opcode(OP_0),
            [n @ 1..=16] => ScriptChunk::opcode(OP_1 + n - 1),
            [0x81] => ScriptChunk::opcode(OP_1NEGATE),
            _ => {
                let op = match data.len() {
                    len if len <= OP_DATA_75 as usize => len as u8,
                    len if len <= 0xff => OP_PUSHDATA1,
                    len if len <= 0xffff => OP_PUSHDATA2,
                    _ => OP_PUSHDATA4,
                };
                ScriptChunk { op, data: Some(data.to_vec()) }
            }
        }
    }

    /// `true` if this op only pushes a value (opcode <= OP_16).
    pub fn is_push(&self) -> bool {
        self.op <= OP_16
    }

    /// The bytes this op pushes onto the stack, if it is a push.
    ///
    /// OP_0 pushes an empty vector, OP_1NEGATE pushes 0x81 and OP_1..OP_16
    /// push their value; OP_RESERVED and non-push opcodes yield `None`.
    pub fn push_data(&self) -> Option<Vec<u8>> {
        match self.op {
            OP_0 => Some(Vec::new()),
            OP_DATA_1..=OP_PUSHDATA4 => self.data.clone(),
            OP_1NEGATE => Some(vec![0x81]),
            OP_1..=OP_16 => Some(vec![self.op - (OP_1 - 1)]),
            _ => None,
        }
    }

    /// Decode this op as an integer.
    ///
    /// Small-integer opcodes decode directly; data pushes of up to 4 bytes
    /// decode as little-endian sign-magnitude script numbers.
    pub fn as_int(&self) -> Option<i64> {
        if let Some(n) = decode_small_int(self.op) {
            return Some(n as i64);
        }
        if self.op == OP_1NEGATE {
            return Some(-1);
        }
        match (&self.data, self.op) {
            (Some(data), OP_DATA_1..=OP_PUSHDATA4) => decode_script_num(data),
            _ => None,
        }
    }

    /// Script bytes of this op, using the push opcode it carries.
    pub fn to_bytes(&self) -> Vec<u8> {
        let Some(data) = &self.data else {
            return vec![self.op];
        };
        let mut out = Vec::with_capacity(data.len() + 5);
        out.push(self.op);
        match self.op {
            OP_PUSHDATA1 => out.push(data.len() as u8),
            OP_PUSHDATA2 => out.extend_from_slice(&(data.len() as u16).to_le_bytes()),
            OP_PUSHDATA4 => out.extend_from_slice(&(data.len() as u32).to_le_bytes()),
            _ => {}
        }
        out.extend_from_slice(data);
        out
    }

    /// ASM token: hex for data pushes, the opcode name otherwise.
    pub fn to_asm_string(&self) -> String {
        match &self.data {
            Some(data) => hex::encode(data),
            None => opcode_to_string(self.op).to_string(),
        }
    }
}

/// Decode a minimal-or-not script number of at most 4 bytes.
fn decode_script_num(data: &[u8]) -> Option<i64> {
    if data.len() > MAX_SCRIPT_NUM_LEN {
        return None;
    }
    let Some((&last, _)) = data.split_last() else {
        return Some(0);
    };
    let mut value: i64 = 0;
    for (i, &b) in data.iter().enumerate() {
        value |= (b as i64) << (8 * i);
    }
    if last & 0x80 != 0 {
        let mask = !(0x80i64 << (8 * (data.len() - 1)));
        return Some(-(value & mask));
    }
    Some(value)
}

/// Split raw script bytes into ops.
///
/// Only OP_DATA_1..OP_DATA_75 and OP_PUSHDATA1/2/4 carry data; every other
/// byte, OP_RETURN included, is a bare opcode.
///
/// # Errors
/// `DataTooSmall` if a push length or its payload runs past the end.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut rest = bytes;
    while let Some((&op, tail)) = rest.split_first() {
        let (len, tail) = match op {
            OP_DATA_1..=OP_DATA_75 => (op as usize, tail),
            OP_PUSHDATA1 => read_push_len(tail, 1)?,
            OP_PUSHDATA2 => read_push_len(tail, 2)?,
            OP_PUSHDATA4 => read_push_len(tail, 4)?,
            _ => {
                chunks.push(ScriptChunk::opcode(op));
                rest = tail;
                continue;
            }
        };
        if tail.len() < len {
            return Err(ScriptError::DataTooSmall);
        }
        let (data, tail) = tail.split_at(len);
        chunks.push(ScriptChunk { op, data: Some(data.to_vec()) });
        rest = tail;
    }
    Ok(chunks)
}

/// Little-endian length of `width` bytes, and what follows it.
fn read_push_len(bytes: &[u8], width: usize) -> Result<(usize, &[u8]), ScriptError> {
    if bytes.len() < width {
        return Err(ScriptError::DataTooSmall);
    }
    let (len, rest) = bytes.split_at(width);
    let len = len.iter().rev().fold(0usize, |acc, &b| (acc << 8) | b as usize);
    Ok((len, rest))
}

/// Shortest push prefix for `data_len` bytes, without the OP_0 / OP_n
/// single-opcode forms.
///
/// # Errors
/// `DataTooBig` above `u32::MAX`.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    let len = u32::try_from(data_len).map_err(|_| ScriptError::DataTooBig)?;
    Ok(match len {
        0..=75 => vec![len as u8],
        76..=0xff => vec![OP_PUSHDATA1, len as u8],
        0x100..=0xffff => [&[OP_PUSHDATA2][..], &(len as u16).to_le_bytes()].concat(),
        _ => [&[OP_PUSHDATA4][..], &len.to_le_bytes()].concat(),
    })
}

/// Encode `data` as its minimal push operation.
///
/// # Errors
/// `DataTooBig` above `u32::MAX` bytes.
pub fn push_op(data: &[u8]) -> Result<Vec<u8>, ScriptError> {
    if u32::try_from(data.len()).is_err() {
        return Err(ScriptError::DataTooBig);
    }
    Ok(ScriptChunk::push(data).to_bytes())
}
