//! Segregated witness stacks.

use std::fmt;

/// The witness of one transaction input: an ordered list of byte vectors.
///
/// An empty witness is how a non-witness input is represented.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Witness(Vec<Vec<u8>>);

impl Witness {
    pub fn new() -> Self {
        Witness(Vec::new())
    }

    /// Build a witness from hex items, e.g. as printed by a node's RPC.
    pub fn from_hex_items<S: AsRef<str>>(items: &[S]) -> Result<Self, crate::ScriptError> {
        let items = items
            .iter()
            .map(|item| hex::decode(item.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Witness(items))
    }

    pub fn items(&self) -> &[Vec<u8>] {
        &self.0
    }

    pub fn into_items(self) -> Vec<Vec<u8>> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.0.get(index).map(Vec::as_slice)
    }

    pub fn last(&self) -> Option<&[u8]> {
        self.0.last().map(Vec::as_slice)
    }

    pub fn push(&mut self, item: impl Into<Vec<u8>>) {
        self.0.push(item.into());
    }

    pub fn to_hex_items(&self) -> Vec<String> {
        self.0.iter().map(hex::encode).collect()
    }
}

impl From<Vec<Vec<u8>>> for Witness {
    fn from(items: Vec<Vec<u8>>) -> Self {
        Witness(items)
    }
}

impl fmt::Debug for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Witness").field(&self.to_hex_items()).finish()
    }
}
