/// Base58Check addresses for P2PKH and P2SH destinations.
///
/// The version byte is taken from a [`Network`], so the same hash encodes
/// differently on mainnet and testnet. Uses Base58Check encoding with
/// SHA-256d checksums.

use std::fmt;

use utxo_primitives::hash::{hash160, sha256d};

use crate::destination::{KeyId, ScriptId, TxDestination};
use crate::network::Network;
use crate::{Script, ScriptError};

/// Which kind of hash an address carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressKind {
    /// Hash of a public key (P2PKH).
    PubKeyHash,
    /// Hash of a redeem script (P2SH).
    ScriptHash,
}

/// A Base58Check encoded address.
///
/// Contains the 20-byte hash, its kind, and the version byte it was
/// encoded with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The human-readable Base58Check address string.
    pub address_string: String,
    /// The 20-byte hash the address pays to.
    pub hash: [u8; 20],
    /// Whether `hash` is a key hash or a script hash.
    pub kind: AddressKind,
    /// The version byte.
    pub version: u8,
}

impl Address {
    /// Parse a Base58Check-encoded address string for `network`.
    ///
    /// Decodes the string, validates the checksum, and matches the version
    /// byte against the network's P2PKH and P2SH prefixes.
    ///
    /// # Arguments
    /// * `addr` - The Base58Check address string.
    /// * `network` - Network whose prefixes are accepted.
    ///
    /// # Returns
    /// An `Address` or an error if the string is invalid.
    pub fn from_string(addr: &str, network: &Network) -> Result<Self, ScriptError> {
        let decoded = bs58::decode(addr)
            .into_vec()
            .map_err(|_| ScriptError::InvalidAddress(format!("bad char for '{}'", addr)))?;

        if decoded.len() != 25 {
            return Err(ScriptError::InvalidAddressLength(addr.to_string()));
        }

        // Verify checksum: last 4 bytes should equal sha256d of first 21 bytes.
        let checksum = sha256d(&decoded[..21]);
        if decoded[21..25] != checksum[..4] {
            return Err(ScriptError::EncodingChecksumFailed);
        }

        let version = decoded[0];
        let kind = if version == network.pubkey_address_prefix {
            AddressKind::PubKeyHash
        } else if version == network.script_address_prefix {
            AddressKind::ScriptHash
        } else {
            return Err(ScriptError::UnsupportedAddress(version, network.name.clone()));
        };

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&decoded[1..21]);

        Ok(Address {
            address_string: addr.to_string(),
            hash,
            kind,
            version,
        })
    }

    /// Create a P2PKH address from a 20-byte public key hash.
    pub fn from_public_key_hash(hash: &[u8; 20], network: &Network) -> Self {
        Self::encode(*hash, AddressKind::PubKeyHash, network.pubkey_address_prefix)
    }

    /// Create a P2SH address from a 20-byte script hash.
    pub fn from_script_hash(hash: &[u8; 20], network: &Network) -> Self {
        Self::encode(*hash, AddressKind::ScriptHash, network.script_address_prefix)
    }

    /// Create a P2PKH address from a hex-encoded public key string.
    ///
    /// Computes hash160 of the decoded public key bytes.
    ///
    /// # Returns
    /// An `Address`, or an error if the hex is invalid.
    pub fn from_public_key_string(pub_key_hex: &str, network: &Network) -> Result<Self, ScriptError> {
        let pub_key_bytes = hex::decode(pub_key_hex)?;
        let h = hash160(&pub_key_bytes);
        Ok(Self::from_public_key_hash(&h, network))
    }

    /// Encode a P2PKH or P2SH destination; witness destinations have no
    /// Base58 form and yield `None`.
    pub fn from_destination(destination: &TxDestination, network: &Network) -> Option<Self> {
        match destination {
            TxDestination::KeyId(id) => {
                Some(Self::from_public_key_hash(&to_array(id.to_bytes())?, network))
            }
            TxDestination::ScriptId(id) => {
                Some(Self::from_script_hash(&to_array(id.to_bytes())?, network))
            }
            TxDestination::WitKeyId(_) | TxDestination::WitScriptId(_) => None,
        }
    }

    /// The destination this address pays to.
    pub fn destination(&self) -> TxDestination {
        match self.kind {
            AddressKind::PubKeyHash => TxDestination::KeyId(KeyId::new(self.hash)),
            AddressKind::ScriptHash => TxDestination::ScriptId(ScriptId::new(self.hash)),
        }
    }

    /// The standard locking script paying to this address.
    pub fn locking_script(&self) -> Script {
        self.destination().locking_script()
    }

    fn encode(hash: [u8; 20], kind: AddressKind, version: u8) -> Self {
        let mut payload = Vec::with_capacity(25);
        payload.push(version);
        payload.extend_from_slice(&hash);
        let checksum = sha256d(&payload);
        payload.extend_from_slice(&checksum[..4]);

        Address {
            address_string: bs58::encode(&payload).into_string(),
            hash,
            kind,
            version,
        }
    }
}

fn to_array(bytes: &[u8]) -> Option<[u8; 20]> {
    bytes.try_into().ok()
}

impl fmt::Display for Address {
    /// Display the address as its Base58Check string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

#[cfg(test)]
mod tests {
    //! Tests for address parsing, generation, and validation.
    //!
    //! Covers Address::from_string for mainnet/testnet P2PKH and P2SH
    //! addresses, checksum validation, network prefix matching,
    //! from_public_key_hash / from_script_hash for both networks, Display
    //! output, destination conversion, and error cases.

    use super::*;

    /// The public key hash shared across several test vectors.
    const TEST_PUBLIC_KEY_HASH: &str = "00ac6144c4db7b5790f343cf0477a65fb8a02eb7";

    fn test_hash() -> [u8; 20] {
        let bytes = hex::decode(TEST_PUBLIC_KEY_HASH).expect("valid hex");
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&bytes);
        hash
    }

    // -----------------------------------------------------------------------
    // from_string
    // -----------------------------------------------------------------------

    /// Parse a known mainnet address and verify the hash and kind.
    #[test]
    fn test_from_string_mainnet() {
        let address_str = "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr";
        let addr = Address::from_string(address_str, &Network::mainnet()).expect("should parse mainnet");
        assert_eq!(addr.address_string, address_str);
        assert_eq!(hex::encode(addr.hash), "8fe80c75c9560e8b56ed64ea3c26e18d2c52211b");
        assert_eq!(addr.kind, AddressKind::PubKeyHash);
        assert_eq!(addr.version, 0x00);
    }

    /// Parse a known testnet address and verify the hash and kind.
    #[test]
    fn test_from_string_testnet() {
        let address_str = "mtdruWYVEV1wz5yL7GvpBj4MgifCB7yhPd";
        let addr = Address::from_string(address_str, &Network::testnet()).expect("should parse testnet");
        assert_eq!(hex::encode(addr.hash), "8fe80c75c9560e8b56ed64ea3c26e18d2c52211b");
        assert_eq!(addr.version, 0x6f);
    }

    /// A testnet address is rejected by mainnet parameters.
    #[test]
    fn test_from_string_wrong_network() {
        let result = Address::from_string("mtdruWYVEV1wz5yL7GvpBj4MgifCB7yhPd", &Network::mainnet());
        assert!(matches!(result, Err(ScriptError::UnsupportedAddress(0x6f, _))));
    }

    /// P2SH addresses decode as script hashes.
    #[test]
    fn test_from_string_p2sh() {
        let addr = Address::from_string("31kaRiJvc8YrDqZHF6eHG2y7A1JuNFV5CV", &Network::mainnet())
            .expect("should parse p2sh");
        assert_eq!(addr.kind, AddressKind::ScriptHash);
        assert_eq!(addr.hash, test_hash());
        assert_eq!(
            addr.locking_script().to_hex(),
            format!("a914{}87", TEST_PUBLIC_KEY_HASH)
        );
    }

    /// Verify that a short/invalid address returns an error.
    #[test]
    fn test_from_string_short_address() {
        assert!(Address::from_string("ADD8E55", &Network::mainnet()).is_err());
    }

    /// A corrupted final character breaks the checksum.
    #[test]
    fn test_from_string_bad_checksum() {
        let result = Address::from_string("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMs", &Network::mainnet());
        assert!(result.is_err());
    }

    // -----------------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------------

    /// Create addresses from a compressed public key hex string.
    #[test]
    fn test_from_public_key_string() {
        let pubkey = "026cf33373a9f3f6c676b75b543180703df225f7f8edbffedc417718a8ad4e89ce";
        let main = Address::from_public_key_string(pubkey, &Network::mainnet()).expect("should create");
        assert_eq!(hex::encode(main.hash), TEST_PUBLIC_KEY_HASH);
        assert_eq!(main.address_string, "114ZWApV4EEU8frr7zygqQcB1V2BodGZuS");

        let test = Address::from_public_key_string(pubkey, &Network::testnet()).expect("should create");
        assert_eq!(test.address_string, "mfaWoDuTsFfiunLTqZx4fKpVsUctiDV9jk");
    }

    /// Verify that an invalid public key hex returns an error.
    #[test]
    fn test_from_public_key_string_invalid() {
        assert!(Address::from_public_key_string("invalid_pubkey", &Network::mainnet()).is_err());
    }

    /// Script hashes use the P2SH prefix.
    #[test]
    fn test_from_script_hash() {
        let hash = test_hash();
        assert_eq!(
            Address::from_script_hash(&hash, &Network::mainnet()).address_string,
            "31kaRiJvc8YrDqZHF6eHG2y7A1JuNFV5CV"
        );
        assert_eq!(
            Address::from_script_hash(&hash, &Network::testnet()).address_string,
            "2MsJnVTExDb4CRdBpvEG9syxNNMX5AgXgTL"
        );
    }

    /// Verify that from_public_key_hash -> from_string roundtrip is consistent.
    #[test]
    fn test_public_key_hash_to_address_to_string_roundtrip() {
        let network = Network::mainnet();
        let addr = Address::from_public_key_hash(&test_hash(), &network);
        let parsed = Address::from_string(&addr.to_string(), &network).expect("should parse back");
        assert_eq!(addr, parsed);
    }

    // -----------------------------------------------------------------------
    // Destinations
    // -----------------------------------------------------------------------

    #[test]
    fn test_destination_roundtrip() {
        let network = Network::testnet();
        let dest = TxDestination::KeyId(KeyId::new(test_hash()));
        let addr = Address::from_destination(&dest, &network).expect("p2pkh has an address");
        assert_eq!(addr.destination(), dest);
        assert_eq!(
            addr.locking_script().to_hex(),
            format!("76a914{}88ac", TEST_PUBLIC_KEY_HASH)
        );
    }

    #[test]
    fn test_witness_destination_has_no_address() {
        let dest = TxDestination::WitKeyId(crate::destination::WitKeyId::new(test_hash()));
        assert!(Address::from_destination(&dest, &Network::mainnet()).is_none());
    }
}
