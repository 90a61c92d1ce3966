use proptest::prelude::*;

use utxo_primitives::ec::{PubKey, Signature};
use utxo_primitives::hash::{hash160, ripemd160, sha256};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn hash160_is_ripemd_of_sha256(data in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(hash160(&data), ripemd160(&sha256(&data)));
    }

    #[test]
    fn pubkey_quick_check_depends_only_on_length_and_prefix(
        prefix in any::<u8>(),
        body in prop::collection::vec(any::<u8>(), 0..80)
    ) {
        let mut key = vec![prefix];
        key.extend_from_slice(&body);
        let expected = matches!((key.len(), prefix), (33, 0x02 | 0x03) | (65, 0x04 | 0x06 | 0x07));
        prop_assert_eq!(PubKey::check(&key, false), expected);
        prop_assert_eq!(PubKey::from_bytes_unchecked(&key).is_ok(), expected);
    }

    #[test]
    fn der_roundtrip_for_low_s_values(
        r in prop::array::uniform32(1u8..0x7f),
        s in prop::array::uniform32(1u8..0x7f)
    ) {
        let sig = Signature::new(r, s);
        prop_assert!(sig.is_low_s());
        let der = sig.to_der();
        let parsed = Signature::from_der(&der).unwrap();
        prop_assert_eq!(parsed, sig);
    }
}
