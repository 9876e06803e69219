//! # CBOR Encoding of Constructor Records
//!
//! The chain hashes datums and redeemers over their exact CBOR bytes, so we
//! hand the encoding to `pallas-primitives`, which follows the ledger's own
//! rules: constructor tags `121 + n` / `1280 + (n - 7)` / `102`, indefinite
//! arrays for non-empty field lists, and 64-byte chunking of long byte
//! strings.
//!
//! This module only converts between our narrow [`PlutusData`] and the
//! ledger's full data model. Maps, integers and bare lists decode fine as
//! CBOR but are not seedelf records, so they are rejected here.

use pallas_codec::minicbor::Decoder;
use pallas_primitives::alonzo::{self, BoundedBytes, Constr};
use pallas_primitives::Fragment;

use crate::config::CONSTR_0_TAG;
use crate::datum::plutus::PlutusData;
use crate::error::{Result, SeedelfError};

const CONSTR_7_TAG: u64 = 1280;
const CONSTR_ANY_TAG: u64 = 102;

/// Encode a data value to CBOR bytes.
///
/// # Errors
///
/// [`SeedelfError::MalformedRecord`] if the CBOR writer fails.
pub fn encode(data: &PlutusData) -> Result<Vec<u8>> {
    to_ledger(data).encode_fragment().map_err(malformed)
}

/// Hex of [`encode`].
pub fn encode_hex(data: &PlutusData) -> Result<String> {
    encode(data).map(hex::encode)
}

/// Decode CBOR bytes into a data value. Trailing bytes are an error.
///
/// # Errors
///
/// [`SeedelfError::MalformedRecord`] for invalid CBOR, or for anything that
/// is not bytes or a constructor.
pub fn decode(bytes: &[u8]) -> Result<PlutusData> {
    let mut decoder = Decoder::new(bytes);
    let data: alonzo::PlutusData = decoder.decode().map_err(malformed)?;
    let rest = bytes.len() - decoder.position();
    if rest != 0 {
        return Err(malformed(format!("{rest} trailing bytes")));
    }
    from_ledger(data)
}

/// Decode hex-encoded CBOR.
pub fn decode_hex(input: &str) -> Result<PlutusData> {
    decode(&hex::decode(input.trim())?)
}

fn malformed(err: impl std::fmt::Display) -> SeedelfError {
    SeedelfError::MalformedRecord(format!("cbor: {err}"))
}

fn to_ledger(data: &PlutusData) -> alonzo::PlutusData {
    match data {
        PlutusData::Bytes { bytes } => {
            alonzo::PlutusData::BoundedBytes(BoundedBytes::from(bytes.clone()))
        }
        PlutusData::Constr {
            constructor,
            fields,
        } => {
            let n = *constructor;
            let (tag, any_constructor) = match n {
                0..=6 => (CONSTR_0_TAG + n, None),
                7..=127 => (CONSTR_7_TAG + (n - 7), None),
                _ => (CONSTR_ANY_TAG, Some(n)),
            };
            alonzo::PlutusData::Constr(Constr {
                tag,
                any_constructor,
                fields: fields.iter().map(to_ledger).collect(),
            })
        }
    }
}

fn from_ledger(data: alonzo::PlutusData) -> Result<PlutusData> {
    match data {
        alonzo::PlutusData::BoundedBytes(bytes) => Ok(PlutusData::bytes(Vec::from(bytes))),
        alonzo::PlutusData::Constr(constr) => {
            let constructor = match (constr.tag, constr.any_constructor) {
                (121..=127, _) => constr.tag - CONSTR_0_TAG,
                (1280..=1400, _) => constr.tag - CONSTR_7_TAG + 7,
                (CONSTR_ANY_TAG, Some(n)) => n,
                (tag, _) => return Err(malformed(format!("unsupported tag {tag}"))),
            };
            let fields = constr
                .fields
                .into_iter()
                .map(from_ledger)
                .collect::<Result<Vec<_>>>()?;
            Ok(PlutusData::constr(constructor, fields))
        }
        alonzo::PlutusData::Map(_) => Err(malformed("maps are not seedelf records")),
        alonzo::PlutusData::BigInt(_) => Err(malformed("integers are not seedelf records")),
        alonzo::PlutusData::Array(_) => Err(malformed("bare lists are not seedelf records")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::G1_GENERATOR_HEX;
    use crate::identity::register::Register;

    const U_HEX: &str = "aafdf5aaed4bae8122d02990b67b9030c8fe352dc40c5823cce4588ed981e89ec7057e1c057a9657a934f310e8c0851a";

    #[test]
    fn test_register_datum_bytes() {
        let reg = Register::from_hex(G1_GENERATOR_HEX, U_HEX).unwrap();
        let expected = format!("d8799f5830{G1_GENERATOR_HEX}5830{U_HEX}ff");
        assert_eq!(encode_hex(&reg.to_datum()).unwrap(), expected);
    }

    #[test]
    fn test_register_datum_decodes() {
        let cbor = format!("d8799f5830{G1_GENERATOR_HEX}5830{U_HEX}ff");
        let data = decode_hex(&cbor).unwrap();
        let reg = Register::from_datum(&data).unwrap();
        assert_eq!(reg.public_value_hex(), U_HEX);
    }

    #[test]
    fn test_empty_bytes_and_empty_list() {
        assert_eq!(encode(&PlutusData::bytes(vec![])).unwrap(), vec![0x40]);
        assert_eq!(
            encode(&PlutusData::constr(0, vec![])).unwrap(),
            vec![0xd8, 0x79, 0x80]
        );
    }

    #[test]
    fn test_short_bytes_use_inline_length() {
        assert_eq!(
            encode(&PlutusData::bytes(vec![0xac, 0xab])).unwrap(),
            vec![0x42, 0xac, 0xab]
        );
        assert_eq!(
            encode_hex(&PlutusData::bytes(b"testing".to_vec())).unwrap(),
            "4774657374696e67"
        );
    }

    #[test]
    fn test_long_bytes_are_chunked() {
        let long = vec![7u8; 100];
        let out = encode(&PlutusData::bytes(long.clone())).unwrap();
        assert_eq!(out[0], 0x5f);
        assert_eq!(&out[1..3], &[0x58, 0x40]);
        assert_eq!(out[3 + 64], 0x58);
        assert_eq!(out[3 + 64 + 1], 36);
        assert_eq!(*out.last().unwrap(), 0xff);
        assert_eq!(decode(&out).unwrap(), PlutusData::bytes(long));
    }

    #[test]
    fn test_exactly_64_bytes_is_definite() {
        let out = encode(&PlutusData::bytes(vec![1u8; 64])).unwrap();
        assert_eq!(&out[..2], &[0x58, 0x40]);
        assert_eq!(out.len(), 66);
    }

    #[test]
    fn test_constructor_tags() {
        let head = |n| encode(&PlutusData::constr(n, vec![])).unwrap();
        assert_eq!(&head(1)[..2], &[0xd8, 0x7a]);
        assert_eq!(&head(7)[..3], &[0xd9, 0x05, 0x00]);
        assert_eq!(&head(200)[..5], &[0xd8, 0x66, 0x82, 0x18, 0xc8]);
        for n in [0u64, 6, 7, 127, 128, 5000] {
            let data = PlutusData::constr(n, vec![PlutusData::bytes(vec![1])]);
            assert_eq!(decode(&encode(&data).unwrap()).unwrap(), data);
        }
    }

    #[test]
    fn test_decode_accepts_definite_array() {
        // d879 82 41 01 41 02
        let data = decode(&[0xd8, 0x79, 0x82, 0x41, 0x01, 0x41, 0x02]).unwrap();
        assert_eq!(
            data,
            PlutusData::constr(0, vec![PlutusData::bytes(vec![1]), PlutusData::bytes(vec![2])])
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(&[]).is_err());
        assert!(decode(&[0xd8, 0x79, 0x9f, 0x41]).is_err());
        assert!(decode(&[0x01]).is_err(), "integers are not records");
        assert!(decode(&[0xa0]).is_err(), "maps are not records");
        assert!(decode(&[0x80]).is_err(), "bare lists are not records");
        assert!(decode(&[0x40, 0x00]).is_err(), "trailing bytes");
        let huge_array = [0xd8, 0x79, 0x9b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        assert!(decode(&huge_array).is_err());
        assert!(decode_hex("zz").is_err());
    }

    #[test]
    fn test_decode_error_is_malformed_record() {
        assert!(matches!(
            decode(&[0xd8, 0x01, 0x80]),
            Err(SeedelfError::MalformedRecord(_))
        ));
    }
}
