//! # Tagged Constructor Records
//!
//! On-chain data is a small algebraic type: byte strings, and constructors
//! carrying an ordered list of fields. Seedelf only ever needs two shapes
//! of it:
//!
//! ```text
//! register datum   Constr 0 [ bytes(G'), bytes(U') ]
//! spend redeemer   Constr 0 [ bytes(z), bytes(R), bytes("") ]
//! ```
//!
//! [`PlutusData`] serializes to the "detailed schema" JSON used by chain
//! indexers and CLIs (`{"constructor":0,"fields":[{"bytes":"…"}]}`), and
//! [`super::cbor`] turns the same value into the exact bytes that go on
//! chain. The third redeemer field is reserved for later extensions and is
//! always empty today.

use serde::{Deserialize, Serialize};

use crate::config::{REDEEMER_FIELDS, REGISTER_FIELDS};
use crate::crypto::group::{decode_point, encode_point};
use crate::crypto::scalar::{decode_scalar, encode_scalar};
use crate::error::{Result, SeedelfError};
use crate::identity::register::Register;
use crate::zkp::prover::Proof;

/// A data value in detailed-schema JSON form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlutusData {
    /// `{"bytes": "<hex>"}`
    Bytes {
        #[serde(with = "hex_bytes")]
        bytes: Vec<u8>,
    },
    /// `{"constructor": n, "fields": [...]}`
    Constr {
        constructor: u64,
        fields: Vec<PlutusData>,
    },
}

impl PlutusData {
    /// A byte-string value.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        PlutusData::Bytes {
            bytes: bytes.into(),
        }
    }

    /// A constructor value.
    pub fn constr(constructor: u64, fields: Vec<PlutusData>) -> Self {
        PlutusData::Constr {
            constructor,
            fields,
        }
    }

    /// Parse detailed-schema JSON.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Render as compact detailed-schema JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            PlutusData::Bytes { bytes } => Ok(bytes),
            PlutusData::Constr { .. } => Err(SeedelfError::MalformedRecord(
                "expected bytes, found constructor".into(),
            )),
        }
    }

    /// Fields of constructor 0 with exactly `arity` entries.
    fn constr0_fields(&self, arity: usize) -> Result<&[PlutusData]> {
        match self {
            PlutusData::Constr {
                constructor: 0,
                fields,
            } if fields.len() == arity => Ok(fields),
            PlutusData::Constr {
                constructor,
                fields,
            } => Err(SeedelfError::MalformedRecord(format!(
                "expected constructor 0 with {arity} fields, found constructor {constructor} with {}",
                fields.len()
            ))),
            PlutusData::Bytes { .. } => Err(SeedelfError::MalformedRecord(
                "expected constructor, found bytes".into(),
            )),
        }
    }
}

mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Register datum
// ---------------------------------------------------------------------------

impl Register {
    /// The register datum `Constr 0 [bytes(G'), bytes(U')]`.
    pub fn to_datum(&self) -> PlutusData {
        PlutusData::constr(
            0,
            vec![
                PlutusData::bytes(encode_point(&self.generator)),
                PlutusData::bytes(encode_point(&self.public_value)),
            ],
        )
    }

    /// Read a register datum, validating both points.
    ///
    /// # Errors
    ///
    /// * [`SeedelfError::MalformedRecord`] for the wrong shape.
    /// * [`SeedelfError::InvalidCurvePoint`] for undecodable points.
    pub fn from_datum(data: &PlutusData) -> Result<Self> {
        let fields = data.constr0_fields(REGISTER_FIELDS)?;
        Ok(Register::new(
            decode_point(fields[0].as_bytes()?)?,
            decode_point(fields[1].as_bytes()?)?,
        ))
    }
}

// ---------------------------------------------------------------------------
// Spend redeemer
// ---------------------------------------------------------------------------

impl Proof {
    /// The spend redeemer `Constr 0 [bytes(z), bytes(R), bytes("")]`.
    ///
    /// `z` uses the minimal big-endian scalar encoding.
    pub fn to_redeemer(&self) -> PlutusData {
        PlutusData::constr(
            0,
            vec![
                PlutusData::bytes(encode_scalar(&self.z)),
                PlutusData::bytes(encode_point(&self.commitment)),
                PlutusData::bytes(Vec::new()),
            ],
        )
    }

    /// Read a spend redeemer. The reserved field must be a byte string; its
    /// contents are ignored.
    pub fn from_redeemer(data: &PlutusData) -> Result<Self> {
        let fields = data.constr0_fields(REDEEMER_FIELDS)?;
        fields[2].as_bytes()?;
        Ok(Proof {
            z: decode_scalar(fields[0].as_bytes()?)?,
            commitment: decode_point(fields[1].as_bytes()?)?,
        })
    }
}
