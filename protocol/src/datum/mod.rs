//! On-chain wire records: register datums and spend redeemers, in both
//! detailed-schema JSON ([`plutus`]) and CBOR ([`cbor`]) form.

pub mod cbor;
pub mod plutus;

pub use plutus::PlutusData;
