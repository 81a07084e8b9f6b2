/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output encoding of entropy payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Hex,
    Base64,
    Binary,
    Uint8,
    Uint32,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Hex => "hex",
            Format::Base64 => "base64",
            Format::Binary => "binary",
            Format::Uint8 => "uint8",
            Format::Uint32 => "uint32",
        }
    }
}

/// Physical entropy source requested from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntropyMethod {
    Auto,
    Photon,
    Tunneling,
    Vacuum,
    Simulator,
}

impl EntropyMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntropyMethod::Auto => "auto",
            EntropyMethod::Photon => "photon",
            EntropyMethod::Tunneling => "tunneling",
            EntropyMethod::Vacuum => "vacuum",
            EntropyMethod::Simulator => "simulator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureType {
    Ed25519,
    Dilithium2,
    Dilithium3,
    Dilithium5,
}

impl SignatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureType::Ed25519 => "ed25519",
            SignatureType::Dilithium2 => "dilithium2",
            SignatureType::Dilithium3 => "dilithium3",
            SignatureType::Dilithium5 => "dilithium5",
        }
    }
}

macro_rules! impl_wire_str {
    ($ty:ident, $label:literal, [$($variant:ident),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let lowered = value.to_ascii_lowercase();
                $(
                    if lowered == $ty::$variant.as_str() {
                        return Ok($ty::$variant);
                    }
                )+
                Err(format!("unknown {} '{}'", $label, value))
            }
        }
    };
}

impl_wire_str!(Format, "format", [Hex, Base64, Binary, Uint8, Uint32]);
impl_wire_str!(EntropyMethod, "method", [Auto, Photon, Tunneling, Vacuum, Simulator]);
impl_wire_str!(
    SignatureType,
    "signature type",
    [Ed25519, Dilithium2, Dilithium3, Dilithium5]
);
