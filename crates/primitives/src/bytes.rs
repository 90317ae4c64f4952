use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Error when parsing a fixed-size byte value from a hex string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseBytesError {
    /// The string is not valid hex.
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// The decoded value has the wrong length.
    #[error("Expected {expected} bytes, got {got}")]
    InvalidLength {
        /// The required number of bytes.
        expected: usize,
        /// The number of bytes the string decoded to.
        got: usize,
    },
}

macro_rules! fixed_bytes {
    ($(#[$attr:meta])* $name:ident, $len:literal) => {
        $(#[$attr])*
        ///
        /// Displayed and (de)serialized as a `0x`-prefixed hex string, so it can
        /// key JSON objects.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Returns the raw bytes.
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = ParseBytesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(digits)?;
                let got = bytes.len();
                let bytes: [u8; $len] = bytes
                    .try_into()
                    .map_err(|_| ParseBytesError::InvalidLength { expected: $len, got })?;
                Ok(Self(bytes))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// The unique 32-byte identifier of a run, assigned by the game contract.
    RunId,
    32
);

fixed_bytes!(
    /// A 20-byte ledger account address.
    Address,
    20
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_hex_round_trip() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        bytes[31] = 0x01;
        let id = RunId(bytes);
        let encoded = id.to_string();
        assert!(encoded.starts_with("0xab"));
        assert_eq!(encoded.parse::<RunId>().unwrap(), id);
    }

    #[test]
    fn parse_accepts_unprefixed_hex() {
        let address: Address = "00000000000000000000000000000000000000ff".parse().unwrap();
        assert_eq!(address.as_bytes()[19], 0xff);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = "0x00ff".parse::<RunId>().unwrap_err();
        assert_eq!(err, ParseBytesError::InvalidLength { expected: 32, got: 2 });
    }

    #[test]
    fn serializes_as_json_string() {
        let id = RunId([0x11; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        assert_eq!(serde_json::from_str::<RunId>(&json).unwrap(), id);
    }
}
