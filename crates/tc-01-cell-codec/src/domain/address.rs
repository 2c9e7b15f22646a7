//! # Address
//!
//! Standard internal address: a signed workchain id and a 256-bit account hash.
//!
//! Two textual forms map onto the same binary pair:
//!
//! | Form | Example |
//! |------|---------|
//! | Raw | `0:a3935861f79daf59a13d6d182e1640210c02f98e3df18fda74b8f5ab141abf18` |
//! | Friendly | `EQCjk1hh952vWaE9bRguFkAhDAL5jj3xj9p0uPWrFBq_GEMS` |
//!
//! The friendly form is 36 bytes (`tag · workchain · hash · crc16`) in base64.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::CellError;
use crate::algorithms::checksum::crc16;

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TEST_ONLY: u8 = 0x80;
const FRIENDLY_BYTES: usize = 36;
const FRIENDLY_CHARS: usize = 48;

/// Standard internal address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    /// Workchain id (0 = basechain, -1 = masterchain).
    pub workchain: i8,
    /// Account identifier.
    pub hash: [u8; 32],
}

/// Flags rendered into (and recovered from) the friendly form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FriendlyFlags {
    /// Messages to this address bounce on failure.
    pub bounceable: bool,
    /// Address is only meant for test networks.
    pub test_only: bool,
    /// Use the URL-safe base64 alphabet.
    pub url_safe: bool,
}

impl Default for FriendlyFlags {
    fn default() -> Self {
        Self {
            bounceable: true,
            test_only: false,
            url_safe: true,
        }
    }
}

impl FriendlyFlags {
    /// Flags for a test network (bounceable, test-only, URL-safe).
    pub fn testnet() -> Self {
        Self {
            test_only: true,
            ..Self::default()
        }
    }
}

/// Result of parsing a friendly address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FriendlyAddress {
    /// Decoded address.
    pub address: Address,
    /// Bounceable flag.
    pub bounceable: bool,
    /// Test-only flag.
    pub test_only: bool,
}

impl Address {
    /// Basechain id.
    pub const BASECHAIN: i8 = 0;
    /// Masterchain id.
    pub const MASTERCHAIN: i8 = -1;

    /// Create an address.
    pub fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    /// Raw form `"<workchain>:<hex>"`.
    pub fn to_raw_string(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    /// Parse the raw form; hex may be in either case.
    pub fn from_raw_str(text: &str) -> Result<Self, CellError> {
        let (workchain, hash) = text
            .split_once(':')
            .ok_or_else(|| CellError::InvalidAddress(format!("missing ':' in {text:?}")))?;
        let workchain: i8 = workchain
            .parse()
            .map_err(|_| CellError::InvalidAddress(format!("bad workchain {workchain:?}")))?;
        let bytes = hex::decode(hash)
            .map_err(|e| CellError::InvalidAddress(format!("bad account hash: {e}")))?;
        let hash: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            CellError::InvalidAddress(format!("account hash is {} bytes, expected 32", bytes.len()))
        })?;
        Ok(Self::new(workchain, hash))
    }

    /// Friendly form with the given flags.
    pub fn to_friendly(&self, flags: FriendlyFlags) -> String {
        let mut bytes = [0u8; FRIENDLY_BYTES];
        let mut tag = if flags.bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if flags.test_only {
            tag |= TAG_TEST_ONLY;
        }
        bytes[0] = tag;
        bytes[1] = self.workchain as u8;
        bytes[2..34].copy_from_slice(&self.hash);
        let checksum = crc16(&bytes[..34]);
        bytes[34..].copy_from_slice(&checksum.to_be_bytes());
        if flags.url_safe {
            URL_SAFE.encode(bytes)
        } else {
            STANDARD.encode(bytes)
        }
    }

    /// Parse the friendly form (either base64 alphabet) and verify its checksum.
    pub fn parse_friendly(text: &str) -> Result<FriendlyAddress, CellError> {
        if text.len() != FRIENDLY_CHARS {
            return Err(CellError::InvalidAddress(format!(
                "friendly address must be {FRIENDLY_CHARS} characters, got {}",
                text.len()
            )));
        }
        let normalized: String = text
            .chars()
            .map(|c| match c {
                '-' => '+',
                '_' => '/',
                other => other,
            })
            .collect();
        let bytes = STANDARD
            .decode(normalized)
            .map_err(|e| CellError::InvalidAddress(format!("bad base64: {e}")))?;
        if bytes.len() != FRIENDLY_BYTES {
            return Err(CellError::InvalidAddress(format!(
                "friendly address decodes to {} bytes, expected {FRIENDLY_BYTES}",
                bytes.len()
            )));
        }

        let expected = crc16(&bytes[..34]);
        let actual = u16::from_be_bytes([bytes[34], bytes[35]]);
        if expected != actual {
            return Err(CellError::InvalidAddress(format!(
                "checksum mismatch: expected {expected:#06x}, found {actual:#06x}"
            )));
        }

        let mut tag = bytes[0];
        let test_only = tag & TAG_TEST_ONLY != 0;
        tag &= !TAG_TEST_ONLY;
        let bounceable = match tag {
            TAG_BOUNCEABLE => true,
            TAG_NON_BOUNCEABLE => false,
            other => {
                return Err(CellError::InvalidAddress(format!(
                    "unknown friendly tag {other:#04x}"
                )))
            }
        };

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..34]);
        Ok(FriendlyAddress {
            address: Self::new(bytes[1] as i8, hash),
            bounceable,
            test_only,
        })
    }
}

impl FromStr for Address {
    type Err = CellError;

    /// Accepts either the raw or the friendly form.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.contains(':') {
            Self::from_raw_str(text)
        } else {
            Self::parse_friendly(text).map(|friendly| friendly.address)
        }
    }
}

impl fmt::Display for Address {
    /// Friendly, bounceable, mainnet, URL-safe.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_friendly(FriendlyFlags::default()))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_raw_string())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_raw_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
