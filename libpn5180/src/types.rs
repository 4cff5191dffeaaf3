// libpn5180-rs/libpn5180/src/types.rs

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use derive_more::From;

use crate::constants;
use crate::utils::{bytes_to_hex_colon, parse_hex};
use crate::{Error, Result};

/// ISO 14443-A identifier: a 4, 7 or 10 byte UID plus the final SAK.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Iso14443AUniqueId {
    uid: Vec<u8>,
    sak: u8,
}

impl Iso14443AUniqueId {
    pub const VALID_UID_LENGTHS: [usize; 3] = [4, 7, 10];

    pub fn new(uid: &[u8], sak: u8) -> Result<Self> {
        if !Self::VALID_UID_LENGTHS.contains(&uid.len()) {
            return Err(Error::InvalidArgument(format!(
                "ISO 14443-A UID must be 4, 7 or 10 bytes, got {}",
                uid.len()
            )));
        }
        Ok(Self {
            uid: uid.to_vec(),
            sak,
        })
    }

    /// Build from a hex UID string such as `"04:6f:2a:12:8c:59:80"`.
    pub fn from_hex(uid: &str, sak: u8) -> Result<Self> {
        Self::new(&parse_hex(uid)?, sak)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.uid
    }

    pub fn sak(&self) -> u8 {
        self.sak
    }

    pub fn sak_as_bytes(&self) -> [u8; 1] {
        [self.sak]
    }

    pub fn uid_as_string(&self) -> String {
        bytes_to_hex_colon(&self.uid)
    }

    pub fn sak_as_string(&self) -> String {
        bytes_to_hex_colon(&self.sak_as_bytes())
    }

    /// The little-endian 32-bit UID value used by MIFARE authentication.
    /// `None` unless the UID is 4 bytes.
    pub fn uid32(&self) -> Option<u32> {
        let bytes: [u8; 4] = self.uid.as_slice().try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }
}

impl fmt::Display for Iso14443AUniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UID: {}, SAK={}",
            self.uid_as_string(),
            self.sak_as_string()
        )
    }
}

/// ISO 15693 identifier (8 bytes, display order: MSB first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Iso15693UniqueId([u8; constants::iso15693::UID_LEN]);

impl Iso15693UniqueId {
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Build from the LSB-first byte order used on air.
    pub fn from_wire(wire: &[u8]) -> Result<Self> {
        let mut id = Self::try_from(wire)?;
        id.0.reverse();
        Ok(id)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// The UID in on-air (LSB first) order.
    pub fn to_wire(&self) -> [u8; 8] {
        let mut wire = self.0;
        wire.reverse();
        wire
    }

    pub fn uid_as_string(&self) -> String {
        bytes_to_hex_colon(&self.0)
    }
}

impl TryFrom<&[u8]> for Iso15693UniqueId {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> std::result::Result<Self, Self::Error> {
        let arr: [u8; 8] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: constants::iso15693::UID_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

impl FromStr for Iso15693UniqueId {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = parse_hex(s)?;
        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for Iso15693UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UID: {}", self.uid_as_string())
    }
}

/// Identifier of a discovered tag of either family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UniqueId {
    Iso14443A(Iso14443AUniqueId),
    Iso15693(Iso15693UniqueId),
}

impl UniqueId {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            UniqueId::Iso14443A(id) => id.as_bytes(),
            UniqueId::Iso15693(id) => id.as_bytes(),
        }
    }

    pub fn uid_as_string(&self) -> String {
        bytes_to_hex_colon(self.as_bytes())
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueId::Iso14443A(id) => fmt::Display::fmt(id, f),
            UniqueId::Iso15693(id) => fmt::Display::fmt(id, f),
        }
    }
}

/// MIFARE Classic sector key (6 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MifareKey([u8; 6]);

impl MifareKey {
    pub const LEN: usize = 6;

    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl TryFrom<&[u8]> for MifareKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> std::result::Result<Self, Self::Error> {
        let arr: [u8; 6] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: Self::LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

// Keys stay out of logs.
impl fmt::Debug for MifareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MifareKey(..)")
    }
}

/// Which of the two sector keys to authenticate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    A,
    B,
}

impl KeyType {
    /// The command byte passed to the chip's authentication routine.
    pub fn code(&self) -> u8 {
        match self {
            KeyType::A => constants::mifare::KEY_A,
            KeyType::B => constants::mifare::KEY_B,
        }
    }
}

/// Outcome of a chip-level MIFARE authentication cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResult {
    Authenticated,
    Denied,
    Timeout,
}

impl AuthResult {
    /// Map the transport's status code (0 ok, 1 denied, 2 timeout). Negative
    /// codes are transport failures.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(AuthResult::Authenticated),
            1 => Ok(AuthResult::Denied),
            2 => Ok(AuthResult::Timeout),
            c if c < 0 => Err(Error::Transport {
                operation: "mifare_authenticate",
                code: c,
            }),
            c => Err(Error::FrameFormat(format!(
                "unknown mifare_authenticate status {}",
                c
            ))),
        }
    }
}

/// RF protocol configuration indices loaded before the field is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RfConfig {
    pub tx: u8,
    pub rx: u8,
}

impl RfConfig {
    pub const ISO14443A_106: Self = Self::new(0x00, 0x80);
    pub const ISO15693_ASK100_26: Self = Self::new(0x0D, 0x8D);
    pub const ISO15693_ASK10_26: Self = Self::new(0x0E, 0x8D);

    pub const fn new(tx: u8, rx: u8) -> Self {
        Self { tx, rx }
    }
}
