// libpn5180-rs/libpn5180/src/protocol/ndef.rs
//! Capability Container decoding and the TLV walk that locates the NDEF
//! message in a tag memory image.
//!
//! Both tag families share the TLV grammar; they differ in where the CC
//! lives, how its size byte is scaled and how the read-only state is encoded.
//! [`NdefMapping`] carries those differences.

use crate::constants::ndef;
use crate::{Error, Result};

/// Per-family CC layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NdefMapping {
    /// Type 2 tags: CC in page 3, TLVs from page 4.
    Iso14443a,
    /// Type 5 tags: CC in block 0, TLVs right after it.
    Iso15693,
}

impl NdefMapping {
    /// Byte offset of the CC in the memory image.
    pub fn cc_offset(self) -> usize {
        match self {
            NdefMapping::Iso14443a => 12,
            NdefMapping::Iso15693 => 0,
        }
    }

    /// Byte offset of the first TLV.
    pub fn tlv_offset(self) -> usize {
        self.cc_offset() + ndef::CC_LEN
    }

    /// Highest mapping major version understood.
    pub fn max_major(self) -> u8 {
        match self {
            NdefMapping::Iso14443a => 1,
            NdefMapping::Iso15693 => 4,
        }
    }

    fn memory_len(self, size_byte: u8) -> usize {
        match self {
            NdefMapping::Iso14443a => size_byte as usize * 4,
            NdefMapping::Iso15693 => (size_byte as usize + 1) * 8,
        }
    }

    fn read_only(self, access_byte: u8) -> bool {
        match self {
            NdefMapping::Iso14443a => access_byte & 0xF0 == 0xF0,
            NdefMapping::Iso15693 => access_byte & 0x01 != 0,
        }
    }
}

/// Decoded Capability Container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapabilityContainer {
    pub major: u8,
    pub minor: u8,
    /// Declared NDEF-mappable memory size in bytes.
    pub memory_len: usize,
    pub read_only: bool,
}

/// Decode the first four bytes of `cc`.
///
/// Returns `Ok(None)` when the magic byte is wrong and an error when fewer
/// than four bytes are supplied.
pub fn decode_cc(cc: &[u8], mapping: NdefMapping) -> Result<Option<CapabilityContainer>> {
    if cc.len() < ndef::CC_LEN {
        return Err(Error::InvalidLength {
            expected: ndef::CC_LEN,
            actual: cc.len(),
        });
    }
    if cc[0] != ndef::CC_MAGIC {
        return Ok(None);
    }
    Ok(Some(CapabilityContainer {
        major: cc[1] >> 4,
        minor: cc[1] & 0x0F,
        memory_len: mapping.memory_len(cc[2]),
        read_only: mapping.read_only(cc[3]),
    }))
}

/// An NDEF TLV found in memory: the payload and where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdefTlv<'a> {
    pub offset: usize,
    pub payload: &'a [u8],
}

// Read a TLV length field at `pos`: (length, bytes consumed).
fn read_tlv_len(memory: &[u8], pos: usize) -> Option<(usize, usize)> {
    let first = *memory.get(pos)?;
    if first != ndef::TLV_LONG_LENGTH {
        return Some((first as usize, 1));
    }
    let hi = *memory.get(pos + 1)?;
    let lo = *memory.get(pos + 2)?;
    Some((u16::from_be_bytes([hi, lo]) as usize, 3))
}

/// Locate the NDEF message in a memory image read from offset 0.
///
/// `Ok(None)` covers every "no NDEF here" outcome: bad magic, unsupported
/// major version, a CC claiming more memory than supplied, a terminator
/// before the NDEF TLV, or an NDEF TLV overrunning the declared memory.
pub fn locate_ndef(memory: &[u8], mapping: NdefMapping) -> Result<Option<NdefTlv<'_>>> {
    let cc_start = mapping.cc_offset();
    let cc_end = (cc_start + ndef::CC_LEN).min(memory.len());
    let cc_bytes = memory.get(cc_start..cc_end).unwrap_or(&[]);

    let cc = match decode_cc(cc_bytes, mapping)? {
        Some(cc) => cc,
        None => return Ok(None),
    };
    if cc.major > mapping.max_major() {
        log::debug!("unsupported NDEF mapping version {}.{}", cc.major, cc.minor);
        return Ok(None);
    }
    let mlen = cc.memory_len;
    if mlen > memory.len() {
        return Ok(None);
    }

    let mut pos = mapping.tlv_offset();
    while pos < mlen {
        let tlv_type = memory[pos];
        pos += 1;
        match tlv_type {
            ndef::TLV_NULL => continue,
            ndef::TLV_TERMINATOR => return Ok(None),
            _ => {}
        }

        let Some((len, consumed)) = read_tlv_len(memory, pos) else {
            return Ok(None);
        };
        pos += consumed;

        if tlv_type == ndef::TLV_NDEF {
            if pos + len > mlen {
                return Ok(None);
            }
            return Ok(Some(NdefTlv {
                offset: pos,
                payload: &memory[pos..pos + len],
            }));
        }
        pos += len;
    }
    Ok(None)
}
