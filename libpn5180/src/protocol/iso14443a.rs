// libpn5180-rs/libpn5180/src/protocol/iso14443a.rs
//! ISO/IEC 14443-3 type A wake-up, anticollision and select.

use crate::config;
use crate::constants::{self, iso14443a, registers};
use crate::transport::Transport;
use crate::types::Iso14443AUniqueId;
use crate::{Error, Result};

/// Length of an anticollision reply: four UID bytes plus BCC.
pub const UID_FRAME_LEN: usize = 5;

/// Cascade tag announcing that more UID bytes follow at the next level.
pub const CASCADE_TAG: u8 = 0x88;

/// Block Check Character: XOR of the four UID bytes.
pub fn bcc(uid_bytes: &[u8]) -> u8 {
    uid_bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Select code for a 0-based cascade level.
pub fn select_code(level: usize) -> u8 {
    match level {
        0 => iso14443a::SEL_CL1,
        1 => iso14443a::SEL_CL2,
        _ => iso14443a::SEL_CL3,
    }
}

/// Number of cascade levels after the first for the ATQA's UID size bits.
///
/// 0 -> single (4 bytes), 1 -> double (7), anything else -> triple (10).
/// The reserved code 3 lands on the triple-size path.
pub fn uid_size_code(atqa: [u8; 2]) -> usize {
    match atqa[0] >> 6 {
        0 => 0,
        1 => 1,
        _ => 2,
    }
}

/// Wake a card in the field and run the cascade until it is selected.
///
/// The transport must already have the RF field on. CRC is left enabled
/// afterwards so the selected card can be talked to directly.
pub fn select_card(transport: &mut dyn Transport) -> Result<Iso14443AUniqueId> {
    transport.turn_off_crc()?;
    transport.write_register(registers::IRQ_CLEAR, constants::IRQ_CLEAR_ALL)?;
    transport.write_register_or_mask(registers::IRQ_ENABLE, constants::IRQ_RX_ENABLE)?;
    transport.change_mode_to_transceiver()?;

    transport.send_data(iso14443a::SHORT_FRAME_BITS, &[iso14443a::WUPA])?;
    if !transport.wait_for_irq(config::WUPA_IRQ_TIMEOUT_MS)? {
        log::trace!("no RX IRQ within {} ms after WUPA", config::WUPA_IRQ_TIMEOUT_MS);
    }

    let len = transport.rx_len()?;
    if len == 0 {
        return Err(Error::Timeout("no card answered".to_string()));
    }
    let raw = transport.read_data(len.min(2))?;
    let atqa: [u8; 2] = raw.as_slice().try_into().map_err(|_| Error::InvalidLength {
        expected: 2,
        actual: raw.len(),
    })?;
    let size_code = uid_size_code(atqa);
    log::debug!(
        "ATQA {:02x} {:02x}, {} cascade level(s)",
        atqa[0],
        atqa[1],
        size_code + 1
    );

    let mut uid = Vec::with_capacity(10);
    let mut cascade_tag = 0u8;
    let mut sak = Vec::new();

    for level in 0..=size_code {
        let sel = select_code(level);
        let frame = transport.send_and_receive(0, &[sel, iso14443a::ANTICOLLISION])?;
        if frame.len() < UID_FRAME_LEN {
            return Err(Error::InvalidLength {
                expected: UID_FRAME_LEN,
                actual: frame.len(),
            });
        }

        let computed = bcc(&frame[..4]);
        if computed != frame[4] {
            return Err(Error::ChecksumMismatch {
                expected: frame[4],
                actual: computed,
            });
        }

        let last = level == size_code;
        if level > 0 && !last && frame[0] != cascade_tag {
            return Err(Error::CascadeTagMismatch {
                level,
                expected: cascade_tag,
                actual: frame[0],
            });
        }

        if last {
            uid.push(frame[0]);
        } else if level == 0 {
            cascade_tag = frame[0];
        }
        uid.extend_from_slice(&frame[1..4]);
        log::debug!("cascade level {}: {:02x?}", level + 1, &frame[..4]);

        transport.turn_on_crc()?;
        let mut select = Vec::with_capacity(2 + UID_FRAME_LEN);
        select.push(sel);
        select.push(iso14443a::SELECT);
        select.extend_from_slice(&frame[..UID_FRAME_LEN]);
        sak = transport.send_and_receive(0, &select)?;

        if !last {
            transport.turn_off_crc()?;
        }
    }

    let sak = *sak.first().ok_or(Error::InvalidLength {
        expected: 1,
        actual: 0,
    })?;
    let id = Iso14443AUniqueId::new(&uid, sak)?;
    log::debug!("selected {}", id);
    Ok(id)
}
