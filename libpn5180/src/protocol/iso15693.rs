// libpn5180-rs/libpn5180/src/protocol/iso15693.rs
//! ISO/IEC 15693 request framing, slotted inventory, select and system
//! information.

use crate::constants::{iso15693, registers};
use crate::transport::Transport;
use crate::types::Iso15693UniqueId;
use crate::{Error, Result};

/// Which tags a request is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Every tag in the field that is not quiet.
    Unaddressed,
    /// Only the tag with this UID.
    Addressed(Iso15693UniqueId),
    /// Only the tag currently in the selected state.
    Selected,
}

impl RequestMode {
    pub fn flags(&self) -> u8 {
        match self {
            RequestMode::Unaddressed => iso15693::FLAG_HIGH_DATA_RATE,
            RequestMode::Addressed(_) => iso15693::FLAG_HIGH_DATA_RATE | iso15693::FLAG_ADDRESS,
            RequestMode::Selected => iso15693::FLAG_HIGH_DATA_RATE | iso15693::FLAG_SELECT,
        }
    }
}

/// Build `flags | command | [uid] | payload`. Addressed requests carry the
/// UID in wire (LSB first) order.
pub fn encode_request(mode: RequestMode, command: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(2 + iso15693::UID_LEN + payload.len());
    frame.push(mode.flags());
    frame.push(command);
    if let RequestMode::Addressed(uid) = mode {
        frame.extend_from_slice(&uid.to_wire());
    }
    frame.extend_from_slice(payload);
    frame
}

/// Build a 16-slot INVENTORY request: flags, command, mask length in bits,
/// then the mask bytes.
pub fn encode_inventory(mask_len: u8, mask: &[u8]) -> Result<Vec<u8>> {
    if mask_len as usize > iso15693::UID_LEN * 8 {
        return Err(Error::InvalidArgument(format!(
            "inventory mask length {} exceeds 64 bits",
            mask_len
        )));
    }
    let mask_bytes = (mask_len as usize).div_ceil(8);
    if mask.len() != mask_bytes {
        return Err(Error::InvalidLength {
            expected: mask_bytes,
            actual: mask.len(),
        });
    }
    let mut frame = Vec::with_capacity(3 + mask_bytes);
    frame.push(iso15693::FLAG_HIGH_DATA_RATE | iso15693::FLAG_INVENTORY);
    frame.push(iso15693::INVENTORY);
    frame.push(mask_len);
    frame.extend_from_slice(mask);
    Ok(frame)
}

/// Transmit a request without waiting for the reply.
pub fn send_request(
    transport: &mut dyn Transport,
    mode: RequestMode,
    command: u8,
    payload: &[u8],
) -> Result<()> {
    transport.send_data(0, &encode_request(mode, command, payload))
}

/// Transmit a request and return the raw reply (empty if none arrived).
pub fn send_and_receive_request(
    transport: &mut dyn Transport,
    mode: RequestMode,
    command: u8,
    payload: &[u8],
) -> Result<Vec<u8>> {
    transport.send_and_receive(0, &encode_request(mode, command, payload))
}

/// Turn a reply with the error flag set into [`Error::TagStatus`].
pub fn check_status(command: u8, response: &[u8]) -> Result<()> {
    match response.first() {
        Some(flags) if flags & iso15693::RESPONSE_ERROR != 0 => Err(Error::TagStatus {
            command,
            error_code: response.get(1).copied().unwrap_or(0),
            response: response.to_vec(),
        }),
        _ => Ok(()),
    }
}

/// Run a slotted inventory and return the UIDs seen, in slot order.
///
/// TX_CONFIG is modified for the EOF-only slot markers and restored to its
/// entry value on every exit path.
pub fn inventory(
    transport: &mut dyn Transport,
    slots: usize,
    mask_len: u8,
    mask: &[u8],
) -> Result<Vec<Iso15693UniqueId>> {
    let request = encode_inventory(mask_len, mask)?;

    transport.turn_on_crc()?;
    transport.change_mode_to_transceiver()?;
    let saved_tx_config = transport.read_register(registers::TX_CONFIG)?;

    let result = run_slots(transport, slots, &request);
    let restored = transport.write_register(registers::TX_CONFIG, saved_tx_config);

    let uids = result?;
    restored?;
    log::debug!("inventory found {} tag(s) in {} slot(s)", uids.len(), slots);
    Ok(uids)
}

fn run_slots(
    transport: &mut dyn Transport,
    slots: usize,
    request: &[u8],
) -> Result<Vec<Iso15693UniqueId>> {
    let mut uids = Vec::new();
    transport.send_data(0, request)?;

    for slot in 0..slots {
        let data = transport.receive()?;
        if let Some(uid) = parse_inventory_slot(&data) {
            log::debug!("slot {}: {}", slot, uid);
            uids.push(uid);
        }

        // Next slot: EOF only
        transport.write_register_and_mask(
            registers::TX_CONFIG,
            crate::constants::TX_CONFIG_EOF_ONLY_MASK,
        )?;
        transport.change_mode_to_transceiver()?;
        transport.send_data(0, &[])?;
    }
    Ok(uids)
}

/// UID from one slot's reply: flags, DSFID, then the UID LSB first.
/// Error replies, empty slots and short frames yield `None`.
pub fn parse_inventory_slot(data: &[u8]) -> Option<Iso15693UniqueId> {
    let flags = *data.first()?;
    if flags & iso15693::RESPONSE_ERROR != 0 || data.len() < iso15693::INVENTORY_RESPONSE_LEN {
        return None;
    }
    Iso15693UniqueId::from_wire(&data[2..iso15693::INVENTORY_RESPONSE_LEN]).ok()
}

/// SELECT the tag with `uid`.
pub fn select(transport: &mut dyn Transport, uid: &Iso15693UniqueId) -> Result<()> {
    transport.turn_on_crc()?;
    transport.change_mode_to_transceiver()?;
    let reply = send_and_receive_request(
        transport,
        RequestMode::Addressed(*uid),
        iso15693::SELECT,
        &[],
    )?;
    if reply.is_empty() {
        return Err(Error::Timeout(format!("no answer to SELECT for {}", uid)));
    }
    check_status(iso15693::SELECT, &reply)?;
    log::debug!("selected {}", uid);
    Ok(())
}

/// Optional fields of a GET_SYSTEM_INFORMATION reply. Absent fields stay
/// `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemInformation {
    pub dsfid: Option<u8>,
    pub afi: Option<u8>,
    pub num_blocks: Option<usize>,
    pub block_size: Option<usize>,
    pub ic_reference: Option<u8>,
}

/// Decode a GET_SYSTEM_INFORMATION reply.
pub fn parse_system_information(resp: &[u8]) -> Result<SystemInformation> {
    if resp.is_empty() {
        return Err(Error::Timeout(
            "no answer to GET_SYSTEM_INFORMATION".to_string(),
        ));
    }
    check_status(iso15693::GET_SYSTEM_INFORMATION, resp)?;

    let info_flags = *resp.get(1).ok_or(Error::InvalidLength {
        expected: 2,
        actual: resp.len(),
    })?;

    let mut pos = iso15693::SYSTEM_INFO_FIELDS_OFFSET;
    let mut next = || -> Result<u8> {
        let b = *resp.get(pos).ok_or(Error::InvalidLength {
            expected: pos + 1,
            actual: resp.len(),
        })?;
        pos += 1;
        Ok(b)
    };

    let mut info = SystemInformation::default();
    if info_flags & iso15693::INFO_DSFID != 0 {
        info.dsfid = Some(next()?);
    }
    if info_flags & iso15693::INFO_AFI != 0 {
        info.afi = Some(next()?);
    }
    if info_flags & iso15693::INFO_MEMORY_SIZE != 0 {
        info.num_blocks = Some(next()? as usize + 1);
        info.block_size = Some((next()? & 0x1F) as usize + 1);
    }
    if info_flags & iso15693::INFO_IC_REFERENCE != 0 {
        info.ic_reference = Some(next()?);
    }
    Ok(info)
}

/// Ask the tag for its system information.
pub fn get_system_information(
    transport: &mut dyn Transport,
    mode: RequestMode,
) -> Result<SystemInformation> {
    transport.turn_on_crc()?;
    transport.change_mode_to_transceiver()?;
    let resp = send_and_receive_request(transport, mode, iso15693::GET_SYSTEM_INFORMATION, &[])?;
    let info = parse_system_information(&resp)?;
    log::debug!("system information: {:?}", info);
    Ok(info)
}
