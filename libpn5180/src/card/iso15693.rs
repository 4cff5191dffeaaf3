// libpn5180-rs/libpn5180/src/card/iso15693.rs

use crate::card::{check_addressable, check_alignment};
use crate::config;
use crate::constants::iso15693;
use crate::protocol::iso15693::{self as proto, RequestMode, SystemInformation};
use crate::protocol::ndef::{self, CapabilityContainer, NdefMapping, NdefTlv};
use crate::transport::Transport;
use crate::types::Iso15693UniqueId;
use crate::{Error, Result};

/// A selected ISO 15693 tag.
///
/// Block geometry and the optional identifiers come from one
/// GET_SYSTEM_INFORMATION exchange made the first time any of them is
/// needed; the answer is cached for the life of the card.
pub struct Iso15693Card<'a> {
    transport: &'a mut dyn Transport,
    card_id: Iso15693UniqueId,
    system_info: Option<SystemInformation>,
}

impl<'a> Iso15693Card<'a> {
    pub fn new(transport: &'a mut dyn Transport, card_id: Iso15693UniqueId) -> Self {
        Self {
            transport,
            card_id,
            system_info: None,
        }
    }

    pub fn id(&self) -> &Iso15693UniqueId {
        &self.card_id
    }

    /// Request the system information from the tag, bypassing the cache.
    pub fn get_system_information(&mut self) -> Result<SystemInformation> {
        proto::get_system_information(&mut *self.transport, RequestMode::Selected)
    }

    fn system_info(&mut self) -> Result<SystemInformation> {
        if let Some(info) = self.system_info {
            return Ok(info);
        }
        let info = self.get_system_information()?;
        self.system_info = Some(info);
        Ok(info)
    }

    /// Block size in bytes; 4 if the tag does not report it.
    pub fn memory_block_size(&mut self) -> Result<usize> {
        Ok(self
            .system_info()?
            .block_size
            .unwrap_or(config::ISO15693_DEFAULT_BLOCK_SIZE))
    }

    /// Number of blocks; 256 if the tag does not report it.
    pub fn memory_number_of_blocks(&mut self) -> Result<usize> {
        Ok(self
            .system_info()?
            .num_blocks
            .unwrap_or(config::ISO15693_DEFAULT_NUM_BLOCKS))
    }

    pub fn dsfid(&mut self) -> Result<Option<u8>> {
        Ok(self.system_info()?.dsfid)
    }

    pub fn afi(&mut self) -> Result<Option<u8>> {
        Ok(self.system_info()?.afi)
    }

    pub fn ic_reference(&mut self) -> Result<Option<u8>> {
        Ok(self.system_info()?.ic_reference)
    }

    /// Read `length` bytes at `offset`; both must be block aligned.
    ///
    /// Large reads are split into READ_MULTIPLE_BLOCKS requests of at most
    /// 128 bytes. A request that comes back without data ends the read and
    /// what was read so far is returned.
    pub fn read_memory(&mut self, offset: usize, length: usize) -> Result<Vec<u8>> {
        let block_size = self.memory_block_size()?;
        check_alignment(offset, length, block_size)?;

        let start_block = offset / block_size;
        let end_block = start_block + length / block_size;
        let per_request = (config::ISO15693_READ_CHUNK_LEN / block_size).max(1);
        check_addressable("block", start_block, end_block - start_block)?;

        self.transport.turn_on_crc()?;
        self.transport.change_mode_to_transceiver()?;

        let mut memory = Vec::with_capacity(length);
        let mut block = start_block;
        while block < end_block {
            let count = per_request.min(end_block - block);
            let resp = proto::send_and_receive_request(
                &mut *self.transport,
                RequestMode::Selected,
                iso15693::READ_MULTIPLE_BLOCKS,
                &[block as u8, (count - 1) as u8],
            )?;
            proto::check_status(iso15693::READ_MULTIPLE_BLOCKS, &resp)?;
            if resp.len() < 2 {
                log::debug!("no data for block {}, stopping", block);
                break;
            }
            memory.extend_from_slice(&resp[1..]);
            block += count;
        }
        Ok(memory)
    }

    /// Read every block the tag reports.
    pub fn read_all_memory(&mut self) -> Result<Vec<u8>> {
        let block_size = self.memory_block_size()?;
        let num_blocks = self.memory_number_of_blocks()?;
        self.read_memory(0, block_size * num_blocks)
    }

    /// Write block-aligned data one WRITE_SINGLE_BLOCK at a time.
    pub fn write_memory(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let block_size = self.memory_block_size()?;
        check_alignment(offset, data.len(), block_size)?;
        let start_block = offset / block_size;
        check_addressable("block", start_block, data.len() / block_size)?;

        self.transport.turn_on_crc()?;
        self.transport.change_mode_to_transceiver()?;

        for (i, block_data) in data.chunks_exact(block_size).enumerate() {
            let block_offset = offset + i * block_size;
            let mut payload = Vec::with_capacity(1 + block_size);
            payload.push((start_block + i) as u8);
            payload.extend_from_slice(block_data);

            let resp = proto::send_and_receive_request(
                &mut *self.transport,
                RequestMode::Selected,
                iso15693::WRITE_SINGLE_BLOCK,
                &payload,
            )?;
            let failed = match resp.first() {
                None => true,
                Some(flags) => flags & iso15693::RESPONSE_ERROR != 0,
            };
            if failed {
                return Err(Error::MemoryWrite {
                    offset: block_offset,
                    error_code: resp.get(1).copied().unwrap_or(0),
                    response: resp,
                });
            }
        }
        log::debug!("wrote {} byte(s) at offset {}", data.len(), offset);
        Ok(())
    }

    pub fn decode_cc(&self, cc: &[u8]) -> Result<Option<CapabilityContainer>> {
        ndef::decode_cc(cc, NdefMapping::Iso15693)
    }

    pub fn get_ndef<'m>(&self, memory: &'m [u8]) -> Result<Option<NdefTlv<'m>>> {
        ndef::locate_ndef(memory, NdefMapping::Iso15693)
    }
}
