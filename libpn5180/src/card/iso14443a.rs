// libpn5180-rs/libpn5180/src/card/iso14443a.rs

use crate::card::{check_addressable, check_alignment};
use crate::card::keys::{KeyPage, KeyStore};
use crate::constants::iso14443a;
use crate::protocol::ndef::{self, CapabilityContainer, NdefMapping, NdefTlv};
use crate::transport::Transport;
use crate::types::{AuthResult, Iso14443AUniqueId, KeyType};
use crate::{Error, Result};

/// A selected ISO 14443-A card.
///
/// Cards with a 4-byte UID are treated as MIFARE Classic and every page
/// group is authenticated before it is read. Longer UIDs (NTAG, Ultralight)
/// are read without authentication.
pub struct Iso14443aCard<'a> {
    transport: &'a mut dyn Transport,
    card_id: Iso14443AUniqueId,
    keys: KeyStore,
}

impl<'a> Iso14443aCard<'a> {
    pub fn new(transport: &'a mut dyn Transport, card_id: Iso14443AUniqueId) -> Self {
        Self {
            transport,
            card_id,
            keys: KeyStore::new(),
        }
    }

    pub fn id(&self) -> &Iso14443AUniqueId {
        &self.card_id
    }

    pub fn sak(&self) -> u8 {
        self.card_id.sak()
    }

    pub fn memory_block_size(&self) -> usize {
        iso14443a::PAGE_SIZE
    }

    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    /// Set or clear the MIFARE keys used for `page`, or for every page
    /// without an override when `page` is [`KeyPage::Default`].
    pub fn authenticate_for_page(
        &mut self,
        page: impl Into<KeyPage>,
        key_a: Option<&[u8]>,
        key_b: Option<&[u8]>,
    ) -> Result<()> {
        self.keys.set(page, key_a, key_b)
    }

    /// Read `length` bytes starting at `offset`, in 4-page READ groups.
    ///
    /// Reading stops quietly at the first group the card does not return
    /// (or, on MIFARE Classic, cannot be authenticated for), so the result
    /// may be shorter than asked for. Whole groups are returned.
    pub fn read_memory(&mut self, offset: usize, length: usize) -> Result<Vec<u8>> {
        let start_page = offset / iso14443a::PAGE_SIZE;
        let num_pages = length.div_ceil(iso14443a::PAGE_SIZE);
        let end_page = (start_page + num_pages).min(iso14443a::MAX_PAGE);

        self.transport.turn_on_crc()?;
        let memory = match self.card_id.uid32() {
            Some(uid) => self.read_mifare_pages(uid, start_page, end_page)?,
            None => self.read_pages(start_page, end_page)?,
        };
        log::debug!(
            "read {} byte(s) from pages {}..{}",
            memory.len(),
            start_page,
            end_page
        );
        Ok(memory)
    }

    fn read_page_group(&mut self, page: usize) -> Result<Vec<u8>> {
        self.transport
            .send_and_receive(0, &[iso14443a::READ, page as u8])
    }

    fn read_pages(&mut self, start_page: usize, end_page: usize) -> Result<Vec<u8>> {
        let mut memory = Vec::new();
        for page in (start_page..end_page).step_by(iso14443a::PAGES_PER_READ) {
            let chunk = self.read_page_group(page)?;
            if chunk.is_empty() {
                break;
            }
            memory.extend_from_slice(&chunk);
        }
        Ok(memory)
    }

    fn read_mifare_pages(&mut self, uid: u32, start_page: usize, end_page: usize) -> Result<Vec<u8>> {
        let mut memory = Vec::new();
        for page in (start_page..end_page).step_by(iso14443a::PAGES_PER_READ) {
            if !self.authenticate_page(uid, page as u8)? {
                log::debug!("no usable key for page {}, stopping", page);
                break;
            }
            let chunk = self.read_page_group(page)?;
            if chunk.is_empty() {
                break;
            }
            memory.extend_from_slice(&chunk);
        }
        Ok(memory)
    }

    // Key A first, Key B on denial. A timeout on either ends the read.
    fn authenticate_page(&mut self, uid: u32, page: u8) -> Result<bool> {
        if let Some(key) = self.keys.key_for(KeyType::A, page) {
            match self
                .transport
                .mifare_authenticate(&key, KeyType::A, page, uid)?
            {
                AuthResult::Authenticated => return Ok(true),
                AuthResult::Timeout => return Ok(false),
                AuthResult::Denied => log::trace!("key A denied for page {}", page),
            }
        }

        let Some(key) = self.keys.key_for(KeyType::B, page) else {
            return Ok(false);
        };
        let result = self
            .transport
            .mifare_authenticate(&key, KeyType::B, page, uid)?;
        Ok(result == AuthResult::Authenticated)
    }

    /// Write whole pages starting at `offset`. Both `offset` and the data
    /// length must be multiples of the page size.
    pub fn write_memory(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let page_size = iso14443a::PAGE_SIZE;
        check_alignment(offset, data.len(), page_size)?;
        let start_page = offset / page_size;
        check_addressable("page", start_page, data.len() / page_size)?;

        for (i, page_data) in data.chunks_exact(page_size).enumerate() {
            let page_offset = offset + i * page_size;
            let page_byte = (start_page + i) as u8;

            let mut frame = Vec::with_capacity(2 + page_size);
            frame.push(iso14443a::WRITE);
            frame.push(page_byte);
            frame.extend_from_slice(page_data);

            let response = self.transport.send_and_wait_for_ack(&frame)?;
            let Some(&ack) = response.first() else {
                return Err(Error::MemoryWrite {
                    offset: page_offset,
                    error_code: 0xFF,
                    response,
                });
            };
            if ack & 0x0F != iso14443a::ACK {
                return Err(Error::MemoryWrite {
                    offset: page_offset,
                    error_code: ack,
                    response,
                });
            }
        }
        log::debug!("wrote {} byte(s) at offset {}", data.len(), offset);
        Ok(())
    }

    pub fn decode_cc(&self, cc: &[u8]) -> Result<Option<CapabilityContainer>> {
        ndef::decode_cc(cc, NdefMapping::Iso14443a)
    }

    /// Find the NDEF TLV in `memory` (a read starting at offset 0).
    pub fn get_ndef<'m>(&self, memory: &'m [u8]) -> Result<Option<NdefTlv<'m>>> {
        ndef::locate_ndef(memory, NdefMapping::Iso14443a)
    }
}
