// vicinity.rs: an emulated ISO 15693 field holding any number of tags.
// Inventory answers follow the 16-slot rules: a tag answers in the slot
// given by the four UID bits after the mask.

use std::collections::HashMap;

use libpn5180::constants::{iso15693, registers};
use libpn5180::test_support::{inventory_slot_response, system_information_response};
use libpn5180::transport::Transport;
use libpn5180::types::{AuthResult, Iso15693UniqueId, KeyType, MifareKey};
use libpn5180::Result;

const ERR_BLOCK_UNAVAILABLE: u8 = 0x10;

pub struct VicinityTag {
    pub uid: Iso15693UniqueId,
    pub block_size: usize,
    pub memory: Vec<u8>,
    /// Blocks from this one on answer WRITE with an error.
    pub locked_from: Option<usize>,
}

impl VicinityTag {
    pub fn new(uid: Iso15693UniqueId, block_size: usize, memory: Vec<u8>) -> Self {
        Self {
            uid,
            block_size,
            memory,
            locked_from: None,
        }
    }

    fn num_blocks(&self) -> usize {
        self.memory.len() / self.block_size
    }

    fn as_u64(&self) -> u64 {
        u64::from_le_bytes(self.uid.to_wire())
    }

    fn handle(&mut self, command: u8, payload: &[u8]) -> Option<Vec<u8>> {
        match (command, payload) {
            (iso15693::GET_SYSTEM_INFORMATION, []) => Some(system_information_response(
                &self.uid,
                self.block_size as u8,
                self.num_blocks() as u16,
            )),
            (iso15693::READ_MULTIPLE_BLOCKS, [first, count_minus_one]) => {
                let first = *first as usize;
                let count = *count_minus_one as usize + 1;
                if first + count > self.num_blocks() {
                    return Some(vec![0x01, ERR_BLOCK_UNAVAILABLE]);
                }
                let start = first * self.block_size;
                let mut r = vec![0x00];
                r.extend_from_slice(&self.memory[start..start + count * self.block_size]);
                Some(r)
            }
            (iso15693::WRITE_SINGLE_BLOCK, [block, data @ ..]) if data.len() == self.block_size => {
                let block = *block as usize;
                let locked = self.locked_from.is_some_and(|l| block >= l);
                if block >= self.num_blocks() || locked {
                    return Some(vec![0x01, ERR_BLOCK_UNAVAILABLE]);
                }
                let start = block * self.block_size;
                self.memory[start..start + self.block_size].copy_from_slice(data);
                Some(vec![0x00])
            }
            _ => Some(vec![0x01, 0x01]),
        }
    }
}

#[derive(Default)]
pub struct VicinityField {
    pub tags: Vec<VicinityTag>,
    pub field_on: bool,
    pub rf_off_count: usize,
    pub frames: Vec<Vec<u8>>,
    /// Fail every send_data once this many frames have gone out.
    pub fail_after: Option<usize>,
    registers: HashMap<u8, u32>,
    pending: Option<Vec<u8>>,
    selected: Option<usize>,
    inventory: Option<(u64, u8, usize)>,
}

impl VicinityField {
    pub fn new(tags: Vec<VicinityTag>) -> Self {
        Self {
            tags,
            ..Default::default()
        }
    }

    pub fn tag(&self, uid: &Iso15693UniqueId) -> Option<&VicinityTag> {
        self.tags.iter().find(|t| &t.uid == uid)
    }

    pub fn register(&self, addr: u8) -> u32 {
        self.registers.get(&addr).copied().unwrap_or(0)
    }

    pub fn set_register(&mut self, addr: u8, value: u32) {
        self.registers.insert(addr, value);
    }

    // Reply of the current inventory slot: one tag answers cleanly, more
    // than one collide and produce a frame with the error bit set.
    fn slot_reply(&self) -> Option<Vec<u8>> {
        let (mask, mask_len, slot) = self.inventory?;
        let low = |v: u64, bits: u8| {
            if bits >= 64 {
                v
            } else {
                v & ((1u64 << bits) - 1)
            }
        };
        let answering: Vec<&VicinityTag> = self
            .tags
            .iter()
            .filter(|t| {
                let uid = t.as_u64();
                let next = if mask_len >= 64 { 0 } else { uid >> mask_len };
                low(uid, mask_len) == mask && (next & 0x0F) as usize == slot
            })
            .collect();
        match answering.as_slice() {
            [] => None,
            [tag] => Some(inventory_slot_response(&tag.uid)),
            _ => Some(vec![0x01, 0x00]),
        }
    }

    fn answer(&mut self, frame: &[u8]) -> Option<Vec<u8>> {
        if !self.field_on {
            return None;
        }

        // EOF-only frame moves the inventory to its next slot
        if frame.is_empty() {
            let (_, _, slot) = self.inventory.as_mut()?;
            *slot += 1;
            return self.slot_reply();
        }

        let flags = frame[0];
        if flags & iso15693::FLAG_INVENTORY != 0 {
            if frame.get(1) != Some(&iso15693::INVENTORY) || frame.len() < 3 {
                return None;
            }
            let mask_len = frame[2];
            let mut mask_bytes = [0u8; 8];
            let given = &frame[3..];
            mask_bytes[..given.len().min(8)].copy_from_slice(&given[..given.len().min(8)]);
            self.inventory = Some((u64::from_le_bytes(mask_bytes), mask_len, 0));
            return self.slot_reply();
        }

        let command = *frame.get(1)?;
        let (index, payload) = if flags & iso15693::FLAG_ADDRESS != 0 {
            let wire = frame.get(2..2 + iso15693::UID_LEN)?;
            let uid = Iso15693UniqueId::from_wire(wire).ok()?;
            let index = self.tags.iter().position(|t| t.uid == uid)?;
            (index, &frame[2 + iso15693::UID_LEN..])
        } else if flags & iso15693::FLAG_SELECT != 0 {
            (self.selected?, &frame[2..])
        } else if self.tags.len() == 1 {
            (0, &frame[2..])
        } else {
            return None;
        };

        if command == iso15693::SELECT {
            self.selected = Some(index);
            return Some(vec![0x00]);
        }
        self.tags[index].handle(command, payload)
    }
}

impl Transport for VicinityField {
    fn write_register(&mut self, addr: u8, value: u32) -> Result<()> {
        self.registers.insert(addr, value);
        Ok(())
    }

    fn write_register_or_mask(&mut self, addr: u8, mask: u32) -> Result<()> {
        *self.registers.entry(addr).or_insert(0) |= mask;
        Ok(())
    }

    fn write_register_and_mask(&mut self, addr: u8, mask: u32) -> Result<()> {
        *self.registers.entry(addr).or_insert(0) &= mask;
        Ok(())
    }

    fn read_register(&mut self, addr: u8) -> Result<u32> {
        if addr == registers::RX_STATUS {
            return Ok(self.pending.as_ref().map_or(0, |p| p.len() as u32));
        }
        Ok(self.register(addr))
    }

    fn send_data(&mut self, _valid_bits: u8, data: &[u8]) -> Result<()> {
        if self.fail_after.is_some_and(|n| self.frames.len() >= n) {
            return Err(libpn5180::Error::Transport {
                operation: "send_data",
                code: -1,
            });
        }
        self.frames.push(data.to_vec());
        self.pending = self.answer(data);
        Ok(())
    }

    fn read_data(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut data = self.pending.take().unwrap_or_default();
        data.truncate(len);
        Ok(data)
    }

    fn wait_for_irq(&mut self, _timeout_ms: u16) -> Result<bool> {
        Ok(self.pending.is_some())
    }

    fn mifare_authenticate(
        &mut self,
        _key: &MifareKey,
        _key_type: KeyType,
        _block_addr: u8,
        _uid: u32,
    ) -> Result<AuthResult> {
        Ok(AuthResult::Timeout)
    }

    fn load_rf_config(&mut self, _tx_config: u8, _rx_config: u8) -> Result<()> {
        Ok(())
    }

    fn rf_on(&mut self) -> Result<()> {
        self.field_on = true;
        Ok(())
    }

    fn rf_off(&mut self) -> Result<()> {
        self.field_on = false;
        self.selected = None;
        self.rf_off_count += 1;
        Ok(())
    }
}
