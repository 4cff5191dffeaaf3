//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common MockTransport scripting so tests across
//! the crate and tests/ directory can reuse the same logic.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use crate::protocol::iso14443a::{bcc, CASCADE_TAG};
use crate::transport::mock::MockTransport;
use crate::transport::Transport;
use crate::types::{AuthResult, Iso15693UniqueId, KeyType, MifareKey};
use crate::Result;

/// Transport wrapper that delegates into a shared MockTransport so a test
/// can inspect it after a [`crate::device::Pn5180`] has taken ownership.
#[doc(hidden)]
#[derive(Clone, Default)]
pub struct SharedTransport {
    pub inner: Rc<RefCell<MockTransport>>,
}

impl SharedTransport {
    pub fn new(mock: MockTransport) -> Self {
        Self {
            inner: Rc::new(RefCell::new(mock)),
        }
    }
}

impl Transport for SharedTransport {
    fn write_register(&mut self, addr: u8, value: u32) -> Result<()> {
        self.inner.borrow_mut().write_register(addr, value)
    }
    fn write_register_or_mask(&mut self, addr: u8, mask: u32) -> Result<()> {
        self.inner.borrow_mut().write_register_or_mask(addr, mask)
    }
    fn write_register_and_mask(&mut self, addr: u8, mask: u32) -> Result<()> {
        self.inner.borrow_mut().write_register_and_mask(addr, mask)
    }
    fn read_register(&mut self, addr: u8) -> Result<u32> {
        self.inner.borrow_mut().read_register(addr)
    }
    fn send_data(&mut self, valid_bits: u8, data: &[u8]) -> Result<()> {
        self.inner.borrow_mut().send_data(valid_bits, data)
    }
    fn read_data(&mut self, len: usize) -> Result<Vec<u8>> {
        self.inner.borrow_mut().read_data(len)
    }
    fn wait_for_irq(&mut self, timeout_ms: u16) -> Result<bool> {
        self.inner.borrow_mut().wait_for_irq(timeout_ms)
    }
    fn mifare_authenticate(
        &mut self,
        key: &MifareKey,
        key_type: KeyType,
        block_addr: u8,
        uid: u32,
    ) -> Result<AuthResult> {
        self.inner
            .borrow_mut()
            .mifare_authenticate(key, key_type, block_addr, uid)
    }
    fn load_rf_config(&mut self, tx_config: u8, rx_config: u8) -> Result<()> {
        self.inner.borrow_mut().load_rf_config(tx_config, rx_config)
    }
    fn rf_on(&mut self) -> Result<()> {
        self.inner.borrow_mut().rf_on()
    }
    fn rf_off(&mut self) -> Result<()> {
        self.inner.borrow_mut().rf_off()
    }
}

/// Four UID bytes followed by their BCC, as sent in an anticollision reply.
#[doc(hidden)]
pub fn uid_frame(bytes: [u8; 4]) -> Vec<u8> {
    let mut f = bytes.to_vec();
    f.push(bcc(&bytes));
    f
}

/// Queue the replies of a complete WUPA/anticollision/select exchange for
/// a 4, 7 or 10 byte UID.
#[doc(hidden)]
pub fn seed_iso14443a_select(mock: &mut MockTransport, uid: &[u8], sak: u8) {
    let size_code: u8 = match uid.len() {
        4 => 0,
        7 => 1,
        _ => 2,
    };
    mock.push_response(vec![0x04 | (size_code << 6), 0x00]);

    let mut rest = uid;
    for _ in 0..size_code {
        mock.push_response(uid_frame([CASCADE_TAG, rest[0], rest[1], rest[2]]));
        mock.push_response(vec![0x04]);
        rest = &rest[3..];
    }
    mock.push_response(uid_frame([rest[0], rest[1], rest[2], rest[3]]));
    mock.push_response(vec![sak]);
}

/// One inventory slot reply: flags, DSFID, UID in wire order.
#[doc(hidden)]
pub fn inventory_slot_response(uid: &Iso15693UniqueId) -> Vec<u8> {
    let mut r = vec![0x00, 0x00];
    r.extend_from_slice(&uid.to_wire());
    r
}

/// GET_SYSTEM_INFORMATION reply carrying every optional field.
#[doc(hidden)]
pub fn system_information_response(
    uid: &Iso15693UniqueId,
    block_size: u8,
    num_blocks: u16,
) -> Vec<u8> {
    let mut r = vec![0x00, 0x0F];
    r.extend_from_slice(&uid.to_wire());
    r.push(0x00); // DSFID
    r.push(0x00); // AFI
    r.push(num_blocks.saturating_sub(1) as u8);
    r.push(block_size.saturating_sub(1) & 0x1F);
    r.push(0x01); // IC reference
    r
}
