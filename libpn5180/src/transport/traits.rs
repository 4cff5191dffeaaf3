// libpn5180-rs/libpn5180/src/transport/traits.rs

use crate::constants::{self, registers};
use crate::types::{AuthResult, KeyType, MifareKey};
use crate::{Error, Result};

/// Transport trait abstracts the front-end's register/data primitives away
/// from protocol logic.
///
/// Implementations report negative device status codes as
/// [`Error::Transport`]. The provided methods compose the primitives into the
/// sequences the protocol engines rely on.
pub trait Transport {
    /// Write a 32-bit value to a register
    fn write_register(&mut self, addr: u8, value: u32) -> Result<()>;

    /// OR a mask into a register
    fn write_register_or_mask(&mut self, addr: u8, mask: u32) -> Result<()>;

    /// AND a mask into a register
    fn write_register_and_mask(&mut self, addr: u8, mask: u32) -> Result<()>;

    fn read_register(&mut self, addr: u8) -> Result<u32>;

    /// Load the TX buffer and transmit it. `valid_bits` is the number of
    /// valid bits in the final byte, 0 meaning the whole byte.
    fn send_data(&mut self, valid_bits: u8, data: &[u8]) -> Result<()>;

    /// Read `len` bytes from the RX buffer.
    fn read_data(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Block until the IRQ line is raised or `timeout_ms` elapses.
    fn wait_for_irq(&mut self, timeout_ms: u16) -> Result<bool>;

    /// Run the chip's MIFARE Classic authentication cycle.
    fn mifare_authenticate(
        &mut self,
        key: &MifareKey,
        key_type: KeyType,
        block_addr: u8,
        uid: u32,
    ) -> Result<AuthResult>;

    fn load_rf_config(&mut self, tx_config: u8, rx_config: u8) -> Result<()>;

    fn rf_on(&mut self) -> Result<()>;

    fn rf_off(&mut self) -> Result<()>;

    /// Enable CRC generation on TX and checking on RX.
    fn turn_on_crc(&mut self) -> Result<()> {
        self.write_register_or_mask(registers::CRC_TX_CONFIG, constants::CRC_ENABLE_MASK)?;
        self.write_register_or_mask(registers::CRC_RX_CONFIG, constants::CRC_ENABLE_MASK)
    }

    fn turn_off_crc(&mut self) -> Result<()> {
        self.write_register_and_mask(registers::CRC_TX_CONFIG, constants::CRC_DISABLE_MASK)?;
        self.write_register_and_mask(registers::CRC_RX_CONFIG, constants::CRC_DISABLE_MASK)
    }

    /// Go to Idle, then start the Transceive command.
    fn change_mode_to_transceiver(&mut self) -> Result<()> {
        self.write_register_and_mask(registers::SYSTEM_CONFIG, constants::SYSTEM_CONFIG_IDLE_MASK)?;
        self.write_register_or_mask(registers::SYSTEM_CONFIG, constants::SYSTEM_CONFIG_TRANSCEIVE)
    }

    /// Number of bytes waiting in the RX buffer.
    fn rx_len(&mut self) -> Result<usize> {
        let status = self.read_register(registers::RX_STATUS)?;
        Ok((status & constants::RX_STATUS_LEN_MASK) as usize)
    }

    /// Read whatever RX_STATUS reports as received; empty if nothing arrived.
    fn receive(&mut self) -> Result<Vec<u8>> {
        let len = self.rx_len()?;
        if len == 0 {
            return Ok(Vec::new());
        }
        if len > constants::MAX_RX_LEN {
            return Err(Error::FrameFormat(format!(
                "RX_STATUS reports {} bytes, buffer holds {}",
                len,
                constants::MAX_RX_LEN
            )));
        }
        self.read_data(len)
    }

    /// Send a frame and collect the reply in one call.
    fn send_and_receive(&mut self, valid_bits: u8, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() > constants::MAX_TX_LEN {
            return Err(Error::InvalidLength {
                expected: constants::MAX_TX_LEN,
                actual: data.len(),
            });
        }
        log::trace!("tx [{}]", crate::utils::bytes_to_hex_spaced(data));
        self.send_data(valid_bits, data)?;
        let reply = self.receive()?;
        log::trace!("rx [{}]", crate::utils::bytes_to_hex_spaced(&reply));
        Ok(reply)
    }

    /// Send a CRC-protected command whose answer is a bare 4-bit ACK/NAK
    /// (no CRC on the reply).
    fn send_and_wait_for_ack(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        self.write_register_or_mask(registers::CRC_TX_CONFIG, constants::CRC_ENABLE_MASK)?;
        self.write_register_and_mask(registers::CRC_RX_CONFIG, constants::CRC_DISABLE_MASK)?;
        self.send_and_receive(0, data)
    }
}
