// libpn5180-rs/libpn5180/src/constants.rs
//! Register addresses, masks and protocol command bytes used by the engines

/// PN5180 register addresses.
pub mod registers {
    pub const SYSTEM_CONFIG: u8 = 0x00;
    pub const IRQ_ENABLE: u8 = 0x01;
    pub const IRQ_CLEAR: u8 = 0x03;
    pub const CRC_RX_CONFIG: u8 = 0x12;
    pub const RX_STATUS: u8 = 0x13;
    pub const TX_CONFIG: u8 = 0x18;
    pub const CRC_TX_CONFIG: u8 = 0x19;
}

/// AND mask clearing the CRC enable bit of CRC_TX_CONFIG / CRC_RX_CONFIG.
pub const CRC_DISABLE_MASK: u32 = 0xFFFF_FFFE;
/// OR mask setting the CRC enable bit.
pub const CRC_ENABLE_MASK: u32 = 0x0000_0001;

/// AND mask putting the transceiver into Idle (command bits cleared).
pub const SYSTEM_CONFIG_IDLE_MASK: u32 = 0xFFFF_FFF8;
/// OR mask starting the Transceive command.
pub const SYSTEM_CONFIG_TRANSCEIVE: u32 = 0x0000_0003;

/// Value written to IRQ_CLEAR to acknowledge every pending interrupt.
pub const IRQ_CLEAR_ALL: u32 = 0x000F_FFFF;
/// RX_IRQ_EN bit of IRQ_ENABLE.
pub const IRQ_RX_ENABLE: u32 = 0x0000_0001;

/// Received byte count field of RX_STATUS.
pub const RX_STATUS_LEN_MASK: u32 = 0x1FF;

/// Clears bits 7, 8 and 11 of TX_CONFIG so only an EOF is transmitted.
pub const TX_CONFIG_EOF_ONLY_MASK: u32 = 0xFFFF_FB3F;

/// Largest payload `send_data` accepts.
pub const MAX_TX_LEN: usize = 260;
/// Largest read `read_data` accepts.
pub const MAX_RX_LEN: usize = 508;

/// ISO/IEC 14443-A command bytes.
pub mod iso14443a {
    pub const WUPA: u8 = 0x52;
    pub const READ: u8 = 0x30;
    pub const WRITE: u8 = 0xA2;

    /// Select codes for cascade levels 1..=3.
    pub const SEL_CL1: u8 = 0x93;
    pub const SEL_CL2: u8 = 0x95;
    pub const SEL_CL3: u8 = 0x97;

    /// NVB for an anticollision frame carrying no UID bits.
    pub const ANTICOLLISION: u8 = 0x20;
    /// NVB for a SELECT frame carrying the full 40 bits.
    pub const SELECT: u8 = 0x70;

    /// WUPA is a short frame.
    pub const SHORT_FRAME_BITS: u8 = 7;

    /// Low nibble of a positive 4-bit acknowledgement.
    pub const ACK: u8 = 0x0A;

    /// Bytes returned per READ, written per WRITE.
    pub const PAGE_SIZE: usize = 4;
    /// Pages covered by one READ.
    pub const PAGES_PER_READ: usize = 4;
    /// Pages are addressed with one byte.
    pub const MAX_PAGE: usize = 255;
}

/// MIFARE Classic authentication key-type bytes.
pub mod mifare {
    pub const KEY_A: u8 = 0x60;
    pub const KEY_B: u8 = 0x61;
}

/// ISO/IEC 15693 command bytes and request flags.
pub mod iso15693 {
    pub const INVENTORY: u8 = 0x01;
    pub const WRITE_SINGLE_BLOCK: u8 = 0x21;
    pub const READ_MULTIPLE_BLOCKS: u8 = 0x23;
    pub const SELECT: u8 = 0x25;
    pub const GET_SYSTEM_INFORMATION: u8 = 0x2B;

    pub const FLAG_HIGH_DATA_RATE: u8 = 0x02;
    pub const FLAG_INVENTORY: u8 = 0x04;
    pub const FLAG_SELECT: u8 = 0x10;
    pub const FLAG_ADDRESS: u8 = 0x20;

    /// Response flag bit signalling a tag-side error.
    pub const RESPONSE_ERROR: u8 = 0x01;

    pub const UID_LEN: usize = 8;
    /// flags(1) + DSFID(1) + UID(8)
    pub const INVENTORY_RESPONSE_LEN: usize = 10;
    /// Optional system information fields begin after flags(1), info(1), UID(8).
    pub const SYSTEM_INFO_FIELDS_OFFSET: usize = 10;

    pub const INFO_DSFID: u8 = 0x01;
    pub const INFO_AFI: u8 = 0x02;
    pub const INFO_MEMORY_SIZE: u8 = 0x04;
    pub const INFO_IC_REFERENCE: u8 = 0x08;
}

/// NDEF capability container and TLV constants.
pub mod ndef {
    pub const CC_MAGIC: u8 = 0xE1;
    pub const CC_LEN: usize = 4;

    pub const TLV_NULL: u8 = 0x00;
    pub const TLV_NDEF: u8 = 0x03;
    pub const TLV_TERMINATOR: u8 = 0xFE;
    /// A length byte of 0xFF announces a two-byte big-endian length.
    pub const TLV_LONG_LENGTH: u8 = 0xFF;
}
