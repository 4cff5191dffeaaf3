//! Compile-time protocol configuration

use crate::types::MifareKey;

/// How long to wait for the ATQA after WUPA (ms).
pub const WUPA_IRQ_TIMEOUT_MS: u16 = 1000;

/// Fallback MIFARE keys used for pages without an explicit override.
pub const DEFAULT_KEY_A: MifareKey = MifareKey::from_bytes([0xFF; 6]);
pub const DEFAULT_KEY_B: MifareKey = MifareKey::from_bytes([0x00; 6]);

/// Inventory defaults: 16-slot mode, no mask.
pub const INVENTORY_SLOTS: usize = 16;
pub const INVENTORY_MASK_LEN: u8 = 0;

/// Upper bound on the data requested by one READ_MULTIPLE_BLOCKS.
pub const ISO15693_READ_CHUNK_LEN: usize = 128;

/// Used when GET_SYSTEM_INFORMATION omits the memory size field.
pub const ISO15693_DEFAULT_BLOCK_SIZE: usize = 4;
pub const ISO15693_DEFAULT_NUM_BLOCKS: usize = 256;
