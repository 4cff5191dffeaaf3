// libpn5180-rs/libpn5180/src/lib.rs

//! libpn5180
//!
//! Protocol engines for the NXP PN5180 NFC front-end: ISO/IEC 14443-A
//! anticollision and MIFARE Classic access, ISO/IEC 15693 inventory and
//! block access, and NDEF location on both tag families. The chip itself is
//! reached through a [`transport::Transport`] implementation supplied by the
//! caller.

pub mod card;
pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod prelude;
pub mod protocol;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the value types in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
