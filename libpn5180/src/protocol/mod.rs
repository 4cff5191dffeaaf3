// libpn5180-rs/libpn5180/src/protocol/mod.rs

pub mod iso14443a;
pub mod iso15693;
pub mod ndef;

pub use iso14443a::{bcc, select_card};
pub use iso15693::{RequestMode, SystemInformation};
pub use ndef::{decode_cc, locate_ndef, CapabilityContainer, NdefMapping, NdefTlv};
