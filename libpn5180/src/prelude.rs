// libpn5180-rs/libpn5180/src/prelude.rs

pub use crate::card::{Card, Iso14443aCard, Iso15693Card, KeyPage};
pub use crate::device::{Pn5180, RfSession};
pub use crate::protocol::{CapabilityContainer, NdefTlv, SystemInformation};
pub use crate::transport::Transport;
pub use crate::{
    AuthResult, Error, ErrorKind, Iso14443AUniqueId, Iso15693UniqueId, KeyType, MifareKey, Result,
    RfConfig, UniqueId,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_colon, parse_hex};
