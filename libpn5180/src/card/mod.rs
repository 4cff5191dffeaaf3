// libpn5180-rs/libpn5180/src/card/mod.rs

use derive_more::From;

use crate::protocol::ndef::{CapabilityContainer, NdefTlv};
use crate::types::UniqueId;
use crate::{Error, Result};

pub mod iso14443a;
pub mod iso15693;
pub mod keys;

pub use iso14443a::Iso14443aCard;
pub use iso15693::Iso15693Card;
pub use keys::{KeyPage, KeyStore};

/// A connected card of either family.
#[derive(From)]
pub enum Card<'a> {
    Iso14443a(Iso14443aCard<'a>),
    Iso15693(Iso15693Card<'a>),
}

impl Card<'_> {
    pub fn id(&self) -> UniqueId {
        match self {
            Card::Iso14443a(card) => card.id().clone().into(),
            Card::Iso15693(card) => (*card.id()).into(),
        }
    }

    pub fn memory_block_size(&mut self) -> Result<usize> {
        match self {
            Card::Iso14443a(card) => Ok(card.memory_block_size()),
            Card::Iso15693(card) => card.memory_block_size(),
        }
    }

    pub fn read_memory(&mut self, offset: usize, length: usize) -> Result<Vec<u8>> {
        match self {
            Card::Iso14443a(card) => card.read_memory(offset, length),
            Card::Iso15693(card) => card.read_memory(offset, length),
        }
    }

    pub fn write_memory(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        match self {
            Card::Iso14443a(card) => card.write_memory(offset, data),
            Card::Iso15693(card) => card.write_memory(offset, data),
        }
    }

    pub fn decode_cc(&self, cc: &[u8]) -> Result<Option<CapabilityContainer>> {
        match self {
            Card::Iso14443a(card) => card.decode_cc(cc),
            Card::Iso15693(card) => card.decode_cc(cc),
        }
    }

    pub fn get_ndef<'m>(&self, memory: &'m [u8]) -> Result<Option<NdefTlv<'m>>> {
        match self {
            Card::Iso14443a(card) => card.get_ndef(memory),
            Card::Iso15693(card) => card.get_ndef(memory),
        }
    }
}

/// Reject offsets or lengths that are not whole blocks.
pub(crate) fn check_alignment(offset: usize, len: usize, block_size: usize) -> Result<()> {
    if offset % block_size != 0 {
        return Err(Error::Misaligned {
            what: "offset",
            value: offset,
            block_size,
        });
    }
    if len % block_size != 0 {
        return Err(Error::Misaligned {
            what: "length",
            value: len,
            block_size,
        });
    }
    Ok(())
}

/// Reject a run of `count` pages or blocks from `first` whose last one does
/// not fit the one-byte address of the read and write commands.
pub(crate) fn check_addressable(unit: &str, first: usize, count: usize) -> Result<()> {
    let Some(last) = count.checked_sub(1).map(|n| first + n) else {
        return Ok(());
    };
    if last > usize::from(u8::MAX) {
        return Err(Error::InvalidArgument(format!(
            "{} {} is not addressable",
            unit, last
        )));
    }
    Ok(())
}
