// libpn5180-rs/libpn5180/src/device/session.rs

use crate::card::{Iso14443aCard, Iso15693Card};
use crate::config;
use crate::protocol::{iso14443a, iso15693};
use crate::transport::Transport;
use crate::types::{Iso15693UniqueId, RfConfig};
use crate::{Error, Result};

/// An RF field that is switched on for the lifetime of the value.
///
/// The field goes off on [`RfSession::close`] or when the session is
/// dropped, whichever comes first. Cards returned by the `connect_*` methods
/// borrow the session, so they cannot be used once it is gone. After close
/// every operation fails with [`Error::SessionInactive`] without touching
/// the transport.
pub struct RfSession<'a> {
    transport: &'a mut dyn Transport,
    active: bool,
}

impl<'a> RfSession<'a> {
    /// Load the RF configuration and switch the field on.
    pub fn open(transport: &'a mut dyn Transport, rf_config: RfConfig) -> Result<Self> {
        transport.load_rf_config(rf_config.tx, rf_config.rx)?;
        transport.rf_on()?;
        log::debug!(
            "RF on (tx config {:#04x}, rx config {:#04x})",
            rf_config.tx,
            rf_config.rx
        );
        Ok(Self {
            transport,
            active: true,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn transport(&mut self) -> Result<&mut dyn Transport> {
        if !self.active {
            return Err(Error::SessionInactive);
        }
        Ok(&mut *self.transport)
    }

    /// Wake and select the ISO 14443-A card in the field.
    pub fn connect_iso14443a(&mut self) -> Result<Iso14443aCard<'_>> {
        let transport = self.transport()?;
        let card_id = iso14443a::select_card(&mut *transport)?;
        Ok(Iso14443aCard::new(transport, card_id))
    }

    /// 16-slot inventory without a mask.
    pub fn iso15693_inventory(&mut self) -> Result<Vec<Iso15693UniqueId>> {
        self.iso15693_inventory_with(config::INVENTORY_SLOTS, config::INVENTORY_MASK_LEN, &[])
    }

    /// Inventory with an explicit slot count and UID mask. `mask` holds
    /// `mask_len` bits, rounded up to whole bytes.
    pub fn iso15693_inventory_with(
        &mut self,
        slots: usize,
        mask_len: u8,
        mask: &[u8],
    ) -> Result<Vec<Iso15693UniqueId>> {
        let transport = self.transport()?;
        iso15693::inventory(transport, slots, mask_len, mask)
    }

    /// SELECT the ISO 15693 tag with `uid` and return it.
    pub fn connect_iso15693(&mut self, uid: Iso15693UniqueId) -> Result<Iso15693Card<'_>> {
        let transport = self.transport()?;
        iso15693::select(&mut *transport, &uid)?;
        Ok(Iso15693Card::new(transport, uid))
    }

    /// Switch the field off. Only the first call does anything.
    pub fn close(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        match self.transport.rf_off() {
            Ok(()) => log::debug!("RF off"),
            Err(e) => log::warn!("failed to switch RF off: {}", e),
        }
    }
}

impl Drop for RfSession<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
