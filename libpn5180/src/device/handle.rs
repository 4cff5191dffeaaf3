// libpn5180-rs/libpn5180/src/device/handle.rs

use crate::device::session::RfSession;
use crate::transport::Transport;
use crate::types::RfConfig;
use crate::Result;

/// Reader handle owning the transport to the front-end.
pub struct Pn5180 {
    transport: Box<dyn Transport>,
}

impl Pn5180 {
    /// Wrap an already-created transport instance (e.g. MockTransport).
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Switch the RF field on with the given protocol configuration.
    ///
    /// The session borrows the reader, so only one can be open at a time.
    pub fn start_session(&mut self, rf_config: RfConfig) -> Result<RfSession<'_>> {
        RfSession::open(&mut *self.transport, rf_config)
    }

    /// Direct access to the transport for low-level register work.
    pub fn ll(&mut self) -> &mut dyn Transport {
        &mut *self.transport
    }

    pub fn into_transport(self) -> Box<dyn Transport> {
        self.transport
    }
}
