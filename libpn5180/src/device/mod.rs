// libpn5180-rs/libpn5180/src/device/mod.rs

pub mod handle;
pub mod session;

pub use handle::Pn5180;
pub use session::RfSession;
