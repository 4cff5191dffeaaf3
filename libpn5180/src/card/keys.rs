// libpn5180-rs/libpn5180/src/card/keys.rs
//! MIFARE Classic key selection: per-page overrides on top of a default pair.

use std::collections::BTreeMap;
use std::convert::TryFrom;

use crate::config;
use crate::types::{KeyType, MifareKey};
use crate::Result;

/// Which entry of the key store to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPage {
    /// The fallback used by pages without an override.
    Default,
    Page(u8),
}

impl From<u8> for KeyPage {
    fn from(page: u8) -> Self {
        KeyPage::Page(page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStore {
    default_a: Option<MifareKey>,
    default_b: Option<MifareKey>,
    keys_a: BTreeMap<u8, MifareKey>,
    keys_b: BTreeMap<u8, MifareKey>,
}

impl Default for KeyStore {
    fn default() -> Self {
        Self {
            default_a: Some(config::DEFAULT_KEY_A),
            default_b: Some(config::DEFAULT_KEY_B),
            keys_a: BTreeMap::new(),
            keys_b: BTreeMap::new(),
        }
    }
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key to use for `page`: its override, else the default, else none.
    pub fn key_for(&self, key_type: KeyType, page: u8) -> Option<MifareKey> {
        let (overrides, default) = match key_type {
            KeyType::A => (&self.keys_a, self.default_a),
            KeyType::B => (&self.keys_b, self.default_b),
        };
        overrides.get(&page).copied().or(default)
    }

    /// Set or clear (`None`) both keys for `page`.
    ///
    /// Both keys are validated before anything is stored, so a bad key
    /// leaves the store untouched.
    pub fn set(
        &mut self,
        page: impl Into<KeyPage>,
        key_a: Option<&[u8]>,
        key_b: Option<&[u8]>,
    ) -> Result<()> {
        let key_a = key_a.map(MifareKey::try_from).transpose()?;
        let key_b = key_b.map(MifareKey::try_from).transpose()?;

        match page.into() {
            KeyPage::Default => {
                self.default_a = key_a;
                self.default_b = key_b;
            }
            KeyPage::Page(page) => {
                Self::put(&mut self.keys_a, page, key_a);
                Self::put(&mut self.keys_b, page, key_b);
            }
        }
        Ok(())
    }

    fn put(map: &mut BTreeMap<u8, MifareKey>, page: u8, key: Option<MifareKey>) {
        match key {
            Some(k) => {
                map.insert(page, k);
            }
            None => {
                map.remove(&page);
            }
        }
    }
}
