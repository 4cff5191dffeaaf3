// libpn5180-rs/libpn5180/src/transport/mock.rs

use std::collections::{HashMap, VecDeque};

use crate::constants::registers;
use crate::transport::traits::Transport;
use crate::types::{AuthResult, KeyType, MifareKey};
use crate::{Error, Result};

/// Which register primitive was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOp {
    Set,
    Or,
    And,
}

/// Recorded `mifare_authenticate` call: (key, key type, block, uid).
pub type AuthCall = (MifareKey, KeyType, u8, u32);

/// Mock transport for unit tests. It keeps a register file, records every
/// frame sent and replays queued RX payloads.
///
/// Reading RX_STATUS reports the length of the next queued payload. An empty
/// queued payload stands for "nothing received" and is consumed by that
/// RX_STATUS read, so scripts can interleave silent exchanges with replies.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub registers: HashMap<u8, u32>,
    pub register_log: Vec<(RegisterOp, u8, u32)>,
    pub responses: VecDeque<Vec<u8>>,
    pub sent: Vec<(u8, Vec<u8>)>,
    /// Raw status codes returned by `mifare_authenticate`; 0 once exhausted.
    pub auth_results: VecDeque<i32>,
    pub auth_calls: Vec<AuthCall>,
    pub irq_waits: Vec<u16>,
    pub irq_ready: bool,
    pub rf_config: Option<(u8, u8)>,
    pub rf_on_count: usize,
    pub rf_off_count: usize,
    /// Testing hook: number of `send_data` calls that succeed before every
    /// further call fails with a transport error.
    pub send_failures_after: Option<usize>,
    /// Testing hook: make `rf_off` fail.
    pub fail_rf_off: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            irq_ready: true,
            ..Self::default()
        }
    }

    pub fn push_response(&mut self, resp: Vec<u8>) {
        self.responses.push_back(resp);
    }

    /// Queue an exchange that produces no reply.
    pub fn push_silence(&mut self) {
        self.responses.push_back(Vec::new());
    }

    pub fn push_auth_result(&mut self, code: i32) {
        self.auth_results.push_back(code);
    }

    /// Make the next `send_data` calls succeed `n` times, then fail.
    pub fn set_send_failures_after(&mut self, n: usize) {
        self.send_failures_after = Some(n);
    }

    pub fn set_register(&mut self, addr: u8, value: u32) {
        self.registers.insert(addr, value);
    }

    pub fn register(&self, addr: u8) -> u32 {
        self.registers.get(&addr).copied().unwrap_or(0)
    }

    /// Payloads sent so far, without the valid-bits field.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.sent.iter().map(|(_, f)| f.clone()).collect()
    }

    fn apply(&mut self, op: RegisterOp, addr: u8, value: u32) {
        self.register_log.push((op, addr, value));
        let reg = self.registers.entry(addr).or_insert(0);
        match op {
            RegisterOp::Set => *reg = value,
            RegisterOp::Or => *reg |= value,
            RegisterOp::And => *reg &= value,
        }
    }
}

impl Transport for MockTransport {
    fn write_register(&mut self, addr: u8, value: u32) -> Result<()> {
        self.apply(RegisterOp::Set, addr, value);
        Ok(())
    }

    fn write_register_or_mask(&mut self, addr: u8, mask: u32) -> Result<()> {
        self.apply(RegisterOp::Or, addr, mask);
        Ok(())
    }

    fn write_register_and_mask(&mut self, addr: u8, mask: u32) -> Result<()> {
        self.apply(RegisterOp::And, addr, mask);
        Ok(())
    }

    fn read_register(&mut self, addr: u8) -> Result<u32> {
        if addr != registers::RX_STATUS {
            return Ok(self.register(addr));
        }
        match self.responses.front() {
            Some(front) if front.is_empty() => {
                self.responses.pop_front();
                Ok(0)
            }
            Some(front) => Ok(front.len() as u32),
            None => Ok(0),
        }
    }

    fn send_data(&mut self, valid_bits: u8, data: &[u8]) -> Result<()> {
        if let Some(remaining) = self.send_failures_after.as_mut() {
            if *remaining == 0 {
                return Err(Error::Transport {
                    operation: "send_data",
                    code: -1,
                });
            }
            *remaining -= 1;
        }
        self.sent.push((valid_bits, data.to_vec()));
        Ok(())
    }

    fn read_data(&mut self, len: usize) -> Result<Vec<u8>> {
        match self.responses.pop_front() {
            Some(mut resp) => {
                resp.truncate(len);
                Ok(resp)
            }
            None => Err(Error::Transport {
                operation: "read_data",
                code: -1,
            }),
        }
    }

    fn wait_for_irq(&mut self, timeout_ms: u16) -> Result<bool> {
        self.irq_waits.push(timeout_ms);
        Ok(self.irq_ready)
    }

    fn mifare_authenticate(
        &mut self,
        key: &MifareKey,
        key_type: KeyType,
        block_addr: u8,
        uid: u32,
    ) -> Result<AuthResult> {
        self.auth_calls.push((*key, key_type, block_addr, uid));
        let code = self.auth_results.pop_front().unwrap_or(0);
        AuthResult::from_code(code)
    }

    fn load_rf_config(&mut self, tx_config: u8, rx_config: u8) -> Result<()> {
        self.rf_config = Some((tx_config, rx_config));
        Ok(())
    }

    fn rf_on(&mut self) -> Result<()> {
        self.rf_on_count += 1;
        Ok(())
    }

    fn rf_off(&mut self) -> Result<()> {
        self.rf_off_count += 1;
        if self.fail_rf_off {
            return Err(Error::Transport {
                operation: "rf_off",
                code: -2,
            });
        }
        Ok(())
    }
}
