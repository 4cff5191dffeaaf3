#[path = "../common/mod.rs"]
mod common;

use libpn5180::constants::{registers, CRC_ENABLE_MASK};
use libpn5180::transport::mock::RegisterOp;
use libpn5180::transport::{MockTransport, Transport};
use libpn5180::types::{AuthResult, KeyType, MifareKey};

#[test]
fn mock_transport_send_and_receive() {
    let mut m = MockTransport::new();
    m.push_response(vec![0x01, 0x02]);
    let r = m.send_and_receive(0, &[0x30, 0x00]).unwrap();
    assert_eq!(r, vec![0x01, 0x02]);
    assert_eq!(m.sent_frames(), vec![vec![0x30, 0x00]]);
}

#[test]
fn silence_reads_as_empty_reply() {
    let mut m = MockTransport::new();
    m.push_silence();
    m.push_response(vec![0xAA]);
    assert!(m.send_and_receive(0, &[0x01]).unwrap().is_empty());
    assert_eq!(m.send_and_receive(0, &[0x02]).unwrap(), vec![0xAA]);
}

#[test]
fn register_writes_are_logged_and_applied() {
    let mut m = MockTransport::new();
    m.set_register(registers::CRC_TX_CONFIG, 0x10);
    m.turn_on_crc().unwrap();
    assert_eq!(m.register(registers::CRC_TX_CONFIG), 0x11);
    assert_eq!(
        m.register_log[0],
        (RegisterOp::Or, registers::CRC_TX_CONFIG, CRC_ENABLE_MASK)
    );
}

#[test]
fn authentication_calls_are_recorded() {
    let mut m = MockTransport::new();
    m.push_auth_result(1);
    let key = MifareKey::from_bytes([0xFF; 6]);
    assert_eq!(
        m.mifare_authenticate(&key, KeyType::A, 8, 0x1234_5678).unwrap(),
        AuthResult::Denied
    );
    // queue exhausted: authenticated
    assert_eq!(
        m.mifare_authenticate(&key, KeyType::B, 8, 0x1234_5678).unwrap(),
        AuthResult::Authenticated
    );
    assert_eq!(m.auth_calls.len(), 2);
    assert_eq!(m.auth_calls[1].1, KeyType::B);
}

#[test]
fn rf_field_bookkeeping() {
    let mut m = MockTransport::new();
    m.load_rf_config(0x0D, 0x8D).unwrap();
    m.rf_on().unwrap();
    m.rf_off().unwrap();
    assert_eq!(m.rf_config, Some((0x0D, 0x8D)));
    assert_eq!((m.rf_on_count, m.rf_off_count), (1, 1));
}
