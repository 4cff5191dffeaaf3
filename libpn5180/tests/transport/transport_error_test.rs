#[path = "../common/mod.rs"]
mod common;

use libpn5180::transport::{MockTransport, Transport};
use libpn5180::types::{KeyType, MifareKey};
use libpn5180::{Error, ErrorKind};

#[test]
fn send_failure_after_budget() {
    let mut m = MockTransport::new();
    m.set_send_failures_after(1);
    m.send_data(0, &[0x01]).unwrap();

    let err = m.send_data(0, &[0x02]).unwrap_err();
    assert_eq!(
        err,
        Error::Transport {
            operation: "send_data",
            code: -1
        }
    );
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(m.sent.len(), 1);
}

#[test]
fn read_without_reply_is_a_transport_error() {
    let mut m = MockTransport::new();
    match m.read_data(4) {
        Err(Error::Transport {
            operation: "read_data",
            ..
        }) => {}
        other => panic!("expected Transport error, got {:?}", other),
    }
}

#[test]
fn negative_auth_status_is_a_transport_error() {
    let mut m = MockTransport::new();
    m.push_auth_result(-5);
    let key = MifareKey::from_bytes([0; 6]);
    match m.mifare_authenticate(&key, KeyType::A, 0, 0) {
        Err(Error::Transport {
            operation: "mifare_authenticate",
            code: -5,
        }) => {}
        other => panic!("expected Transport error, got {:?}", other),
    }
}

#[test]
fn unknown_auth_status_is_frame_format() {
    let mut m = MockTransport::new();
    m.push_auth_result(7);
    let key = MifareKey::from_bytes([0; 6]);
    match m.mifare_authenticate(&key, KeyType::A, 0, 0) {
        Err(err @ Error::FrameFormat(_)) => assert_eq!(err.kind(), ErrorKind::Transport),
        other => panic!("expected FrameFormat, got {:?}", other),
    }
}

#[test]
fn rf_off_failure_surfaces_from_transport() {
    let mut m = MockTransport::new();
    m.fail_rf_off = true;
    assert!(m.rf_off().is_err());
    assert_eq!(m.rf_off_count, 1);
}

#[test]
fn oversized_rx_status_is_rejected() {
    let mut m = MockTransport::new();
    m.push_response(vec![0u8; 509]);
    match m.receive() {
        Err(Error::FrameFormat(_)) => {}
        other => panic!("expected FrameFormat, got {:?}", other),
    }
}
