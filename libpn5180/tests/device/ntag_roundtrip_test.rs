#[path = "../common/mod.rs"]
mod common;

use common::ntag::EmulatedNtag;
use libpn5180::prelude::*;

fn ntag() -> EmulatedNtag {
    EmulatedNtag::new(
        common::fixtures::ntag_uid_bytes(),
        common::fixtures::ntag_memory_with_ndef(),
    )
}

#[test]
fn read_whole_memory_and_find_ndef() {
    common::init_logging();
    let mut tag = ntag();
    let expected = tag.memory.clone();

    let mut session = RfSession::open(&mut tag, RfConfig::ISO14443A_106).unwrap();
    let mut card = session.connect_iso14443a().unwrap();
    assert_eq!(card.id(), &common::fixtures::ntag_id());

    let memory = card.read_memory(0, expected.len()).unwrap();
    assert_eq!(memory, expected);

    let tlv = card.get_ndef(&memory).unwrap().expect("NDEF TLV");
    assert_eq!(tlv.payload, common::fixtures::ndef_uri_record().as_slice());
}

#[test]
fn read_past_end_returns_what_exists() {
    let mut tag = ntag();
    let mut session = RfSession::open(&mut tag, RfConfig::ISO14443A_106).unwrap();
    let mut card = session.connect_iso14443a().unwrap();

    // pages 40..60: only 40..44 exist
    let memory = card.read_memory(160, 80).unwrap();
    assert_eq!(memory.len(), 20);
}

#[test]
fn write_then_read_back() {
    let mut tag = ntag();
    let record = b"\xD1\x01\x05\x54\x02enhi".to_vec();
    let mut tlv = vec![0x03, record.len() as u8];
    tlv.extend_from_slice(&record);
    tlv.push(0xFE);
    tlv.resize(12, 0x00);

    {
        let mut session = RfSession::open(&mut tag, RfConfig::ISO14443A_106).unwrap();
        let mut card: Card = session.connect_iso14443a().unwrap().into();
        assert_eq!(card.memory_block_size().unwrap(), 4);
        card.write_memory(16, &tlv).unwrap();

        let memory = card.read_memory(0, 80).unwrap();
        assert_eq!(&memory[16..28], tlv.as_slice());
        let found = card.get_ndef(&memory).unwrap().unwrap();
        assert_eq!(found.payload, record.as_slice());
    }

    assert_eq!(tag.page(4), &tlv[..4]);
    assert_eq!(tag.page(6), &tlv[8..12]);
    assert_eq!(tag.rf_off_count, 1);
    assert!(!tag.field_on);
}

#[test]
fn write_to_protected_page_is_nacked() {
    let mut tag = ntag();
    let original = tag.memory.clone();
    let mut session = RfSession::open(&mut tag, RfConfig::ISO14443A_106).unwrap();
    let mut card = session.connect_iso14443a().unwrap();

    match card.write_memory(8, &[0u8; 8]) {
        Err(Error::MemoryWrite {
            offset: 8,
            error_code: 0x00,
            ..
        }) => {}
        other => panic!("expected MemoryWrite, got {:?}", other),
    }
    drop(card);
    drop(session);
    assert_eq!(tag.memory, original);
}

#[test]
fn failing_page_reports_its_own_offset() {
    let mut tag = ntag();
    let mut session = RfSession::open(&mut tag, RfConfig::ISO14443A_106).unwrap();
    let mut card = session.connect_iso14443a().unwrap();

    // pages 43 and 44 exist, page 45 is past the end
    match card.write_memory(172, &[0xAB; 12]) {
        Err(Error::MemoryWrite { offset: 180, .. }) => {}
        other => panic!("expected MemoryWrite, got {:?}", other),
    }
    drop(card);
    drop(session);
    assert_eq!(tag.page(43), &[0xABu8; 4]);
    assert_eq!(tag.page(44), &[0xABu8; 4]);
}

#[test]
fn misaligned_write_sends_nothing() {
    let mut tag = ntag();
    let mut session = RfSession::open(&mut tag, RfConfig::ISO14443A_106).unwrap();
    let mut card = session.connect_iso14443a().unwrap();

    match card.write_memory(17, &[0u8; 4]) {
        Err(Error::Misaligned { what: "offset", .. }) => {}
        other => panic!("expected Misaligned, got {:?}", other),
    }
    match card.write_memory(16, &[0u8; 3]) {
        Err(Error::Misaligned { what: "length", .. }) => {}
        other => panic!("expected Misaligned, got {:?}", other),
    }
    drop(card);
    drop(session);
    assert!(!tag.frames.iter().any(|f| f.first() == Some(&0xA2)));
}

#[test]
fn reader_handle_end_to_end() {
    let mut reader = Pn5180::new(Box::new(ntag()));
    let payload = [0x03, 0x00, 0xFE, 0x00];

    {
        let mut session = reader.start_session(RfConfig::ISO14443A_106).unwrap();
        let mut card = session.connect_iso14443a().unwrap();
        card.write_memory(16, &payload).unwrap();
    }

    // a fresh session sees the empty NDEF message left by the first one
    let mut session = reader.start_session(RfConfig::ISO14443A_106).unwrap();
    let mut card = session.connect_iso14443a().unwrap();
    let memory = card.read_memory(0, 80).unwrap();
    let tlv = card.get_ndef(&memory).unwrap().unwrap();
    assert_eq!(tlv.offset, 18);
    assert!(tlv.payload.is_empty());
}
