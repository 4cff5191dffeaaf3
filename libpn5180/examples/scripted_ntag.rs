// Read the NDEF message of a scripted NTAG through an RF session.
//
// No reader hardware is needed: the replies a real tag would give are
// queued on a MockTransport. Run with RUST_LOG=debug to see the exchange.

use libpn5180::prelude::*;
use libpn5180::test_support::seed_iso14443a_select;
use libpn5180::transport::MockTransport;

fn scripted_tag() -> MockTransport {
    let uid = [0x04, 0x6F, 0x2A, 0x12, 0x8C, 0x59, 0x80];
    let mut memory = vec![0u8; 80];
    memory[12..16].copy_from_slice(&[0xE1, 0x10, 0x12, 0x00]);
    let record = hex::decode("d1010e5504727573742d6c616e672e6f7267").unwrap_or_default();
    memory[16] = 0x03;
    memory[17] = record.len() as u8;
    memory[18..18 + record.len()].copy_from_slice(&record);
    memory[18 + record.len()] = 0xFE;

    let mut mock = MockTransport::new();
    seed_iso14443a_select(&mut mock, &uid, 0x00);
    for group in memory.chunks(16) {
        mock.push_response(group.to_vec());
    }
    mock
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut reader = Pn5180::new(Box::new(scripted_tag()));
    let mut session = reader.start_session(RfConfig::ISO14443A_106)?;
    let mut card = session.connect_iso14443a()?;
    println!("{} (SAK {:02x})", card.id(), card.sak());

    let memory = card.read_memory(0, 80)?;
    match card.get_ndef(&memory)? {
        Some(tlv) => println!(
            "NDEF at offset {}: {}",
            tlv.offset,
            hex::encode(tlv.payload)
        ),
        None => println!("no NDEF message"),
    }
    Ok(())
}
