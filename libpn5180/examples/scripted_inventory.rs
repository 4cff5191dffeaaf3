// Inventory an ISO 15693 field and dump the system information of each tag.
//
// The field is scripted on a MockTransport; swap in a real Transport
// implementation to talk to hardware.

use libpn5180::prelude::*;
use libpn5180::test_support::{inventory_slot_response, system_information_response};
use libpn5180::transport::MockTransport;

fn scripted_field(uids: &[Iso15693UniqueId]) -> MockTransport {
    let mut mock = MockTransport::new();
    // 16 slots, one tag in each of the first slots
    for slot in 0..16 {
        match uids.get(slot) {
            Some(uid) => mock.push_response(inventory_slot_response(uid)),
            None => mock.push_silence(),
        }
    }
    for uid in uids {
        mock.push_response(vec![0x00]); // SELECT
        mock.push_response(system_information_response(uid, 4, 64));
    }
    mock
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let uids: Vec<Iso15693UniqueId> = ["e0:04:01:50:0a:1b:2c:3d", "e0:07:00:00:12:34:56:78"]
        .iter()
        .map(|s| s.parse())
        .collect::<Result<_>>()?;

    let mut reader = Pn5180::new(Box::new(scripted_field(&uids)));
    let mut session = reader.start_session(RfConfig::ISO15693_ASK100_26)?;

    let found = session.iso15693_inventory()?;
    println!("{} tag(s) in the field", found.len());
    for uid in found {
        let mut card = session.connect_iso15693(uid)?;
        let info = card.get_system_information()?;
        println!(
            "{}: {} blocks of {} bytes, IC reference {:?}",
            uid,
            info.num_blocks.unwrap_or_default(),
            info.block_size.unwrap_or_default(),
            info.ic_reference
        );
    }
    session.close();
    Ok(())
}
