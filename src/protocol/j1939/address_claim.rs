//! Address Claim (PGN 60928) and Request (PGN 59904) frames, and the address
//! walk used by arbitrary-address-capable devices.
use crate::core::{
    ADDRESS_CLAIM_PGN, BROADCAST_ADDRESS, DEFAULT_PRIORITY, MAX_CLAIMABLE_ADDRESS,
    MIN_CLAIMABLE_ADDRESS, REQUEST_PDU_FORMAT, REQUEST_PGN,
};
use crate::protocol::message::J1939Message;

//==================================================================================ADDRESS_CLAIM_FRAME
/// Claim of `address` for `name`, sent to the global address.
pub fn address_claim_message(name: u64, address: u8) -> J1939Message {
    J1939Message::new(ADDRESS_CLAIM_PGN, DEFAULT_PRIORITY)
        .with_source(address)
        .with_destination(BROADCAST_ADDRESS)
        .with_payload(&name.to_le_bytes())
}

/// Source address and NAME of a claim; `None` for anything else.
pub fn parse_address_claim(message: &J1939Message) -> Option<(u8, u64)> {
    if message.pgn != ADDRESS_CLAIM_PGN || message.len != 8 {
        return None;
    }
    Some((message.source, u64::from_le_bytes(message.data)))
}

//==================================================================================REQUEST_FRAME
/// "Request for Address Claim" from `source` to `destination`.
pub fn request_for_address_claim(source: u8, destination: u8) -> J1939Message {
    let requested = ADDRESS_CLAIM_PGN.to_le_bytes();
    J1939Message::new(REQUEST_PGN, DEFAULT_PRIORITY)
        .with_source(source)
        .with_destination(destination)
        .with_payload(&requested[..3])
}

/// `true` if `message` asks `address` (or everyone) to re-announce its claim.
pub fn is_claim_request(message: &J1939Message, address: u8) -> bool {
    if message.pdu_format() != REQUEST_PDU_FORMAT {
        return false;
    }
    if message.destination != BROADCAST_ADDRESS && message.destination != address {
        return false;
    }
    match message.payload() {
        [b0, b1, b2, ..] => u32::from_le_bytes([*b0, *b1, *b2, 0]) == ADDRESS_CLAIM_PGN,
        _ => false,
    }
}

//==================================================================================ADDRESS_WALK
/// Next candidate after `address`, wrapping inside 1..=254.
pub fn next_address(address: u8) -> u8 {
    if !(MIN_CLAIMABLE_ADDRESS..MAX_CLAIMABLE_ADDRESS).contains(&address) {
        MIN_CLAIMABLE_ADDRESS
    } else {
        address + 1
    }
}
