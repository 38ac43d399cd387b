//! Unit tests for the `CanId` accessors and builder.
use super::*;

//==================================================================================CAN_ID
#[test]
fn test_source_address() {
    let can_id = CanId(0x18EEFF20);
    assert_eq!(can_id.source_address(), 0x20);
}

#[test]
fn test_priority() {
    let can_id = CanId(0x18EEFF20);
    assert_eq!(can_id.priority(), 6);
}

#[test]
/// PDU1: the destination byte is not part of the PGN.
fn test_pgn_pdu1() {
    let can_id = CanId(0x18EF4021);
    assert_eq!(can_id.pgn(), 0xEF00);
    assert_eq!(can_id.destination(), Some(0x40));
    assert_eq!(can_id.pdu_format(), 0xEF);
}

#[test]
/// PDU2: the group extension belongs to the PGN, no destination.
fn test_pgn_pdu2() {
    let can_id = CanId(0x0CFF0021);
    assert_eq!(can_id.pgn(), 0xFF00);
    assert_eq!(can_id.destination(), None);
    let with_page = CanId(0x19FEF100);
    assert_eq!(with_page.pgn(), 0x1FEF1);
}

//==================================================================================CAN_ID_BUILDER
#[test]
fn test_builder_address_claim() {
    let id = CanId::builder(0xEE00, 0x20)
        .to_destination(0xFF)
        .with_priority(6)
        .build()
        .unwrap();
    assert_eq!(id.0, 0x18EEFF20);
}

#[test]
fn test_builder_broadcast() {
    let id = CanId::builder(0xFF00, 0x21).with_priority(3).build().unwrap();
    assert_eq!(id.0, 0x0CFF0021);
    assert_eq!(id.pgn(), 0xFF00);
}

#[test]
fn test_builder_rejects_misuse() {
    assert_eq!(
        CanId::builder(0xEF00, 1).build(),
        Err(CanIdBuildError::InvalidForBroadcast)
    );
    assert_eq!(
        CanId::builder(0xFF00, 1).to_destination(2).build(),
        Err(CanIdBuildError::InvalidForFocusedMessage { pf: 0xFF })
    );
    assert_eq!(
        CanId::builder(0xEF05, 1).to_destination(2).build(),
        Err(CanIdBuildError::PsFocusMessageMustBeNull)
    );
    assert_eq!(
        CanId::builder(0x4_0000, 1).build(),
        Err(CanIdBuildError::PgnOutOfRange { pgn: 0x4_0000 })
    );
}

#[test]
/// The priority must be capped to 3 bits to avoid touching the reserved field.
fn test_priority_masks_extra_bits() {
    let can_id = CanId::builder(0xFF00, 35)
        .with_priority(0b1111_0000)
        .build()
        .expect("CanId must build");
    assert_eq!(can_id.priority(), 0);
    assert_eq!(can_id.0 >> 29, 0);
}
