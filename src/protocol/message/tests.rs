//! Message model: wire packing, ownership variants and J1939 frame mapping.
use super::*;
use crate::core::{EVENT_PADDING, NULL_ADDRESS};
use crate::error::EventDecodeError;

//==================================================================================EVENT
#[test]
/// Layout: subsystem, id, then the six payload bytes.
fn test_event_wire_layout() {
    let event = Event::with_data(0x12, 0x34, [1, 2, 3, 4, 5, 6]);
    assert_eq!(event.to_bytes(), [0x12, 0x34, 1, 2, 3, 4, 5, 6]);
}

#[test]
/// Decoding then re-encoding arbitrary wire bytes is the identity.
fn test_event_decode_encode_identity() {
    let samples: [[u8; 8]; 4] = [
        [0; 8],
        [0xFF; 8],
        [0x01, 0x80, 0x7F, 0x00, 0xAA, 0x55, 0x10, 0x01],
        [0xFE, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08],
    ];
    for bytes in samples {
        assert_eq!(Event::from_bytes(&bytes).to_bytes(), bytes);
    }
}

#[test]
fn test_event_padding_and_prefix() {
    let event = Event::from_prefix(3, 4, &[9, 8]);
    assert_eq!(event.data, [9, 8, EVENT_PADDING, EVENT_PADDING, EVENT_PADDING, EVENT_PADDING]);
    assert_eq!(Event::new(1, 2).data, [EVENT_PADDING; 6]);
}

#[test]
fn test_event_try_from_short_slice() {
    assert_eq!(
        Event::try_from(&[1u8, 2, 3][..]),
        Err(EventDecodeError::TooShort { len: 3 })
    );
    let long = [7u8, 8, 1, 2, 3, 4, 5, 6, 0xEE];
    assert_eq!(
        Event::try_from(&long[..]),
        Ok(Event::with_data(7, 8, [1, 2, 3, 4, 5, 6]))
    );
}

//==================================================================================MESSAGE
#[test]
/// Value and view variants compare by content.
fn test_view_equals_value() {
    let event = Event::new(1, 1);
    let view = Message::event_view(&event);
    let value = Message::event(event);
    assert_eq!(view, value);
    assert!(matches!(view, Message::Event(payload) if payload.is_view()));
}

#[test]
fn test_to_owned_message_detaches_from_source() {
    let owned = {
        let frame = CanFrame::standard(0x100, &[1, 2]);
        let view = Message::can_frame_view(&frame);
        view.to_owned_message()
    };
    match owned {
        Message::CanFrame(payload) => {
            assert!(!payload.is_view());
            assert_eq!(payload.payload(), &[1, 2]);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_kind_and_accessors() {
    let claim = J1939Claim::new(0x20, 42);
    let message = Message::from(claim);
    assert_eq!(message.kind(), MessageKind::J1939Claim);
    assert_eq!(message.as_j1939_claim(), Some(&claim));
    assert!(message.as_event().is_none());
    assert!(Message::default().is_empty());
    assert_eq!(Message::default().kind(), MessageKind::Empty);
}

//==================================================================================J1939
#[test]
fn test_j1939_message_pdu1_round_trip_through_can() {
    let message = J1939Message::new(0xEF00, 6)
        .with_source(0x21)
        .with_destination(0x40)
        .with_payload(&[1, 2, 3, 4, 5, 6, 7, 8]);
    let frame = message.to_can().unwrap();
    assert!(frame.extended);
    assert_eq!(frame.id, 0x18EF4021);
    assert_eq!(J1939Message::from_can(&frame), Some(message));
}

#[test]
/// PDU2 frames are broadcast whatever destination the message carried.
fn test_j1939_message_pdu2_is_broadcast() {
    let message = J1939Message::new(0xFF00, 3)
        .with_source(0x21)
        .with_destination(0x40)
        .with_payload(&[0; 8]);
    let frame = message.to_can().unwrap();
    assert_eq!(frame.id, 0x0CFF0021);
    let decoded = J1939Message::from_can(&frame).unwrap();
    assert!(decoded.is_broadcast());
    assert_eq!(decoded.pgn, 0xFF00);
}

#[test]
fn test_standard_frame_is_not_j1939() {
    let frame = CanFrame::standard(0x123, &[0; 8]);
    assert_eq!(J1939Message::from_can(&frame), None);
}

#[test]
fn test_claim_null_address() {
    assert!(!J1939Claim::new(NULL_ADDRESS, 1).is_claimed());
    assert!(J1939Claim::new(0x20, 1).is_claimed());
}
