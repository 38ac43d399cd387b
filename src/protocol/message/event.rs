//! Transport-agnostic event and its canonical 8-byte wire encoding.
use crate::core::{EVENT_DATA_LEN, EVENT_PADDING, EVENT_WIRE_LEN};
use crate::error::EventDecodeError;

/// Subsystem state change or command: `{subsystem, id, 6-byte payload}`.
///
/// Equality is structural. On every transport (CAN, J1939, RealDash/BLE serial)
/// an event travels as `[subsystem, id, data[0], .., data[5]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event {
    /// Logical domain (climate, tire, power, keypad, ...).
    pub subsystem: u8,
    /// Event/command kind within the subsystem.
    pub id: u8,
    /// Payload, unused trailing bytes padded with `0xFF`.
    pub data: [u8; EVENT_DATA_LEN],
}

impl Event {
    /// Event with an all-padding payload.
    pub const fn new(subsystem: u8, id: u8) -> Self {
        Self::with_data(subsystem, id, [EVENT_PADDING; EVENT_DATA_LEN])
    }

    /// Event with an explicit payload.
    pub const fn with_data(subsystem: u8, id: u8, data: [u8; EVENT_DATA_LEN]) -> Self {
        Self {
            subsystem,
            id,
            data,
        }
    }

    /// Event whose payload starts with `bytes`, the rest padded with `0xFF`.
    /// Bytes beyond six are ignored.
    pub fn from_prefix(subsystem: u8, id: u8, bytes: &[u8]) -> Self {
        let mut event = Self::new(subsystem, id);
        let len = bytes.len().min(EVENT_DATA_LEN);
        event.data[..len].copy_from_slice(&bytes[..len]);
        event
    }

    /// `true` if this event is `subsystem`/`id`.
    #[inline]
    pub fn is(&self, subsystem: u8, id: u8) -> bool {
        self.subsystem == subsystem && self.id == id
    }

    /// Canonical wire encoding.
    pub fn to_bytes(&self) -> [u8; EVENT_WIRE_LEN] {
        let mut bytes = [0u8; EVENT_WIRE_LEN];
        bytes[0] = self.subsystem;
        bytes[1] = self.id;
        bytes[2..].copy_from_slice(&self.data);
        bytes
    }

    /// Inverse of [`Event::to_bytes`].
    pub fn from_bytes(bytes: &[u8; EVENT_WIRE_LEN]) -> Self {
        let mut data = [0u8; EVENT_DATA_LEN];
        data.copy_from_slice(&bytes[2..]);
        Self::with_data(bytes[0], bytes[1], data)
    }
}

impl TryFrom<&[u8]> for Event {
    type Error = EventDecodeError;

    /// Decode the first eight bytes of `payload`; trailing bytes are ignored.
    fn try_from(payload: &[u8]) -> Result<Self, Self::Error> {
        let bytes: &[u8; EVENT_WIRE_LEN] = payload
            .get(..EVENT_WIRE_LEN)
            .and_then(|head| head.try_into().ok())
            .ok_or(EventDecodeError::TooShort { len: payload.len() })?;
        Ok(Self::from_bytes(bytes))
    }
}

impl From<Event> for [u8; EVENT_WIRE_LEN] {
    fn from(event: Event) -> Self {
        event.to_bytes()
    }
}
