//! J1939 records carried on the internal bus.
use crate::core::{BROADCAST_ADDRESS, CAN_MAX_DLC, DEFAULT_PRIORITY, NULL_ADDRESS};
use crate::error::CanIdBuildError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::{is_pdu1, CanId};

//==================================================================================J1939_MESSAGE
/// Single-frame J1939 message, decoupled from its 29-bit identifier.
///
/// `pgn` is the 18-bit parameter group number with the destination byte of PDU1
/// groups zeroed; `destination` carries it instead (`0xFF` = global).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct J1939Message {
    pub pgn: u32,
    pub priority: u8,
    pub source: u8,
    pub destination: u8,
    pub len: u8,
    pub data: [u8; CAN_MAX_DLC],
}

impl J1939Message {
    /// Empty broadcast message from the null address.
    pub const fn new(pgn: u32, priority: u8) -> Self {
        Self {
            pgn,
            priority: priority & 0x07,
            source: NULL_ADDRESS,
            destination: BROADCAST_ADDRESS,
            len: 0,
            data: [0xFF; CAN_MAX_DLC],
        }
    }

    /// Sets the source address.
    pub const fn with_source(mut self, source: u8) -> Self {
        self.source = source;
        self
    }

    /// Sets the destination address.
    pub const fn with_destination(mut self, destination: u8) -> Self {
        self.destination = destination;
        self
    }

    /// Copies up to 8 payload bytes.
    pub fn with_payload(mut self, payload: &[u8]) -> Self {
        let len = payload.len().min(CAN_MAX_DLC);
        self.data[..len].copy_from_slice(&payload[..len]);
        self.len = len as u8;
        self
    }

    /// Populated payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..(self.len as usize).min(CAN_MAX_DLC)]
    }

    /// PDU format byte of the PGN.
    #[inline]
    pub fn pdu_format(&self) -> u8 {
        ((self.pgn >> 8) & 0xFF) as u8
    }

    /// `true` when addressed to every node.
    #[inline]
    pub fn is_broadcast(&self) -> bool {
        self.destination == BROADCAST_ADDRESS
    }

    /// Decode an extended CAN frame; standard frames are not J1939.
    pub fn from_can(frame: &CanFrame) -> Option<Self> {
        if !frame.extended || frame.remote {
            return None;
        }
        let id = CanId(frame.id);
        Some(
            Self::new(id.pgn(), id.priority())
                .with_source(id.source_address())
                .with_destination(id.destination().unwrap_or(BROADCAST_ADDRESS))
                .with_payload(frame.payload()),
        )
    }

    /// Encode as an extended CAN frame. PDU2 groups ignore `destination`.
    pub fn to_can(&self) -> Result<CanFrame, CanIdBuildError> {
        let builder = CanId::builder(self.pgn, self.source).with_priority(self.priority);
        let builder = if is_pdu1(self.pgn) {
            builder.to_destination(self.destination)
        } else {
            builder
        };
        let id = builder.build()?;
        Ok(CanFrame::extended(id.0, self.payload()))
    }
}

impl Default for J1939Message {
    fn default() -> Self {
        Self::new(0, DEFAULT_PRIORITY)
    }
}

//==================================================================================J1939_CLAIM
/// "This device currently holds `address` with `name`". Published by a gateway
/// whenever its own address changes; `address == NULL_ADDRESS` means it lost
/// arbitration and cannot transmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct J1939Claim {
    pub address: u8,
    pub name: u64,
}

impl J1939Claim {
    pub const fn new(address: u8, name: u64) -> Self {
        Self { address, name }
    }

    /// `true` unless the claim reports the null address.
    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.address != NULL_ADDRESS
    }
}
