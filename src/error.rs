//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (transport access, CAN ID
//! construction, event decoding, bit access, serial framing).
use thiserror_no_std::Error;

//==================================================================================CONNECTION_ERROR
#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Outcome of a failed `Connection` read or write. Never fatal: callers report
/// it through a hook and drop the frame.
pub enum ConnectionError<E: core::fmt::Debug> {
    /// Nothing pending on the receive side.
    #[error("Receive FIFO empty")]
    FifoEmpty,
    /// Transmit side cannot accept another frame right now.
    #[error("Transmit FIFO full")]
    FifoFull,
    /// The frame cannot be represented by the underlying controller.
    #[error("Frame rejected by the controller")]
    InvalidFrame,
    /// Error reported by the driver.
    #[error("Transport error: {0:?}")]
    Transport(E),
}

impl<E: core::fmt::Debug> ConnectionError<E> {
    /// `true` for the empty/full conditions that only mean "try again later".
    pub fn is_would_block(&self) -> bool {
        matches!(self, Self::FifoEmpty | Self::FifoFull)
    }
}

//==================================================================================CAN_ID_ERROR
#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Errors that can occur while building a 29-bit CAN identifier.
pub enum CanIdBuildError {
    /// Attempt to build a broadcast message (PDU2) with PF < 240.
    #[error("Invalid for broadcast message: PF is too low")]
    InvalidForBroadcast,
    /// Attempt to send an addressed message (PDU1) with PF ≥ 240.
    #[error("Invalid for addressed message: PF is too high: {pf}")]
    InvalidForFocusedMessage { pf: u8 },
    /// In PDU1 the lower 8 bits of the PGN must remain zero.
    #[error("PDU1 PGNs require PS = 0")]
    PsFocusMessageMustBeNull,
    /// PGN does not fit in 18 bits.
    #[error("PGN out of range: {pgn:#X}")]
    PgnOutOfRange { pgn: u32 },
}

//==================================================================================EVENT_ERROR
#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Failures while turning bytes (or a generic event) into an event type.
pub enum EventDecodeError {
    /// Wire payload shorter than the 8-byte event encoding.
    #[error("Event payload too short: {len} bytes")]
    TooShort { len: usize },
    /// The event belongs to another subsystem/id than the requested view.
    #[error("Event {subsystem:#04X}/{id:#04X} does not match the view")]
    Mismatch { subsystem: u8, id: u8 },
}

//==================================================================================BITREADER_ERRORS
#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors raised during bitwise buffer reads.
pub enum BitReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("Attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than the target type can hold.
    #[error("Cannot read more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
}

//==================================================================================BITWRITER_ERRORS
#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors raised during bitwise writes into a buffer.
pub enum BitWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("Attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Field is too large for the provided type.
    #[error("Cannot write more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
}

//==================================================================================FRAME_ERROR
#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Serial framing failures.
pub enum FrameError {
    /// Output buffer cannot hold the encoded frame.
    #[error("Buffer too small: need {needed} bytes")]
    BufferTooSmall { needed: usize },
}
