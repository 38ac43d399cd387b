//! RealDash "CAN over serial" framing, used on the Bluetooth/BLE serial link.
//!
//! ```text
//! 44 33 22 11 | id (u32, LE) | 8 payload bytes | checksum
//! ```
//!
//! The checksum is the wrapping sum of the 16 preceding bytes. Events travel
//! inside the payload using their 8-byte wire encoding.
use crate::core::CAN_MAX_DLC;
use crate::error::FrameError;
use crate::protocol::message::{CanFrame, Event};

mod node;

pub use node::{RealDashConfig, RealDashNode};

/// Frame start marker.
pub const REALDASH_PREFIX: [u8; 4] = [0x44, 0x33, 0x22, 0x11];
/// Encoded frame size, checksum included.
pub const REALDASH_FRAME_LEN: usize = 17;
/// Frame id reserved by default for events.
pub const REALDASH_EVENT_FRAME_ID: u32 = 0x0C00;

const CHECKSUM_OFFSET: usize = REALDASH_FRAME_LEN - 1;

/// Wrapping additive checksum.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}

//==================================================================================FRAME
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Decoded RealDash frame.
pub struct RealDashFrame {
    pub id: u32,
    pub data: [u8; CAN_MAX_DLC],
}

impl RealDashFrame {
    pub const fn new(id: u32, data: [u8; CAN_MAX_DLC]) -> Self {
        Self { id, data }
    }

    /// Carry an event under `frame_id`.
    pub fn from_event(frame_id: u32, event: &Event) -> Self {
        Self::new(frame_id, event.to_bytes())
    }

    /// Interpret the payload as an event.
    pub fn to_event(&self) -> Event {
        Event::from_bytes(&self.data)
    }

    /// Wrap a CAN frame; unused payload bytes are zero.
    pub fn from_can(frame: &CanFrame) -> Self {
        let mut data = [0u8; CAN_MAX_DLC];
        data[..frame.payload().len()].copy_from_slice(frame.payload());
        Self::new(frame.id, data)
    }

    /// Ids above the 11-bit range come back as extended frames.
    pub fn to_can(&self) -> CanFrame {
        match u16::try_from(self.id) {
            Ok(id) if id <= 0x7FF => CanFrame::standard(id, &self.data),
            _ => CanFrame::extended(self.id, &self.data),
        }
    }

    pub fn encode(&self) -> [u8; REALDASH_FRAME_LEN] {
        let mut bytes = [0u8; REALDASH_FRAME_LEN];
        bytes[..4].copy_from_slice(&REALDASH_PREFIX);
        bytes[4..8].copy_from_slice(&self.id.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.data);
        bytes[CHECKSUM_OFFSET] = checksum(&bytes[..CHECKSUM_OFFSET]);
        bytes
    }

    /// Encode into `buffer`, returning the number of bytes written.
    pub fn encode_into(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let target = buffer
            .get_mut(..REALDASH_FRAME_LEN)
            .ok_or(FrameError::BufferTooSmall {
                needed: REALDASH_FRAME_LEN,
            })?;
        target.copy_from_slice(&self.encode());
        Ok(REALDASH_FRAME_LEN)
    }

    /// Decode a complete frame; `None` on a bad prefix or checksum.
    pub fn decode(bytes: &[u8; REALDASH_FRAME_LEN]) -> Option<Self> {
        if bytes[..4] != REALDASH_PREFIX || checksum(&bytes[..CHECKSUM_OFFSET]) != bytes[CHECKSUM_OFFSET] {
            return None;
        }
        let mut id = [0u8; 4];
        id.copy_from_slice(&bytes[4..8]);
        let mut data = [0u8; CAN_MAX_DLC];
        data.copy_from_slice(&bytes[8..16]);
        Some(Self::new(u32::from_le_bytes(id), data))
    }
}

//==================================================================================PARSER
/// Byte-at-a-time frame parser.
///
/// Bytes are discarded until the prefix is seen. A frame failing its checksum
/// is dropped and counted; parsing resumes at the next prefix inside the
/// dropped bytes, so a truncated frame does not swallow the one after it.
#[derive(Debug, Clone)]
pub struct RealDashParser {
    buffer: [u8; REALDASH_FRAME_LEN],
    len: usize,
    rejected: u32,
}

impl RealDashParser {
    pub const fn new() -> Self {
        Self {
            buffer: [0; REALDASH_FRAME_LEN],
            len: 0,
            rejected: 0,
        }
    }

    /// Feed one byte; returns a frame once the last byte of a valid one arrives.
    pub fn push(&mut self, byte: u8) -> Option<RealDashFrame> {
        if self.len < REALDASH_PREFIX.len() {
            if byte == REALDASH_PREFIX[self.len] {
                self.buffer[self.len] = byte;
                self.len += 1;
            } else if byte == REALDASH_PREFIX[0] {
                self.buffer[0] = byte;
                self.len = 1;
            } else {
                self.len = 0;
            }
            return None;
        }

        self.buffer[self.len] = byte;
        self.len += 1;
        if self.len < REALDASH_FRAME_LEN {
            return None;
        }

        self.len = 0;
        let frame = RealDashFrame::decode(&self.buffer);
        if frame.is_none() {
            self.rejected = self.rejected.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::debug!("RealDash frame rejected: bad checksum");
            self.resync();
        }
        frame
    }

    /// Keep the rejected bytes from the first later (possibly partial) prefix on.
    fn resync(&mut self) {
        let start = (1..REALDASH_FRAME_LEN).find(|&start| {
            let tail = &self.buffer[start..];
            let overlap = tail.len().min(REALDASH_PREFIX.len());
            tail[..overlap] == REALDASH_PREFIX[..overlap]
        });
        if let Some(start) = start {
            self.buffer.copy_within(start.., 0);
            self.len = REALDASH_FRAME_LEN - start;
        }
    }

    /// Feed a slice; returns the first complete frame and the bytes consumed.
    pub fn push_slice(&mut self, bytes: &[u8]) -> (Option<RealDashFrame>, usize) {
        for (index, byte) in bytes.iter().enumerate() {
            if let Some(frame) = self.push(*byte) {
                return (Some(frame), index + 1);
            }
        }
        (None, bytes.len())
    }

    /// Frames dropped for a bad checksum.
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// `true` while hunting for the prefix.
    pub fn is_idle(&self) -> bool {
        self.len == 0
    }

    pub fn reset(&mut self) {
        self.len = 0;
    }
}

impl Default for RealDashParser {
    fn default() -> Self {
        Self::new()
    }
}
