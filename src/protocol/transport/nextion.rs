//! Nextion HMI serial framing: every command and every response ends with
//! three `0xFF` bytes. Payload semantics are left to the display node.
use core::fmt;

use heapless::{String, Vec};

use crate::error::FrameError;

/// Terminator byte, repeated [`NEXTION_TERMINATOR_LEN`] times.
pub const NEXTION_TERMINATOR: u8 = 0xFF;
pub const NEXTION_TERMINATOR_LEN: usize = 3;

/// Append the terminator to `command`.
pub fn encode_command<const N: usize>(command: &[u8]) -> Result<Vec<u8, N>, FrameError> {
    let needed = command.len() + NEXTION_TERMINATOR_LEN;
    let mut frame = Vec::new();
    frame
        .extend_from_slice(command)
        .map_err(|_| FrameError::BufferTooSmall { needed })?;
    frame
        .extend_from_slice(&[NEXTION_TERMINATOR; NEXTION_TERMINATOR_LEN])
        .map_err(|_| FrameError::BufferTooSmall { needed })?;
    Ok(frame)
}

/// Format a command (`t0.txt="21.5"`, `page 2`, ...) and terminate it.
pub fn encode_fmt<const N: usize>(args: fmt::Arguments<'_>) -> Result<Vec<u8, N>, FrameError> {
    let mut text: String<N> = String::new();
    fmt::Write::write_fmt(&mut text, args).map_err(|_| FrameError::BufferTooSmall { needed: N + 1 })?;
    encode_command(text.as_bytes())
}

/// Reassembles terminated responses from a byte stream.
///
/// A response longer than `N` is dropped whole once its terminator arrives and
/// counted in [`NextionReader::overflows`].
#[derive(Debug, Clone, Default)]
pub struct NextionReader<const N: usize> {
    buffer: Vec<u8, N>,
    pending_terminators: usize,
    overflowed: bool,
    overflows: u32,
}

impl<const N: usize> NextionReader<N> {
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            pending_terminators: 0,
            overflowed: false,
            overflows: 0,
        }
    }

    /// Feed one byte; returns the response body when its terminator completes.
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8, N>> {
        if byte == NEXTION_TERMINATOR {
            self.pending_terminators += 1;
            if self.pending_terminators < NEXTION_TERMINATOR_LEN {
                return None;
            }
            self.pending_terminators = 0;
            let response = core::mem::take(&mut self.buffer);
            if core::mem::take(&mut self.overflowed) {
                self.overflows = self.overflows.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("Nextion response exceeded {} bytes, dropped", N);
                return None;
            }
            return Some(response);
        }

        // Fewer than three 0xFF in a row are payload.
        for _ in 0..core::mem::take(&mut self.pending_terminators) {
            self.store(NEXTION_TERMINATOR);
        }
        self.store(byte);
        None
    }

    /// Responses dropped because they did not fit.
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pending_terminators = 0;
        self.overflowed = false;
    }

    fn store(&mut self, byte: u8) {
        if self.buffer.push(byte).is_err() {
            self.overflowed = true;
        }
    }
}
