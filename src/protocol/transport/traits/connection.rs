//! Minimal abstraction for a non-blocking frame transport. Allows the adapters
//! to plug into any driver (CAN controller, UART, BLE serial, test double).
use crate::error::ConnectionError;
use core::fmt::Debug;

/// Contract to send and receive frames without blocking.
///
/// `read` reports [`ConnectionError::FifoEmpty`] when nothing is pending and
/// `write` reports [`ConnectionError::FifoFull`] when the transmit side is
/// saturated; both are expected conditions, not faults.
pub trait Connection {
    type Frame;
    type Error: Debug;

    /// Take the next pending frame.
    fn read(&mut self) -> Result<Self::Frame, ConnectionError<Self::Error>>;

    /// Queue `frame` for transmission.
    fn write(&mut self, frame: &Self::Frame) -> Result<(), ConnectionError<Self::Error>>;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    type Frame = C::Frame;
    type Error = C::Error;

    fn read(&mut self) -> Result<Self::Frame, ConnectionError<Self::Error>> {
        (**self).read()
    }

    fn write(&mut self, frame: &Self::Frame) -> Result<(), ConnectionError<Self::Error>> {
        (**self).write(frame)
    }
}

/// Error reporting seam of an adapter. Errors never propagate past it: the
/// frame is dropped and the adapter keeps running.
pub trait TransportHooks<F, E: Debug> {
    /// A read failed with anything but `FifoEmpty`.
    fn on_read_error(&mut self, error: &ConnectionError<E>) {
        let _ = error;
        #[cfg(feature = "defmt")]
        defmt::warn!("Connection read error: {}", defmt::Debug2Format(error));
    }

    /// A write failed; `frame` has been dropped.
    fn on_write_error(&mut self, error: &ConnectionError<E>, frame: &F) {
        let _ = (error, frame);
        #[cfg(feature = "defmt")]
        defmt::warn!("Connection write error: {}", defmt::Debug2Format(error));
    }
}

/// Hooks that only log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrors;

impl<F, E: Debug> TransportHooks<F, E> for LogErrors {}
