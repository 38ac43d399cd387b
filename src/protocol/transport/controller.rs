//! `Connection` adapter over any non-blocking `embedded-can` controller.
use crate::error::ConnectionError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::connection::Connection;

/// Wraps a HAL CAN peripheral implementing [`embedded_can::nb::Can`].
///
/// `nb::Error::WouldBlock` becomes [`ConnectionError::FifoEmpty`] on read and
/// [`ConnectionError::FifoFull`] on write.
pub struct CanController<T> {
    can: T,
}

impl<T: embedded_can::nb::Can> CanController<T> {
    pub fn new(can: T) -> Self {
        Self { can }
    }

    /// Access the wrapped peripheral (filters, bit timing, ...).
    pub fn inner(&mut self) -> &mut T {
        &mut self.can
    }

    pub fn into_inner(self) -> T {
        self.can
    }
}

impl<T: embedded_can::nb::Can> Connection for CanController<T> {
    type Frame = CanFrame;
    type Error = T::Error;

    fn read(&mut self) -> Result<CanFrame, ConnectionError<T::Error>> {
        match self.can.receive() {
            Ok(frame) => Ok(CanFrame::from_frame(&frame)),
            Err(nb::Error::WouldBlock) => Err(ConnectionError::FifoEmpty),
            Err(nb::Error::Other(error)) => Err(ConnectionError::Transport(error)),
        }
    }

    fn write(&mut self, frame: &CanFrame) -> Result<(), ConnectionError<T::Error>> {
        let frame: T::Frame = frame.to_frame().ok_or(ConnectionError::InvalidFrame)?;
        match self.can.transmit(&frame) {
            Ok(displaced) => {
                // A lower-priority frame may have been pushed out of the mailbox.
                if displaced.is_some() {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("CAN transmit displaced a pending frame");
                }
                Ok(())
            }
            Err(nb::Error::WouldBlock) => Err(ConnectionError::FifoFull),
            Err(nb::Error::Other(error)) => Err(ConnectionError::Transport(error)),
        }
    }
}
