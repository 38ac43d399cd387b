//! Bus node speaking RealDash framing over a byte stream.
use super::{RealDashFrame, RealDashParser, REALDASH_EVENT_FRAME_ID, REALDASH_FRAME_LEN};
use crate::error::ConnectionError;
use crate::protocol::bus::{Emit, Node};
use crate::protocol::message::Message;
use crate::protocol::transport::traits::connection::{Connection, LogErrors, TransportHooks};
use crate::protocol::transport::READ_BUDGET;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RealDashConfig {
    /// Frame id carrying events in both directions.
    pub event_frame_id: u32,
    /// Also bridge raw CAN frames (any other frame id).
    pub forward_can: bool,
}

impl Default for RealDashConfig {
    fn default() -> Self {
        Self {
            event_frame_id: REALDASH_EVENT_FRAME_ID,
            forward_can: false,
        }
    }
}

/// Bridges events (and optionally CAN frames) to a RealDash peer.
pub struct RealDashNode<C, H = LogErrors>
where
    C: Connection<Frame = u8>,
    H: TransportHooks<u8, C::Error>,
{
    connection: C,
    hooks: H,
    config: RealDashConfig,
    parser: RealDashParser,
}

impl<C> RealDashNode<C, LogErrors>
where
    C: Connection<Frame = u8>,
{
    pub fn new(connection: C, config: RealDashConfig) -> Self {
        Self::with_hooks(connection, config, LogErrors)
    }
}

impl<C, H> RealDashNode<C, H>
where
    C: Connection<Frame = u8>,
    H: TransportHooks<u8, C::Error>,
{
    pub fn with_hooks(connection: C, config: RealDashConfig, hooks: H) -> Self {
        Self {
            connection,
            hooks,
            config,
            parser: RealDashParser::new(),
        }
    }

    pub fn connection(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Frames rejected by the parser so far.
    pub fn rejected(&self) -> u32 {
        self.parser.rejected()
    }

    fn send(&mut self, frame: &RealDashFrame) {
        for byte in frame.encode() {
            if let Err(error) = self.connection.write(&byte) {
                self.hooks.on_write_error(&error, &byte);
                return;
            }
        }
    }

    fn publish(&self, frame: &RealDashFrame, emit: &mut Emit<'_>) {
        if frame.id == self.config.event_frame_id {
            emit(&Message::event(frame.to_event()));
        } else if self.config.forward_can {
            emit(&Message::can_frame(frame.to_can()));
        }
    }
}

impl<C, H> Node for RealDashNode<C, H>
where
    C: Connection<Frame = u8>,
    H: TransportHooks<u8, C::Error>,
{
    fn handle(&mut self, message: &Message<'_>, _emit: &mut Emit<'_>) {
        match message {
            Message::Event(event) => {
                let frame = RealDashFrame::from_event(self.config.event_frame_id, event);
                self.send(&frame);
            }
            Message::CanFrame(frame) if self.config.forward_can => {
                self.send(&RealDashFrame::from_can(frame));
            }
            _ => {}
        }
    }

    fn emit(&mut self, emit: &mut Emit<'_>) {
        for _ in 0..READ_BUDGET * REALDASH_FRAME_LEN {
            match self.connection.read() {
                Ok(byte) => {
                    if let Some(frame) = self.parser.push(byte) {
                        self.publish(&frame, emit);
                    }
                }
                Err(ConnectionError::FifoEmpty) => break,
                Err(error) => {
                    self.hooks.on_read_error(&error);
                    break;
                }
            }
        }
    }
}
