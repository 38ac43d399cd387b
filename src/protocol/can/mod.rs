//! Raw CAN gateway: bridges a CAN controller connection to the bus.
//!
//! Inbound frames are published as [`Message::CanFrame`]; outbound CAN frames
//! seen on the bus are written to the controller. Both directions go through a
//! [`CanPolicy`] that decides which identifiers cross and receives transport
//! errors.
use core::fmt::Debug;

use crate::error::ConnectionError;
use crate::protocol::bus::{Emit, Node};
use crate::protocol::message::{CanFrame, Message};
use crate::protocol::transport::traits::connection::{Connection, LogErrors, TransportHooks};
use crate::protocol::transport::READ_BUDGET;

//==================================================================================POLICY
/// Per-node filtering and error handling.
pub trait CanPolicy<E: Debug>: TransportHooks<CanFrame, E> {
    /// `true` to publish an inbound frame on the bus.
    fn read_filter(&mut self, frame: &CanFrame) -> bool {
        let _ = frame;
        true
    }

    /// `true` to write a bus frame to the controller.
    fn write_filter(&mut self, frame: &CanFrame) -> bool {
        let _ = frame;
        true
    }
}

impl<E: Debug> CanPolicy<E> for LogErrors {}

/// Allow-lists of identifiers; `None` lets everything through.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIdFilter<'a> {
    pub read: Option<&'a [u32]>,
    pub write: Option<&'a [u32]>,
}

impl<'a> StaticIdFilter<'a> {
    pub const fn allow_all() -> Self {
        Self {
            read: None,
            write: None,
        }
    }

    /// Only publish frames whose id is in `ids`.
    pub const fn reading(mut self, ids: &'a [u32]) -> Self {
        self.read = Some(ids);
        self
    }

    /// Only write frames whose id is in `ids`.
    pub const fn writing(mut self, ids: &'a [u32]) -> Self {
        self.write = Some(ids);
        self
    }

    fn allows(list: Option<&[u32]>, id: u32) -> bool {
        match list {
            Some(ids) => ids.contains(&id),
            None => true,
        }
    }
}

impl<F, E: Debug> TransportHooks<F, E> for StaticIdFilter<'_> {}

impl<E: Debug> CanPolicy<E> for StaticIdFilter<'_> {
    fn read_filter(&mut self, frame: &CanFrame) -> bool {
        Self::allows(self.read, frame.id)
    }

    fn write_filter(&mut self, frame: &CanFrame) -> bool {
        Self::allows(self.write, frame.id)
    }
}

//==================================================================================NODE
pub struct CanNode<C, P = LogErrors>
where
    C: Connection<Frame = CanFrame>,
    P: CanPolicy<C::Error>,
{
    connection: C,
    policy: P,
}

impl<C> CanNode<C, LogErrors>
where
    C: Connection<Frame = CanFrame>,
{
    /// Node forwarding every frame in both directions.
    pub fn new(connection: C) -> Self {
        Self::with_policy(connection, LogErrors)
    }
}

impl<C, P> CanNode<C, P>
where
    C: Connection<Frame = CanFrame>,
    P: CanPolicy<C::Error>,
{
    pub fn with_policy(connection: C, policy: P) -> Self {
        Self { connection, policy }
    }

    pub fn connection(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<C, P> Node for CanNode<C, P>
where
    C: Connection<Frame = CanFrame>,
    P: CanPolicy<C::Error>,
{
    fn handle(&mut self, message: &Message<'_>, _emit: &mut Emit<'_>) {
        let Some(frame) = message.as_can_frame() else {
            return;
        };
        if !self.policy.write_filter(frame) {
            return;
        }
        if let Err(error) = self.connection.write(frame) {
            self.policy.on_write_error(&error, frame);
        }
    }

    fn emit(&mut self, emit: &mut Emit<'_>) {
        for _ in 0..READ_BUDGET {
            match self.connection.read() {
                Ok(frame) => {
                    if self.policy.read_filter(&frame) {
                        emit(&Message::can_frame_view(&frame));
                    }
                }
                Err(ConnectionError::FifoEmpty) => break,
                Err(error) => {
                    self.policy.on_read_error(&error);
                    break;
                }
            }
        }
    }
}
