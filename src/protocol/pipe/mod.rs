//! Inter-core pipe: two bounded queues joining two independently scheduled
//! buses.
//!
//! Each side is exposed as a [`PipeEnd`] node. `handle` copies a message that
//! passes the side's filter into the queue towards the other side; `emit`
//! publishes at most one message from the queue coming the other way. A full
//! queue drops the message and calls [`PipeFilter::on_buffer_overrun`]; the
//! producer never blocks. Messages queued from one side keep their order.
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::protocol::bus::{Emit, Node};
use crate::protocol::message::{Message, OwnedMessage};

mod sync_wait;

pub use sync_wait::SyncWait;

/// Default capacity of each direction.
pub const DEFAULT_PIPE_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

//==================================================================================FILTER
/// Which messages cross the pipe, and what happens when a queue is full.
///
/// Called from both sides' contexts, hence `&self`.
pub trait PipeFilter {
    /// `true` to carry a message from the left bus to the right one.
    fn filter_left(&self, message: &Message<'_>) -> bool {
        let _ = message;
        true
    }

    /// `true` to carry a message from the right bus to the left one.
    fn filter_right(&self, message: &Message<'_>) -> bool {
        let _ = message;
        true
    }

    /// `message`, handled on `side`, was dropped: the queue towards the other
    /// side is full.
    fn on_buffer_overrun(&self, side: Side, message: &Message<'_>) {
        let _ = (side, message);
        #[cfg(feature = "defmt")]
        defmt::warn!("Pipe overrun on {} side, dropping {}", side, message.kind());
    }
}

/// Carries everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassAll;

impl PipeFilter for PassAll {}

//==================================================================================PIPE
type Queue<const N: usize> = Channel<CriticalSectionRawMutex, OwnedMessage, N>;

pub struct Pipe<F = PassAll, const N: usize = DEFAULT_PIPE_DEPTH> {
    filter: F,
    left_to_right: Queue<N>,
    right_to_left: Queue<N>,
}

impl<F: PipeFilter, const N: usize> Pipe<F, N> {
    pub const fn new(filter: F) -> Self {
        Self {
            filter,
            left_to_right: Channel::new(),
            right_to_left: Channel::new(),
        }
    }

    /// Node for the left bus.
    pub fn left(&self) -> PipeEnd<'_, F, N> {
        PipeEnd {
            pipe: self,
            side: Side::Left,
        }
    }

    /// Node for the right bus.
    pub fn right(&self) -> PipeEnd<'_, F, N> {
        PipeEnd {
            pipe: self,
            side: Side::Right,
        }
    }

    /// Messages waiting to be emitted on `side`.
    pub fn pending(&self, side: Side) -> usize {
        self.inbound(side).len()
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    fn inbound(&self, side: Side) -> &Queue<N> {
        match side {
            Side::Left => &self.right_to_left,
            Side::Right => &self.left_to_right,
        }
    }

    fn accepts(&self, side: Side, message: &Message<'_>) -> bool {
        match side {
            Side::Left => self.filter.filter_left(message),
            Side::Right => self.filter.filter_right(message),
        }
    }
}

impl<const N: usize> Default for Pipe<PassAll, N> {
    fn default() -> Self {
        Self::new(PassAll)
    }
}

//==================================================================================PIPE_END
/// One side of a [`Pipe`], attached to that side's bus.
pub struct PipeEnd<'p, F, const N: usize> {
    pipe: &'p Pipe<F, N>,
    side: Side,
}

impl<F: PipeFilter, const N: usize> PipeEnd<'_, F, N> {
    pub fn side(&self) -> Side {
        self.side
    }
}

impl<F: PipeFilter, const N: usize> Node for PipeEnd<'_, F, N> {
    fn handle(&mut self, message: &Message<'_>, _emit: &mut Emit<'_>) {
        if message.is_empty() || !self.pipe.accepts(self.side, message) {
            return;
        }
        let outbound = self.pipe.inbound(self.side.other());
        if let Err(TrySendError::Full(dropped)) = outbound.try_send(message.to_owned_message()) {
            self.pipe.filter.on_buffer_overrun(self.side, &dropped);
        }
    }

    fn emit(&mut self, emit: &mut Emit<'_>) {
        if let Ok(message) = self.pipe.inbound(self.side).try_receive() {
            emit(&message);
        }
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
