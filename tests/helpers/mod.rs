/// Test doubles: an in-memory connection, a recording node and a manual clock.
use canbridge::error::ConnectionError;
use canbridge::protocol::bus::{Emit, Node};
use canbridge::protocol::message::{Message, OwnedMessage};
use canbridge::protocol::transport::traits::{clock::Clock, connection::Connection};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Both directions of a simulated link.
#[allow(dead_code)]
pub struct Wire<F> {
    /// Frames the device will read.
    pub rx: VecDeque<F>,
    /// Frames the device wrote.
    pub tx: Vec<F>,
    /// Reject every write with `FifoFull`.
    pub jammed: bool,
}

/// Connection handed to a node; the test keeps a clone to drive the far end.
#[allow(dead_code)]
pub struct MockConnection<F> {
    wire: Rc<RefCell<Wire<F>>>,
}

impl<F> Clone for MockConnection<F> {
    fn clone(&self) -> Self {
        Self {
            wire: Rc::clone(&self.wire),
        }
    }
}

#[allow(dead_code)]
impl<F: Clone> MockConnection<F> {
    pub fn new() -> Self {
        Self {
            wire: Rc::new(RefCell::new(Wire {
                rx: VecDeque::new(),
                tx: Vec::new(),
                jammed: false,
            })),
        }
    }

    /// Queue a frame for the device to read.
    pub fn feed(&self, frame: F) {
        self.wire.borrow_mut().rx.push_back(frame);
    }

    pub fn feed_all(&self, frames: impl IntoIterator<Item = F>) {
        self.wire.borrow_mut().rx.extend(frames);
    }

    /// Take everything written so far.
    pub fn take_written(&self) -> Vec<F> {
        std::mem::take(&mut self.wire.borrow_mut().tx)
    }

    pub fn pending(&self) -> usize {
        self.wire.borrow().rx.len()
    }

    pub fn jam(&self, jammed: bool) {
        self.wire.borrow_mut().jammed = jammed;
    }
}

impl<F: Clone> Connection for MockConnection<F> {
    type Frame = F;
    type Error = ();

    fn read(&mut self) -> Result<F, ConnectionError<()>> {
        self.wire
            .borrow_mut()
            .rx
            .pop_front()
            .ok_or(ConnectionError::FifoEmpty)
    }

    fn write(&mut self, frame: &F) -> Result<(), ConnectionError<()>> {
        let mut wire = self.wire.borrow_mut();
        if wire.jammed {
            return Err(ConnectionError::FifoFull);
        }
        wire.tx.push(frame.clone());
        Ok(())
    }
}

/// Node recording everything it is handed and publishing a scripted outbox on
/// each `emit`.
#[allow(dead_code)]
pub struct Recorder {
    seen: Rc<RefCell<Vec<OwnedMessage>>>,
    outbox: Rc<RefCell<VecDeque<OwnedMessage>>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn new() -> Self {
        Self {
            seen: Rc::new(RefCell::new(Vec::new())),
            outbox: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Handle sharing this recorder's buffers, for use while the bus owns it.
    pub fn tap(&self) -> RecorderTap {
        RecorderTap {
            seen: Rc::clone(&self.seen),
            outbox: Rc::clone(&self.outbox),
        }
    }
}

impl Node for Recorder {
    fn handle(&mut self, message: &Message<'_>, _emit: &mut Emit<'_>) {
        self.seen.borrow_mut().push(message.to_owned_message());
    }

    fn emit(&mut self, emit: &mut Emit<'_>) {
        let pending: Vec<OwnedMessage> = self.outbox.borrow_mut().drain(..).collect();
        for message in &pending {
            emit(message);
        }
    }
}

#[derive(Clone)]
#[allow(dead_code)]
pub struct RecorderTap {
    seen: Rc<RefCell<Vec<OwnedMessage>>>,
    outbox: Rc<RefCell<VecDeque<OwnedMessage>>>,
}

#[allow(dead_code)]
impl RecorderTap {
    /// Publish `message` on the next bus cycle.
    pub fn send(&self, message: OwnedMessage) {
        self.outbox.borrow_mut().push_back(message);
    }

    /// Everything handled so far, clearing the record.
    pub fn take(&self) -> Vec<OwnedMessage> {
        std::mem::take(&mut self.seen.borrow_mut())
    }

    pub fn seen(&self) -> Vec<OwnedMessage> {
        self.seen.borrow().clone()
    }
}

/// Clock advanced by hand.
#[derive(Default)]
#[allow(dead_code)]
pub struct MockClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(now_ms: u64) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
