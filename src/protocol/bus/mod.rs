//! Single-threaded, run-to-completion broadcast bus.
//!
//! # Dispatch rules
//!
//! * [`Bus::init`] calls every node's [`Node::init`] once, in registration order.
//! * [`Bus::poll`] calls every node's [`Node::emit`] once, in registration order.
//! * A message passed to the emit callback of `init`/`emit` is delivered
//!   synchronously to every *other* node's [`Node::handle`] before the callback
//!   returns, in registration order. A node never receives its own output.
//! * Messages a node emits from inside `handle` (reactions) are queued and
//!   delivered, to every node except their producer, right after the message
//!   that caused them, before the emit callback returns. Reactions to
//!   reactions join the back of the same queue.
//! * The node whose `init`/`emit` is running cannot be re-entered; reactions
//!   it must see are held and handed to it as soon as its call returns.
//! * A full queue drops the reaction and bumps [`Bus::dropped`].
//!
//! A node whose `handle`/`emit` never returns stalls the whole bus; two nodes
//! answering each other forever do the same.
use heapless::Deque;

use crate::protocol::message::{Message, OwnedMessage};
use crate::protocol::transport::READ_BUDGET;

/// Default depth of the reaction FIFO.
pub const DEFAULT_REACTION_DEPTH: usize = 16;

/// Default number of reactions held for the node whose `emit` is running.
pub const DEFAULT_HELD_DEPTH: usize = READ_BUDGET * 4;

/// Callback through which a node publishes messages.
pub type Emit<'e> = dyn for<'m, 'p> FnMut(&'m Message<'p>) + 'e;

//==================================================================================NODE
/// Unit of bus-attached behaviour. Every protocol adapter and subsystem decoder
/// implements it; all methods must return promptly.
pub trait Node {
    /// Called once at startup; may announce initial state (address claim, ...).
    fn init(&mut self, emit: &mut Emit<'_>) {
        let _ = emit;
    }

    /// Called for every message produced by another node.
    fn handle(&mut self, message: &Message<'_>, emit: &mut Emit<'_>) {
        let _ = (message, emit);
    }

    /// Called once per bus cycle; publish pending input through `emit`.
    fn emit(&mut self, emit: &mut Emit<'_>) {
        let _ = emit;
    }
}

//==================================================================================BUS
struct Reaction {
    origin: usize,
    message: OwnedMessage,
}

struct Reactions<const Q: usize, const H: usize> {
    pending: Deque<Reaction, Q>,
    held: Deque<OwnedMessage, H>,
    dropped: u32,
}

impl<const Q: usize, const H: usize> Reactions<Q, H> {
    fn push(&mut self, origin: usize, message: &Message<'_>) {
        let reaction = Reaction {
            origin,
            message: message.to_owned_message(),
        };
        if self.pending.push_back(reaction).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("Bus reaction queue full, dropping message from node {}", origin);
        }
    }

    fn hold(&mut self, message: OwnedMessage) {
        if self.held.push_back(message).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("Bus held queue full, dropping reaction");
        }
    }
}

/// Fixed set of nodes wired together at construction time.
///
/// `N` is the node count, `Q` the depth of the reaction FIFO, `H` how many
/// reactions may wait for the node whose `emit` is running.
pub struct Bus<
    'n,
    const N: usize,
    const Q: usize = DEFAULT_REACTION_DEPTH,
    const H: usize = DEFAULT_HELD_DEPTH,
> {
    nodes: [&'n mut dyn Node; N],
    reactions: Reactions<Q, H>,
}

impl<'n, const N: usize, const Q: usize, const H: usize> Bus<'n, N, Q, H> {
    pub fn new(nodes: [&'n mut dyn Node; N]) -> Self {
        Self {
            nodes,
            reactions: Reactions {
                pending: Deque::new(),
                held: Deque::new(),
                dropped: 0,
            },
        }
    }

    /// Run every node's `init` once.
    pub fn init(&mut self) {
        for origin in 0..N {
            let reactions = &mut self.reactions;
            if let Some((before, node, after)) = split_around(&mut self.nodes, origin) {
                node.init(&mut |message: &Message<'_>| {
                    deliver(before, after, origin + 1, origin, message, reactions);
                    settle(before, after, origin, reactions);
                });
            }
            self.release(origin);
        }
    }

    /// One bus cycle: every node's `emit` once, with synchronous delivery.
    pub fn poll(&mut self) {
        for origin in 0..N {
            let reactions = &mut self.reactions;
            if let Some((before, node, after)) = split_around(&mut self.nodes, origin) {
                node.emit(&mut |message: &Message<'_>| {
                    deliver(before, after, origin + 1, origin, message, reactions);
                    settle(before, after, origin, reactions);
                });
            }
            self.release(origin);
        }
    }

    /// Deliver a message produced outside the bus to every node.
    pub fn inject(&mut self, message: &Message<'_>) {
        let (nodes, reactions) = (&mut self.nodes, &mut self.reactions);
        deliver(&mut [], nodes, 0, usize::MAX, message, reactions);
        self.drain();
    }

    /// Reactions dropped because a queue was full.
    pub fn dropped(&self) -> u32 {
        self.reactions.dropped
    }

    /// Number of registered nodes.
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Hand the held reactions to `producer` now that its call returned.
    fn release(&mut self, producer: usize) {
        self.drain();
        while let Some(message) = self.reactions.held.pop_front() {
            let reactions = &mut self.reactions;
            if let Some(node) = self.nodes.get_mut(producer) {
                node.handle(&message, &mut |reply: &Message<'_>| reactions.push(producer, reply));
            }
            self.drain();
        }
    }

    /// Deliver queued reactions while no node is borrowed.
    fn drain(&mut self) {
        while let Some(Reaction { origin, message }) = self.reactions.pending.pop_front() {
            if let Some((before, _, after)) = split_around(&mut self.nodes, origin) {
                deliver(before, after, origin + 1, usize::MAX, &message, &mut self.reactions);
            }
        }
    }
}

type Split<'s, 'n> = (
    &'s mut [&'n mut dyn Node],
    &'s mut &'n mut dyn Node,
    &'s mut [&'n mut dyn Node],
);

/// Nodes before `index`, the node at `index`, nodes after it.
fn split_around<'s, 'n>(nodes: &'s mut [&'n mut dyn Node], index: usize) -> Option<Split<'s, 'n>> {
    let (before, rest) = nodes.split_at_mut(index.min(nodes.len()));
    let (node, after) = rest.split_first_mut()?;
    Some((before, node, after))
}

/// Hand `message` to every node of `before` then `after`, except the one at
/// `skip`. Indices of `after` start at `first_after`.
fn deliver<'n, const Q: usize, const H: usize>(
    before: &mut [&'n mut dyn Node],
    after: &mut [&'n mut dyn Node],
    first_after: usize,
    skip: usize,
    message: &Message<'_>,
    reactions: &mut Reactions<Q, H>,
) {
    let indexed = before.iter_mut().enumerate().chain(
        after
            .iter_mut()
            .enumerate()
            .map(|(offset, node)| (first_after + offset, node)),
    );
    for (index, node) in indexed {
        if index == skip {
            continue;
        }
        node.handle(message, &mut |reply: &Message<'_>| reactions.push(index, reply));
    }
}

/// Deliver queued reactions to every node but `producer`, which is borrowed
/// by its own call; the ones it must see are held for it.
fn settle<'n, const Q: usize, const H: usize>(
    before: &mut [&'n mut dyn Node],
    after: &mut [&'n mut dyn Node],
    producer: usize,
    reactions: &mut Reactions<Q, H>,
) {
    while let Some(Reaction { origin, message }) = reactions.pending.pop_front() {
        deliver(before, after, producer + 1, origin, &message, reactions);
        if origin != producer {
            reactions.hold(message);
        }
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
