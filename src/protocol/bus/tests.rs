//! Dispatch order, self-exclusion and reaction handling.
extern crate std;

use super::*;
use crate::protocol::message::Event;
use std::cell::RefCell;
use std::vec::Vec;

type Log = RefCell<Vec<(u8, Event)>>;

/// Records what it sees; emits its scripted events on `emit`, answers a
/// matching event with `reply` from inside `handle`.
struct Actor<'l> {
    tag: u8,
    log: &'l Log,
    on_init: Option<Event>,
    script: Vec<Event>,
    reply: Option<(Event, Event)>,
}

impl<'l> Actor<'l> {
    fn new(tag: u8, log: &'l Log) -> Self {
        Self {
            tag,
            log,
            on_init: None,
            script: Vec::new(),
            reply: None,
        }
    }
}

impl Node for Actor<'_> {
    fn init(&mut self, emit: &mut Emit<'_>) {
        if let Some(event) = self.on_init {
            emit(&Message::event(event));
        }
    }

    fn handle(&mut self, message: &Message<'_>, emit: &mut Emit<'_>) {
        if let Some(event) = message.as_event() {
            self.log.borrow_mut().push((self.tag, *event));
            if let Some((trigger, answer)) = self.reply {
                if *event == trigger {
                    emit(&Message::event(answer));
                }
            }
        }
    }

    fn emit(&mut self, emit: &mut Emit<'_>) {
        for event in self.script.drain(..) {
            emit(&Message::event_view(&event));
        }
    }
}

fn ev(id: u8) -> Event {
    Event::new(0x01, id)
}

#[test]
/// Every other node sees each message exactly once, in emission order; the
/// producer never sees its own output.
fn test_broadcast_order_and_self_exclusion() {
    let log = Log::default();
    let mut a = Actor::new(b'a', &log);
    let mut b = Actor::new(b'b', &log);
    let mut c = Actor::new(b'c', &log);
    b.script = std::vec![ev(1), ev(2)];

    let mut bus: Bus<'_, 3> = Bus::new([&mut a, &mut b, &mut c]);
    bus.poll();
    drop(bus);

    assert_eq!(
        *log.borrow(),
        std::vec![(b'a', ev(1)), (b'c', ev(1)), (b'a', ev(2)), (b'c', ev(2))]
    );
}

#[test]
/// Messages from the first node reach nodes whose `emit` has not run yet, and
/// a later node's output reaches earlier ones in the same cycle.
fn test_registration_order_across_nodes() {
    let log = Log::default();
    let mut a = Actor::new(b'a', &log);
    let mut b = Actor::new(b'b', &log);
    a.script = std::vec![ev(1)];
    b.script = std::vec![ev(2)];

    let mut bus: Bus<'_, 2> = Bus::new([&mut a, &mut b]);
    bus.poll();
    drop(bus);

    assert_eq!(*log.borrow(), std::vec![(b'b', ev(1)), (b'a', ev(2))]);
}

#[test]
fn test_init_emissions_skip_the_producer() {
    let log = Log::default();
    let mut a = Actor::new(b'a', &log);
    let mut b = Actor::new(b'b', &log);
    a.on_init = Some(ev(9));

    let mut bus: Bus<'_, 2> = Bus::new([&mut a, &mut b]);
    bus.init();
    drop(bus);

    assert_eq!(*log.borrow(), std::vec![(b'b', ev(9))]);
}

#[test]
/// A reaction reaches the other nodes right after its cause; the node whose
/// `emit` triggered it gets it once that call returns, before the next node runs.
fn test_reactions_follow_their_cause() {
    let log = Log::default();
    let mut a = Actor::new(b'a', &log);
    let mut b = Actor::new(b'b', &log);
    let mut c = Actor::new(b'c', &log);
    a.script = std::vec![ev(1)];
    b.reply = Some((ev(1), ev(10)));
    c.script = std::vec![ev(3)];

    let mut bus: Bus<'_, 3> = Bus::new([&mut a, &mut b, &mut c]);
    bus.poll();
    drop(bus);

    assert_eq!(
        *log.borrow(),
        std::vec![
            (b'b', ev(1)),
            (b'c', ev(1)),
            (b'c', ev(10)),
            (b'a', ev(10)),
            (b'a', ev(3)),
            (b'b', ev(3)),
        ]
    );
}

#[test]
/// Overflowing the reactions held for a busy producer drops the excess and
/// counts it.
fn test_held_overflow_is_counted() {
    let log = Log::default();
    let mut a = Actor::new(b'a', &log);
    let mut b = Actor::new(b'b', &log);
    a.script = std::vec![ev(1), ev(1), ev(1)];
    b.reply = Some((ev(1), ev(2)));

    let mut bus: Bus<'_, 2, 2, 2> = Bus::new([&mut a, &mut b]);
    bus.poll();
    assert_eq!(bus.dropped(), 1);
    drop(bus);

    let replies = log.borrow().iter().filter(|(tag, e)| *tag == b'a' && *e == ev(2)).count();
    assert_eq!(replies, 2);
}

#[test]
/// A burst read in one `emit` with several reacting nodes loses nothing.
fn test_reactions_to_a_burst_are_not_dropped() {
    let log = Log::default();
    let mut reader = Actor::new(b'r', &log);
    let mut first = Actor::new(b'f', &log);
    let mut second = Actor::new(b's', &log);
    let mut sink = Actor::new(b'k', &log);
    reader.script = std::vec![ev(1); 32];
    first.reply = Some((ev(1), ev(20)));
    second.reply = Some((ev(1), ev(30)));

    let mut bus: Bus<'_, 4> = Bus::new([&mut reader, &mut first, &mut second, &mut sink]);
    bus.poll();
    assert_eq!(bus.dropped(), 0);
    drop(bus);

    let seen = |tag: u8, id: u8| log.borrow().iter().filter(|(t, e)| *t == tag && *e == ev(id)).count();
    assert_eq!(seen(b'k', 20), 32);
    assert_eq!(seen(b'k', 30), 32);
    assert_eq!(seen(b'f', 30), 32);
    assert_eq!(seen(b's', 20), 32);
    assert_eq!(seen(b'r', 20) + seen(b'r', 30), 64);
}

#[test]
fn test_inject_reaches_every_node() {
    let log = Log::default();
    let mut a = Actor::new(b'a', &log);
    let mut b = Actor::new(b'b', &log);
    b.reply = Some((ev(5), ev(6)));

    let mut bus: Bus<'_, 2> = Bus::new([&mut a, &mut b]);
    bus.inject(&Message::event(ev(5)));
    drop(bus);

    assert_eq!(
        *log.borrow(),
        std::vec![(b'a', ev(5)), (b'b', ev(5)), (b'a', ev(6))]
    );
}
