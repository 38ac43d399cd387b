extern crate std;

use super::*;
use crate::protocol::message::{CanFrame, Event};
use core::cell::Cell;
use std::vec::Vec;

fn drain<F: PipeFilter, const N: usize>(end: &mut PipeEnd<'_, F, N>) -> Vec<OwnedMessage> {
    let mut out = Vec::new();
    loop {
        let before = out.len();
        end.emit(&mut |message: &Message<'_>| out.push(message.to_owned_message()));
        if out.len() == before {
            return out;
        }
    }
}

fn send<F: PipeFilter, const N: usize>(end: &mut PipeEnd<'_, F, N>, message: Message<'_>) {
    end.handle(&message, &mut |_: &Message<'_>| {});
}

#[test]
/// Views are copied in; FIFO order is kept; `emit` yields one per call.
fn test_messages_cross_in_order() {
    let pipe: Pipe = Pipe::default();
    let (mut left, mut right) = (pipe.left(), pipe.right());

    let first = Event::new(1, 1);
    send(&mut left, Message::event_view(&first));
    send(&mut left, Message::event(Event::new(1, 2)));
    assert_eq!(pipe.pending(Side::Right), 2);

    let mut once = Vec::new();
    right.emit(&mut |message: &Message<'_>| once.push(message.to_owned_message()));
    assert_eq!(once, std::vec![Message::event(first)]);
    assert_eq!(drain(&mut right), std::vec![Message::event(Event::new(1, 2))]);
    assert!(drain(&mut left).is_empty());
}

#[test]
fn test_empty_messages_are_not_carried() {
    let pipe: Pipe = Pipe::default();
    send(&mut pipe.right(), Message::Empty);
    assert_eq!(pipe.pending(Side::Left), 0);
}

struct EventsOnly {
    overruns: Cell<usize>,
    last_side: Cell<Option<Side>>,
}

impl PipeFilter for EventsOnly {
    fn filter_left(&self, message: &Message<'_>) -> bool {
        message.as_event().is_some()
    }

    fn filter_right(&self, message: &Message<'_>) -> bool {
        message.as_can_frame().is_some()
    }

    fn on_buffer_overrun(&self, side: Side, _message: &Message<'_>) {
        self.overruns.set(self.overruns.get() + 1);
        self.last_side.set(Some(side));
    }
}

#[test]
fn test_filters_are_per_side() {
    let pipe: Pipe<EventsOnly, 4> = Pipe::new(EventsOnly {
        overruns: Cell::new(0),
        last_side: Cell::new(None),
    });
    let (mut left, mut right) = (pipe.left(), pipe.right());
    let frame = CanFrame::standard(0x10, &[1]);

    send(&mut left, Message::can_frame(frame));
    send(&mut left, Message::event(Event::new(2, 2)));
    send(&mut right, Message::event(Event::new(3, 3)));
    send(&mut right, Message::can_frame(frame));

    assert_eq!(drain(&mut right), std::vec![Message::event(Event::new(2, 2))]);
    assert_eq!(drain(&mut left), std::vec![Message::can_frame(frame)]);
}

#[test]
/// A full queue drops the newcomer, fires the hook once per drop and leaves
/// the queued messages untouched.
fn test_overrun_hook_fires_once_per_drop() {
    let pipe: Pipe<EventsOnly, 2> = Pipe::new(EventsOnly {
        overruns: Cell::new(0),
        last_side: Cell::new(None),
    });
    let mut left = pipe.left();
    for id in 0..5 {
        send(&mut left, Message::event(Event::new(1, id)));
    }
    assert_eq!(pipe.filter().overruns.get(), 3);
    assert_eq!(pipe.filter().last_side.get(), Some(Side::Left));
    assert_eq!(
        drain(&mut pipe.right()),
        std::vec![Message::event(Event::new(1, 0)), Message::event(Event::new(1, 1))]
    );
}

#[test]
fn test_sync_wait_last_arrival_does_not_block() {
    let barrier = SyncWait::new(1);
    assert!(!barrier.is_released());
    barrier.wait();
    assert!(barrier.is_released());
}
