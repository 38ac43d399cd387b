//! The one message type exchanged on the bus.
//!
//! [`Message`] is a tagged union over the four payload kinds. Each payload is
//! held either by value (the message owns a copy and may outlive the producer,
//! required to cross a pipe queue) or as a view borrowing a payload that lives
//! for the current dispatch cycle (zero-copy broadcast within one loop).
use core::ops::Deref;

mod event;
mod j1939;

pub use crate::protocol::transport::can_frame::CanFrame;
pub use event::Event;
pub use j1939::{J1939Claim, J1939Message};

//==================================================================================PAYLOAD
/// Owned or borrowed payload.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a, T> {
    /// Deep copy owned by the message.
    Value(T),
    /// Borrowed from the producer; valid for the current dispatch only.
    View(&'a T),
}

impl<T> Deref for Payload<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        match self {
            Payload::Value(value) => value,
            Payload::View(view) => view,
        }
    }
}

impl<T: PartialEq> PartialEq for Payload<'_, T> {
    /// Content equality, regardless of ownership.
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq> Eq for Payload<'_, T> {}

impl<T: Copy> Payload<'_, T> {
    /// Copy the payload out.
    #[inline]
    pub fn get(&self) -> T {
        **self
    }

    /// `true` for the view variant.
    #[inline]
    pub fn is_view(&self) -> bool {
        matches!(self, Payload::View(_))
    }
}

#[cfg(feature = "defmt")]
impl<T: defmt::Format> defmt::Format for Payload<'_, T> {
    fn format(&self, fmt: defmt::Formatter) {
        (**self).format(fmt)
    }
}

//==================================================================================MESSAGE
/// Discriminant of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    Empty,
    Event,
    CanFrame,
    J1939Claim,
    J1939Message,
}

/// Tagged union carried by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message<'a> {
    #[default]
    Empty,
    Event(Payload<'a, Event>),
    CanFrame(Payload<'a, CanFrame>),
    J1939Claim(Payload<'a, J1939Claim>),
    J1939Message(Payload<'a, J1939Message>),
}

/// A message that owns its payload.
pub type OwnedMessage = Message<'static>;

impl<'a> Message<'a> {
    #[inline]
    pub fn event(event: Event) -> Self {
        Message::Event(Payload::Value(event))
    }

    #[inline]
    pub fn event_view(event: &'a Event) -> Self {
        Message::Event(Payload::View(event))
    }

    #[inline]
    pub fn can_frame(frame: CanFrame) -> Self {
        Message::CanFrame(Payload::Value(frame))
    }

    #[inline]
    pub fn can_frame_view(frame: &'a CanFrame) -> Self {
        Message::CanFrame(Payload::View(frame))
    }

    #[inline]
    pub fn j1939_claim(claim: J1939Claim) -> Self {
        Message::J1939Claim(Payload::Value(claim))
    }

    #[inline]
    pub fn j1939_claim_view(claim: &'a J1939Claim) -> Self {
        Message::J1939Claim(Payload::View(claim))
    }

    #[inline]
    pub fn j1939_message(message: J1939Message) -> Self {
        Message::J1939Message(Payload::Value(message))
    }

    #[inline]
    pub fn j1939_message_view(message: &'a J1939Message) -> Self {
        Message::J1939Message(Payload::View(message))
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Empty => MessageKind::Empty,
            Message::Event(_) => MessageKind::Event,
            Message::CanFrame(_) => MessageKind::CanFrame,
            Message::J1939Claim(_) => MessageKind::J1939Claim,
            Message::J1939Message(_) => MessageKind::J1939Message,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Message::Empty)
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            Message::Event(event) => Some(&**event),
            _ => None,
        }
    }

    pub fn as_can_frame(&self) -> Option<&CanFrame> {
        match self {
            Message::CanFrame(frame) => Some(&**frame),
            _ => None,
        }
    }

    pub fn as_j1939_claim(&self) -> Option<&J1939Claim> {
        match self {
            Message::J1939Claim(claim) => Some(&**claim),
            _ => None,
        }
    }

    pub fn as_j1939_message(&self) -> Option<&J1939Message> {
        match self {
            Message::J1939Message(message) => Some(&**message),
            _ => None,
        }
    }

    /// Deep copy into a message owning its payload.
    pub fn to_owned_message(&self) -> OwnedMessage {
        match self {
            Message::Empty => Message::Empty,
            Message::Event(event) => Message::event(event.get()),
            Message::CanFrame(frame) => Message::can_frame(frame.get()),
            Message::J1939Claim(claim) => Message::j1939_claim(claim.get()),
            Message::J1939Message(message) => Message::j1939_message(message.get()),
        }
    }
}

impl From<Event> for Message<'_> {
    fn from(event: Event) -> Self {
        Message::event(event)
    }
}

impl From<CanFrame> for Message<'_> {
    fn from(frame: CanFrame) -> Self {
        Message::can_frame(frame)
    }
}

impl From<J1939Claim> for Message<'_> {
    fn from(claim: J1939Claim) -> Self {
        Message::j1939_claim(claim)
    }
}

impl From<J1939Message> for Message<'_> {
    fn from(message: J1939Message) -> Self {
        Message::j1939_message(message)
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
