//! Payload codecs.
pub mod bits;
