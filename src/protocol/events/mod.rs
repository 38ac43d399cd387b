//! Subsystem identifiers and typed event views.
//!
//! `generated_events.rs` is produced at build time from the event manifest.
//! Each view wraps an [`Event`] and exposes its payload bit fields through
//! getters and setters; a setter returns `true` only when the stored bits
//! changed, which lets callers skip redundant emissions.
//!
//! ```
//! use canbridge::protocol::events::IpdmState;
//!
//! let mut state = IpdmState::new();
//! assert!(state.set_fog_lamps(true));
//! assert!(!state.set_fog_lamps(true));
//! assert_eq!(state.event().data[0], 0b0000_1000);
//! ```
include!(concat!(env!("OUT_DIR"), "/generated_events.rs"));
use crate::{
    error::EventDecodeError,
    infra::codec::bits::{read_field, write_field},
    protocol::message::Event,
};
