//! `canbridge` library: the message bus and protocol-adapter core of a
//! vehicle-integration module. Transport adapters (raw CAN, J1939 with dynamic
//! address claim, serial framing, inter-core pipe) exchange one tagged-union
//! [`Message`](protocol::message::Message) through a single-threaded,
//! run-to-completion [`Bus`](protocol::bus::Bus).
#![no_std]
//==================================================================================
/// Protocol constants shared by every module (addresses, PGNs, frame sizes).
pub mod core;
/// Error types for transports, identifier construction, codecs and framing.
pub mod error;
/// Bit-level helpers backing the typed event views.
pub mod infra;
/// Message model, bus, transports and protocol adapters.
pub mod protocol;
//==================================================================================
