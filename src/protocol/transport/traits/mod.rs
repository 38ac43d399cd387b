//! Abstraction traits used by the transport layer (connection, error hooks, clock).
pub mod clock;
pub mod connection;
