//! Bus, message model and the protocol adapters that attach to it:
//! raw CAN, J1939 (address claim + event transport), inter-core pipe,
//! serial framing and periodic heartbeats.
pub mod bus;
pub mod can;
pub mod events;
pub mod heartbeat;
pub mod j1939;
pub mod message;
pub mod pipe;
pub mod transport;
