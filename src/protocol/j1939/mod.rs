//! SAE J1939 over CAN: NAME handling, address-claim frames, the claiming
//! gateway node and the generic event adapter node.
//!
//! The gateway owns addressing, the adapter owns event encoding. They only
//! talk through [`J1939Claim`](crate::protocol::message::J1939Claim) messages
//! on the bus, so either can be swapped or duplicated independently.
pub mod address_claim;
pub mod event_adapter;
pub mod gateway;
pub mod iso_name;

pub use event_adapter::{EventAdapterConfig, EventRouting, ForwardAll, J1939EventAdapter};
pub use gateway::{ClaimState, GatewayConfig, J1939Gateway};
pub use iso_name::IsoName;
