//! Transport layer: frame representations, the 29-bit J1939 identifier,
//! the `Connection` contract consumed by every adapter, and the serial
//! framings (RealDash, Nextion) reused by the peripheral nodes.
pub mod can_frame;
pub mod can_id;
pub mod controller;
pub mod nextion;
pub mod realdash;
pub mod traits;

/// Frames read from a connection in one bus cycle before yielding to the
/// next node.
pub const READ_BUDGET: usize = 16;
