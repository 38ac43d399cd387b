//! Infrastructure shared by protocol modules.
pub mod codec;
