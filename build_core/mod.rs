//! Workspace for the build script: manifest model and the event view generator.
pub mod conf;
pub mod domain;
pub mod errors;
pub mod gen_events;
pub mod name_helpers;
