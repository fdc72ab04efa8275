//! Simulation integration test modules

pub mod binaries;
pub mod streaming;
