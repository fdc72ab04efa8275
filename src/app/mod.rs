//! Application layer: argument and config resolution, process startup and
//! the orchestration of one simulator run

pub mod cli;
pub mod error;
pub mod settings;
pub mod simulation;
pub mod startup;

pub use error::{AppError, AppResult};
