pub mod analysis;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod ntuple;
pub mod plot;

pub use error::{RadiusError, RadiusResult};
