pub mod config;
pub mod error;
pub mod presentation;
pub mod simulation;

pub use config::*;
pub use error::*;
pub use simulation::*;
