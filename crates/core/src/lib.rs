// Reelforge Core - Domain Logic, Ports & Pipeline
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
