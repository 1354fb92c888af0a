pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::Backend;
pub use config::ConsoleConfig;
pub use utils::error::{ConsoleError, Result};
