//! gbdate Common Library
//!
//! Shared error handling and logging for the gbdate workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`GbDateError`] and the [`Result`] alias used by the core
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`]
//!
//! # Example
//!
//! ```no_run
//! use gbdate_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{GbDateError, Result};
