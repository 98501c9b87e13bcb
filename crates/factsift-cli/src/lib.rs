//! Factsift CLI library.
//!
//! Argument parsing, configuration, embedding provider selection, JSON fact
//! input and output formatting for the `factsift` command.

pub mod cli;
pub mod commands;
pub mod config;
pub mod embedder;
pub mod error;
pub mod input;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use embedder::Embedder;
pub use error::{CliError, Result};
pub use output::Formatter;
