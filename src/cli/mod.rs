//! # CLI Module
//!
//! Command-line access to route manifests.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print the route table a manifest produces, in dispatch order:
//!
//! ```bash
//! chainrouter routes --manifest routes.yaml
//! chainrouter routes --manifest routes.yaml --format json
//! ```
//!
//! ### `match`
//!
//! Dispatch one request and print the resulting context as JSON. Every
//! route answers with the echo handler:
//!
//! ```bash
//! chainrouter match --manifest routes.yaml GET /api/users/42
//! chainrouter match --manifest routes.yaml --prefix /v2 GET /v2/users/42
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use chainrouter::cli::{execute, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! execute(&cli, &mut std::io::stdout())?;
//! ```
//!
//! Logging goes to stderr and is configured with `CHAINROUTER_LOG_*`
//! variables (see [`crate::otel`]).

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands, OutputFormat};
