//! Skillpack command-line interface
//!
//! Library half of the `skillpack` binary. Each subcommand lives here
//! as an async function returning rendered output, so integration
//! tests drive commands directly and the binary stays a thin clap
//! dispatcher.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use skillpack_cli::commands;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let validation = commands::validate(Path::new("./typescript-tutorial"), false).await?;
//! print!("{}", validation.rendered);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod commands;

pub use commands::{
    fingerprint, lookup, search, sections, show, validate, SearchOptions, Validation,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
