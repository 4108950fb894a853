//! Coldcut command-line front end.
//!
//! Parses arguments, initializes logging, loads settings and credentials,
//! builds the store clients and runs the migration pipeline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cli;
mod run;
mod stores;
mod telemetry;

pub use cli::Cli;
pub use run::run;
pub use stores::{Stores, build_stores};
pub use telemetry::init_telemetry;
