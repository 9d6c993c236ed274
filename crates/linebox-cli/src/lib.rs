#![forbid(unsafe_code)]

//! Command-line front end for linebox.
//!
//! Reads logical lines from a file or stdin, renders them into the requested
//! rectangle, and writes the bytes to stdout. Clickable regions produced by
//! internal hyperlinks can be dumped as JSON with `--regions`.

pub mod cli;
pub mod error;
pub mod logging;
pub mod regions;

pub use cli::{Cli, run, run_from_env};
pub use error::{CliError, Result};
