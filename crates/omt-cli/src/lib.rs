//! # omt-cli — Open Type Manifest Tooling
//!
//! Command-line front end over `omt-core` and `omt-constraint`.
//!
//! ## Subcommands
//!
//! - `check`: build every type, attribute and parameter of a manifest and
//!   report resolved constraints or the reason each definition is invalid
//! - `coerce`: parse text with a simple type's canonical parser
//! - `types`: list the simple type vocabulary
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers; handlers return an
//!   exit code and leave process setup to `main`.
//! - No validation logic here. Handlers delegate to the library crates.
//! - Logs go to stderr so `--format json` output stays machine-readable.

pub mod check;
pub mod coerce;
pub mod manifest;
pub mod types;
