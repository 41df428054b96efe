//! # Coerce Subcommand
//!
//! Parses text with a simple type's canonical parser and prints the
//! canonical rendering of the resulting value.

use anyhow::{anyhow, Result};
use clap::Args;

use omt_core::{OpenValue, SimpleType};

/// Arguments for `omt coerce`.
#[derive(Args, Debug)]
pub struct CoerceArgs {
    /// Simple type, by name (`integer`) or class name (`java.lang.Integer`).
    #[arg(long = "type", value_name = "SIMPLE_TYPE")]
    pub simple_type: String,

    /// Text to coerce.
    pub text: String,
}

/// Coerce `text` to the named simple type.
pub fn coerce_text(simple_type: &str, text: &str) -> Result<OpenValue> {
    let kind: SimpleType = simple_type
        .parse()
        .map_err(|_| anyhow!("unknown simple type '{simple_type}' (see `omt types`)"))?;
    Ok(kind.parse(text)?)
}

/// Execute `omt coerce`. Returns the process exit code.
pub fn run_coerce(args: &CoerceArgs) -> Result<u8> {
    let value = coerce_text(&args.simple_type, &args.text)?;
    tracing::debug!(kind = %value.kind_label(), "coerced");
    println!("{value}");
    Ok(0)
}
