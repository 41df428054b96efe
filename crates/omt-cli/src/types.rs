//! # Types Subcommand
//!
//! Lists the simple type vocabulary.

use anyhow::Result;
use clap::Args;

use omt_core::SimpleType;

/// Arguments for `omt types`.
#[derive(Args, Debug)]
pub struct TypesArgs {}

/// One line per simple type: name, class name, orderability and primitive
/// form.
pub fn render_types() -> String {
    let mut out = format!(
        "{:<12} {:<24} {:<8} {}\n",
        "NAME", "CLASS", "ORDERED", "PRIMITIVE"
    );
    for kind in SimpleType::all() {
        out.push_str(&format!(
            "{:<12} {:<24} {:<8} {}\n",
            kind.as_str(),
            kind.class_name(),
            if kind.is_ordered() { "yes" } else { "no" },
            kind.primitive_name().unwrap_or("-"),
        ));
    }
    out
}

/// Execute `omt types`.
pub fn run_types(_args: &TypesArgs) -> Result<u8> {
    print!("{}", render_types());
    Ok(0)
}
