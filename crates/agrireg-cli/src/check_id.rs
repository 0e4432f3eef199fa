//! # Check-Id Subcommand
//!
//! `agrireg check-id <value>...` classifies each taxpayer identifier and
//! prints one line per value. Exits 1 if any value is rejected.

use anyhow::Result;
use clap::Args;

use agrireg_core::{IdentifierError, TaxId};

/// Arguments for `agrireg check-id`.
#[derive(Args, Debug)]
pub struct CheckIdArgs {
    /// Identifiers to check, masked or bare.
    #[arg(required = true)]
    pub values: Vec<String>,
}

/// Execute `agrireg check-id`.
pub fn run_check_id(args: &CheckIdArgs) -> Result<u8> {
    let mut rejected = 0usize;
    for value in &args.values {
        let line = match check(value) {
            Ok(line) => line,
            Err(e) => {
                rejected += 1;
                tracing::debug!(value = %value, error = %e, "identifier rejected");
                format!("{value}: INVALID ({e})")
            }
        };
        println!("{line}");
    }
    Ok(if rejected == 0 { 0 } else { 1 })
}

/// `"<value>: <KIND> <masked>"` for a valid identifier.
fn check(value: &str) -> Result<String, IdentifierError> {
    let id = TaxId::new(value)?;
    Ok(format!("{value}: {} {}", id.kind(), id.formatted()))
}
