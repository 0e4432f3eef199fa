//! # agrireg-cli — CLI Tool for the Farm Registry
//!
//! Provides the `agrireg` command-line interface over the registry crates.
//!
//! ## Subcommands
//!
//! - `agrireg check-id` — Classify taxpayer identifiers.
//! - `agrireg load` — Validate and commit a YAML fixture.
//! - `agrireg report` — Print the dashboard report for a fixture as JSON.
//! - `agrireg seed` — Generate a deterministic sample fixture.
//! - `agrireg delete` — Delete one record from a fixture and show the cascade.
//!
//! ```bash
//! agrireg seed --producers 20 -o farm.yaml
//! agrireg load farm.yaml
//! agrireg --config agrireg.yaml delete farm.yaml --region Bahia
//! agrireg report farm.yaml
//! ```

pub mod check_id;
pub mod config;
pub mod delete;
pub mod fixture;
pub mod report;
pub mod seed;
