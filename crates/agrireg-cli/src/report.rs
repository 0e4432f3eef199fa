//! # Report Subcommand
//!
//! `agrireg report <fixture>` loads a fixture and prints the dashboard
//! report as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use agrireg_report::DashboardReport;
use agrireg_state::Registry;

use crate::config::CliConfig;
use crate::fixture::load_registry;

/// Arguments for `agrireg report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Fixture describing the registry to report on.
    pub fixture: PathBuf,

    /// Emit compact JSON on a single line.
    #[arg(long)]
    pub compact: bool,
}

/// Execute `agrireg report`.
pub fn run_report(args: &ReportArgs, config: &CliConfig) -> Result<u8> {
    let registry = load_registry(&args.fixture, config)?;
    let report = dashboard(&registry);
    println!("{}", render(&report, args.compact)?);
    Ok(0)
}

/// Compute the report over a snapshot of `registry`.
pub fn dashboard(registry: &Registry) -> DashboardReport {
    let snapshot = registry.snapshot();
    let report = agrireg_report::compute(&snapshot);
    tracing::debug!(
        taken_at = %snapshot.taken_at(),
        landholdings = report.total_landholdings,
        regions = report.landholdings_by_region.len(),
        crop_kinds = report.plantings_by_crop_kind.len(),
        "dashboard computed"
    );
    report
}

/// Serialize a report, pretty unless `compact`.
pub fn render(report: &DashboardReport, compact: bool) -> Result<String> {
    let text = if compact {
        serde_json::to_string(report)
    } else {
        serde_json::to_string_pretty(report)
    };
    text.context("failed to serialize dashboard report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrireg_state::RegistryConfig;

    #[test]
    fn empty_registry_renders_zero_report() {
        let registry = Registry::new(RegistryConfig::default());
        let text = render(&dashboard(&registry), true).unwrap();
        assert_eq!(
            text,
            r#"{"total_landholdings":0,"total_area":0.0,"landholdings_by_region":[],"plantings_by_crop_kind":[],"land_use":{"total_arable":0.0,"total_vegetation":0.0}}"#
        );
    }

    #[test]
    fn pretty_output_spans_lines() {
        let registry = Registry::new(RegistryConfig::default());
        let text = render(&dashboard(&registry), false).unwrap();
        assert!(text.lines().count() > 1);
    }
}
