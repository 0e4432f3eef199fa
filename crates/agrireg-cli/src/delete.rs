//! # Delete Subcommand
//!
//! `agrireg delete <fixture> --producer <id>` (or `--region`, `--locality`,
//! `--crop-kind`) loads a fixture, deletes one record under the configured
//! referential policy, then prints what was removed and the dashboard of
//! what remains.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{ArgGroup, Args};

use agrireg_core::{AgriError, EntityKind, EntityRef, TaxId};
use agrireg_state::{CascadeReport, Registry};

use crate::config::CliConfig;
use crate::fixture::load_registry;
use crate::report::{dashboard, render};

/// Arguments for `agrireg delete`.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["producer", "region", "locality", "crop_kind"])
))]
pub struct DeleteArgs {
    /// Fixture describing the registry.
    pub fixture: PathBuf,

    /// Producer identifier, masked or bare.
    #[arg(long)]
    pub producer: Option<String>,

    /// Region name.
    #[arg(long)]
    pub region: Option<String>,

    /// Locality as `<region>/<locality>`.
    #[arg(long)]
    pub locality: Option<String>,

    /// Crop kind name.
    #[arg(long)]
    pub crop_kind: Option<String>,
}

/// Execute `agrireg delete`.
pub fn run_delete(args: &DeleteArgs, config: &CliConfig) -> Result<u8> {
    let mut registry = load_registry(&args.fixture, config)?;
    let target = resolve(args, &registry)?;

    match registry.delete(target.clone()) {
        Ok(report) => {
            tracing::info!(
                record = %target,
                removed = report.removed.len(),
                "record deleted"
            );
            println!("{}", summarize(&report));
            println!("{}", render(&dashboard(&registry), false)?);
            Ok(0)
        }
        Err(e @ AgriError::DependentsExist { .. }) => {
            tracing::warn!(
                record = %target,
                policy = ?registry.config().referential_delete,
                "delete blocked by dependents"
            );
            println!("REJECTED: {e}");
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}

/// Map the selected option to a committed record.
fn resolve(args: &DeleteArgs, registry: &Registry) -> Result<EntityRef> {
    if let Some(identifier) = &args.producer {
        return Ok(EntityRef::Producer(TaxId::new(identifier.as_str())?));
    }
    if let Some(name) = &args.region {
        let id = registry
            .region_named(name)
            .ok_or_else(|| anyhow!("unknown region {name:?}"))?;
        return Ok(id.into());
    }
    if let Some(path) = &args.locality {
        let (region, locality) = path
            .split_once('/')
            .ok_or_else(|| anyhow!("locality must be written as <region>/<locality>"))?;
        let region = registry
            .region_named(region)
            .ok_or_else(|| anyhow!("unknown region {region:?}"))?;
        let id = registry
            .locality_named(region, locality)
            .ok_or_else(|| anyhow!("unknown locality {locality:?}"))?;
        return Ok(id.into());
    }
    if let Some(name) = &args.crop_kind {
        let id = registry
            .crop_kind_named(name)
            .ok_or_else(|| anyhow!("unknown crop kind {name:?}"))?;
        return Ok(id.into());
    }
    Err(anyhow!("no record selected"))
}

/// `"DELETED <root>: 1 producer, 2 landholding, 3 planting"`.
fn summarize(report: &CascadeReport) -> String {
    let parts: Vec<String> = [
        EntityKind::Producer,
        EntityKind::Region,
        EntityKind::Locality,
        EntityKind::CropKind,
        EntityKind::Landholding,
        EntityKind::Planting,
    ]
    .into_iter()
    .filter_map(|kind| match report.count(kind) {
        0 => None,
        n => Some(format!("{n} {kind}")),
    })
    .collect();
    format!("DELETED {}: {}", report.root, parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrireg_state::ReferentialPolicy;

    const SAMPLE: &str = r#"
regions:
  - name: Bahia
    localities: [Salvador]
crop_kinds: [Soja]
producers:
  - identifier: "12345678909"
    name: Ana Souza
    landholdings:
      - name: Fazenda Boa Vista
        region: Bahia
        locality: Salvador
        total_area: 100.0
        arable_area: 60.0
        vegetation_area: 40.0
        plantings:
          - { crop_kind: Soja, harvest_year: 2024 }
          - { crop_kind: Soja, harvest_year: 2025 }
"#;

    fn args(dir: &tempfile::TempDir) -> DeleteArgs {
        let fixture = dir.path().join("farm.yaml");
        std::fs::write(&fixture, SAMPLE).unwrap();
        DeleteArgs {
            fixture,
            producer: None,
            region: None,
            locality: None,
            crop_kind: None,
        }
    }

    fn config(policy: ReferentialPolicy) -> CliConfig {
        CliConfig {
            referential_delete: policy,
            ..CliConfig::default()
        }
    }

    #[test]
    fn producer_delete_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(&dir);
        a.producer = Some("123.456.789-09".into());
        assert_eq!(run_delete(&a, &config(ReferentialPolicy::Reject)).unwrap(), 0);
    }

    #[test]
    fn region_delete_depends_on_policy() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(&dir);
        a.region = Some("Bahia".into());
        assert_eq!(run_delete(&a, &config(ReferentialPolicy::Reject)).unwrap(), 1);
        assert_eq!(run_delete(&a, &config(ReferentialPolicy::Cascade)).unwrap(), 0);
    }

    #[test]
    fn unknown_names_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(&dir);
        a.locality = Some("Bahia/Recife".into());
        assert!(run_delete(&a, &CliConfig::default()).is_err());
        a.locality = Some("Salvador".into());
        assert!(run_delete(&a, &CliConfig::default()).is_err());
    }

    #[test]
    fn summary_lists_removed_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(&dir);
        let mut registry = load_registry(&a.fixture, &CliConfig::default()).unwrap();
        let report = registry
            .delete(EntityRef::Producer(TaxId::new("12345678909").unwrap()))
            .unwrap();
        assert_eq!(
            summarize(&report),
            "DELETED producer:12345678909: 1 producer, 1 landholding, 2 planting"
        );
        assert!(registry.producer(&TaxId::new("12345678909").unwrap()).is_none());
    }
}
