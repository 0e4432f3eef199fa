//! # Fixtures
//!
//! A YAML description of a whole registry, with records nested under their
//! owners and references written by name:
//!
//! ```yaml
//! regions:
//!   - name: Bahia
//!     localities: [Salvador, Feira de Santana]
//! crop_kinds: [Soja, Milho]
//! producers:
//!   - identifier: 123.456.789-09
//!     name: Ana Souza
//!     landholdings:
//!       - name: Fazenda Boa Vista
//!         region: Bahia
//!         locality: Salvador
//!         total_area: 100.0
//!         arable_area: 60.0
//!         vegetation_area: 40.0
//!         plantings:
//!           - { crop_kind: Soja, harvest_year: 2025 }
//! ```
//!
//! Loading walks the fixture in dependency order and commits every record
//! through the normal lifecycle, stopping at the first violation.
//!
//! `agrireg load <fixture>` runs that and prints what was committed.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use agrireg_core::{
    CropKindDraft, LandholdingDraft, LocalityDraft, PlantingDraft, ProducerDraft,
    RegionDraft, TaxId,
};
use agrireg_state::{Record, Registry};

use crate::config::CliConfig;

// ─── Fixture Model ───────────────────────────────────────────────────

/// A complete registry description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    /// Regions, each with its localities.
    #[serde(default)]
    pub regions: Vec<RegionFixture>,
    /// Crop kind names.
    #[serde(default)]
    pub crop_kinds: Vec<String>,
    /// Producers, each with its landholdings.
    #[serde(default)]
    pub producers: Vec<ProducerFixture>,
}

/// A region and the names of its localities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionFixture {
    /// Region name.
    pub name: String,
    /// Names of the localities in this region.
    #[serde(default)]
    pub localities: Vec<String>,
}

/// A producer and the landholdings it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProducerFixture {
    /// Taxpayer identifier, masked or bare.
    pub identifier: String,
    /// Display name.
    pub name: String,
    /// Landholdings owned by this producer.
    #[serde(default)]
    pub landholdings: Vec<LandholdingFixture>,
}

/// A landholding located by region and locality name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandholdingFixture {
    /// Landholding name.
    pub name: String,
    /// Name of the region holding `locality`.
    pub region: String,
    /// Locality name within `region`.
    pub locality: String,
    /// Total area in hectares.
    pub total_area: f64,
    /// Arable area in hectares.
    pub arable_area: f64,
    /// Vegetation area in hectares.
    pub vegetation_area: f64,
    /// Crops planted on this landholding.
    #[serde(default)]
    pub plantings: Vec<PlantingFixture>,
}

/// A planting referring to its crop kind by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantingFixture {
    /// Crop kind name.
    pub crop_kind: String,
    /// Harvest year.
    pub harvest_year: i32,
}

/// Records committed by one [`Fixture::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Regions committed.
    pub regions: usize,
    /// Localities committed.
    pub localities: usize,
    /// Crop kinds committed.
    pub crop_kinds: usize,
    /// Producers committed.
    pub producers: usize,
    /// Landholdings committed.
    pub landholdings: usize,
    /// Plantings committed.
    pub plantings: usize,
}

impl LoadSummary {
    /// Total records committed.
    pub fn total(&self) -> usize {
        self.regions
            + self.localities
            + self.crop_kinds
            + self.producers
            + self.landholdings
            + self.plantings
    }
}

impl Fixture {
    /// Read and parse a fixture file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse fixture {}", path.display()))
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Commit every record into `registry`.
    ///
    /// Stops at the first violation. Records committed before it stay
    /// committed; callers that need all-or-nothing load into a fresh
    /// registry and discard it on error.
    pub fn apply(&self, registry: &mut Registry) -> Result<LoadSummary> {
        let mut summary = LoadSummary::default();

        for region in &self.regions {
            let validated = Record::propose(RegionDraft {
                name: region.name.clone(),
            })
            .validate()?;
            let region_id = *registry
                .commit_region(validated)
                .with_context(|| format!("region {:?}", region.name))?
                .key();
            summary.regions += 1;

            for locality in &region.localities {
                let validated = Record::propose(LocalityDraft {
                    name: locality.clone(),
                    region: region_id,
                })
                .validate()?;
                registry
                    .commit_locality(validated)
                    .with_context(|| format!("locality {locality:?} in {:?}", region.name))?;
                summary.localities += 1;
            }
        }

        for crop_kind in &self.crop_kinds {
            let validated = Record::propose(CropKindDraft {
                name: crop_kind.clone(),
            })
            .validate()?;
            registry
                .commit_crop_kind(validated)
                .with_context(|| format!("crop kind {crop_kind:?}"))?;
            summary.crop_kinds += 1;
        }

        for producer in &self.producers {
            let validated = Record::propose(ProducerDraft::new(
                producer.identifier.as_str(),
                producer.name.as_str(),
            ))
            .validate()
            .with_context(|| format!("producer {:?}", producer.identifier))?;
            let owner: TaxId = registry
                .commit_producer(validated)
                .with_context(|| format!("producer {:?}", producer.identifier))?
                .into_payload();
            summary.producers += 1;

            for landholding in &producer.landholdings {
                let region = registry
                    .region_named(&landholding.region)
                    .ok_or_else(|| anyhow!("unknown region {:?}", landholding.region))?;
                let locality = registry
                    .locality_named(region, &landholding.locality)
                    .ok_or_else(|| {
                        anyhow!(
                            "unknown locality {:?} in {:?}",
                            landholding.locality,
                            landholding.region
                        )
                    })?;
                let validated = Record::propose(LandholdingDraft {
                    name: landholding.name.clone(),
                    total_area: landholding.total_area,
                    arable_area: landholding.arable_area,
                    vegetation_area: landholding.vegetation_area,
                    locality,
                    owner: owner.clone(),
                })
                .validate()
                .with_context(|| format!("landholding {:?}", landholding.name))?;
                let landholding_id = *registry
                    .commit_landholding(validated)
                    .with_context(|| format!("landholding {:?}", landholding.name))?
                    .key();
                summary.landholdings += 1;

                for planting in &landholding.plantings {
                    let crop_kind = registry
                        .crop_kind_named(&planting.crop_kind)
                        .ok_or_else(|| anyhow!("unknown crop kind {:?}", planting.crop_kind))?;
                    let validated = Record::propose(PlantingDraft {
                        harvest_year: planting.harvest_year,
                        crop_kind,
                        landholding: landholding_id,
                    })
                    .validate()?;
                    registry.commit_planting(validated).with_context(|| {
                        format!(
                            "planting of {:?} on {:?}",
                            planting.crop_kind, landholding.name
                        )
                    })?;
                    summary.plantings += 1;
                }
            }
        }

        Ok(summary)
    }
}

// ─── Subcommand ──────────────────────────────────────────────────────

/// Arguments for `agrireg load`.
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Fixture file to validate and commit.
    pub fixture: PathBuf,
}

/// Load a fixture into a fresh registry built from `config`.
pub fn load_registry(path: &Path, config: &CliConfig) -> Result<Registry> {
    let fixture = Fixture::from_path(path)?;
    let (registry, _) = commit_fixture(&fixture, path, config)?;
    Ok(registry)
}

/// Apply `fixture`, read from `source`, to a fresh registry.
fn commit_fixture(
    fixture: &Fixture,
    source: &Path,
    config: &CliConfig,
) -> Result<(Registry, LoadSummary)> {
    let mut registry = Registry::new(config.registry_config());
    let summary = fixture
        .apply(&mut registry)
        .with_context(|| format!("failed to load fixture {}", source.display()))?;
    tracing::info!(
        fixture = %source.display(),
        records = summary.total(),
        producers = summary.producers,
        landholdings = summary.landholdings,
        plantings = summary.plantings,
        "fixture loaded"
    );
    Ok((registry, summary))
}

/// Execute `agrireg load`.
///
/// An unreadable or malformed file is an error; a record that violates an
/// invariant prints `REJECTED` and exits 1.
pub fn run_load(args: &LoadArgs, config: &CliConfig) -> Result<u8> {
    let fixture = Fixture::from_path(&args.fixture)?;
    match commit_fixture(&fixture, &args.fixture, config) {
        Ok((_, summary)) => {
            println!(
                "OK: {} regions, {} localities, {} crop kinds, {} producers, {} landholdings, {} plantings",
                summary.regions,
                summary.localities,
                summary.crop_kinds,
                summary.producers,
                summary.landholdings,
                summary.plantings
            );
            Ok(0)
        }
        Err(e) => {
            tracing::warn!(fixture = %args.fixture.display(), "fixture rejected");
            println!("REJECTED: {e:#}");
            Ok(1)
        }
    }
}
