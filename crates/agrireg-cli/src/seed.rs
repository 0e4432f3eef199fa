//! # Seed Subcommand
//!
//! Generates a realistic sample [`Fixture`]: ten Brazilian states with two
//! cities each, ten crop kinds, and `N` producers holding one to three
//! landholdings with one to four plantings each.
//!
//! Output depends only on the RNG seed and the reference year, so the same
//! invocation always writes the same file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Args;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use agrireg_core::checksum::individual_check_digits;
use agrireg_core::{LandArea, TaxId};

use crate::config::{CliConfig, SeedConfig};
use crate::fixture::{
    Fixture, LandholdingFixture, PlantingFixture, ProducerFixture, RegionFixture,
};

const REGIONS: [(&str, [&str; 2]); 10] = [
    ("Acre", ["Rio Branco", "Cruzeiro do Sul"]),
    ("Bahia", ["Salvador", "Feira de Santana"]),
    ("Ceará", ["Fortaleza", "Juazeiro do Norte"]),
    ("Minas Gerais", ["Belo Horizonte", "Uberlândia"]),
    ("Paraná", ["Curitiba", "Londrina"]),
    ("Pernambuco", ["Recife", "Caruaru"]),
    ("Rio de Janeiro", ["Rio de Janeiro", "Niterói"]),
    ("Rio Grande do Sul", ["Porto Alegre", "Caxias do Sul"]),
    ("São Paulo", ["São Paulo", "Campinas"]),
    ("Tocantins", ["Palmas", "Araguaína"]),
];

const CROP_KINDS: [&str; 10] = [
    "Soja",
    "Milho",
    "Cana-de-açúcar",
    "Café",
    "Algodão",
    "Arroz",
    "Feijão",
    "Trigo",
    "Laranja",
    "Banana",
];

const FIRST_NAMES: [&str; 12] = [
    "Ana", "Bruno", "Carla", "Diego", "Eduarda", "Fernando", "Gabriela", "Heitor", "Isabela",
    "João", "Larissa", "Marcos",
];

const LAST_NAMES: [&str; 10] = [
    "Almeida", "Barbosa", "Carvalho", "Costa", "Ferreira", "Lima", "Oliveira", "Pereira",
    "Rodrigues", "Souza",
];

const FARM_NAMES: [&str; 10] = [
    "Boa Vista",
    "Santa Luzia",
    "Bela Vista",
    "São José",
    "Esperança",
    "Três Irmãos",
    "Água Limpa",
    "Primavera",
    "Monte Alegre",
    "Santa Rita",
];

/// Arguments for `agrireg seed`.
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Number of producers (overrides the config file).
    #[arg(long)]
    pub producers: Option<usize>,

    /// RNG seed (overrides the config file).
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// Last harvest year of the generated plantings. Defaults to the current year.
    #[arg(long)]
    pub year: Option<i32>,

    /// Write the fixture here instead of standard output.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Execute `agrireg seed`.
pub fn run_seed(args: &SeedArgs, config: &CliConfig) -> Result<u8> {
    let seed = SeedConfig {
        producers: args.producers.unwrap_or(config.seed.producers),
        rng_seed: args.rng_seed.unwrap_or(config.seed.rng_seed),
        harvest_years: config.seed.harvest_years,
    };
    let year = args.year.unwrap_or_else(|| chrono::Utc::now().year());
    let fixture = generate(&seed, year);
    let yaml = fixture.to_yaml()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, yaml)
                .with_context(|| format!("failed to write fixture {}", path.display()))?;
            tracing::info!(
                output = %path.display(),
                producers = fixture.producers.len(),
                "seed fixture written"
            );
        }
        None => print!("{yaml}"),
    }
    Ok(0)
}

/// Build a sample fixture. `last_year` is the most recent harvest year.
pub fn generate(config: &SeedConfig, last_year: i32) -> Fixture {
    let mut rng = StdRng::seed_from_u64(config.rng_seed);

    let regions = REGIONS
        .iter()
        .map(|(name, cities)| RegionFixture {
            name: (*name).to_string(),
            localities: cities.iter().map(|c| (*c).to_string()).collect(),
        })
        .collect();

    let years: Vec<i32> = (0..i32::from(config.harvest_years.max(1)))
        .map(|back| last_year - back)
        .collect();

    let mut producers = Vec::with_capacity(config.producers);
    let mut identifiers = std::collections::BTreeSet::new();
    let mut farm_serial = 0usize;
    while producers.len() < config.producers {
        let identifier = individual_identifier(&mut rng);
        if !identifiers.insert(identifier.clone()) {
            continue;
        }
        let name = format!(
            "{} {}",
            FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())],
            LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())]
        );

        let landholdings = (0..rng.gen_range(1..=3))
            .map(|_| {
                farm_serial += 1;
                landholding(&mut rng, farm_serial, &years)
            })
            .collect();

        producers.push(ProducerFixture {
            identifier: identifier.formatted(),
            name,
            landholdings,
        });
    }

    Fixture {
        regions,
        crop_kinds: CROP_KINDS.iter().map(|c| (*c).to_string()).collect(),
        producers,
    }
}

/// A random valid individual identifier that is not a repeated digit.
fn individual_identifier(rng: &mut StdRng) -> TaxId {
    loop {
        let mut base = [0u8; 9];
        for d in &mut base {
            *d = rng.gen_range(0..10);
        }
        if base.iter().all(|d| *d == base[0]) {
            continue;
        }
        let check = individual_check_digits(&base);
        let digits: String = base
            .iter()
            .chain(check.iter())
            .map(|d| char::from(b'0' + d))
            .collect();
        if let Ok(id) = TaxId::new(digits) {
            return id;
        }
    }
}

fn landholding(rng: &mut StdRng, serial: usize, years: &[i32]) -> LandholdingFixture {
    let (region, cities) = REGIONS[rng.gen_range(0..REGIONS.len())];
    let locality = cities[rng.gen_range(0..cities.len())];
    let (total, arable, vegetation) = areas(rng);

    let mut combos: Vec<(i32, &str)> = years
        .iter()
        .flat_map(|y| CROP_KINDS.iter().map(move |c| (*y, *c)))
        .collect();
    combos.shuffle(&mut *rng);
    let plantings = combos
        .into_iter()
        .take(rng.gen_range(1..=4))
        .map(|(harvest_year, crop_kind)| PlantingFixture {
            crop_kind: crop_kind.to_string(),
            harvest_year,
        })
        .collect();

    LandholdingFixture {
        name: format!(
            "Fazenda {} {serial}",
            FARM_NAMES[rng.gen_range(0..FARM_NAMES.len())]
        ),
        region: region.to_string(),
        locality: locality.to_string(),
        total_area: total,
        arable_area: arable,
        vegetation_area: vegetation,
        plantings,
    }
}

/// Total in [50, 500], arable 30–90 % of it, vegetation the remainder.
/// Computed in hundredths so the parts never exceed the total after rounding.
fn areas(rng: &mut StdRng) -> (f64, f64, f64) {
    let total_c: u32 = rng.gen_range(5_000..=50_000);
    let arable_c: u32 = rng.gen_range(total_c * 3 / 10..=total_c * 9 / 10);
    let mut vegetation_c = total_c - arable_c;
    loop {
        let (t, a, v) = (
            f64::from(total_c) / 100.0,
            f64::from(arable_c) / 100.0,
            f64::from(vegetation_c) / 100.0,
        );
        if LandArea::new(t, a, v).is_ok() || vegetation_c == 0 {
            return (t, a, v);
        }
        vegetation_c -= 1;
    }
}
