//! The shipped demo fixture and config must stay loadable.

use std::path::PathBuf;

use agrireg_cli::config::CliConfig;
use agrireg_cli::fixture::load_registry;
use agrireg_cli::report::dashboard;
use agrireg_core::{EntityKind, EntityRef, TaxId};
use agrireg_state::ReferentialPolicy;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn demo_config_parses() {
    let config = CliConfig::load(Some(&demo("agrireg.yaml"))).unwrap();
    assert_eq!(config.referential_delete, ReferentialPolicy::Reject);
    assert_eq!(config.seed.producers, 20);
}

#[test]
fn demo_fixture_report() {
    let registry = load_registry(&demo("farm.yaml"), &CliConfig::default()).unwrap();
    let report = dashboard(&registry);

    assert_eq!(report.total_landholdings, 3);
    assert_eq!(report.total_area, 625.5);
    assert_eq!(report.land_use.total_arable, 480.0);
    assert_eq!(report.land_use.total_vegetation, 135.25);

    // One landholding per region: equal counts fall back to name order.
    let regions: Vec<_> = report
        .landholdings_by_region
        .iter()
        .map(|r| r.region_name.as_str())
        .collect();
    assert_eq!(regions, vec!["Bahia", "Minas Gerais", "Paraná"]);

    let crops: Vec<_> = report
        .plantings_by_crop_kind
        .iter()
        .map(|c| (c.crop_kind_name.as_str(), c.count))
        .collect();
    assert_eq!(
        crops,
        vec![("Soja", 3), ("Algodão", 1), ("Café", 1), ("Milho", 1)]
    );
}

#[test]
fn demo_producer_delete_cascades() {
    let mut registry = load_registry(&demo("farm.yaml"), &CliConfig::default()).unwrap();
    let ana = TaxId::new("123.456.789-09").unwrap();
    let report = registry.delete(EntityRef::Producer(ana)).unwrap();
    assert_eq!(report.count(EntityKind::Landholding), 2);
    assert_eq!(report.count(EntityKind::Planting), 4);
    assert_eq!(dashboard(&registry).total_landholdings, 1);
}
