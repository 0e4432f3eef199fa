use agrireg_core::{
    CropKindDraft, CropKindId, EntityRef, LandholdingDraft, LocalityDraft, LocalityId,
    PlantingDraft, ProducerDraft, RegionDraft, TaxId,
};
use agrireg_report::{compute, CropKindSummary, DashboardReport, LandUse};
use agrireg_state::{Record, Registry, RegistryConfig};

struct Builder {
    registry: Registry,
    owner: TaxId,
}

impl Builder {
    fn new() -> Self {
        let mut registry = Registry::new(RegistryConfig::default());
        let owner = registry
            .commit_producer(
                Record::propose(ProducerDraft::new("98765432100", "Produtor"))
                    .validate()
                    .unwrap(),
            )
            .unwrap()
            .into_payload();
        Self { registry, owner }
    }

    fn locality(&mut self, region: &str, name: &str) -> LocalityId {
        let region = match self.registry.region_named(region) {
            Some(id) => id,
            None => *self
                .registry
                .commit_region(
                    Record::propose(RegionDraft {
                        name: region.into(),
                    })
                    .validate()
                    .unwrap(),
                )
                .unwrap()
                .key(),
        };
        *self
            .registry
            .commit_locality(
                Record::propose(LocalityDraft {
                    name: name.into(),
                    region,
                })
                .validate()
                .unwrap(),
            )
            .unwrap()
            .key()
    }

    fn crop(&mut self, name: &str) -> CropKindId {
        *self
            .registry
            .commit_crop_kind(
                Record::propose(CropKindDraft { name: name.into() })
                    .validate()
                    .unwrap(),
            )
            .unwrap()
            .key()
    }

    fn farm(
        &mut self,
        locality: LocalityId,
        total: f64,
        arable: f64,
        vegetation: f64,
        crops: &[(i32, CropKindId)],
    ) {
        let n = self.registry.landholdings_of(&self.owner).len();
        let landholding = *self
            .registry
            .commit_landholding(
                Record::propose(LandholdingDraft {
                    name: format!("Fazenda {n}"),
                    total_area: total,
                    arable_area: arable,
                    vegetation_area: vegetation,
                    locality,
                    owner: self.owner.clone(),
                })
                .validate()
                .unwrap(),
            )
            .unwrap()
            .key();
        for &(harvest_year, crop_kind) in crops {
            self.registry
                .commit_planting(
                    Record::propose(PlantingDraft {
                        harvest_year,
                        crop_kind,
                        landholding,
                    })
                    .validate()
                    .unwrap(),
                )
                .unwrap();
        }
    }
}

#[test]
fn empty_graph_reports_zeros() {
    let registry = Registry::new(RegistryConfig::default());
    let report = compute(&registry);
    assert_eq!(report, DashboardReport::default());
    assert_eq!(
        report.land_use,
        LandUse {
            total_arable: 0.0,
            total_vegetation: 0.0
        }
    );
}

#[test]
fn groups_and_totals() {
    let mut b = Builder::new();
    let salvador = b.locality("Bahia", "Salvador");
    let feira = b.locality("Bahia", "Feira de Santana");
    let recife = b.locality("Pernambuco", "Recife");
    b.locality("Acre", "Rio Branco");
    let soja = b.crop("Soja");
    let milho = b.crop("Milho");
    b.crop("Trigo");

    b.farm(salvador, 100.0, 60.0, 40.0, &[(2024, soja), (2025, soja)]);
    b.farm(feira, 50.0, 20.0, 10.0, &[(2025, milho)]);
    b.farm(recife, 200.0, 150.0, 25.0, &[(2025, soja), (2025, milho)]);

    let report = compute(&b.registry);
    assert_eq!(report.total_landholdings, 3);
    assert_eq!(report.total_area, 350.0);
    assert_eq!(report.land_use.total_arable, 230.0);
    assert_eq!(report.land_use.total_vegetation, 75.0);

    let regions: Vec<_> = report
        .landholdings_by_region
        .iter()
        .map(|r| (r.region_name.as_str(), r.count, r.total_area))
        .collect();
    // Acre has no landholdings and is omitted.
    assert_eq!(regions, vec![("Bahia", 2, 150.0), ("Pernambuco", 1, 200.0)]);

    // Trigo has no plantings and is omitted.
    assert_eq!(
        report.plantings_by_crop_kind,
        vec![
            CropKindSummary {
                crop_kind_name: "Soja".into(),
                count: 3
            },
            CropKindSummary {
                crop_kind_name: "Milho".into(),
                count: 2
            },
        ]
    );
}

#[test]
fn equal_counts_break_ties_by_name() {
    let mut b = Builder::new();
    // Committed in reverse alphabetical order so key order differs from name order.
    let tocantins = b.locality("Tocantins", "Palmas");
    let parana = b.locality("Paraná", "Curitiba");
    let acre = b.locality("Acre", "Rio Branco");
    let cafe = b.crop("Café");
    let arroz = b.crop("Arroz");
    for locality in [tocantins, parana, acre] {
        b.farm(locality, 10.0, 5.0, 5.0, &[(2025, cafe), (2025, arroz)]);
    }

    let report = compute(&b.registry);
    let names: Vec<_> = report
        .landholdings_by_region
        .iter()
        .map(|r| r.region_name.as_str())
        .collect();
    assert_eq!(names, vec!["Acre", "Paraná", "Tocantins"]);

    let crops: Vec<_> = report
        .plantings_by_crop_kind
        .iter()
        .map(|c| c.crop_kind_name.as_str())
        .collect();
    assert_eq!(crops, vec!["Arroz", "Café"]);
}

#[test]
fn snapshot_report_ignores_later_deletes() {
    let mut b = Builder::new();
    let curitiba = b.locality("Paraná", "Curitiba");
    let soja = b.crop("Soja");
    b.farm(curitiba, 80.0, 40.0, 40.0, &[(2025, soja)]);

    let snapshot = b.registry.snapshot();
    b.registry
        .delete(EntityRef::Producer(b.owner.clone()))
        .unwrap();

    assert_eq!(snapshot.landholding_count(), 1);
    assert_eq!(compute(&snapshot).total_landholdings, 1);
    assert_eq!(compute(&b.registry), DashboardReport::default());
}

#[test]
fn report_serializes_with_contract_field_names() {
    let mut b = Builder::new();
    let palmas = b.locality("Tocantins", "Palmas");
    let soja = b.crop("Soja");
    b.farm(palmas, 10.0, 6.0, 4.0, &[(2025, soja)]);

    let json = serde_json::to_value(compute(&b.registry)).unwrap();
    assert_eq!(json["total_landholdings"], 1);
    assert_eq!(json["total_area"], 10.0);
    assert_eq!(json["landholdings_by_region"][0]["region_name"], "Tocantins");
    assert_eq!(json["landholdings_by_region"][0]["count"], 1);
    assert_eq!(json["landholdings_by_region"][0]["total_area"], 10.0);
    assert_eq!(json["plantings_by_crop_kind"][0]["crop_kind_name"], "Soja");
    assert_eq!(json["land_use"]["total_arable"], 6.0);
    assert_eq!(json["land_use"]["total_vegetation"], 4.0);
}
