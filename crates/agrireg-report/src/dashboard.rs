//! # Dashboard Aggregates
//!
//! Grouped rollups over a committed graph view: landholding totals, area
//! by region, plantings by crop kind, and land use.
//!
//! ## Ordering
//!
//! Group lists are sorted by descending count, ties broken by ascending
//! name. Region and crop kind names are unique, so the order is total.
//!
//! ## Consistency
//!
//! [`compute`] walks the view exactly once per table and never re-reads,
//! so every field of one report describes the same point in time as long
//! as the view itself does not change during the call. Pass a
//! [`Snapshot`](agrireg_state::Snapshot) when the registry is shared.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use agrireg_core::{CropKindId, RegionId};
use agrireg_state::GraphView;

/// Landholding count and area for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    /// Region name.
    pub region_name: String,
    /// Landholdings located in the region.
    pub count: usize,
    /// Sum of their total areas.
    pub total_area: f64,
}

/// Planting count for one crop kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropKindSummary {
    /// Crop kind name.
    pub crop_kind_name: String,
    /// Plantings of this crop kind across all harvest years.
    pub count: usize,
}

/// Arable and vegetation area across all landholdings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LandUse {
    /// Sum of arable areas.
    pub total_arable: f64,
    /// Sum of vegetation areas.
    pub total_vegetation: f64,
}

/// The consolidated dashboard report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Number of committed landholdings.
    pub total_landholdings: usize,
    /// Sum of landholding total areas.
    pub total_area: f64,
    /// Regions with at least one landholding.
    pub landholdings_by_region: Vec<RegionSummary>,
    /// Crop kinds with at least one planting.
    pub plantings_by_crop_kind: Vec<CropKindSummary>,
    /// Arable and vegetation totals.
    pub land_use: LandUse,
}

/// Compute the dashboard report over `view`.
///
/// Never fails: an empty graph yields zero totals and empty group lists.
pub fn compute<G: GraphView + ?Sized>(view: &G) -> DashboardReport {
    let mut report = DashboardReport::default();
    let mut by_region: BTreeMap<RegionId, (usize, f64)> = BTreeMap::new();

    for (_, landholding) in view.landholdings() {
        let area = &landholding.area;
        report.total_landholdings += 1;
        report.total_area += area.total();
        report.land_use.total_arable += area.arable();
        report.land_use.total_vegetation += area.vegetation();

        // A committed landholding always has a committed locality.
        if let Some(locality) = view.locality(landholding.locality) {
            let entry = by_region.entry(locality.region).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += area.total();
        }
    }

    let mut by_crop: BTreeMap<CropKindId, usize> = BTreeMap::new();
    for (_, planting) in view.plantings() {
        *by_crop.entry(planting.crop_kind).or_insert(0) += 1;
    }

    report.landholdings_by_region = by_region
        .into_iter()
        .filter_map(|(id, (count, total_area))| {
            view.region(id).map(|region| RegionSummary {
                region_name: region.name.clone(),
                count,
                total_area,
            })
        })
        .collect();
    report
        .landholdings_by_region
        .sort_by(|a, b| by_count_then_name(a.count, &a.region_name, b.count, &b.region_name));

    report.plantings_by_crop_kind = by_crop
        .into_iter()
        .filter_map(|(id, count)| {
            view.crop_kind(id).map(|crop| CropKindSummary {
                crop_kind_name: crop.name.clone(),
                count,
            })
        })
        .collect();
    report.plantings_by_crop_kind.sort_by(|a, b| {
        by_count_then_name(a.count, &a.crop_kind_name, b.count, &b.crop_kind_name)
    });

    report
}

fn by_count_then_name(a_count: usize, a_name: &str, b_count: usize, b_name: &str) -> Ordering {
    b_count.cmp(&a_count).then_with(|| a_name.cmp(b_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_descending_then_name_ascending() {
        let mut rows = vec![("Bahia", 1), ("Acre", 2), ("Ceará", 2), ("Amapá", 1)];
        rows.sort_by(|a, b| by_count_then_name(a.1, a.0, b.1, b.0));
        assert_eq!(
            rows.iter().map(|r| r.0).collect::<Vec<_>>(),
            vec!["Acre", "Ceará", "Amapá", "Bahia"]
        );
    }

    #[test]
    fn default_report_is_the_empty_report() {
        let report = DashboardReport::default();
        assert_eq!(report.total_landholdings, 0);
        assert_eq!(report.total_area, 0.0);
        assert!(report.landholdings_by_region.is_empty());
        assert!(report.plantings_by_crop_kind.is_empty());
        assert_eq!(report.land_use, LandUse::default());
    }
}
