//! # Read-Only Graph View
//!
//! [`GraphView`] is the read surface the aggregation engine consumes. Both
//! the live [`Registry`] and a frozen [`Snapshot`] implement it, so a report
//! can be computed under the registry's lock or later from a copy.

use agrireg_core::{
    CropKind, CropKindId, Landholding, LandholdingId, Locality, LocalityId, Planting, PlantingId,
    Region, RegionId, Timestamp,
};

use crate::registry::{Registry, Tables};

/// Read access to the committed entity graph.
///
/// Iterators yield records in ascending key order.
pub trait GraphView {
    /// All regions.
    fn regions(&self) -> Box<dyn Iterator<Item = (RegionId, &Region)> + '_>;
    /// All localities.
    fn localities(&self) -> Box<dyn Iterator<Item = (LocalityId, &Locality)> + '_>;
    /// All crop kinds.
    fn crop_kinds(&self) -> Box<dyn Iterator<Item = (CropKindId, &CropKind)> + '_>;
    /// All landholdings.
    fn landholdings(&self) -> Box<dyn Iterator<Item = (LandholdingId, &Landholding)> + '_>;
    /// All plantings.
    fn plantings(&self) -> Box<dyn Iterator<Item = (PlantingId, &Planting)> + '_>;

    /// Region by key.
    fn region(&self, id: RegionId) -> Option<&Region>;
    /// Locality by key.
    fn locality(&self, id: LocalityId) -> Option<&Locality>;
    /// Crop kind by key.
    fn crop_kind(&self, id: CropKindId) -> Option<&CropKind>;
}

macro_rules! impl_graph_view {
    ($ty:ty, $tables:ident) => {
        impl GraphView for $ty {
            fn regions(&self) -> Box<dyn Iterator<Item = (RegionId, &Region)> + '_> {
                Box::new(self.$tables.regions.iter().map(|(k, v)| (*k, v)))
            }
            fn localities(&self) -> Box<dyn Iterator<Item = (LocalityId, &Locality)> + '_> {
                Box::new(self.$tables.localities.iter().map(|(k, v)| (*k, v)))
            }
            fn crop_kinds(&self) -> Box<dyn Iterator<Item = (CropKindId, &CropKind)> + '_> {
                Box::new(self.$tables.crop_kinds.iter().map(|(k, v)| (*k, v)))
            }
            fn landholdings(
                &self,
            ) -> Box<dyn Iterator<Item = (LandholdingId, &Landholding)> + '_> {
                Box::new(self.$tables.landholdings.iter().map(|(k, v)| (*k, v)))
            }
            fn plantings(&self) -> Box<dyn Iterator<Item = (PlantingId, &Planting)> + '_> {
                Box::new(self.$tables.plantings.iter().map(|(k, v)| (*k, v)))
            }
            fn region(&self, id: RegionId) -> Option<&Region> {
                self.$tables.regions.get(&id)
            }
            fn locality(&self, id: LocalityId) -> Option<&Locality> {
                self.$tables.localities.get(&id)
            }
            fn crop_kind(&self, id: CropKindId) -> Option<&CropKind> {
                self.$tables.crop_kinds.get(&id)
            }
        }
    };
}

impl_graph_view!(Registry, tables);
impl_graph_view!(Snapshot, tables);

/// A frozen copy of the committed graph.
#[derive(Debug, Clone)]
pub struct Snapshot {
    tables: Tables,
    taken_at: Timestamp,
}

impl Snapshot {
    pub(crate) fn new(tables: Tables, taken_at: Timestamp) -> Self {
        Self { tables, taken_at }
    }

    /// When the copy was taken.
    pub fn taken_at(&self) -> Timestamp {
        self.taken_at
    }

    /// Number of landholdings in the copy.
    pub fn landholding_count(&self) -> usize {
        self.tables.landholdings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Record;
    use crate::registry::RegistryConfig;
    use agrireg_core::RegionDraft;

    fn region(registry: &mut Registry, name: &str) -> RegionId {
        let validated = Record::propose(RegionDraft { name: name.into() })
            .validate()
            .unwrap();
        *registry.commit_region(validated).unwrap().key()
    }

    #[test]
    fn snapshot_is_detached_from_registry() {
        let mut registry = Registry::new(RegistryConfig::default());
        let bahia = region(&mut registry, "Bahia");
        let snapshot = registry.snapshot();
        region(&mut registry, "Ceará");

        assert_eq!(GraphView::regions(&registry).count(), 2);
        assert_eq!(snapshot.regions().count(), 1);
        assert_eq!(snapshot.region(bahia).map(|r| r.name.as_str()), Some("Bahia"));
    }

    #[test]
    fn iteration_follows_key_order() {
        let mut registry = Registry::new(RegistryConfig::default());
        let a = region(&mut registry, "Tocantins");
        let b = region(&mut registry, "Acre");
        let keys: Vec<_> = GraphView::regions(&registry).map(|(k, _)| k).collect();
        assert_eq!(keys, vec![a, b]);
    }
}
