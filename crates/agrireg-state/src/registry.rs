//! # In-Memory Registry
//!
//! Arena-style storage for committed records: one ordered map per record
//! kind, keyed by the record's primary key, with explicit reference fields
//! between them. A single index maps every claimed natural key to its
//! owner, so uniqueness is a map lookup.
//!
//! ## Commit
//!
//! `commit_*` takes a `Record<_, Validated>` and, in order:
//!
//! 1. re-runs the record's invariants;
//! 2. checks that every referenced record is committed;
//! 3. checks the natural key against the index;
//! 4. assigns a surrogate key, stores the record, and claims its key.
//!
//! Any failure leaves the registry unchanged.
//!
//! ## Delete
//!
//! Deletion first *plans* the full cascade by walking the declared edges
//! (`agrireg_core::EDGES`): owning edges always cascade; referential edges
//! cascade only under [`ReferentialPolicy::Cascade`] and otherwise reject the
//! whole deletion with `DependentsExist`. Nothing is removed until the plan
//! is complete, so a blocked cascade removes nothing.
//!
//! ## Concurrency
//!
//! The registry is a plain value. Callers sharing one across threads wrap it
//! in a lock; every `&mut self` operation then runs under that lock's
//! isolation, which is what the uniqueness and cascade checks require.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use agrireg_core::{
    AgriError, CropKind, CropKindId, EntityKind, EntityRef, LandArea, Landholding,
    LandholdingId, Locality, LocalityId, NaturalKey, Planting, PlantingId, Producer, Region,
    RegionId, TaxId, Timestamp, UniqueKey, Validate,
};

use crate::lifecycle::{Committed, Record, Validated};
use crate::view::Snapshot;

// ─── Configuration ───────────────────────────────────────────────────

/// What happens when a region, locality, or crop kind that still has
/// dependents is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialPolicy {
    /// Refuse with `DependentsExist`.
    #[default]
    Reject,
    /// Delete the dependents too, and everything they own.
    Cascade,
}

/// Registry configuration, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Policy for referential (non-owning) edges on delete.
    #[serde(default)]
    pub referential_delete: ReferentialPolicy,
}

// ─── Storage ─────────────────────────────────────────────────────────

/// The record tables, shared by the registry and its snapshots.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub(crate) producers: BTreeMap<TaxId, Producer>,
    pub(crate) regions: BTreeMap<RegionId, Region>,
    pub(crate) localities: BTreeMap<LocalityId, Locality>,
    pub(crate) crop_kinds: BTreeMap<CropKindId, CropKind>,
    pub(crate) landholdings: BTreeMap<LandholdingId, Landholding>,
    pub(crate) plantings: BTreeMap<PlantingId, Planting>,
}

/// Last surrogate value handed out per kind. Values are never reused.
#[derive(Debug, Clone, Default)]
struct Sequences {
    region: u64,
    locality: u64,
    crop_kind: u64,
    landholding: u64,
    planting: u64,
}

fn next(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// Outcome of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    /// The record that was asked to be deleted.
    pub root: EntityRef,
    /// Every removed record, the root first.
    pub removed: Vec<EntityRef>,
}

impl CascadeReport {
    /// How many records of `kind` were removed.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.removed.iter().filter(|r| r.kind() == kind).count()
    }
}

/// The committed entity graph.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    config: RegistryConfig,
    pub(crate) tables: Tables,
    keys: BTreeMap<UniqueKey, EntityRef>,
    seq: Sequences,
}

impl Registry {
    /// An empty registry with the given policy.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The configuration fixed at construction.
    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    // ── Commit ───────────────────────────────────────────────────────

    /// Commit a validated producer under its taxpayer identifier.
    pub fn commit_producer(
        &mut self,
        record: Record<Producer, Validated>,
    ) -> Result<Record<TaxId, Committed>, AgriError> {
        let key = self.admit(&record)?;
        let id = record.payload().identifier().clone();
        self.tables.producers.insert(id.clone(), record.payload().clone());
        self.claim(key, EntityRef::Producer(id.clone()));
        Ok(record.into_committed(id))
    }

    /// Commit a validated region.
    pub fn commit_region(
        &mut self,
        record: Record<Region, Validated>,
    ) -> Result<Record<RegionId, Committed>, AgriError> {
        let key = self.admit(&record)?;
        let id = RegionId::new(next(&mut self.seq.region));
        self.tables.regions.insert(id, record.payload().clone());
        self.claim(key, id.into());
        Ok(record.into_committed(id))
    }

    /// Commit a validated locality; its region must be committed.
    pub fn commit_locality(
        &mut self,
        record: Record<Locality, Validated>,
    ) -> Result<Record<LocalityId, Committed>, AgriError> {
        self.require(&EntityRef::Region(record.payload().region))?;
        let key = self.admit(&record)?;
        let id = LocalityId::new(next(&mut self.seq.locality));
        self.tables.localities.insert(id, record.payload().clone());
        self.claim(key, id.into());
        Ok(record.into_committed(id))
    }

    /// Commit a validated crop kind.
    pub fn commit_crop_kind(
        &mut self,
        record: Record<CropKind, Validated>,
    ) -> Result<Record<CropKindId, Committed>, AgriError> {
        let key = self.admit(&record)?;
        let id = CropKindId::new(next(&mut self.seq.crop_kind));
        self.tables.crop_kinds.insert(id, record.payload().clone());
        self.claim(key, id.into());
        Ok(record.into_committed(id))
    }

    /// Commit a validated landholding; its locality and owner must be committed.
    pub fn commit_landholding(
        &mut self,
        record: Record<Landholding, Validated>,
    ) -> Result<Record<LandholdingId, Committed>, AgriError> {
        let payload = record.payload();
        self.require(&EntityRef::Locality(payload.locality))?;
        self.require(&EntityRef::Producer(payload.owner.clone()))?;
        let key = self.admit(&record)?;
        let id = LandholdingId::new(next(&mut self.seq.landholding));
        self.tables.landholdings.insert(id, record.payload().clone());
        self.claim(key, id.into());
        Ok(record.into_committed(id))
    }

    /// Commit a validated planting; its crop kind and landholding must be committed.
    pub fn commit_planting(
        &mut self,
        record: Record<Planting, Validated>,
    ) -> Result<Record<PlantingId, Committed>, AgriError> {
        let payload = record.payload();
        self.require(&EntityRef::CropKind(payload.crop_kind))?;
        self.require(&EntityRef::Landholding(payload.landholding))?;
        let key = self.admit(&record)?;
        let id = PlantingId::new(next(&mut self.seq.planting));
        self.tables.plantings.insert(id, *record.payload());
        self.claim(key, id.into());
        Ok(record.into_committed(id))
    }

    /// Re-validate and check the natural key. Returns the key to claim.
    fn admit<T: Validate + NaturalKey>(
        &self,
        record: &Record<T, Validated>,
    ) -> Result<Option<UniqueKey>, AgriError> {
        record.revalidate()?;
        let key = record.payload().natural_key();
        if let Some(key) = &key {
            if self.keys.contains_key(key) {
                return Err(AgriError::UniquenessViolation { key: key.clone() });
            }
        }
        Ok(key)
    }

    fn claim(&mut self, key: Option<UniqueKey>, owner: EntityRef) {
        if let Some(key) = key {
            self.keys.insert(key, owner);
        }
    }

    fn require(&self, target: &EntityRef) -> Result<(), AgriError> {
        if self.contains(target) {
            Ok(())
        } else {
            Err(AgriError::NotFound(target.clone()))
        }
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Rename a producer. The identifier never changes.
    pub fn rename_producer(&mut self, id: &TaxId, name: &str) -> Result<(), AgriError> {
        let producer = self
            .tables
            .producers
            .get_mut(id)
            .ok_or_else(|| AgriError::NotFound(EntityRef::Producer(id.clone())))?;
        producer.rename(name)?;
        Ok(())
    }

    /// Rename a landholding.
    pub fn rename_landholding(&mut self, id: LandholdingId, name: &str) -> Result<(), AgriError> {
        let current = self
            .tables
            .landholdings
            .get_mut(&id)
            .ok_or(AgriError::NotFound(EntityRef::Landholding(id)))?;
        let mut updated = current.clone();
        updated.name = name.to_string();
        updated.revalidate()?;
        *current = updated;
        Ok(())
    }

    /// Replace a landholding's area figures, re-checking the area invariant.
    pub fn update_landholding_areas(
        &mut self,
        id: LandholdingId,
        total: f64,
        arable: f64,
        vegetation: f64,
    ) -> Result<(), AgriError> {
        let current = self
            .tables
            .landholdings
            .get_mut(&id)
            .ok_or(AgriError::NotFound(EntityRef::Landholding(id)))?;
        current.area = LandArea::new(total, arable, vegetation)?;
        Ok(())
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Delete a committed record and, per the edge rules, its dependents.
    ///
    /// # Errors
    ///
    /// - [`AgriError::NotFound`] if `target` is not committed.
    /// - [`AgriError::DependentsExist`] if a referential edge blocks the
    ///   cascade under [`ReferentialPolicy::Reject`]. Nothing is removed.
    pub fn delete(&mut self, target: EntityRef) -> Result<CascadeReport, AgriError> {
        self.require(&target)?;
        let removed = self.plan_deletion(&target)?;
        for entity in &removed {
            self.remove(entity);
        }
        Ok(CascadeReport {
            root: target,
            removed,
        })
    }

    /// Every record that deleting `target` removes, the root first.
    fn plan_deletion(&self, target: &EntityRef) -> Result<Vec<EntityRef>, AgriError> {
        let index = self.dependents();
        let mut plan = Vec::new();
        let mut seen = BTreeSet::new();
        let mut queue = vec![target.clone()];
        while let Some(node) = queue.pop() {
            if !seen.insert(node.clone()) {
                continue;
            }
            for edge in agrireg_core::uniqueness::edges_into(node.kind()) {
                let children = match index.get(&(node.clone(), edge.field)) {
                    Some(children) => children,
                    None => continue,
                };
                if edge.is_owning() || self.config.referential_delete == ReferentialPolicy::Cascade
                {
                    queue.extend(children.iter().cloned());
                } else {
                    return Err(AgriError::DependentsExist {
                        entity: node,
                        dependents: children.len(),
                    });
                }
            }
            plan.push(node);
        }
        Ok(plan)
    }

    /// Children of every referenced record, keyed by parent and the
    /// [`Edge::field`](agrireg_core::Edge::field) that points at it. One pass over each child table.
    fn dependents(&self) -> BTreeMap<(EntityRef, &'static str), Vec<EntityRef>> {
        let t = &self.tables;
        let mut index: BTreeMap<(EntityRef, &'static str), Vec<EntityRef>> = BTreeMap::new();
        for (id, locality) in &t.localities {
            index
                .entry((EntityRef::Region(locality.region), "region"))
                .or_default()
                .push(EntityRef::Locality(*id));
        }
        for (id, landholding) in &t.landholdings {
            let child = EntityRef::Landholding(*id);
            index
                .entry((EntityRef::Producer(landholding.owner.clone()), "owner"))
                .or_default()
                .push(child.clone());
            index
                .entry((EntityRef::Locality(landholding.locality), "locality"))
                .or_default()
                .push(child);
        }
        for (id, planting) in &t.plantings {
            let child = EntityRef::Planting(*id);
            index
                .entry((EntityRef::Landholding(planting.landholding), "landholding"))
                .or_default()
                .push(child.clone());
            index
                .entry((EntityRef::CropKind(planting.crop_kind), "crop_kind"))
                .or_default()
                .push(child);
        }
        index
    }

    fn remove(&mut self, entity: &EntityRef) {
        let t = &mut self.tables;
        let key = match entity {
            EntityRef::Producer(id) => t.producers.remove(id).and_then(|r| r.natural_key()),
            EntityRef::Region(id) => t.regions.remove(id).and_then(|r| r.natural_key()),
            EntityRef::Locality(id) => t.localities.remove(id).and_then(|r| r.natural_key()),
            EntityRef::CropKind(id) => t.crop_kinds.remove(id).and_then(|r| r.natural_key()),
            EntityRef::Landholding(id) => t.landholdings.remove(id).and_then(|r| r.natural_key()),
            EntityRef::Planting(id) => t.plantings.remove(id).and_then(|r| r.natural_key()),
        };
        if let Some(key) = key {
            self.keys.remove(&key);
        }
    }

    /// Remove every record. Surrogate sequences keep counting.
    pub fn clear(&mut self) {
        self.tables = Tables::default();
        self.keys.clear();
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// Whether `entity` is committed.
    pub fn contains(&self, entity: &EntityRef) -> bool {
        let t = &self.tables;
        match entity {
            EntityRef::Producer(id) => t.producers.contains_key(id),
            EntityRef::Region(id) => t.regions.contains_key(id),
            EntityRef::Locality(id) => t.localities.contains_key(id),
            EntityRef::CropKind(id) => t.crop_kinds.contains_key(id),
            EntityRef::Landholding(id) => t.landholdings.contains_key(id),
            EntityRef::Planting(id) => t.plantings.contains_key(id),
        }
    }

    /// Number of committed records of `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        let t = &self.tables;
        match kind {
            EntityKind::Producer => t.producers.len(),
            EntityKind::Region => t.regions.len(),
            EntityKind::Locality => t.localities.len(),
            EntityKind::CropKind => t.crop_kinds.len(),
            EntityKind::Landholding => t.landholdings.len(),
            EntityKind::Planting => t.plantings.len(),
        }
    }

    /// Look up a producer.
    pub fn producer(&self, id: &TaxId) -> Option<&Producer> {
        self.tables.producers.get(id)
    }

    /// Look up a region.
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.tables.regions.get(&id)
    }

    /// Look up a locality.
    pub fn locality(&self, id: LocalityId) -> Option<&Locality> {
        self.tables.localities.get(&id)
    }

    /// Look up a crop kind.
    pub fn crop_kind(&self, id: CropKindId) -> Option<&CropKind> {
        self.tables.crop_kinds.get(&id)
    }

    /// Look up a landholding.
    pub fn landholding(&self, id: LandholdingId) -> Option<&Landholding> {
        self.tables.landholdings.get(&id)
    }

    /// Look up a planting.
    pub fn planting(&self, id: PlantingId) -> Option<&Planting> {
        self.tables.plantings.get(&id)
    }

    /// The record holding a natural key, if any.
    pub fn holder_of(&self, key: &UniqueKey) -> Option<&EntityRef> {
        self.keys.get(key)
    }

    /// Find a region by name.
    pub fn region_named(&self, name: &str) -> Option<RegionId> {
        match self.holder_of(&UniqueKey::RegionName {
            name: name.to_string(),
        }) {
            Some(EntityRef::Region(id)) => Some(*id),
            _ => None,
        }
    }

    /// Find a locality by name within a region.
    pub fn locality_named(&self, region: RegionId, name: &str) -> Option<LocalityId> {
        match self.holder_of(&UniqueKey::LocalityName {
            name: name.to_string(),
            region,
        }) {
            Some(EntityRef::Locality(id)) => Some(*id),
            _ => None,
        }
    }

    /// Find a crop kind by name.
    pub fn crop_kind_named(&self, name: &str) -> Option<CropKindId> {
        match self.holder_of(&UniqueKey::CropKindName {
            name: name.to_string(),
        }) {
            Some(EntityRef::CropKind(id)) => Some(*id),
            _ => None,
        }
    }

    /// Landholdings owned by a producer, in key order.
    pub fn landholdings_of(&self, owner: &TaxId) -> Vec<LandholdingId> {
        self.tables
            .landholdings
            .iter()
            .filter(|(_, l)| &l.owner == owner)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Plantings on a landholding, in key order.
    pub fn plantings_of(&self, landholding: LandholdingId) -> Vec<PlantingId> {
        self.tables
            .plantings
            .iter()
            .filter(|(_, p)| p.landholding == landholding)
            .map(|(id, _)| *id)
            .collect()
    }

    /// `"<locality> (<region>)"`.
    pub fn describe_locality(&self, id: LocalityId) -> Option<String> {
        let locality = self.locality(id)?;
        let region = self.region(locality.region)?;
        Some(format!("{} ({})", locality.name, region.name))
    }

    /// `"<crop kind> - <harvest year> (<landholding>)"`.
    pub fn describe_planting(&self, id: PlantingId) -> Option<String> {
        let planting = self.planting(id)?;
        let crop = self.crop_kind(planting.crop_kind)?;
        let landholding = self.landholding(planting.landholding)?;
        Some(format!(
            "{} - {} ({})",
            crop.name, planting.harvest_year, landholding.name
        ))
    }

    /// A point-in-time copy of the committed graph.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.tables.clone(), Timestamp::now())
    }
}
