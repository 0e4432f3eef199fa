//! # Natural Keys and Ownership Edges
//!
//! Declares the uniqueness predicates and the reference edges of the entity
//! graph. This crate only *declares* them; the storage collaborator (the
//! in-memory registry in `agrireg-state`, or a database) executes the
//! collision lookups and the cascades.
//!
//! ## Uniqueness
//!
//! | Record | Key |
//! |---|---|
//! | Producer | identifier |
//! | Region | name |
//! | Locality | (name, region) |
//! | CropKind | name |
//! | Planting | (harvest year, crop kind, landholding) |
//!
//! ## Edges
//!
//! ```text
//! Producer ◀══owner══ Landholding ◀══landholding══ Planting
//!                         │                           │
//!                      locality                   crop_kind
//!                         ▼                           ▼
//! Region ◀──region── Locality                     CropKind
//! ```
//!
//! `══` edges are owning: deleting the parent deletes the child. `──`
//! edges are referential: deleting the parent is refused while children
//! exist, unless the registry is configured to cascade referential deletes.

use serde::{Deserialize, Serialize};

use crate::domain::{CropKind, Landholding, Locality, Planting, Producer, Region};
use crate::identity::{CropKindId, EntityKind, LandholdingId, RegionId, TaxId};

/// A natural key that at most one committed record may hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum UniqueKey {
    /// Producer primary key.
    ProducerIdentifier {
        /// The taxpayer identifier.
        identifier: TaxId,
    },
    /// Region name.
    RegionName {
        /// The region name.
        name: String,
    },
    /// Locality name within a region.
    LocalityName {
        /// The locality name.
        name: String,
        /// The region it belongs to.
        region: RegionId,
    },
    /// Crop kind name.
    CropKindName {
        /// The crop kind name.
        name: String,
    },
    /// One crop per landholding per harvest year.
    Planting {
        /// Harvest year.
        harvest_year: i32,
        /// Crop kind.
        crop_kind: CropKindId,
        /// Landholding.
        landholding: LandholdingId,
    },
}

impl std::fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProducerIdentifier { identifier } => {
                write!(f, "producer identifier {identifier}")
            }
            Self::RegionName { name } => write!(f, "region name {name:?}"),
            Self::LocalityName { name, region } => {
                write!(f, "locality name {name:?} in {region}")
            }
            Self::CropKindName { name } => write!(f, "crop kind name {name:?}"),
            Self::Planting {
                harvest_year,
                crop_kind,
                landholding,
            } => write!(
                f,
                "planting of {crop_kind} on {landholding} in harvest year {harvest_year}"
            ),
        }
    }
}

/// A record that may carry a natural key.
pub trait NaturalKey {
    /// The key this record claims, if its kind has one.
    fn natural_key(&self) -> Option<UniqueKey>;
}

impl NaturalKey for Producer {
    fn natural_key(&self) -> Option<UniqueKey> {
        Some(UniqueKey::ProducerIdentifier {
            identifier: self.identifier().clone(),
        })
    }
}

impl NaturalKey for Region {
    fn natural_key(&self) -> Option<UniqueKey> {
        Some(UniqueKey::RegionName {
            name: self.name.clone(),
        })
    }
}

impl NaturalKey for Locality {
    fn natural_key(&self) -> Option<UniqueKey> {
        Some(UniqueKey::LocalityName {
            name: self.name.clone(),
            region: self.region,
        })
    }
}

impl NaturalKey for CropKind {
    fn natural_key(&self) -> Option<UniqueKey> {
        Some(UniqueKey::CropKindName {
            name: self.name.clone(),
        })
    }
}

impl NaturalKey for Landholding {
    fn natural_key(&self) -> Option<UniqueKey> {
        None
    }
}

impl NaturalKey for Planting {
    fn natural_key(&self) -> Option<UniqueKey> {
        Some(UniqueKey::Planting {
            harvest_year: self.harvest_year,
            crop_kind: self.crop_kind,
            landholding: self.landholding,
        })
    }
}

// ─── Edges ───────────────────────────────────────────────────────────

/// How deleting the parent of an edge affects its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Composition: children are deleted with the parent.
    Owning,
    /// Reference: children block the parent's deletion unless configured otherwise.
    Referential,
}

/// A reference field from a child record kind to a parent record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// The record kind holding the reference.
    pub child: EntityKind,
    /// The field name of the reference.
    pub field: &'static str,
    /// The record kind referred to.
    pub parent: EntityKind,
    /// Cascade semantics.
    pub kind: EdgeKind,
}

impl Edge {
    /// Whether deleting the parent deletes the child unconditionally.
    pub fn is_owning(&self) -> bool {
        self.kind == EdgeKind::Owning
    }
}

/// Every reference edge of the entity graph.
pub const EDGES: [Edge; 5] = [
    Edge {
        child: EntityKind::Landholding,
        field: "owner",
        parent: EntityKind::Producer,
        kind: EdgeKind::Owning,
    },
    Edge {
        child: EntityKind::Planting,
        field: "landholding",
        parent: EntityKind::Landholding,
        kind: EdgeKind::Owning,
    },
    Edge {
        child: EntityKind::Locality,
        field: "region",
        parent: EntityKind::Region,
        kind: EdgeKind::Referential,
    },
    Edge {
        child: EntityKind::Landholding,
        field: "locality",
        parent: EntityKind::Locality,
        kind: EdgeKind::Referential,
    },
    Edge {
        child: EntityKind::Planting,
        field: "crop_kind",
        parent: EntityKind::CropKind,
        kind: EdgeKind::Referential,
    },
];

/// Edges whose parent is `parent`, i.e. the kinds that can depend on it.
pub fn edges_into(parent: EntityKind) -> impl Iterator<Item = &'static Edge> {
    EDGES.iter().filter(move |e| e.parent == parent)
}
