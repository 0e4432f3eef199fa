//! # Identity Newtypes
//!
//! Domain-primitive newtypes for every identifier in the registry. Each
//! identifier is a distinct type, so a [`RegionId`] cannot be passed where a
//! [`LocalityId`] is expected.
//!
//! ## Validation
//!
//! [`TaxId`] validates its checksum at construction and stores digits only.
//! Surrogate identifiers ([`RegionId`], [`LocalityId`], [`CropKindId`],
//! [`LandholdingId`], [`PlantingId`]) are assigned by the registry and are
//! valid by construction.

use serde::{Deserialize, Serialize};

use crate::checksum;
use crate::error::IdentifierError;

/// Implement `Deserialize` for a string newtype by routing the raw value
/// through its validating `new()` constructor, so that invalid values are
/// rejected at deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Define an integer surrogate key with a `kind:n` display form.
macro_rules! surrogate_id {
    ($(#[$meta:meta])* $ty:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $ty(u64);

        impl $ty {
            /// Wrap a raw surrogate value.
            pub fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// The raw surrogate value.
            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Surrogate keys (assigned by the registry)
// ---------------------------------------------------------------------------

surrogate_id!(
    /// Surrogate key of a state-level region.
    RegionId,
    "region"
);
surrogate_id!(
    /// Surrogate key of a city-level locality.
    LocalityId,
    "locality"
);
surrogate_id!(
    /// Surrogate key of a crop kind.
    CropKindId,
    "crop_kind"
);
surrogate_id!(
    /// Surrogate key of a landholding.
    LandholdingId,
    "landholding"
);
surrogate_id!(
    /// Surrogate key of a planting.
    PlantingId,
    "planting"
);

// ---------------------------------------------------------------------------
// Taxpayer identifier
// ---------------------------------------------------------------------------

/// Classification of a taxpayer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentifierKind {
    /// 11-digit personal taxpayer number.
    Individual,
    /// 14-digit entity taxpayer number.
    Organization,
}

impl IdentifierKind {
    /// Canonical name ("INDIVIDUAL" or "ORGANIZATION").
    pub fn name(&self) -> &'static str {
        match self {
            Self::Individual => "INDIVIDUAL",
            Self::Organization => "ORGANIZATION",
        }
    }

    /// Number of digits in an identifier of this kind.
    pub fn digit_count(&self) -> usize {
        match self {
            Self::Individual => checksum::INDIVIDUAL_LEN,
            Self::Organization => checksum::ORGANIZATION_LEN,
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A checksum-valid Brazilian taxpayer identifier (individual or organization).
///
/// Accepts masked (`123.456.789-09`, `11.222.333/0001-81`) or bare input and
/// stores the bare digits. Immutable once constructed; it is the primary key
/// of a producer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaxId(String);

impl_validating_deserialize!(TaxId);

impl TaxId {
    /// Create a taxpayer identifier, validating length and check digits.
    ///
    /// # Errors
    ///
    /// Returns the [`IdentifierError`] produced by [`checksum::classify`].
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let raw = value.into();
        checksum::classify(&raw)?;
        Ok(Self(checksum::normalize(&raw)))
    }

    /// The bare digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classification, derived from the digit count.
    pub fn kind(&self) -> IdentifierKind {
        if self.0.len() == checksum::INDIVIDUAL_LEN {
            IdentifierKind::Individual
        } else {
            IdentifierKind::Organization
        }
    }

    /// The identifier with its conventional mask applied.
    ///
    /// Individual: `000.000.000-00`. Organization: `00.000.000/0000-00`.
    pub fn formatted(&self) -> String {
        let d = &self.0;
        match self.kind() {
            IdentifierKind::Individual => {
                format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..])
            }
            IdentifierKind::Organization => format!(
                "{}.{}.{}/{}-{}",
                &d[..2],
                &d[2..5],
                &d[5..8],
                &d[8..12],
                &d[12..]
            ),
        }
    }
}

impl std::fmt::Display for TaxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TaxId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// Entity references
// ---------------------------------------------------------------------------

/// The five kinds of record in the ownership graph, plus crop kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A rural producer.
    Producer,
    /// A state-level region.
    Region,
    /// A city-level locality.
    Locality,
    /// A kind of crop.
    CropKind,
    /// A tract of land.
    Landholding,
    /// One crop on one landholding in one harvest year.
    Planting,
}

impl EntityKind {
    /// Lowercase name used in display forms.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Producer => "producer",
            Self::Region => "region",
            Self::Locality => "locality",
            Self::CropKind => "crop_kind",
            Self::Landholding => "landholding",
            Self::Planting => "planting",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed pointer to any committed record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    /// A producer, by taxpayer identifier.
    Producer(TaxId),
    /// A region.
    Region(RegionId),
    /// A locality.
    Locality(LocalityId),
    /// A crop kind.
    CropKind(CropKindId),
    /// A landholding.
    Landholding(LandholdingId),
    /// A planting.
    Planting(PlantingId),
}

impl EntityRef {
    /// The kind of record this reference points to.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Producer(_) => EntityKind::Producer,
            Self::Region(_) => EntityKind::Region,
            Self::Locality(_) => EntityKind::Locality,
            Self::CropKind(_) => EntityKind::CropKind,
            Self::Landholding(_) => EntityKind::Landholding,
            Self::Planting(_) => EntityKind::Planting,
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Producer(id) => write!(f, "producer:{id}"),
            Self::Region(id) => write!(f, "{id}"),
            Self::Locality(id) => write!(f, "{id}"),
            Self::CropKind(id) => write!(f, "{id}"),
            Self::Landholding(id) => write!(f, "{id}"),
            Self::Planting(id) => write!(f, "{id}"),
        }
    }
}

impl From<TaxId> for EntityRef {
    fn from(id: TaxId) -> Self {
        Self::Producer(id)
    }
}

impl From<RegionId> for EntityRef {
    fn from(id: RegionId) -> Self {
        Self::Region(id)
    }
}

impl From<LocalityId> for EntityRef {
    fn from(id: LocalityId) -> Self {
        Self::Locality(id)
    }
}

impl From<CropKindId> for EntityRef {
    fn from(id: CropKindId) -> Self {
        Self::CropKind(id)
    }
}

impl From<LandholdingId> for EntityRef {
    fn from(id: LandholdingId) -> Self {
        Self::Landholding(id)
    }
}

impl From<PlantingId> for EntityRef {
    fn from(id: PlantingId) -> Self {
        Self::Planting(id)
    }
}
