//! # Entity Records and Invariant Checks
//!
//! Every record enters the registry as a *draft*, the raw fields a caller
//! supplies, and leaves validation as the record type proper. The record
//! types can only be built through validation, so a value of type
//! [`Landholding`] always satisfies the area invariant and a [`Producer`]
//! always carries a checksum-valid identifier with its derived kind.
//!
//! ## Rules
//!
//! | Record | Rule |
//! |---|---|
//! | Producer | identifier classifies; kind is derived, caller's kind ignored |
//! | Landholding | areas finite and ≥ 0; `arable + vegetation <= total` |
//! | all | names are not blank |
//!
//! Uniqueness is not a per-record rule; see [`crate::uniqueness`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::{
    CropKindId, EntityKind, IdentifierKind, LandholdingId, LocalityId, RegionId, TaxId,
};

/// A caller-supplied record awaiting validation.
pub trait Candidate {
    /// The record produced by a successful validation.
    type Valid: Validate;

    /// Check every structural rule and build the validated record.
    ///
    /// Borrows the draft so that a failed validation leaves it intact.
    fn validate(&self) -> Result<Self::Valid, ValidationError>;
}

/// A validated record whose invariants can be re-checked before commit.
pub trait Validate {
    /// The kind of record.
    const KIND: EntityKind;

    /// Re-run the structural rules.
    fn revalidate(&self) -> Result<(), ValidationError>;
}

fn require_name(name: &str, entity: EntityKind) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName { entity });
    }
    Ok(())
}

// ─── Producer ────────────────────────────────────────────────────────

/// Caller input for a producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerDraft {
    /// Taxpayer identifier, masked or bare.
    pub identifier: String,
    /// Producer name.
    pub name: String,
    /// Ignored: the kind is always derived from the identifier.
    #[serde(default)]
    pub identifier_kind: Option<IdentifierKind>,
}

impl ProducerDraft {
    /// A draft with no caller-supplied kind.
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            identifier_kind: None,
        }
    }
}

impl Candidate for ProducerDraft {
    type Valid = Producer;

    fn validate(&self) -> Result<Producer, ValidationError> {
        let identifier = TaxId::new(self.identifier.as_str())?;
        Producer::new(identifier, self.name.clone())
    }
}

/// A rural producer, keyed by taxpayer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Producer {
    identifier: TaxId,
    identifier_kind: IdentifierKind,
    name: String,
}

impl Producer {
    /// Build a producer; the kind is taken from the identifier.
    pub fn new(identifier: TaxId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        require_name(&name, EntityKind::Producer)?;
        Ok(Self {
            identifier_kind: identifier.kind(),
            identifier,
            name,
        })
    }

    /// The primary key.
    pub fn identifier(&self) -> &TaxId {
        &self.identifier
    }

    /// Always equal to `self.identifier().kind()`.
    pub fn identifier_kind(&self) -> IdentifierKind {
        self.identifier_kind
    }

    /// Producer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the name, rejecting a blank one.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        require_name(&name, EntityKind::Producer)?;
        self.name = name;
        Ok(())
    }
}

impl Validate for Producer {
    const KIND: EntityKind = EntityKind::Producer;

    fn revalidate(&self) -> Result<(), ValidationError> {
        TaxId::new(self.identifier.as_str())?;
        require_name(&self.name, EntityKind::Producer)
    }
}

impl std::fmt::Display for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.identifier)
    }
}

// ─── Region, Locality, CropKind ──────────────────────────────────────

/// Caller input for a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDraft {
    /// Region name, unique across all regions.
    pub name: String,
}

/// A state-level region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    /// Region name.
    pub name: String,
}

impl Candidate for RegionDraft {
    type Valid = Region;

    fn validate(&self) -> Result<Region, ValidationError> {
        require_name(&self.name, EntityKind::Region)?;
        Ok(Region {
            name: self.name.clone(),
        })
    }
}

impl Validate for Region {
    const KIND: EntityKind = EntityKind::Region;

    fn revalidate(&self) -> Result<(), ValidationError> {
        require_name(&self.name, EntityKind::Region)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Caller input for a locality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityDraft {
    /// Locality name, unique within its region.
    pub name: String,
    /// The region the locality belongs to.
    pub region: RegionId,
}

/// A city-level locality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locality {
    /// Locality name.
    pub name: String,
    /// The region the locality belongs to.
    pub region: RegionId,
}

impl Candidate for LocalityDraft {
    type Valid = Locality;

    fn validate(&self) -> Result<Locality, ValidationError> {
        require_name(&self.name, EntityKind::Locality)?;
        Ok(Locality {
            name: self.name.clone(),
            region: self.region,
        })
    }
}

impl Validate for Locality {
    const KIND: EntityKind = EntityKind::Locality;

    fn revalidate(&self) -> Result<(), ValidationError> {
        require_name(&self.name, EntityKind::Locality)
    }
}

/// Caller input for a crop kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropKindDraft {
    /// Crop kind name, unique across all crop kinds.
    pub name: String,
}

/// A kind of crop (soy, corn, coffee, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropKind {
    /// Crop kind name.
    pub name: String,
}

impl Candidate for CropKindDraft {
    type Valid = CropKind;

    fn validate(&self) -> Result<CropKind, ValidationError> {
        require_name(&self.name, EntityKind::CropKind)?;
        Ok(CropKind {
            name: self.name.clone(),
        })
    }
}

impl Validate for CropKind {
    const KIND: EntityKind = EntityKind::CropKind;

    fn revalidate(&self) -> Result<(), ValidationError> {
        require_name(&self.name, EntityKind::CropKind)
    }
}

impl std::fmt::Display for CropKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

// ─── Landholding ─────────────────────────────────────────────────────

/// The three area figures of a landholding, in one unit (hectares).
///
/// Only constructible through [`LandArea::new`], which enforces
/// `arable + vegetation <= total` with every figure finite and ≥ 0.
/// Equality of the sum and the total is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LandArea {
    #[serde(rename = "total_area")]
    total: f64,
    #[serde(rename = "arable_area")]
    arable: f64,
    #[serde(rename = "vegetation_area")]
    vegetation: f64,
}

impl LandArea {
    /// Validate and build an area partition.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NonFiniteArea`] for NaN or infinite figures.
    /// - [`ValidationError::NegativeArea`] for figures below zero.
    /// - [`ValidationError::AreaInvariantViolation`] when arable plus
    ///   vegetation exceeds the total.
    pub fn new(total: f64, arable: f64, vegetation: f64) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("total_area", total),
            ("arable_area", arable),
            ("vegetation_area", vegetation),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteArea { field, value });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeArea { field, value });
            }
        }
        if arable + vegetation > total {
            return Err(ValidationError::AreaInvariantViolation {
                total,
                arable,
                vegetation,
            });
        }
        Ok(Self {
            total,
            arable,
            vegetation,
        })
    }

    /// Total area.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Arable area.
    pub fn arable(&self) -> f64 {
        self.arable
    }

    /// Native vegetation area.
    pub fn vegetation(&self) -> f64 {
        self.vegetation
    }

    /// Area that is neither arable nor vegetation.
    pub fn unallocated(&self) -> f64 {
        self.total - self.arable - self.vegetation
    }
}

/// Caller input for a landholding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandholdingDraft {
    /// Landholding name.
    pub name: String,
    /// Total area.
    pub total_area: f64,
    /// Arable area.
    pub arable_area: f64,
    /// Native vegetation area.
    pub vegetation_area: f64,
    /// Where the landholding is.
    pub locality: LocalityId,
    /// The producer that owns it.
    pub owner: TaxId,
}

/// A registered tract of land owned by one producer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Landholding {
    /// Landholding name.
    pub name: String,
    /// Area partition; always satisfies the area invariant.
    #[serde(flatten)]
    pub area: LandArea,
    /// Where the landholding is (referential edge).
    pub locality: LocalityId,
    /// The owning producer (owning edge).
    pub owner: TaxId,
}

impl Candidate for LandholdingDraft {
    type Valid = Landholding;

    fn validate(&self) -> Result<Landholding, ValidationError> {
        require_name(&self.name, EntityKind::Landholding)?;
        let area = LandArea::new(self.total_area, self.arable_area, self.vegetation_area)?;
        Ok(Landholding {
            name: self.name.clone(),
            area,
            locality: self.locality,
            owner: self.owner.clone(),
        })
    }
}

impl Validate for Landholding {
    const KIND: EntityKind = EntityKind::Landholding;

    fn revalidate(&self) -> Result<(), ValidationError> {
        require_name(&self.name, EntityKind::Landholding)?;
        LandArea::new(self.area.total, self.area.arable, self.area.vegetation).map(|_| ())
    }
}

impl std::fmt::Display for Landholding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

// ─── Planting ────────────────────────────────────────────────────────

/// Caller input for a planting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantingDraft {
    /// Harvest year of the planting cycle.
    pub harvest_year: i32,
    /// What was planted (referential edge).
    pub crop_kind: CropKindId,
    /// Where it was planted (owning edge).
    pub landholding: LandholdingId,
}

/// One crop kind grown on one landholding in one harvest year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Planting {
    /// Harvest year of the planting cycle.
    pub harvest_year: i32,
    /// What was planted.
    pub crop_kind: CropKindId,
    /// Where it was planted.
    pub landholding: LandholdingId,
}

impl Candidate for PlantingDraft {
    type Valid = Planting;

    fn validate(&self) -> Result<Planting, ValidationError> {
        Ok(Planting {
            harvest_year: self.harvest_year,
            crop_kind: self.crop_kind,
            landholding: self.landholding,
        })
    }
}

impl Validate for Planting {
    const KIND: EntityKind = EntityKind::Planting;

    fn revalidate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentifierError;

    fn owner() -> TaxId {
        TaxId::new("12345678909").unwrap()
    }

    fn holding(total: f64, arable: f64, vegetation: f64) -> LandholdingDraft {
        LandholdingDraft {
            name: "Fazenda Teste".into(),
            total_area: total,
            arable_area: arable,
            vegetation_area: vegetation,
            locality: LocalityId::new(1),
            owner: owner(),
        }
    }

    // ── Producer ─────────────────────────────────────────────────────

    #[test]
    fn producer_kind_is_derived() {
        let mut draft = ProducerDraft::new("11.222.333/0001-81", "Cooperativa");
        draft.identifier_kind = Some(IdentifierKind::Individual);
        let producer = draft.validate().unwrap();
        assert_eq!(producer.identifier_kind(), IdentifierKind::Organization);
        assert_eq!(producer.identifier().as_str(), "11222333000181");
    }

    #[test]
    fn producer_invalid_identifier_rejected() {
        let err = ProducerDraft::new("123", "Inválido").validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Identifier(IdentifierError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn producer_display() {
        let producer = ProducerDraft::new("12345678909", "Produtor CPF")
            .validate()
            .unwrap();
        assert_eq!(producer.to_string(), "Produtor CPF (12345678909)");
    }

    #[test]
    fn producer_blank_name_rejected() {
        let err = ProducerDraft::new("12345678909", "   ").validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::EmptyName {
                entity: EntityKind::Producer
            }
        );
    }

    #[test]
    fn producer_rename_keeps_old_name_on_failure() {
        let mut producer = ProducerDraft::new("12345678909", "Antigo").validate().unwrap();
        assert!(producer.rename("").is_err());
        assert_eq!(producer.name(), "Antigo");
        producer.rename("Novo").unwrap();
        assert_eq!(producer.name(), "Novo");
    }

    // ── Landholding ──────────────────────────────────────────────────

    #[test]
    fn area_overflow_rejected() {
        let err = holding(100.0, 80.0, 30.0).validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::AreaInvariantViolation {
                total: 100.0,
                arable: 80.0,
                vegetation: 30.0,
            }
        );
    }

    #[test]
    fn area_exact_partition_allowed() {
        let landholding = holding(100.0, 60.0, 40.0).validate().unwrap();
        assert_eq!(landholding.area.unallocated(), 0.0);
        assert!(landholding.revalidate().is_ok());
    }

    #[test]
    fn area_negative_rejected() {
        let err = holding(100.0, -1.0, 10.0).validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeArea {
                field: "arable_area",
                value: -1.0,
            }
        );
    }

    #[test]
    fn area_non_finite_rejected() {
        assert!(matches!(
            LandArea::new(f64::NAN, 0.0, 0.0),
            Err(ValidationError::NonFiniteArea {
                field: "total_area",
                ..
            })
        ));
        assert!(matches!(
            LandArea::new(10.0, 0.0, f64::INFINITY),
            Err(ValidationError::NonFiniteArea {
                field: "vegetation_area",
                ..
            })
        ));
    }

    #[test]
    fn area_all_zero_allowed() {
        let area = LandArea::new(0.0, 0.0, 0.0).unwrap();
        assert_eq!(area.total(), 0.0);
    }

    #[test]
    fn landholding_serializes_flat_area_fields() {
        let landholding = holding(100.0, 60.0, 40.0).validate().unwrap();
        let json = serde_json::to_value(&landholding).unwrap();
        assert_eq!(json["total_area"], 100.0);
        assert_eq!(json["arable_area"], 60.0);
        assert_eq!(json["vegetation_area"], 40.0);
        assert_eq!(json["owner"], "12345678909");
    }

    // ── Names ────────────────────────────────────────────────────────

    #[test]
    fn blank_names_rejected_for_every_named_record() {
        assert!(RegionDraft { name: "".into() }.validate().is_err());
        assert!(CropKindDraft { name: " ".into() }.validate().is_err());
        assert!(LocalityDraft {
            name: "\t".into(),
            region: RegionId::new(1)
        }
        .validate()
        .is_err());
    }
}
