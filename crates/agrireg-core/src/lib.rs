//! # agrireg-core — Foundational Types for the Farm Registry
//!
//! This crate is the leaf of the workspace. It defines the identifier
//! validator, the entity records with their structural invariants, the
//! declared uniqueness keys and ownership edges, and the error taxonomy.
//! Every other crate depends on `agrireg-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated newtypes.** `TaxId` can only hold a checksum-valid
//!    taxpayer identifier; surrogate keys (`RegionId`, `LandholdingId`, …)
//!    are distinct types.
//!
//! 2. **Draft → record.** Callers build `*Draft` values; the record types
//!    (`Producer`, `Landholding`, …) only come out of `Candidate::validate`,
//!    so holding one means its invariants held.
//!
//! 3. **Declared, not executed.** Uniqueness keys and cascade edges are
//!    data (`UniqueKey`, `EDGES`). The storage collaborator enforces them.
//!
//! ## Crate Policy
//!
//! - No I/O, no logging, no global state.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Failures are returned as structured errors; nothing is coerced except
//!   the producer's identifier kind, which is always derived.

pub mod checksum;
pub mod domain;
pub mod error;
pub mod identity;
pub mod temporal;
pub mod uniqueness;

// Re-export primary types for ergonomic imports.
pub use checksum::{classify, is_individual, is_organization};
pub use domain::{
    Candidate, CropKind, CropKindDraft, LandArea, Landholding, LandholdingDraft, Locality,
    LocalityDraft, Planting, PlantingDraft, Producer, ProducerDraft, Region, RegionDraft,
    Validate,
};
pub use error::{AgriError, IdentifierError, ValidationError};
pub use identity::{
    CropKindId, EntityKind, EntityRef, IdentifierKind, LandholdingId, LocalityId, PlantingId,
    RegionId, TaxId,
};
pub use temporal::Timestamp;
pub use uniqueness::{Edge, EdgeKind, NaturalKey, UniqueKey, EDGES};
