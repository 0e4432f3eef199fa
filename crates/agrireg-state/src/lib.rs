//! # agrireg-state — Record Lifecycle and Registry
//!
//! Implements the lifecycle every farm-registry record goes through and the
//! in-memory store that enforces the cross-record rules.
//!
//! ## Modules
//!
//! - **Lifecycle** (`lifecycle.rs`): `Proposed → Validated → Committed →
//!   Deleted` as a typestate. A proposed record has no commit method and a
//!   deleted record has no methods that touch the registry at all.
//!
//! - **Registry** (`registry.rs`): one ordered table per record kind, a
//!   natural-key index for uniqueness, and the cascade planner that walks
//!   the declared ownership edges on delete.
//!
//! - **View** (`view.rs`): the read-only [`GraphView`] consumed by the
//!   aggregation engine, implemented by the live registry and by
//!   point-in-time [`Snapshot`]s.
//!
//! ## Design
//!
//! Records refer to each other by surrogate key, never by pointer. Deleting
//! a producer, landholding, or (under the cascade policy) a region, locality,
//! or crop kind plans the complete set of removals before touching any
//! table, so a blocked delete leaves the graph unchanged.

pub mod lifecycle;
pub mod registry;
pub mod view;

// ─── Lifecycle re-exports ───────────────────────────────────────────

pub use lifecycle::{
    Committed, Deleted, LifecycleStage, LifecycleState, Proposed, Record, TransitionRecord,
    Validated,
};

// ─── Registry re-exports ────────────────────────────────────────────

pub use registry::{CascadeReport, ReferentialPolicy, Registry, RegistryConfig};

// ─── View re-exports ────────────────────────────────────────────────

pub use view::{GraphView, Snapshot};
