//! # Record Lifecycle Typestate
//!
//! Every record moves through the same four states. Each state is a
//! distinct Rust type, and transitions are methods that consume the current
//! state and produce the next one.
//!
//! ## States
//!
//! ```text
//! Proposed ──validate()──▶ Validated ──Registry::commit_*()──▶ Committed ──delete()──▶ Deleted
//!    ▲            │
//!    └── error ───┘   (the draft stays Proposed and can be fixed and retried)
//! ```
//!
//! - `Record<D, Proposed>` holds a caller draft (`D: Candidate`).
//! - `Record<T, Validated>` holds a validated record (`T: Validate`).
//! - `Record<K, Committed>` holds the key the registry assigned.
//! - `Record<K, Deleted>` holds the key of a removed record (terminal).
//!
//! Only the registry can produce a `Committed` record, and it re-runs the
//! record's invariants immediately before doing so.
//!
//! ## Compile-Time Safety Example
//!
//! A proposed record cannot be committed without validation:
//!
//! ```compile_fail
//! use agrireg_core::RegionDraft;
//! use agrireg_state::{Proposed, Record, Registry, RegistryConfig};
//!
//! let mut registry = Registry::new(RegistryConfig::default());
//! let proposed = Record::<_, Proposed>::propose(RegionDraft { name: "Bahia".into() });
//! // ERROR: expected `Record<Region, Validated>`, found `Record<RegionDraft, Proposed>`
//! registry.commit_region(proposed);
//! ```

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use agrireg_core::{AgriError, Candidate, EntityRef, Timestamp, Validate, ValidationError};

use crate::registry::{CascadeReport, Registry};

// ─── State Types ─────────────────────────────────────────────────────

/// Record state: caller input, not yet checked.
#[derive(Debug, Clone, Copy)]
pub struct Proposed;

/// Record state: invariants checked, not yet stored.
#[derive(Debug, Clone, Copy)]
pub struct Validated;

/// Record state: stored in the registry under an assigned key.
#[derive(Debug, Clone, Copy)]
pub struct Committed;

/// Record state: removed from the registry (terminal).
#[derive(Debug, Clone, Copy)]
pub struct Deleted;

mod private {
    pub trait Sealed {}
    impl Sealed for super::Proposed {}
    impl Sealed for super::Validated {}
    impl Sealed for super::Committed {}
    impl Sealed for super::Deleted {}
}

/// Marker trait for the four lifecycle states.
///
/// Sealed: only the states defined in this module implement it.
pub trait LifecycleState: private::Sealed + std::fmt::Debug {
    /// Runtime mirror of this state.
    const STAGE: LifecycleStage;

    /// The canonical state name (e.g., "PROPOSED").
    fn name() -> &'static str {
        Self::STAGE.name()
    }

    /// Whether this state is terminal.
    fn is_terminal() -> bool {
        Self::STAGE.is_terminal()
    }
}

impl LifecycleState for Proposed {
    const STAGE: LifecycleStage = LifecycleStage::Proposed;
}
impl LifecycleState for Validated {
    const STAGE: LifecycleStage = LifecycleStage::Validated;
}
impl LifecycleState for Committed {
    const STAGE: LifecycleStage = LifecycleStage::Committed;
}
impl LifecycleState for Deleted {
    const STAGE: LifecycleStage = LifecycleStage::Deleted;
}

// ─── Runtime Stage ───────────────────────────────────────────────────

/// Runtime representation of a lifecycle state, for collaborators that
/// persist the state of a record and load it back without static types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStage {
    /// Caller input, not yet checked.
    Proposed,
    /// Invariants checked.
    Validated,
    /// Stored.
    Committed,
    /// Removed (terminal).
    Deleted,
}

impl LifecycleStage {
    /// Canonical state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Proposed => "PROPOSED",
            Self::Validated => "VALIDATED",
            Self::Committed => "COMMITTED",
            Self::Deleted => "DELETED",
        }
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deleted)
    }

    /// Whether the state machine allows `self → to`.
    pub fn can_transition_to(&self, to: LifecycleStage) -> bool {
        matches!(
            (self, to),
            (Self::Proposed, Self::Validated)
                | (Self::Validated, Self::Committed)
                | (Self::Committed, Self::Deleted)
        )
    }

    /// Runtime-checked transition.
    ///
    /// # Errors
    ///
    /// Returns [`AgriError::InvalidTransition`] for any pair not allowed by
    /// [`LifecycleStage::can_transition_to`].
    pub fn try_transition(self, to: LifecycleStage) -> Result<LifecycleStage, AgriError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(AgriError::InvalidTransition {
                from: self.name().to_string(),
                to: to.name().to_string(),
            })
        }
    }
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Transition Record ───────────────────────────────────────────────

/// Record of a single lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition.
    pub from_state: LifecycleStage,
    /// State after the transition.
    pub to_state: LifecycleStage,
    /// When the transition occurred (UTC).
    pub timestamp: Timestamp,
}

// ─── The Record ──────────────────────────────────────────────────────

/// A registry record parameterized by its lifecycle state.
///
/// The payload changes type along the way: a draft while proposed, the
/// validated record while validated, and the assigned key once committed.
#[derive(Debug, Clone)]
pub struct Record<T, S: LifecycleState> {
    payload: T,
    proposed_at: Timestamp,
    transition_log: Vec<TransitionRecord>,
    _state: PhantomData<S>,
}

impl<T, S: LifecycleState> Record<T, S> {
    /// The canonical state name.
    pub fn state_name(&self) -> &'static str {
        S::name()
    }

    /// Whether the record is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        S::is_terminal()
    }

    /// When the record was first proposed.
    pub fn proposed_at(&self) -> Timestamp {
        self.proposed_at
    }

    /// Every transition so far, oldest first.
    pub fn transition_log(&self) -> &[TransitionRecord] {
        &self.transition_log
    }

    /// Borrow the payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Take the payload, discarding the lifecycle wrapper.
    pub fn into_payload(self) -> T {
        self.payload
    }

    fn transition_to<U, N: LifecycleState>(&self, payload: U) -> Record<U, N> {
        let mut transition_log = self.transition_log.clone();
        transition_log.push(TransitionRecord {
            from_state: S::STAGE,
            to_state: N::STAGE,
            timestamp: Timestamp::now(),
        });
        Record {
            payload,
            proposed_at: self.proposed_at,
            transition_log,
            _state: PhantomData,
        }
    }
}

impl<D: Candidate> Record<D, Proposed> {
    /// Wrap a caller draft.
    pub fn propose(draft: D) -> Self {
        Self {
            payload: draft,
            proposed_at: Timestamp::now(),
            transition_log: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Mutable access to the draft, to fix it after a failed validation.
    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.payload
    }

    /// Run the record's structural checks (PROPOSED → VALIDATED).
    ///
    /// On failure the proposed record is untouched and the specific
    /// violation is returned.
    pub fn validate(&self) -> Result<Record<D::Valid, Validated>, ValidationError> {
        let valid = self.payload.validate()?;
        Ok(self.transition_to(valid))
    }
}

impl<T: Validate> Record<T, Validated> {
    /// Re-run the invariants, as the registry does right before commit.
    pub fn revalidate(&self) -> Result<(), ValidationError> {
        self.payload.revalidate()
    }

    /// VALIDATED → COMMITTED, once the registry has stored the record.
    pub(crate) fn into_committed<K>(self, key: K) -> Record<K, Committed> {
        self.transition_to(key)
    }
}

impl<K: Clone + Into<EntityRef>> Record<K, Committed> {
    /// The key assigned by the registry.
    pub fn key(&self) -> &K {
        &self.payload
    }

    /// The key as an untyped entity reference.
    pub fn entity_ref(&self) -> EntityRef {
        self.payload.clone().into()
    }

    /// Delete the record and everything it owns (COMMITTED → DELETED).
    ///
    /// On failure nothing is removed and the committed record is handed back
    /// together with the reason.
    #[allow(clippy::result_large_err)]
    pub fn delete(
        self,
        registry: &mut Registry,
    ) -> Result<(Record<K, Deleted>, CascadeReport), (Self, AgriError)> {
        match registry.delete(self.entity_ref()) {
            Ok(report) => {
                let deleted = self.transition_to(self.payload.clone());
                Ok((deleted, report))
            }
            Err(err) => Err((self, err)),
        }
    }
}

impl<K> Record<K, Deleted> {
    /// The key the record had while committed.
    pub fn former_key(&self) -> &K {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrireg_core::{ProducerDraft, RegionDraft};

    use crate::registry::RegistryConfig;

    // ── Stage table ──────────────────────────────────────────────────

    #[test]
    fn only_forward_single_steps_are_allowed() {
        use LifecycleStage as L;
        let all = [L::Proposed, L::Validated, L::Committed, L::Deleted];
        for from in all {
            for to in all {
                let expected = matches!(
                    (from, to),
                    (L::Proposed, L::Validated)
                        | (L::Validated, L::Committed)
                        | (L::Committed, L::Deleted)
                );
                assert_eq!(from.can_transition_to(to), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn try_transition_rejects_skips() {
        let err = LifecycleStage::Proposed
            .try_transition(LifecycleStage::Committed)
            .unwrap_err();
        assert_eq!(
            err,
            AgriError::InvalidTransition {
                from: "PROPOSED".into(),
                to: "COMMITTED".into(),
            }
        );
        assert!(LifecycleStage::Deleted.is_terminal());
    }

    // ── Typestate ────────────────────────────────────────────────────

    #[test]
    fn failed_validation_leaves_record_proposed() {
        let mut proposed = Record::propose(ProducerDraft::new("12345678900", "Produtor"));
        assert!(proposed.validate().is_err());
        assert_eq!(proposed.state_name(), "PROPOSED");
        assert!(proposed.transition_log().is_empty());

        proposed.draft_mut().identifier = "12345678909".into();
        let validated = proposed.validate().unwrap();
        assert_eq!(validated.state_name(), "VALIDATED");
        assert_eq!(validated.transition_log().len(), 1);
    }

    #[test]
    fn full_lifecycle_logs_every_transition() {
        let mut registry = Registry::new(RegistryConfig::default());
        let validated = Record::propose(RegionDraft {
            name: "Bahia".into(),
        })
        .validate()
        .unwrap();
        let proposed_at = validated.proposed_at();
        let committed = registry.commit_region(validated).unwrap();
        assert_eq!(committed.state_name(), "COMMITTED");
        assert_eq!(committed.proposed_at(), proposed_at);
        assert!(committed.transition_log()[0].timestamp >= proposed_at);

        let (deleted, report) = committed.delete(&mut registry).unwrap();
        assert!(deleted.is_terminal());
        assert_eq!(report.removed.len(), 1);

        let stages: Vec<_> = deleted
            .transition_log()
            .iter()
            .map(|t| (t.from_state, t.to_state))
            .collect();
        assert_eq!(
            stages,
            vec![
                (LifecycleStage::Proposed, LifecycleStage::Validated),
                (LifecycleStage::Validated, LifecycleStage::Committed),
                (LifecycleStage::Committed, LifecycleStage::Deleted),
            ]
        );
        assert!(registry.region(*deleted.former_key()).is_none());
    }

    #[test]
    fn failed_delete_hands_back_committed_record() {
        let mut registry = Registry::new(RegistryConfig::default());
        let region = registry
            .commit_region(
                Record::propose(RegionDraft {
                    name: "Bahia".into(),
                })
                .validate()
                .unwrap(),
            )
            .unwrap();
        let region_id = *region.key();
        registry
            .commit_locality(
                Record::propose(agrireg_core::LocalityDraft {
                    name: "Salvador".into(),
                    region: region_id,
                })
                .validate()
                .unwrap(),
            )
            .unwrap();

        let (kept, err) = region.delete(&mut registry).unwrap_err();
        assert!(matches!(err, AgriError::DependentsExist { dependents: 1, .. }));
        assert_eq!(*kept.key(), region_id);
        assert!(registry.region(region_id).is_some());
    }
}
