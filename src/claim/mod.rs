//! ORCID identity claim workflow.
//!
//! # States
//! ```text
//! Claiming ──ok──▶ WaitingForOwnership ──ok──▶ ConfiguringSplits ──ok──▶ Complete
//!    │                     │                          │
//!    └─err─▶ Failed        └─err─▶ Partial            └─err─▶ Partial
//! ```
//!
//! Steps are irreversible on-chain actions, so there is no rollback. Each
//! step's outcome is captured in [`ClaimOrcidResult`]; a failed step stops
//! the run and later steps are reported as not attempted.
//!
//! Polling sleeps through an injectable [`Clock`] so tests can run the
//! ownership deadline on virtual time.

pub mod clock;
pub mod polling;
pub mod saga;
pub mod types;

pub use clock::{Clock, TokioClock};
pub use polling::{owner_of, wait_for_owner, PollOptions};
pub use saga::{claim_orcid, claim_orcid_with_clock, prepare_claim_orcid, ClaimOrcidSaga};
pub use types::{
    ClaimOptions, ClaimOrcidResult, ClaimReceipt, ClaimStatus, OwnershipConfirmed, ProgressFn,
    SplitsConfigured, StepResult,
};
