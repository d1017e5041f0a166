//! Splits receiver resolution.
//!
//! # Data Flow
//! ```text
//! SdkSplitsReceiver (project | drip-list | sub-list | address | ecosystem-main-account)
//!     → resolver.rs (at most one chain read per receiver)
//!     → OnChainSplitsReceiver { accountId, weight }
//!     → format_splits_receivers (sorted, unique, weight-bounded)
//! ```
//!
//! Every other component turns receivers into account IDs through this
//! module; none re-implements resolution.

pub mod resolver;
pub mod types;

pub use resolver::{parse_project_url, resolve_account_id, resolve_receiver, resolve_receivers, ProjectUrl};

pub(crate) use resolver::{calc_address_account_id, calc_project_account_id, receivers_on};
pub use types::{format_splits_receivers, OnChainSplitsReceiver, SdkSplitsReceiver};
