//! Funds collection planning and batching.
//!
//! # Data Flow
//! ```text
//! CollectConfig
//!     → planner.rs (preconditions, receiver resolution, ordered calls)
//!         per token: squeezeStreams* → receiveStreams → split → collect → unwrap
//!     → batch.rs (Caller.callBatched over every call, in emission order)
//!     → PreparedTx
//! ```
//!
//! # Design Decisions
//! - Every precondition is checked before the first call is built
//! - Call order is part of the contract: receive before split, collect before unwrap
//! - Plans are plain data; building one never touches shared state

pub mod batch;
pub mod planner;
pub mod types;

pub use batch::{encode_batch, to_caller_call};
pub use planner::{build_collect_calls, collect, plan_collection, prepare_collection, CollectPlan};
pub use types::{CollectConfig, SqueezeArgs, StreamReceiverEntry, StreamsHistoryEntry};
