//! Drips protocol client SDK.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                     DRIPS SDK                         │
//!                 │                                                       │
//!   CollectConfig │  ┌──────────┐    ┌───────────┐    ┌──────────────┐   │
//!   ──────────────┼─▶│ collect  │───▶│ receivers │───▶│  contracts   │   │
//!                 │  │ planner  │    │ resolver  │    │  (sol! ABI)  │   │
//!                 │  └────┬─────┘    └───────────┘    └──────┬───────┘   │
//!   ORCID iD      │  ┌────┴─────┐          │                 │           │
//!   ──────────────┼─▶│  claim   │──────────┘                 ▼           │
//!                 │  │  saga    │                    ┌──────────────┐    │
//!                 │  └──────────┘                    │    chain     │────┼──▶ JSON-RPC
//!                 │                                  │ Read/Write   │    │
//!                 │  ┌─────────┐ ┌──────────┐        └──────────────┘    │
//!                 │  │  codec  │ │ registry │  config · observability    │
//!                 │  └─────────┘ └──────────┘                            │
//!                 └──────────────────────────────────────────────────────┘
//! ```
//!
//! Every entry point takes its chain client and [`ContractRegistry`]
//! explicitly; there is no global state.

pub mod chain;
pub mod claim;
pub mod codec;
pub mod collect;
pub mod config;
pub mod contracts;
pub mod error;
pub mod observability;
pub mod receivers;
pub mod registry;

pub use chain::{PendingTx, PreparedTx, ReadClient, RpcClient, SigningClient, TxOverrides, Wallet, WriteClient};
pub use claim::{claim_orcid, prepare_claim_orcid, ClaimOptions, ClaimOrcidResult, ClaimStatus};
pub use codec::{decode_stream_config, encode_stream_config, Orcid, StreamConfig};
pub use collect::{build_collect_calls, collect, prepare_collection, CollectConfig};
pub use config::SdkConfig;
pub use error::{DripsError, DripsResult};
pub use receivers::{resolve_receivers, SdkSplitsReceiver};
pub use registry::{ChainContracts, ContractRegistry};
