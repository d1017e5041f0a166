//! Account-identity codec.
//!
//! # Responsibilities
//! - Pack and unpack stream configs into a single `uint256`
//! - Discriminate account IDs by driver type (top 32 bits)
//! - Extract the address held by an AddressDriver account ID
//! - Validate ORCID identifiers before they are claimed
//!
//! # Bit Layouts
//! ```text
//! StreamConfig  | dripId (32) | amountPerSec (160) | start (32) | duration (32) |
//! AccountId     | driver (32) | reserved (64)      | address (160)              |
//! ```
//!
//! Everything here is pure: no chain I/O, no allocation beyond error messages.

pub mod account_id;
pub mod orcid;
pub mod stream_config;
pub mod types;

pub use account_id::{parse_account_id, resolve_address_from_address_driver_id, resolve_driver_name};
pub use orcid::Orcid;
pub use stream_config::{decode_stream_config, encode_stream_config, StreamConfig};
pub use types::{CodecError, CodecResult, DriverName};
