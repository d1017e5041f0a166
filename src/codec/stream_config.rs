//! Stream config packing.
//!
//! A stream config is packed into one `uint256` as
//! `dripId << 224 | amountPerSec << 64 | start << 32 | duration`.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::codec::types::{CodecError, CodecResult};

const DRIP_ID_OFFSET: usize = 224;
const AMOUNT_OFFSET: usize = 64;
const START_OFFSET: usize = 32;

/// Largest value representable in 160 bits.
const MAX_AMOUNT_PER_SEC: U256 = U256::from_limbs([u64::MAX, u64::MAX, u32::MAX as u64, 0]);

/// Configuration of a single stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConfig {
    /// Arbitrary identifier chosen by the sender.
    pub drip_id: u32,
    /// Amount streamed per second, in the token's smallest unit times the
    /// protocol's amount multiplier. Must fit in 160 bits.
    pub amount_per_sec: U256,
    /// Start timestamp; 0 means the stream starts when it is set.
    pub start: u32,
    /// Duration in seconds; 0 means until funds run out.
    pub duration: u32,
}

impl StreamConfig {
    /// Build a config from unchecked wide integers, rejecting any field that
    /// does not fit its width.
    pub fn from_raw(drip_id: u64, amount_per_sec: U256, start: u64, duration: u64) -> CodecResult<Self> {
        let config = Self {
            drip_id: narrow_u32("dripId", drip_id)?,
            amount_per_sec,
            start: narrow_u32("start", start)?,
            duration: narrow_u32("duration", duration)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants shared by encoding and decoding.
    pub fn validate(&self) -> CodecResult<()> {
        if self.amount_per_sec.is_zero() {
            return Err(CodecError::ZeroAmountPerSec);
        }
        if self.amount_per_sec > MAX_AMOUNT_PER_SEC {
            return Err(CodecError::FieldOutOfRange {
                field: "amountPerSec",
                value: self.amount_per_sec,
                bits: 160,
            });
        }
        Ok(())
    }
}

fn narrow_u32(field: &'static str, value: u64) -> CodecResult<u32> {
    u32::try_from(value).map_err(|_| CodecError::FieldOutOfRange {
        field,
        value: U256::from(value),
        bits: 32,
    })
}

/// Pack a stream config into its on-chain `uint256` form.
pub fn encode_stream_config(config: &StreamConfig) -> CodecResult<U256> {
    config.validate()?;

    let packed = (U256::from(config.drip_id) << DRIP_ID_OFFSET)
        | (config.amount_per_sec << AMOUNT_OFFSET)
        | (U256::from(config.start) << START_OFFSET)
        | U256::from(config.duration);

    Ok(packed)
}

/// Unpack an on-chain stream config, re-validating every field.
pub fn decode_stream_config(packed: U256) -> CodecResult<StreamConfig> {
    let low_u32 = U256::from(u32::MAX);

    let config = StreamConfig {
        drip_id: (packed >> DRIP_ID_OFFSET).saturating_to::<u32>(),
        amount_per_sec: (packed >> AMOUNT_OFFSET) & MAX_AMOUNT_PER_SEC,
        start: ((packed >> START_OFFSET) & low_u32).saturating_to::<u32>(),
        duration: (packed & low_u32).saturating_to::<u32>(),
    };
    config.validate()?;

    Ok(config)
}
