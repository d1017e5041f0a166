//! Account-ID decoding.

use alloy::primitives::{Address, U256};

use crate::codec::types::{CodecError, CodecResult, DriverName};

const DRIVER_OFFSET: usize = 224;
const ADDRESS_BITS: usize = 160;

/// Mask over the 64 reserved bits (160..=223) of an AddressDriver ID.
const RESERVED_MASK: U256 = U256::from_limbs([0, 0, 0xffff_ffff_0000_0000, 0xffff_ffff]);

/// Parse account-ID text (decimal or `0x` hex), checking it fits in 256 bits.
pub fn parse_account_id(text: &str) -> CodecResult<U256> {
    let trimmed = text.trim();
    trimmed
        .parse::<U256>()
        .map_err(|_| CodecError::AccountIdOutOfRange(trimmed.to_string()))
}

/// The raw driver ID held in the top 32 bits.
pub fn driver_id(account_id: U256) -> u32 {
    (account_id >> DRIVER_OFFSET).saturating_to::<u32>()
}

/// Name the driver that owns `account_id`.
///
/// Fails with [`CodecError::UnknownDriver`] for any driver ID outside 0..=5.
pub fn resolve_driver_name(account_id: U256) -> CodecResult<DriverName> {
    let driver_id = driver_id(account_id);
    DriverName::from_driver_id(driver_id).ok_or(CodecError::UnknownDriver {
        driver_id,
        account_id,
    })
}

/// Extract the address encoded in an AddressDriver account ID.
///
/// The returned [`Address`] displays in EIP-55 checksummed form. Any set bit in
/// positions 160..=223 means the ID came from another driver and is rejected.
pub fn resolve_address_from_address_driver_id(account_id: U256) -> CodecResult<Address> {
    if !(account_id & RESERVED_MASK).is_zero() {
        return Err(CodecError::NonZeroReservedBits(account_id));
    }

    let bytes = account_id.to_be_bytes::<32>();
    Ok(Address::from_slice(&bytes[32 - ADDRESS_BITS / 8..]))
}

/// Compose an AddressDriver account ID locally.
///
/// Mirrors `AddressDriver.calcAccountId`, which places driver ID 0 in the top
/// bits and the address in the low 160 bits.
pub fn address_driver_account_id(address: Address) -> U256 {
    U256::from_be_slice(address.as_slice())
}
