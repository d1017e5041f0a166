//! Contract ABI surface.
//!
//! Only the functions this crate encodes or decodes are declared.

use alloy::primitives::Address;
use alloy::sol;
use alloy::sol_types::{SolCall, SolType, SolValue};

use crate::chain::{PreparedTx, ReadClient};
use crate::error::{DripsError, DripsResult};

/// Total weight that a splits receivers list is measured against.
pub const TOTAL_SPLITS_WEIGHT: u32 = 1_000_000;

/// Maximum number of receivers a single account may split to.
pub const MAX_SPLITS_RECEIVERS: usize = 200;

/// Upper bound on cycles processed by one `receiveStreams` call.
pub const RECEIVE_STREAMS_MAX_CYCLES: u32 = 1_000;

sol! {
    /// A splits receiver as stored by the Drips contract.
    #[derive(Debug, PartialEq, Eq)]
    struct SplitsReceiver {
        uint256 accountId;
        uint32 weight;
    }

    /// A stream receiver, with its config packed into one word.
    #[derive(Debug, PartialEq, Eq)]
    struct StreamReceiver {
        uint256 accountId;
        uint256 config;
    }

    /// One entry of a sender's streams history, used for squeezing.
    #[derive(Debug, PartialEq, Eq)]
    struct StreamsHistory {
        bytes32 streamsHash;
        StreamReceiver[] receivers;
        uint32 updateTime;
        uint32 maxEnd;
    }

    /// A call executed by the Caller contract.
    #[derive(Debug, PartialEq, Eq)]
    struct Call {
        address target;
        bytes data;
        uint256 value;
    }

    #[derive(Debug)]
    contract Drips {
        /// Receive streams from the currently running cycle for `accountId`.
        function receiveStreams(uint256 accountId, address erc20, uint32 maxCycles)
            external
            returns (uint128 receivedAmt);

        /// Receive streams from a sender's current cycle before it ends.
        function squeezeStreams(
            uint256 accountId,
            address erc20,
            uint256 senderId,
            bytes32 historyHash,
            StreamsHistory[] memory streamsHistory
        ) external returns (uint128 amt);

        /// Split the account's splittable funds among its current receivers.
        function split(uint256 accountId, address erc20, SplitsReceiver[] memory currReceivers)
            external
            returns (uint128 collectableAmt, uint128 splitAmt);
    }

    #[derive(Debug)]
    contract AddressDriver {
        function calcAccountId(address addr) external view returns (uint256 accountId);

        /// Collect the sender's collectable funds and transfer them to `transferTo`.
        function collect(address erc20, address transferTo) external returns (uint128 amt);
    }

    #[derive(Debug)]
    contract RepoDriver {
        function calcAccountId(uint8 forge, bytes memory name) external view returns (uint256 accountId);

        /// Ask the oracle to update the owner of the account for `(forge, name)`.
        function requestUpdateOwner(uint8 forge, bytes memory name) external returns (uint256 accountId);

        function ownerOf(uint256 accountId) external view returns (address owner);

        function setSplits(uint256 accountId, SplitsReceiver[] memory receivers) external;
    }

    #[derive(Debug)]
    contract Caller {
        /// Execute `calls` in order, atomically, on behalf of the sender.
        function callBatched(Call[] memory calls) external payable returns (bytes[] memory returnData);
    }

    #[derive(Debug)]
    contract NativeTokenUnwrapper {
        /// Unwrap all wrapped native tokens held and send them to `recipient`.
        function unwrap(address recipient) external returns (uint256 amount);
    }
}

/// Forges understood by the RepoDriver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Forge {
    GitHub = 0,
    GitLab = 1,
    Orcid = 2,
}

impl Forge {
    /// The `uint8` value passed to RepoDriver functions.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Execute a view function and decode its single return value.
pub async fn view_call<R, C, T>(client: &R, to: Address, call: &C) -> DripsResult<T>
where
    R: ReadClient,
    C: SolCall,
    T: SolValue + From<<<T as SolValue>::SolType as SolType>::RustType>,
{
    let tx = PreparedTx::from_call(to, call);
    let raw = client.call(&tx).await?;
    T::abi_decode(&raw).map_err(|e| DripsError::AbiDecode {
        function: C::SIGNATURE,
        reason: e.to_string(),
    })
}
