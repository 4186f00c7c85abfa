// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction related APDUs, used to construct and sign a transaction via the hardware wallet.
//!
//! A transaction is started with [TxStart], followed by one [TxLoadInput] per input and one
//! [TxLoadOutput] per output. [TxFinalizePrefix] then computes the prefix hash, [TxSign] requests
//! user approval, and [TxSignInput] returns the key image and ring signatures for each input
//! in order. [TxReset] aborts the transaction at any point.
//!
//! See `ledger_trtl_core::engine` for interaction and state machines

use encdec::{Decode, Encode};
use ledger_proto::ApduStatic;

use crate::{helpers::arr, state::TxState, ApduError, Instruction, TRTL_APDU_CLA};

mod tx_start;
pub use tx_start::*;

mod inputs;
pub use inputs::*;

mod sign;
pub use sign::*;

/// Transaction information request APDU
#[derive(Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxInfoReq {}

impl ApduStatic for TxInfoReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::TxState as u8;
}

/// Finalize the transaction prefix (0 length APDU)
///
/// Responds with [TxPrefixHash].
#[derive(Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxFinalizePrefix {}

impl ApduStatic for TxFinalizePrefix {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::TxFinalizePrefix as u8;
}

/// Abort any transaction in progress (0 length APDU)
#[derive(Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxReset {}

impl ApduStatic for TxReset {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::TxReset as u8;
}

/// Transaction information response APDU.
///
/// Received in response to TX commands, contains the current transaction engine state
/// and a value where relevant (ie. the number of inputs or outputs loaded).
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   TX_STATE    |   RESERVED    |             VALUE             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxInfo {
    /// Current transaction engine state
    pub state: TxState,
    /// Reserved for future use (maintains field alignment)
    reserved: u8,
    /// Value associated with current state (zero otherwise)
    pub value: u16,
}

impl TxInfo {
    /// Create a new [`TxInfo`] response
    pub fn new(state: TxState, value: u16) -> Self {
        Self {
            state,
            reserved: 0,
            value,
        }
    }
}

/// Transaction prefix hash response
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   TX_STATE    |                   RESERVED                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PREFIX_HASH                          /
/// /                   (32-byte keccak-256 digest)                 /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxPrefixHash {
    /// Current transaction engine state
    pub state: TxState,
    #[encdec(with = "arr")]
    reserved: [u8; 3],
    /// Keccak-256 hash of the serialized transaction prefix
    #[encdec(with = "arr")]
    pub prefix_hash: [u8; 32],
}

impl TxPrefixHash {
    /// Create a new [`TxPrefixHash`] response
    pub fn new(state: TxState, prefix_hash: [u8; 32]) -> Self {
        Self {
            state,
            reserved: [0u8; 3],
            prefix_hash,
        }
    }
}
