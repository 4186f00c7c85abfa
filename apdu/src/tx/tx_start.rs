// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::{Decode, Encode};
use ledger_proto::ApduStatic;

use crate::{encdec_bitflags, helpers::*, ApduError, Instruction, TRTL_APDU_CLA};

bitflags::bitflags! {
    /// Transaction start flags
    pub struct TxFlags: u8 {
        /// Transaction carries a payment id in the extra field
        const HAS_PAYMENT_ID = 1 << 0;
    }
}

encdec_bitflags!(TxFlags);

/// Transaction start APDU, sets up a transaction for execution.
///
/// Issuing a [TxStart] discards any transaction in progress.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  NUM_INPUTS   |  NUM_OUTPUTS  |     FLAGS     |   RESERVED    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          UNLOCK_TIME                          |
/// |                        (u64, 8-byte)                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                        TX_PUBLIC_KEY                          /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PAYMENT_ID                           /
/// /           (32-bytes, ignored without HAS_PAYMENT_ID)          /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
#[derive(Clone, Debug, PartialEq, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxStart {
    /// Number of inputs to be loaded
    pub num_inputs: u8,

    /// Number of outputs to be loaded
    pub num_outputs: u8,

    /// Transaction flags
    pub flags: TxFlags,

    /// Reserved for future use (maintains 32-bit field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 1],

    /// Transaction unlock time
    pub unlock_time: u64,

    /// Transaction public key, included in the extra field
    #[encdec(with = "arr")]
    pub tx_public_key: [u8; 32],

    /// Optional payment id
    #[encdec(with = "arr")]
    pub payment_id: [u8; 32],
}

impl ApduStatic for TxStart {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::TxStart as u8;
}

impl TxStart {
    /// Create a new [`TxStart`] request
    pub fn new(
        unlock_time: u64,
        num_inputs: u8,
        num_outputs: u8,
        tx_public_key: [u8; 32],
        payment_id: Option<[u8; 32]>,
    ) -> Self {
        let flags = match payment_id.is_some() {
            true => TxFlags::HAS_PAYMENT_ID,
            false => TxFlags::empty(),
        };

        Self {
            num_inputs,
            num_outputs,
            flags,
            reserved: [0u8; 1],
            unlock_time,
            tx_public_key,
            payment_id: payment_id.unwrap_or_default(),
        }
    }

    /// Fetch payment id if set
    pub fn payment_id(&self) -> Option<[u8; 32]> {
        match self.flags.contains(TxFlags::HAS_PAYMENT_ID) {
            true => Some(self.payment_id),
            false => None,
        }
    }
}
