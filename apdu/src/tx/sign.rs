// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::{Decode, DecodeOwned, Encode};
use ledger_proto::ApduStatic;

use crate::{
    helpers::*, ring::RingSignatures, state::TxState, ApduError, Instruction, KEY_LEN, RING_SIZE,
    SIG_LEN, TRTL_APDU_CLA,
};

/// Request approval for a finalized transaction (0 length APDU)
///
/// Responds with [TxInfo][super::TxInfo] in `Signing` state on approval.
#[derive(Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxSign {}

impl ApduStatic for TxSign {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::TxSign as u8;
}

/// Fetch ring signatures for an input, inputs must be requested in order
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  INPUT_INDEX  |                   RESERVED                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxSignInput {
    /// Index of the input to be signed
    pub input_index: u8,

    /// Reserved for future use (maintains 32-bit field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 3],
}

impl ApduStatic for TxSignInput {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::TxSignInput as u8;
}

impl TxSignInput {
    /// Create a new [`TxSignInput`] request
    pub fn new(input_index: u8) -> Self {
        Self {
            input_index,
            reserved: [0u8; 3],
        }
    }
}

/// Input signature response, containing the key image and ring signatures for an input
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   TX_STATE    |  INPUT_INDEX  |   RING_SIZE   |   RESERVED    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                     KEY_IMAGE (32-bytes)                      /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /               SIGNATURES (RING_SIZE * 64-bytes)               /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct TxSignatures {
    /// Transaction state following signing
    pub state: TxState,
    /// Index of the signed input
    pub input_index: u8,
    /// Key image for the input
    pub key_image: [u8; 32],
    /// Ring signatures for the input
    pub signatures: RingSignatures,
}

impl Encode for TxSignatures {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        let mut index = self.state.encode(buff)?;
        buff[1] = self.input_index;
        buff[2] = self.signatures.len() as u8;
        buff[3] = 0;
        index += 3;

        index += put(&self.key_image, &mut buff[index..])?;
        index += enc_list(&self.signatures, &mut buff[index..])?;

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(4 + KEY_LEN + self.signatures.len() * SIG_LEN)
    }
}

impl DecodeOwned for TxSignatures {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        let (state, _) = TxState::decode(buff)?;
        let input_index = buff[1];

        let n = buff[2] as usize;
        if n == 0 || n > RING_SIZE {
            return Err(ApduError::InvalidEncoding);
        }

        let (key_image, rest) = take::<KEY_LEN>(&buff[4..])?;
        let (signatures, len) = dec_list(n, rest)?;

        Ok((
            Self {
                state,
                input_index,
                key_image,
                signatures,
            },
            4 + KEY_LEN + len,
        ))
    }
}
