// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::{Decode, DecodeOwned, Encode};
use heapless::Vec;
use ledger_proto::ApduStatic;

use crate::{
    helpers::*, ring::RingKeys, ApduError, Instruction, KEY_LEN, RING_SIZE, TRTL_APDU_CLA,
};

/// Ring offsets, relative global output indices as serialized in the prefix
pub type RingOffsets = Vec<u32, RING_SIZE>;

/// Load a transaction input.
///
/// The real ring entry must be an output owned by the wallet, the device
/// recomputes its output key from `tx_public_key` and `output_index` and
/// computes the key image for the input.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   RING_SIZE   |  REAL_INDEX   |           RESERVED            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         OUTPUT_INDEX                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            AMOUNT                             |
/// |                        (u64, 8-byte)                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                   TX_PUBLIC_KEY (32-bytes)                    /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                 OFFSETS (RING_SIZE * u32 LE)                  /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /              PUBLIC_KEYS (RING_SIZE * 32-bytes)               /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TxLoadInput {
    /// Index of the real entry in the ring
    pub real_index: u8,
    /// Output index of the real entry within its source transaction
    pub output_index: u32,
    /// Input amount
    pub amount: u64,
    /// Source transaction public key for the real entry
    pub tx_public_key: [u8; 32],
    /// Ring offsets
    pub offsets: RingOffsets,
    /// Ring public keys
    pub public_keys: RingKeys,
}

impl ApduStatic for TxLoadInput {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::TxLoadInput as u8;
}

impl TxLoadInput {
    /// Create a new [`TxLoadInput`] request
    pub fn new(
        real_index: u8,
        output_index: u32,
        amount: u64,
        tx_public_key: [u8; 32],
        offsets: &[u32],
        public_keys: &[[u8; 32]],
    ) -> Result<Self, ApduError> {
        if offsets.len() != public_keys.len() {
            return Err(ApduError::InvalidLength);
        }

        Ok(Self {
            real_index,
            output_index,
            amount,
            tx_public_key,
            offsets: Vec::from_slice(offsets).map_err(|_| ApduError::InvalidLength)?,
            public_keys: Vec::from_slice(public_keys).map_err(|_| ApduError::InvalidLength)?,
        })
    }
}

impl Encode for TxLoadInput {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if self.offsets.len() != self.public_keys.len() {
            return Err(ApduError::InvalidEncoding);
        }
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.public_keys.len() as u8;
        buff[1] = self.real_index;
        buff[2..4].copy_from_slice(&[0u8; 2]);
        let mut index = 4;

        index += self.output_index.encode(&mut buff[index..])?;
        index += self.amount.encode(&mut buff[index..])?;
        index += put(&self.tx_public_key, &mut buff[index..])?;

        for o in self.offsets.iter() {
            index += o.encode(&mut buff[index..])?;
        }

        index += enc_list(&self.public_keys, &mut buff[index..])?;

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(16 + KEY_LEN + self.offsets.len() * 4 + self.public_keys.len() * KEY_LEN)
    }
}

impl DecodeOwned for TxLoadInput {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        if buff.len() < 16 {
            return Err(ApduError::InvalidLength);
        }

        let n = buff[0] as usize;
        if n == 0 || n > RING_SIZE {
            return Err(ApduError::InvalidEncoding);
        }
        let real_index = buff[1];

        let (output_index, _) = u32::decode(&buff[4..])?;
        let (amount, _) = u64::decode(&buff[8..])?;
        let (tx_public_key, rest) = take::<KEY_LEN>(&buff[16..])?;

        if rest.len() < n * 4 {
            return Err(ApduError::InvalidLength);
        }

        let mut offsets = Vec::new();
        for c in rest[..n * 4].chunks_exact(4) {
            let (o, _) = u32::decode(c)?;

            offsets.push(o).map_err(|_| ApduError::InvalidLength)?;
        }

        let (public_keys, len) = dec_list(n, &rest[n * 4..])?;

        Ok((
            Self {
                real_index,
                output_index,
                amount,
                tx_public_key,
                offsets,
                public_keys,
            },
            16 + KEY_LEN + n * 4 + len,
        ))
    }
}

/// Load a transaction output
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            AMOUNT                             |
/// |                        (u64, 8-byte)                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          OUTPUT_KEY                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Debug, PartialEq, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxLoadOutput {
    /// Output amount
    pub amount: u64,

    /// Output (ephemeral public) key
    #[encdec(with = "arr")]
    pub output_key: [u8; 32],
}

impl ApduStatic for TxLoadOutput {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::TxLoadOutput as u8;
}

impl TxLoadOutput {
    /// Create a new [`TxLoadOutput`] request
    pub fn new(amount: u64, output_key: [u8; 32]) -> Self {
        Self { amount, output_key }
    }
}
