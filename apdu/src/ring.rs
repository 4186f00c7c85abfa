// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Ring signature APDUs
//!
//! Rings are variable length with an explicit `RING_SIZE` header field,
//! limited to [RING_SIZE][crate::RING_SIZE] entries per APDU.

use encdec::{Decode, DecodeOwned, Encode};
use heapless::Vec;

use super::{
    ApduError, ApduStatic, Instruction, RequestFlags, KEY_LEN, RING_SIZE, SIG_LEN, TRTL_APDU_CLA,
};
use crate::helpers::{arr, dec_list, enc_list, put, take};

/// Ring public keys
pub type RingKeys = Vec<[u8; KEY_LEN], RING_SIZE>;

/// Ring signatures
pub type RingSignatures = Vec<[u8; SIG_LEN], RING_SIZE>;

/// Decode and check the ring size header field
fn ring_size(buff: &[u8]) -> Result<usize, ApduError> {
    if buff.is_empty() {
        return Err(ApduError::InvalidLength);
    }

    let n = buff[0] as usize;
    if n == 0 || n > RING_SIZE {
        return Err(ApduError::InvalidEncoding);
    }

    Ok(n)
}

/// Prepare ring signatures for later completion
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   RING_SIZE   |  REAL_INDEX   |           RESERVED            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PREFIX_HASH                          /
/// /                           (32-bytes)                          /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                           KEY_IMAGE                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PUBLIC_KEYS                          /
/// /                  (RING_SIZE * 32-byte points)                 /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct PrepareRingReq {
    /// Index of the real entry in the ring
    pub real_index: u8,
    /// Transaction prefix hash
    pub prefix_hash: [u8; 32],
    /// Key image for the real entry
    pub key_image: [u8; 32],
    /// Ring public keys
    pub public_keys: RingKeys,
}

impl PrepareRingReq {
    /// Create a new [PrepareRingReq] APDU
    pub fn new(
        real_index: u8,
        prefix_hash: [u8; 32],
        key_image: [u8; 32],
        public_keys: &[[u8; 32]],
    ) -> Result<Self, ApduError> {
        Ok(Self {
            real_index,
            prefix_hash,
            key_image,
            public_keys: Vec::from_slice(public_keys).map_err(|_| ApduError::InvalidLength)?,
        })
    }
}

impl ApduStatic for PrepareRingReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::PrepareRingSignatures as u8;
}

impl Encode for PrepareRingReq {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.public_keys.len() as u8;
        buff[1] = self.real_index;
        buff[2..4].copy_from_slice(&[0u8; 2]);
        let mut index = 4;

        index += put(&self.prefix_hash, &mut buff[index..])?;
        index += put(&self.key_image, &mut buff[index..])?;
        index += enc_list(&self.public_keys, &mut buff[index..])?;

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(4 + 2 * KEY_LEN + self.public_keys.len() * KEY_LEN)
    }
}

impl DecodeOwned for PrepareRingReq {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        let n = ring_size(buff)?;
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }
        let real_index = buff[1];

        let (prefix_hash, rest) = take::<KEY_LEN>(&buff[4..])?;
        let (key_image, rest) = take::<KEY_LEN>(rest)?;
        let (public_keys, len) = dec_list(n, rest)?;

        Ok((
            Self {
                real_index,
                prefix_hash,
                key_image,
                public_keys,
            },
            4 + 2 * KEY_LEN + len,
        ))
    }
}

/// Prepared ring response APDU, containing the ring signatures
/// (with the real entry pending completion) and the blinding scalar `k`
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   RING_SIZE   |                   RESERVED                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                               K                               /
/// /                       (32-byte scalar)                        /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          SIGNATURES                           /
/// /                (RING_SIZE * 64-byte signatures)               /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct PrepareRingResp {
    /// Blinding scalar for completion of the real entry
    pub k: [u8; 32],
    /// Ring signatures
    pub signatures: RingSignatures,
}

impl Encode for PrepareRingResp {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.signatures.len() as u8;
        buff[1..4].copy_from_slice(&[0u8; 3]);
        let mut index = 4;

        index += put(&self.k, &mut buff[index..])?;
        index += enc_list(&self.signatures, &mut buff[index..])?;

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(4 + KEY_LEN + self.signatures.len() * SIG_LEN)
    }
}

impl DecodeOwned for PrepareRingResp {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        let n = ring_size(buff)?;
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        let (k, rest) = take::<KEY_LEN>(&buff[4..])?;
        let (signatures, len) = dec_list(n, rest)?;

        Ok((Self { k, signatures }, 4 + KEY_LEN + len))
    }
}

/// Complete a prepared ring signature using the private key for an owned output
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     FLAGS     |                   RESERVED                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         OUTPUT_INDEX                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                   TX_PUBLIC_KEY (32-bytes)                    /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    OUTPUT_KEY (32-bytes)                      /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                        K (32-bytes)                           /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                  PARTIAL_SIGNATURE (64-bytes)                 /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Responds with [SignatureResp][crate::signature::SignatureResp].
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct CompleteRingReq {
    /// Request flags
    pub flags: RequestFlags,
    /// Reserved for future use (maintains field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 3],
    /// Output index within the source transaction
    pub output_index: u32,
    /// Source transaction public key
    #[encdec(with = "arr")]
    pub tx_public_key: [u8; 32],
    /// Output (ephemeral public) key
    #[encdec(with = "arr")]
    pub output_key: [u8; 32],
    /// Blinding scalar returned by [PrepareRingResp]
    #[encdec(with = "arr")]
    pub k: [u8; 32],
    /// Prepared signature for the real ring entry
    #[encdec(with = "arr")]
    pub signature: [u8; 64],
}

impl CompleteRingReq {
    /// Create a new [CompleteRingReq] APDU
    pub fn new(
        flags: RequestFlags,
        output_index: u32,
        tx_public_key: [u8; 32],
        output_key: [u8; 32],
        k: [u8; 32],
        signature: [u8; 64],
    ) -> Self {
        Self {
            flags,
            reserved: [0u8; 3],
            output_index,
            tx_public_key,
            output_key,
            k,
            signature,
        }
    }
}

impl ApduStatic for CompleteRingReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::CompleteRingSignature as u8;
}

/// One-shot ring signature generation for an owned output
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     FLAGS     |   RING_SIZE   |  REAL_INDEX   |   RESERVED    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         OUTPUT_INDEX                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                   TX_PUBLIC_KEY (32-bytes)                    /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    OUTPUT_KEY (32-bytes)                      /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    PREFIX_HASH (32-bytes)                     /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /              PUBLIC_KEYS (RING_SIZE * 32-bytes)               /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Responds with [RingSignaturesResp].
#[derive(Clone, PartialEq, Debug)]
pub struct GenerateRingReq {
    /// Request flags
    pub flags: RequestFlags,
    /// Index of the real entry in the ring
    pub real_index: u8,
    /// Output index within the source transaction
    pub output_index: u32,
    /// Source transaction public key
    pub tx_public_key: [u8; 32],
    /// Output (ephemeral public) key
    pub output_key: [u8; 32],
    /// Transaction prefix hash
    pub prefix_hash: [u8; 32],
    /// Ring public keys
    pub public_keys: RingKeys,
}

impl GenerateRingReq {
    /// Create a new [GenerateRingReq] APDU
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        flags: RequestFlags,
        real_index: u8,
        output_index: u32,
        tx_public_key: [u8; 32],
        output_key: [u8; 32],
        prefix_hash: [u8; 32],
        public_keys: &[[u8; 32]],
    ) -> Result<Self, ApduError> {
        Ok(Self {
            flags,
            real_index,
            output_index,
            tx_public_key,
            output_key,
            prefix_hash,
            public_keys: Vec::from_slice(public_keys).map_err(|_| ApduError::InvalidLength)?,
        })
    }
}

impl ApduStatic for GenerateRingReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GenerateRingSignatures as u8;
}

impl Encode for GenerateRingReq {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < 8 {
            return Err(ApduError::InvalidLength);
        }

        let mut index = self.flags.encode(buff)?;
        buff[1] = self.public_keys.len() as u8;
        buff[2] = self.real_index;
        buff[3] = 0;
        index += 3;

        index += self.output_index.encode(&mut buff[index..])?;
        index += put(&self.tx_public_key, &mut buff[index..])?;
        index += put(&self.output_key, &mut buff[index..])?;
        index += put(&self.prefix_hash, &mut buff[index..])?;
        index += enc_list(&self.public_keys, &mut buff[index..])?;

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(8 + 3 * KEY_LEN + self.public_keys.len() * KEY_LEN)
    }
}

impl DecodeOwned for GenerateRingReq {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        if buff.len() < 8 {
            return Err(ApduError::InvalidLength);
        }

        let (flags, _) = RequestFlags::decode_owned(buff)?;
        let n = ring_size(&buff[1..])?;
        let real_index = buff[2];
        let (output_index, _) = u32::decode(&buff[4..])?;

        let (tx_public_key, rest) = take::<KEY_LEN>(&buff[8..])?;
        let (output_key, rest) = take::<KEY_LEN>(rest)?;
        let (prefix_hash, rest) = take::<KEY_LEN>(rest)?;
        let (public_keys, len) = dec_list(n, rest)?;

        Ok((
            Self {
                flags,
                real_index,
                output_index,
                tx_public_key,
                output_key,
                prefix_hash,
                public_keys,
            },
            8 + 3 * KEY_LEN + len,
        ))
    }
}

/// Ring signatures response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   RING_SIZE   |                   RESERVED                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /               SIGNATURES (RING_SIZE * 64-bytes)               /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct RingSignaturesResp {
    /// Ring signatures
    pub signatures: RingSignatures,
}

impl RingSignaturesResp {
    /// Create a new [RingSignaturesResp] APDU
    pub fn new(signatures: RingSignatures) -> Self {
        Self { signatures }
    }
}

impl Encode for RingSignaturesResp {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.signatures.len() as u8;
        buff[1..4].copy_from_slice(&[0u8; 3]);

        let n = enc_list(&self.signatures, &mut buff[4..])?;

        Ok(4 + n)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(4 + self.signatures.len() * SIG_LEN)
    }
}

impl DecodeOwned for RingSignaturesResp {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        let n = ring_size(buff)?;
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        let (signatures, len) = dec_list(n, &buff[4..])?;

        Ok((Self { signatures }, 4 + len))
    }
}

/// Check a set of ring signatures
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   RING_SIZE   |                   RESERVED                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    PREFIX_HASH (32-bytes)                     /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                     KEY_IMAGE (32-bytes)                      /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /              PUBLIC_KEYS (RING_SIZE * 32-bytes)               /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /               SIGNATURES (RING_SIZE * 64-bytes)               /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Responds with [ValidResp][crate::keys::ValidResp].
#[derive(Clone, PartialEq, Debug)]
pub struct CheckRingReq {
    /// Transaction prefix hash
    pub prefix_hash: [u8; 32],
    /// Key image for the ring
    pub key_image: [u8; 32],
    /// Ring public keys
    pub public_keys: RingKeys,
    /// Ring signatures
    pub signatures: RingSignatures,
}

impl CheckRingReq {
    /// Create a new [CheckRingReq] APDU
    pub fn new(
        prefix_hash: [u8; 32],
        key_image: [u8; 32],
        public_keys: &[[u8; 32]],
        signatures: &[[u8; 64]],
    ) -> Result<Self, ApduError> {
        if public_keys.len() != signatures.len() {
            return Err(ApduError::InvalidLength);
        }

        Ok(Self {
            prefix_hash,
            key_image,
            public_keys: Vec::from_slice(public_keys).map_err(|_| ApduError::InvalidLength)?,
            signatures: Vec::from_slice(signatures).map_err(|_| ApduError::InvalidLength)?,
        })
    }
}

impl ApduStatic for CheckRingReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::CheckRingSignatures as u8;
}

impl Encode for CheckRingReq {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if self.public_keys.len() != self.signatures.len() {
            return Err(ApduError::InvalidEncoding);
        }
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.public_keys.len() as u8;
        buff[1..4].copy_from_slice(&[0u8; 3]);
        let mut index = 4;

        index += put(&self.prefix_hash, &mut buff[index..])?;
        index += put(&self.key_image, &mut buff[index..])?;
        index += enc_list(&self.public_keys, &mut buff[index..])?;
        index += enc_list(&self.signatures, &mut buff[index..])?;

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(4 + 2 * KEY_LEN + self.public_keys.len() * (KEY_LEN + SIG_LEN))
    }
}

impl DecodeOwned for CheckRingReq {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        let n = ring_size(buff)?;
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        let (prefix_hash, rest) = take::<KEY_LEN>(&buff[4..])?;
        let (key_image, rest) = take::<KEY_LEN>(rest)?;
        let (public_keys, a) = dec_list(n, rest)?;
        let (signatures, b) = dec_list(n, &rest[a..])?;

        Ok((
            Self {
                prefix_hash,
                key_image,
                public_keys,
                signatures,
            },
            4 + 2 * KEY_LEN + a + b,
        ))
    }
}
