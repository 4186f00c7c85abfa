// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Key Image APDUs, used for spent output detection

use encdec::{Decode, Encode};

use super::{ApduError, ApduStatic, Instruction, RequestFlags, TRTL_APDU_CLA};
use crate::helpers::arr;

/// Resolve a key image for an owned output from its transaction public key
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
/// |                                                               |
/// /                        TX_PUBLIC_KEY                          /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          OUTPUT_KEY                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct KeyImageReq {
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
}

impl KeyImageReq {
    /// Create a new [KeyImageReq] APDU
    pub fn new(
        flags: RequestFlags,
        output_index: u32,
        tx_public_key: [u8; 32],
        output_key: [u8; 32],
    ) -> Self {
        Self {
            flags,
            reserved: [0u8; 3],
            output_index,
            tx_public_key,
            output_key,
        }
    }
}

impl ApduStatic for KeyImageReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GenerateKeyImage as u8;
}

/// Resolve a key image for an owned output from a precomputed key derivation
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
/// |                                                               |
/// /                          DERIVATION                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          OUTPUT_KEY                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct KeyImagePrimitiveReq {
    /// Request flags
    pub flags: RequestFlags,
    /// Reserved for future use (maintains field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 3],
    /// Output index within the source transaction
    pub output_index: u32,
    /// Key derivation for the source transaction
    #[encdec(with = "arr")]
    pub derivation: [u8; 32],
    /// Output (ephemeral public) key
    #[encdec(with = "arr")]
    pub output_key: [u8; 32],
}

impl KeyImagePrimitiveReq {
    /// Create a new [KeyImagePrimitiveReq] APDU
    pub fn new(
        flags: RequestFlags,
        output_index: u32,
        derivation: [u8; 32],
        output_key: [u8; 32],
    ) -> Self {
        Self {
            flags,
            reserved: [0u8; 3],
            output_index,
            derivation,
            output_key,
        }
    }
}

impl ApduStatic for KeyImagePrimitiveReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GenerateKeyImagePrimitive as u8;
}

/// Key image response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                           KEY_IMAGE                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct KeyImageResp {
    /// Key Image (compressed point)
    #[encdec(with = "arr")]
    pub key_image: [u8; 32],
}

impl KeyImageResp {
    /// Create a new [`KeyImageResp`] APDU
    pub fn new(key_image: [u8; 32]) -> Self {
        Self { key_image }
    }
}

#[cfg(test)]
mod test {
    use rand::random;

    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn key_image_req_apdu() {
        let apdu = KeyImageReq::new(RequestFlags::empty(), random(), random(), random());

        let mut buff = [0u8; 128];
        let n = encode_decode_apdu(&mut buff, &apdu);
        assert_eq!(n, 72);
    }

    #[test]
    fn key_image_primitive_req_apdu() {
        let apdu = KeyImagePrimitiveReq::new(RequestFlags::CONFIRM, random(), random(), random());

        let mut buff = [0u8; 128];
        encode_decode_apdu(&mut buff, &apdu);
    }
}
