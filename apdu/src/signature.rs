// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Single signature APDUs

use encdec::{Decode, Encode};

use super::{ApduError, ApduStatic, Instruction, RequestFlags, TRTL_APDU_CLA};
use crate::helpers::arr;

/// Sign a message digest using the wallet spend key
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     FLAGS     |                   RESERVED                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                        MESSAGE_DIGEST                         /
/// /                           (32-bytes)                          /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SignatureReq {
    /// Request flags
    pub flags: RequestFlags,
    /// Reserved for future use (maintains field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 3],
    /// Digest to be signed
    #[encdec(with = "arr")]
    pub message_digest: [u8; 32],
}

impl SignatureReq {
    /// Create a new [SignatureReq] APDU
    pub fn new(flags: RequestFlags, message_digest: [u8; 32]) -> Self {
        Self {
            flags,
            reserved: [0u8; 3],
            message_digest,
        }
    }
}

impl ApduStatic for SignatureReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GenerateSignature as u8;
}

/// Signature response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          SIGNATURE                            /
/// /                 (64-byte `c || r` scalar pair)                /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SignatureResp {
    #[encdec(with = "arr")]
    pub signature: [u8; 64],
}

impl SignatureResp {
    /// Create a new [SignatureResp] APDU
    pub fn new(signature: [u8; 64]) -> Self {
        Self { signature }
    }
}

/// Check a signature over a message digest
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                        MESSAGE_DIGEST                         /
/// /                           (32-bytes)                          /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PUBLIC_KEY                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          SIGNATURE                            /
/// /                 (64-byte `c || r` scalar pair)                /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Responds with [ValidResp][crate::keys::ValidResp].
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct CheckSignatureReq {
    /// Signed digest
    #[encdec(with = "arr")]
    pub message_digest: [u8; 32],
    /// Signer public key
    #[encdec(with = "arr")]
    pub public_key: [u8; 32],
    /// Signature
    #[encdec(with = "arr")]
    pub signature: [u8; 64],
}

impl CheckSignatureReq {
    /// Create a new [CheckSignatureReq] APDU
    pub fn new(message_digest: [u8; 32], public_key: [u8; 32], signature: [u8; 64]) -> Self {
        Self {
            message_digest,
            public_key,
            signature,
        }
    }
}

impl ApduStatic for CheckSignatureReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::CheckSignature as u8;
}
