// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Key utility APDUs, for generating and checking keys
//!
//! These operate on caller supplied values and do not use wallet keys.

use encdec::{Decode, Encode};

use super::{ApduError, ApduStatic, Instruction, TRTL_APDU_CLA};
use crate::helpers::arr;

/// Generate a random key pair (0 length APDU)
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct RandomKeyPairReq {}

impl ApduStatic for RandomKeyPairReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GenerateRandomKeyPair as u8;
}

/// Key pair response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PUBLIC_KEY                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PRIVATE_KEY                          /
/// /                       (32-byte scalar)                        /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct KeyPairResp {
    /// Public key
    #[encdec(with = "arr")]
    pub public_key: [u8; 32],
    /// Private key
    #[encdec(with = "arr")]
    pub private_key: [u8; 32],
}

impl KeyPairResp {
    /// Create a new [KeyPairResp] APDU
    pub fn new(public_key: [u8; 32], private_key: [u8; 32]) -> Self {
        Self {
            public_key,
            private_key,
        }
    }
}

/// Compute the public key for a provided private key
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PRIVATE_KEY                          /
/// /                       (32-byte scalar)                        /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct PrivateToPublicReq {
    /// Private key
    #[encdec(with = "arr")]
    pub private_key: [u8; 32],
}

impl PrivateToPublicReq {
    /// Create a new [PrivateToPublicReq] APDU
    pub fn new(private_key: [u8; 32]) -> Self {
        Self { private_key }
    }
}

impl ApduStatic for PrivateToPublicReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::PrivateToPublic as u8;
}

/// Public key response APDU, shared by operations returning a single point
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PUBLIC_KEY                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct PublicKeyResp {
    #[encdec(with = "arr")]
    pub public_key: [u8; 32],
}

impl PublicKeyResp {
    /// Create a new [PublicKeyResp] APDU
    pub fn new(public_key: [u8; 32]) -> Self {
        Self { public_key }
    }
}

/// Private key response APDU, shared by private key exports
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PRIVATE_KEY                          /
/// /                       (32-byte scalar)                        /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct PrivateKeyResp {
    #[encdec(with = "arr")]
    pub private_key: [u8; 32],
}

impl PrivateKeyResp {
    /// Create a new [PrivateKeyResp] APDU
    pub fn new(private_key: [u8; 32]) -> Self {
        Self { private_key }
    }
}

/// Check whether the provided value is a valid public key
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PUBLIC_KEY                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct CheckKeyReq {
    #[encdec(with = "arr")]
    pub public_key: [u8; 32],
}

impl CheckKeyReq {
    /// Create a new [CheckKeyReq] APDU
    pub fn new(public_key: [u8; 32]) -> Self {
        Self { public_key }
    }
}

impl ApduStatic for CheckKeyReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::CheckKey as u8;
}

/// Check whether the provided value is a canonical scalar
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                            SCALAR                             /
/// /                       (32-byte scalar)                        /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct CheckScalarReq {
    #[encdec(with = "arr")]
    pub scalar: [u8; 32],
}

impl CheckScalarReq {
    /// Create a new [CheckScalarReq] APDU
    pub fn new(scalar: [u8; 32]) -> Self {
        Self { scalar }
    }
}

impl ApduStatic for CheckScalarReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::CheckScalar as u8;
}

/// Boolean result APDU, returned by key and signature checks
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     VALID     |
/// +-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct ValidResp {
    /// `1` if valid, `0` otherwise
    pub valid: u8,
}

impl ValidResp {
    /// Create a new [ValidResp] APDU
    pub fn new(valid: bool) -> Self {
        Self { valid: valid as u8 }
    }

    /// Fetch check result
    pub fn is_valid(&self) -> bool {
        self.valid != 0
    }
}
