// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Key derivation APDUs, for computing shared derivations and output keys
//! using the wallet view / spend keys.

use encdec::{Decode, Encode};

use super::{ApduError, ApduStatic, Instruction, RequestFlags, TRTL_APDU_CLA};
use crate::helpers::arr;

/// Generate a key derivation for a transaction public key using the wallet view key
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     FLAGS     |                   RESERVED                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                        TX_PUBLIC_KEY                          /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct KeyDerivationReq {
    /// Request flags
    pub flags: RequestFlags,
    /// Reserved for future use (maintains field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 3],
    /// Transaction public key
    #[encdec(with = "arr")]
    pub tx_public_key: [u8; 32],
}

impl KeyDerivationReq {
    /// Create a new [KeyDerivationReq] APDU
    pub fn new(flags: RequestFlags, tx_public_key: [u8; 32]) -> Self {
        Self {
            flags,
            reserved: [0u8; 3],
            tx_public_key,
        }
    }
}

impl ApduStatic for KeyDerivationReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GenerateKeyDerivation as u8;
}

/// Key derivation response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          DERIVATION                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct KeyDerivationResp {
    #[encdec(with = "arr")]
    pub derivation: [u8; 32],
}

impl KeyDerivationResp {
    /// Create a new [KeyDerivationResp] APDU
    pub fn new(derivation: [u8; 32]) -> Self {
        Self { derivation }
    }
}

/// Derive an output public key from a derivation and the wallet spend public key
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
/// ```
///
/// Responds with [PublicKeyResp][crate::keys::PublicKeyResp].
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct DerivePublicKeyReq {
    /// Request flags
    pub flags: RequestFlags,
    /// Reserved for future use (maintains field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 3],
    /// Output index within the transaction
    pub output_index: u32,
    /// Key derivation
    #[encdec(with = "arr")]
    pub derivation: [u8; 32],
}

impl DerivePublicKeyReq {
    /// Create a new [DerivePublicKeyReq] APDU
    pub fn new(flags: RequestFlags, output_index: u32, derivation: [u8; 32]) -> Self {
        Self {
            flags,
            reserved: [0u8; 3],
            output_index,
            derivation,
        }
    }
}

impl ApduStatic for DerivePublicKeyReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::DerivePublicKey as u8;
}

/// Derive an output private key from a derivation and the wallet spend private key.
///
/// This exports private key material and always requires approval.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         OUTPUT_INDEX                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          DERIVATION                           /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Responds with [PrivateKeyResp][crate::keys::PrivateKeyResp].
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct DeriveSecretKeyReq {
    /// Output index within the transaction
    pub output_index: u32,
    /// Key derivation
    #[encdec(with = "arr")]
    pub derivation: [u8; 32],
}

impl DeriveSecretKeyReq {
    /// Create a new [DeriveSecretKeyReq] APDU
    pub fn new(output_index: u32, derivation: [u8; 32]) -> Self {
        Self {
            output_index,
            derivation,
        }
    }
}

impl ApduStatic for DeriveSecretKeyReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::DeriveSecretKey as u8;
}

#[cfg(test)]
mod test {
    use rand::random;

    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn key_derivation_req_apdu() {
        let apdu = KeyDerivationReq::new(RequestFlags::empty(), random());

        let mut buff = [0u8; 128];
        let n = encode_decode_apdu(&mut buff, &apdu);
        assert_eq!(n, 36);
    }

    #[test]
    fn derive_public_key_req_apdu() {
        let apdu = DerivePublicKeyReq::new(RequestFlags::CONFIRM, random(), random());

        let mut buff = [0u8; 128];
        let n = encode_decode_apdu(&mut buff, &apdu);
        assert_eq!(n, 40);
    }
}
