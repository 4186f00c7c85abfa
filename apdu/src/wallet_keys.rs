// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Wallet key APDUs, for fetching wallet keys and addresses

use encdec::{Decode, Encode};

use super::{ApduError, ApduStatic, Instruction, RequestFlags, TRTL_APDU_CLA};
use crate::helpers::arr;

/// Wallet public key request APDU.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     FLAGS     |                   RESERVED                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct PublicKeysReq {
    /// Request flags
    pub flags: RequestFlags,
    /// Reserved for future use (maintains field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 3],
}

impl PublicKeysReq {
    /// Create a new [PublicKeysReq] APDU
    pub fn new(flags: RequestFlags) -> Self {
        Self {
            flags,
            reserved: [0u8; 3],
        }
    }
}

impl ApduStatic for PublicKeysReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GetPublicKeys as u8;
}

/// Wallet public key response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                       SPEND_PUBLIC_KEY                        /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                        VIEW_PUBLIC_KEY                        /
/// /               (32-byte compressed Edwards point)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct PublicKeysResp {
    /// Spend public key
    #[encdec(with = "arr")]
    pub spend_public: [u8; 32],
    /// View public key
    #[encdec(with = "arr")]
    pub view_public: [u8; 32],
}

impl PublicKeysResp {
    /// Create a new [`PublicKeysResp`] APDU
    pub fn new(spend_public: [u8; 32], view_public: [u8; 32]) -> Self {
        Self {
            spend_public,
            view_public,
        }
    }
}

/// Export the wallet private view key (0 length APDU), always requires approval
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct PrivateViewKeyReq {}

impl ApduStatic for PrivateViewKeyReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GetPrivateViewKey as u8;
}

/// Export the wallet private spend key (0 length APDU), always requires approval
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct PrivateSpendKeyReq {}

impl ApduStatic for PrivateSpendKeyReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GetPrivateSpendKey as u8;
}

/// Wallet address request APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     FLAGS     |                   RESERVED                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct AddressReq {
    /// Request flags
    pub flags: RequestFlags,
    /// Reserved for future use (maintains field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 3],
}

impl AddressReq {
    /// Create a new [AddressReq] APDU
    pub fn new(flags: RequestFlags) -> Self {
        Self {
            flags,
            reserved: [0u8; 3],
        }
    }
}

impl ApduStatic for AddressReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GetAddress as u8;
}

/// Wallet address response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  ADDRESS_LEN  |            ADDRESS (base58 string)...         /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AddressResp<'a> {
    /// Encoded public address
    pub address: &'a str,
}

impl<'a> AddressResp<'a> {
    /// Create a new [AddressResp] APDU
    pub fn new(address: &'a str) -> Self {
        Self { address }
    }
}

impl<'a> Encode for AddressResp<'a> {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let n = self.address.len();

        if n > u8::MAX as usize {
            return Err(ApduError::InvalidEncoding);
        }
        if buff.len() < n + 1 {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = n as u8;
        buff[1..][..n].copy_from_slice(self.address.as_bytes());

        Ok(n + 1)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(1 + self.address.len())
    }
}

impl<'a> Decode<'a> for AddressResp<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        let n = buff[0] as usize;
        if buff.len() < n + 1 {
            return Err(ApduError::InvalidLength);
        }

        let address = core::str::from_utf8(&buff[1..][..n]).map_err(|_| ApduError::InvalidUtf8)?;

        Ok((Self { address }, n + 1))
    }
}

/// Re-derive wallet keys from the stored seed
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     FLAGS     |                   RESERVED                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Responds with [PublicKeysResp] containing the re-derived public keys.
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct ResetKeysReq {
    /// Request flags
    pub flags: RequestFlags,
    /// Reserved for future use (maintains field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 3],
}

impl ResetKeysReq {
    /// Create a new [ResetKeysReq] APDU
    pub fn new(flags: RequestFlags) -> Self {
        Self {
            flags,
            reserved: [0u8; 3],
        }
    }
}

impl ApduStatic for ResetKeysReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::ResetKeys as u8;
}
