// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Application Information APDUs

use encdec::{Decode, Encode};

use super::{ApduError, ApduStatic, Instruction, TRTL_APDU_CLA};

/// Fetch application version APDU (0 length APDU)
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct VersionReq {}

impl ApduStatic for VersionReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GetVersion as u8;
}

/// Application version response APDU
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   PROTO_VER   |     MAJOR     |     MINOR     |     PATCH     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct VersionResp {
    /// Protocol version (must be 1)
    pub proto: u8,
    /// Application major version
    pub major: u8,
    /// Application minor version
    pub minor: u8,
    /// Application patch version
    pub patch: u8,
}

impl VersionResp {
    /// Create a new application version APDU
    pub fn new(proto: u8, major: u8, minor: u8, patch: u8) -> Self {
        Self {
            proto,
            major,
            minor,
            patch,
        }
    }
}

/// Check for debug build APDU (0 length APDU)
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct DebugReq {}

impl ApduStatic for DebugReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::IsDebug as u8;
}

/// Debug build response APDU
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     DEBUG     |
/// +-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct DebugResp {
    /// Set to `1` for debug builds, `0` otherwise
    pub debug: u8,
}

/// Fetch application identifier APDU (0 length APDU)
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct IdentReq {}

impl ApduStatic for IdentReq {
    const CLA: u8 = TRTL_APDU_CLA;
    const INS: u8 = Instruction::GetIdent as u8;
}

/// Application identifier response APDU
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   IDENT_LEN   |                  IDENT...                     /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct IdentResp<'a> {
    /// Application identifier
    pub ident: &'a str,
}

impl<'a> IdentResp<'a> {
    /// Create a new application identifier APDU
    pub fn new(ident: &'a str) -> Self {
        Self { ident }
    }
}

impl<'a> Encode for IdentResp<'a> {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let n = self.ident.len();

        if n > u8::MAX as usize {
            return Err(ApduError::InvalidEncoding);
        }
        if buff.len() < n + 1 {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = n as u8;
        buff[1..][..n].copy_from_slice(self.ident.as_bytes());

        Ok(n + 1)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(1 + self.ident.len())
    }
}

impl<'a> Decode<'a> for IdentResp<'a> {
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

        let ident = core::str::from_utf8(&buff[1..][..n]).map_err(|_| ApduError::InvalidUtf8)?;

        Ok((Self { ident }, n + 1))
    }
}
