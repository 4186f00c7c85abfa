// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction State APDUs
//!

use encdec::{DecodeOwned, Encode};
use ledger_proto::ApduError;
use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

/// Transaction state enumeration
/// used in [`TxInfo`][crate::tx::TxInfo] to communicate transaction progress
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum TxState {
    Idle = 0x00,
    ReceivingInputs = 0x10,
    ReceivingOutputs = 0x20,
    OutputsReceived = 0x21,
    PrefixFinalized = 0x30,
    Signing = 0x40,
    Complete = 0x50,
    Aborted = 0xFF,
}

impl Encode for TxState {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(1)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = *self as u8;
        Ok(1)
    }
}

impl DecodeOwned for TxState {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        match Self::try_from(buff[0]) {
            Ok(v) => Ok((v, 1)),
            Err(_) => Err(ApduError::InvalidEncoding),
        }
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn tx_state_encoding() {
        for s in TxState::iter() {
            let mut buff = [0u8; 1];

            s.encode(&mut buff).unwrap();
            assert_eq!(buff[0], s as u8);

            let (d, n) = TxState::decode_owned(&buff).unwrap();
            assert_eq!((d, n), (s, 1));
        }

        assert!(matches!(
            TxState::decode_owned(&[0x13]),
            Err(ApduError::InvalidEncoding)
        ));
    }
}
