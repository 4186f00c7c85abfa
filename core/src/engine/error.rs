// Copyright (c) 2022-2023 The MobileCoin Foundation

use num_enum::TryFromPrimitive;

/// [Engine][super::Engine] errors
///
/// Error codes are returned to the host, any error indicates the operation
/// did not happen.
#[derive(Copy, Clone, PartialEq, Debug, TryFromPrimitive)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[repr(u8)]
pub enum Error {
    /// Invalid argument length
    #[cfg_attr(feature = "thiserror", error("Invalid argument length"))]
    InvalidLength = 0x00,

    /// Non-canonical scalar
    #[cfg_attr(feature = "thiserror", error("invalid scalar"))]
    InvalidScalar = 0x01,

    /// Invalid point (decompression failed, small order or identity)
    #[cfg_attr(feature = "thiserror", error("invalid point"))]
    InvalidPoint = 0x02,

    /// Ring or output index out of range, or recomputed key mismatch
    #[cfg_attr(feature = "thiserror", error("invalid index"))]
    InvalidIndex = 0x03,

    /// Command issued out of sequence
    #[cfg_attr(feature = "thiserror", error("invalid transaction state"))]
    TransactionState = 0x04,

    /// Operation denied by the user
    #[cfg_attr(feature = "thiserror", error("operation not permitted"))]
    OperationNotPermitted = 0x05,

    /// Amount overflow or outputs exceeding inputs
    #[cfg_attr(feature = "thiserror", error("invalid amount"))]
    InvalidAmount = 0x06,

    /// Message encoding failed
    #[cfg_attr(feature = "thiserror", error("message encoding failed"))]
    EncodingFailed = 0x0b,

    /// Unexpected primitive failure (missing seed, storage)
    #[cfg_attr(feature = "thiserror", error("internal error"))]
    InternalError = 0xf0,
}
