// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol / APDU definitions for TurtleCoin app communication
//!
//! This module provides a protocol specification and reference implementation for communication
//! with TurtleCoin hardware wallets.
//!
//! APDUs use a primitive binary encoding to simplify implementation with unsupported languages and platforms.
//! Keys, scalars and signatures are carried as raw byte arrays, validation is the responsibility
//! of the engine so invalid values are reported with engine error codes rather than decode failures.
//!
//! Encodings are intended to be _roughly_ equivalent to packed c structures while maintaining
//! 32-bit field alignment to reduce the need for unaligned access on constrained platforms.
//! All field encodings are little-endian.
//!
//! Ring APDUs exceed the short APDU payload limit and are exchanged as extended APDUs,
//! see [MAX_APDU_LEN].

#![no_std]

pub use ledger_proto::{ApduError, ApduReq, ApduStatic};

pub mod app_info;
pub mod derivation;
pub mod key_image;
pub mod keys;
pub mod prelude;
pub mod ring;
pub mod signature;
pub mod state;
pub mod tx;
pub mod wallet_keys;

mod helpers;

/// TurtleCoin APDU Class
pub const TRTL_APDU_CLA: u8 = 0xe0;

/// Protocol version
pub const TRTL_PROTO_VERSION: u8 = 0x01;

/// Maximum encoded APDU payload (extended APDU)
pub const MAX_APDU_LEN: usize = 512;

/// Maximum number of ring members carried in a single APDU
pub const RING_SIZE: usize = 4;

/// Length of encoded keys and scalars
pub const KEY_LEN: usize = 32;

/// Length of encoded `(c, r)` signatures
pub const SIG_LEN: usize = 64;

/// TurtleCoin APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(u8)]
pub enum Instruction {
    // General instructions
    /// Fetch application version
    GetVersion = 0x01,
    /// Check whether the application is a debug build
    IsDebug = 0x02,
    /// Fetch application identifier
    GetIdent = 0x05,

    // Key management
    /// Fetch wallet public keys
    GetPublicKeys = 0x10,
    /// Export private view key (always requires approval)
    GetPrivateViewKey = 0x11,
    /// Export private spend key (always requires approval)
    GetPrivateSpendKey = 0x12,
    /// Check a point is a valid public key
    CheckKey = 0x16,
    /// Check a scalar is canonical
    CheckScalar = 0x17,
    /// Compute the public key for a private key
    PrivateToPublic = 0x18,
    /// Generate a random key pair
    GenerateRandomKeyPair = 0x19,
    /// Fetch the wallet public address
    GetAddress = 0x30,

    // Stealth derivation
    /// Generate a key image from a transaction public key
    GenerateKeyImage = 0x40,
    /// Generate a key image from a key derivation
    GenerateKeyImagePrimitive = 0x41,

    // Signatures
    /// One-shot ring signature generation (always requires approval)
    GenerateRingSignatures = 0x50,
    /// Complete a prepared ring signature (always requires approval)
    CompleteRingSignature = 0x51,
    /// Check a set of ring signatures
    CheckRingSignatures = 0x52,
    /// Prepare ring signatures for later completion
    PrepareRingSignatures = 0x53,
    /// Sign a message digest with the spend key (always requires approval)
    GenerateSignature = 0x55,
    /// Check a signature
    CheckSignature = 0x56,

    // Key derivation
    /// Generate a key derivation with the wallet view key
    GenerateKeyDerivation = 0x60,
    /// Derive an output public key from the wallet spend key
    DerivePublicKey = 0x61,
    /// Derive an output private key (always requires approval)
    DeriveSecretKey = 0x62,

    // Transaction construction
    /// Fetch transaction state
    TxState = 0x70,
    /// Start a transaction
    TxStart = 0x71,
    /// Load a transaction input
    TxLoadInput = 0x73,
    /// Load a transaction output
    TxLoadOutput = 0x75,
    /// Finalize the transaction prefix
    TxFinalizePrefix = 0x76,
    /// Request approval to sign the transaction
    TxSign = 0x77,
    /// Fetch ring signatures for a transaction input
    TxSignInput = 0x78,
    /// Reset / abort the current transaction
    TxReset = 0x79,

    /// Re-derive wallet keys from the stored seed
    ResetKeys = 0xff,
}

/// Helper macro for encoding `bitflags` types
#[macro_export]
macro_rules! encdec_bitflags {
    ($b:ty) => {
        impl encdec::Encode for $b {
            type Error = $crate::ApduError;

            fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
                let bits: u8 = self.bits();
                encdec::Encode::encode(&bits, buff).map_err(|e| e.into())
            }

            fn encode_len(&self) -> Result<usize, Self::Error> {
                let bits: u8 = self.bits();
                encdec::Encode::encode_len(&bits).map_err(|e| e.into())
            }
        }

        impl encdec::DecodeOwned for $b {
            type Output = $b;
            type Error = $crate::ApduError;

            fn decode_owned(buff: &[u8]) -> Result<(Self, usize), Self::Error> {
                if buff.is_empty() {
                    return Err($crate::ApduError::InvalidLength);
                }

                let v = <$b>::from_bits_truncate(buff[0]);
                Ok((v, 1))
            }
        }
    };
}

bitflags::bitflags! {
    /// Request flags
    pub struct RequestFlags: u8 {
        /// Request user confirmation prior to returning the result
        const CONFIRM = 1 << 0;
    }
}

encdec_bitflags!(RequestFlags);
