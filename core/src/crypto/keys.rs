// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Checked key types

use core::fmt::Debug;

use curve25519_dalek::{edwards::EdwardsPoint, scalar::Scalar};
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::{decompress_point, decompress_scalar, random_scalar, scalar_mult_base};
use crate::engine::Error;

/// Checked public key, holds both the compressed encoding and decompressed point
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PublicKey {
    point: EdwardsPoint,
    bytes: [u8; 32],
}

impl PublicKey {
    /// Create a public key from an (already validated) point
    pub(crate) fn from_point(point: EdwardsPoint) -> Self {
        Self {
            bytes: point.compress().to_bytes(),
            point,
        }
    }

    /// Fetch the decompressed point
    pub fn point(&self) -> &EdwardsPoint {
        &self.point
    }

    /// Fetch the compressed encoding
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Fetch a copy of the compressed encoding
    pub fn to_bytes(&self) -> [u8; 32] {
        self.bytes
    }
}

impl TryFrom<&[u8; 32]> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &[u8; 32]) -> Result<Self, Self::Error> {
        match decompress_point(bytes) {
            Some(point) => Ok(Self {
                point,
                bytes: *bytes,
            }),
            None => Err(Error::InvalidPoint),
        }
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PublicKey({:02x?})", self.bytes)
    }
}

/// Checked secret key, zeroized on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Scalar);

impl SecretKey {
    /// Wrap a scalar as a secret key
    pub(crate) fn from_scalar(s: Scalar) -> Self {
        Self(s)
    }

    /// Generate a random secret key
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self(random_scalar(rng))
    }

    /// Fetch the underlying scalar
    pub fn scalar(&self) -> &Scalar {
        &self.0
    }

    /// Fetch the scalar encoding, zeroized on drop
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.0.to_bytes())
    }

    /// Compute the matching public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(scalar_mult_base(&self.0))
    }
}

impl TryFrom<&[u8; 32]> for SecretKey {
    type Error = Error;

    fn try_from(bytes: &[u8; 32]) -> Result<Self, Self::Error> {
        match decompress_scalar(bytes) {
            Some(s) => Ok(Self(s)),
            None => Err(Error::InvalidScalar),
        }
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SecretKey(..)")
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        // Constant time via `subtle`
        self.0 == other.0
    }
}

/// Public / private key pair
#[derive(Clone, Debug, PartialEq)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: SecretKey,
}

impl KeyPair {
    /// Generate a random key pair
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self::from_private(SecretKey::random(rng))
    }

    /// Compute a key pair from a private key
    pub fn from_private(private: SecretKey) -> Self {
        Self {
            public: private.public_key(),
            private,
        }
    }
}

/// Compute the public key for the provided private key bytes
pub fn private_to_public(private_key: &[u8; 32]) -> Result<PublicKey, Error> {
    let s = SecretKey::try_from(private_key)?;
    Ok(s.public_key())
}
