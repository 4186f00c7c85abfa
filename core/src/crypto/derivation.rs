// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Stealth address derivation and key images
//!
//! For a transaction public key `R` and wallet keys `(a, A)` (view) and
//! `(b, B)` (spend), the derivation for output `i` is `D = 8·a·R`, from which
//! the one-time output key pair is `P = H_s(D || i)·G + B` and
//! `x = H_s(D || i) + b`. The key image for the output is `I = x·H_p(P)`.

use curve25519_dalek::scalar::Scalar;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{
    decompress_point, hash_to_point,
    keys::{KeyPair, PublicKey, SecretKey},
    scalar_mult, scalar_mult_base, write_varint, VARINT_MAX_LEN,
};
use crate::engine::Error;

/// Shared key derivation `8·a·R` (compressed encoding)
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct KeyDerivation([u8; 32]);

impl KeyDerivation {
    /// Fetch the derivation encoding
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl TryFrom<&[u8; 32]> for KeyDerivation {
    type Error = Error;

    fn try_from(bytes: &[u8; 32]) -> Result<Self, Self::Error> {
        match decompress_point(bytes) {
            Some(_) => Ok(Self(*bytes)),
            None => Err(Error::InvalidPoint),
        }
    }
}

impl core::fmt::Debug for KeyDerivation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "KeyDerivation(..)")
    }
}

/// Key image, the linking tag for a spent output
pub type KeyImage = [u8; 32];

/// Compute the key derivation `8·a·R` for a transaction public key `R`
/// and private view key `a`
pub fn generate_key_derivation(
    tx_public_key: &PublicKey,
    view_private: &SecretKey,
) -> KeyDerivation {
    let p = scalar_mult(view_private.scalar(), tx_public_key.point()).mul_by_cofactor();

    KeyDerivation(p.compress().to_bytes())
}

/// Compute `H_s(D || varint(i))`
pub fn derivation_to_scalar(derivation: &KeyDerivation, output_index: u32) -> Scalar {
    let mut b = [0u8; 32 + VARINT_MAX_LEN];
    b[..32].copy_from_slice(&derivation.0);

    let mut v = [0u8; VARINT_MAX_LEN];
    let n = write_varint(output_index as u64, &mut v);
    b[32..][..n].copy_from_slice(&v[..n]);

    let s = super::hash_to_scalar(&b[..32 + n]);

    b.zeroize();

    s
}

/// Derive the one-time public key `P = H_s(D || i)·G + B` for an output
pub fn derive_public_key(
    derivation: &KeyDerivation,
    output_index: u32,
    spend_public: &PublicKey,
) -> PublicKey {
    let mut s = derivation_to_scalar(derivation, output_index);
    let p = scalar_mult_base(&s) + spend_public.point();

    s.zeroize();

    PublicKey::from_point(p)
}

/// Derive the one-time secret key `x = H_s(D || i) + b` for an output
pub fn derive_secret_key(
    derivation: &KeyDerivation,
    output_index: u32,
    spend_private: &SecretKey,
) -> SecretKey {
    let mut s = derivation_to_scalar(derivation, output_index);
    let x = s + spend_private.scalar();

    s.zeroize();

    SecretKey::from_scalar(x)
}

/// Derive the one-time secret key for an output owned by the provided spend keys,
/// returning [Error::InvalidIndex] where the recomputed public key does not
/// match `output_key`
pub fn derive_ephemeral(
    derivation: &KeyDerivation,
    output_index: u32,
    output_key: &PublicKey,
    spend: &KeyPair,
) -> Result<SecretKey, Error> {
    let x = derive_secret_key(derivation, output_index, &spend.private);

    if x.public_key() != *output_key {
        return Err(Error::InvalidIndex);
    }

    Ok(x)
}

/// Compute the key image `I = x·H_p(P)` for a one-time key pair
pub fn generate_key_image(public_key: &PublicKey, private_key: &SecretKey) -> KeyImage {
    let hp = hash_to_point(public_key.as_bytes());

    scalar_mult(private_key.scalar(), &hp).compress().to_bytes()
}
