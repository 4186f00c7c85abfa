// Copyright (c) 2022-2023 The MobileCoin Foundation

//! CryptoNote (pre-RingCT) ring signatures
//!
//! Signing is split into two phases so the host can assemble rings without
//! the device holding more than one ring at a time:
//!
//! 1. [prepare_ring_signatures] generates random `(c_i, r_i)` for decoys and
//!    the closing challenge for the real entry, returning the nonce `k`.
//! 2. [complete_ring_signature] computes the real response `r = k - c·x`.
//!
//! [generate_ring_signatures] performs both phases in one call.

use curve25519_dalek::{edwards::EdwardsPoint, scalar::Scalar};
use rand_core::CryptoRngCore;
use sha3::{Digest, Keccak256};

use super::{
    decompress_point, decompress_scalar, finalize_scalar, hash_to_point,
    keys::SecretKey,
    random_scalar, scalar_mult, scalar_mult_base,
    signature::{split, Signature},
};
use crate::engine::Error;

/// Compute the `L = r·G + c·P` and `R = r·H_p(P) + c·I` ring commitments
fn commitments(
    c: &Scalar,
    r: &Scalar,
    p: &EdwardsPoint,
    p_bytes: &[u8; 32],
    key_image: &EdwardsPoint,
) -> (EdwardsPoint, EdwardsPoint) {
    let l = scalar_mult_base(r) + scalar_mult(c, p);
    let r = scalar_mult(r, &hash_to_point(p_bytes)) + scalar_mult(c, key_image);

    (l, r)
}

/// Prepare ring signatures for the provided ring, writing random decoy
/// signatures and the real challenge to `signatures` and returning the
/// nonce `k` required to complete the real signature.
///
/// The real entry holds `c_real = H_s(prefix || L_0 || R_0 ...) - Σ c_decoys`
/// and a zero response until completed.
#[cfg_attr(feature = "noinline", inline(never))]
pub fn prepare_ring_signatures(
    rng: &mut impl CryptoRngCore,
    prefix_hash: &[u8; 32],
    key_image: &[u8; 32],
    public_keys: &[[u8; 32]],
    real_index: usize,
    signatures: &mut [Signature],
) -> Result<SecretKey, Error> {
    let n = public_keys.len();
    if n == 0 || signatures.len() != n {
        return Err(Error::InvalidLength);
    }
    if real_index >= n {
        return Err(Error::InvalidIndex);
    }

    let image = decompress_point(key_image).ok_or(Error::InvalidPoint)?;

    let k = SecretKey::from_scalar(random_scalar(rng));

    let mut h = Keccak256::new();
    h.update(prefix_hash);

    let mut sum = Scalar::ZERO;

    for (i, pk) in public_keys.iter().enumerate() {
        let p = decompress_point(pk).ok_or(Error::InvalidPoint)?;

        let (l, r) = if i == real_index {
            // Real entry commits to the nonce
            let l = scalar_mult_base(k.scalar());
            let r = scalar_mult(k.scalar(), &hash_to_point(pk));
            (l, r)
        } else {
            // Decoys use random challenge / response
            let s = Signature {
                c: random_scalar(rng),
                r: random_scalar(rng),
            };
            sum += s.c;
            signatures[i] = s;

            commitments(&s.c, &s.r, &p, pk, &image)
        };

        h.update(l.compress().as_bytes());
        h.update(r.compress().as_bytes());
    }

    // Close the ring
    signatures[real_index] = Signature {
        c: finalize_scalar(h) - sum,
        r: Scalar::ZERO,
    };

    Ok(k)
}

/// Complete a prepared ring signature with the nonce `k` and the one-time
/// private key `x`, computing `r = k - c·x`
pub fn complete_ring_signature(
    k: &SecretKey,
    x: &SecretKey,
    partial: &[u8; 64],
) -> Result<Signature, Error> {
    let (c, _) = split(partial);
    let c = decompress_scalar(&c).ok_or(Error::InvalidScalar)?;

    Ok(Signature {
        c,
        r: k.scalar() - c * x.scalar(),
    })
}

/// Generate ring signatures in one pass, for the real entry at `real_index`
/// with one-time private key `x`.
///
/// Returns [Error::InvalidIndex] if `public_keys[real_index]` does not match `x·G`.
#[cfg_attr(feature = "noinline", inline(never))]
pub fn generate_ring_signatures(
    rng: &mut impl CryptoRngCore,
    prefix_hash: &[u8; 32],
    key_image: &[u8; 32],
    public_keys: &[[u8; 32]],
    x: &SecretKey,
    real_index: usize,
    signatures: &mut [Signature],
) -> Result<(), Error> {
    match public_keys.get(real_index) {
        Some(p) if p == x.public_key().as_bytes() => (),
        _ => return Err(Error::InvalidIndex),
    }

    let k = prepare_ring_signatures(
        rng,
        prefix_hash,
        key_image,
        public_keys,
        real_index,
        signatures,
    )?;

    let real = &mut signatures[real_index];
    real.r = k.scalar() - real.c * x.scalar();

    Ok(())
}

/// Check ring signatures against the provided prefix hash, key image and ring.
///
/// Returns `false` for mismatched lengths, invalid points (including key images
/// outside the prime-order subgroup), non-canonical scalars, or where the
/// challenge chain does not close.
#[cfg_attr(feature = "noinline", inline(never))]
pub fn check_ring_signatures(
    prefix_hash: &[u8; 32],
    key_image: &[u8; 32],
    public_keys: &[[u8; 32]],
    signatures: &[[u8; 64]],
) -> bool {
    let n = public_keys.len();
    if n == 0 || signatures.len() != n {
        return false;
    }

    let image = match decompress_point(key_image) {
        Some(v) => v,
        None => return false,
    };

    let mut h = Keccak256::new();
    h.update(prefix_hash);

    let mut sum = Scalar::ZERO;

    for (pk, sig) in public_keys.iter().zip(signatures.iter()) {
        let p = match decompress_point(pk) {
            Some(v) => v,
            None => return false,
        };

        let s = match Signature::from_bytes(sig) {
            Ok(v) => v,
            Err(_) => return false,
        };

        let (l, r) = commitments(&s.c, &s.r, &p, pk, &image);

        h.update(l.compress().as_bytes());
        h.update(r.compress().as_bytes());

        sum += s.c;
    }

    finalize_scalar(h) - sum == Scalar::ZERO
}
