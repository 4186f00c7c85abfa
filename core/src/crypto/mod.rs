// Copyright (c) 2022-2023 The MobileCoin Foundation

//! CryptoNote scalar / point primitives over ed25519
//!
//! Scalars are 32-byte little-endian integers modulo the group order `l`,
//! points are 32-byte compressed Edwards points. Values crossing the device
//! boundary are _checked_ prior to use: scalars must be canonical (`< l`),
//! points must decompress, lie in the prime-order subgroup and not be the
//! identity.

use curve25519_dalek::{
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
    traits::IsIdentity,
};
use rand_core::CryptoRngCore;
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

pub mod derivation;
pub mod keys;
pub mod ring;
pub mod signature;

/// Maximum encoded length of a CryptoNote varint (u64)
pub const VARINT_MAX_LEN: usize = 10;

/// Keccak-256 (original keccak padding, as used by CryptoNote `cn_fast_hash`)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Hash to scalar (`H_s`), `sc_reduce32(keccak256(data))`
pub fn hash_to_scalar(data: &[u8]) -> Scalar {
    Scalar::from_bytes_mod_order(keccak256(data))
}

/// Reduce a finished keccak state to a scalar, for callers streaming large inputs
pub(crate) fn finalize_scalar(h: Keccak256) -> Scalar {
    Scalar::from_bytes_mod_order(h.finalize().into())
}

/// Hash to point (`H_p`), CryptoNote `hash_to_ec` over the provided key bytes
pub fn hash_to_point(key: &[u8; 32]) -> EdwardsPoint {
    monero_generators::hash_to_point(*key)
}

/// Check whether the provided bytes are a canonical scalar
pub fn is_valid_scalar(bytes: &[u8; 32]) -> bool {
    Scalar::from_canonical_bytes(*bytes).is_some().into()
}

/// Check whether the provided bytes are a valid public key
pub fn is_valid_point(bytes: &[u8; 32]) -> bool {
    decompress_point(bytes).is_some()
}

/// Decompress and check a point, returning `None` for off-curve,
/// non-canonical, small-order / mixed-order, or identity encodings
pub fn decompress_point(bytes: &[u8; 32]) -> Option<EdwardsPoint> {
    let p = CompressedEdwardsY(*bytes).decompress()?;

    // Reject non-canonical encodings
    if p.compress().as_bytes() != bytes {
        return None;
    }

    if p.is_identity() || !p.is_torsion_free() {
        return None;
    }

    Some(p)
}

/// Decompress a scalar, returning `None` if the encoding is not canonical
pub fn decompress_scalar(bytes: &[u8; 32]) -> Option<Scalar> {
    Scalar::from_canonical_bytes(*bytes).into()
}

/// Scalar multiplication by the base point, `s·G`
#[inline]
pub fn scalar_mult_base(s: &Scalar) -> EdwardsPoint {
    EdwardsPoint::mul_base(s)
}

/// Scalar multiplication, `s·P`
#[inline]
pub fn scalar_mult(s: &Scalar, p: &EdwardsPoint) -> EdwardsPoint {
    s * p
}

/// Point addition, `P + Q`
#[inline]
pub fn point_add(p: &EdwardsPoint, q: &EdwardsPoint) -> EdwardsPoint {
    p + q
}

/// Generate a uniformly random scalar via wide reduction
pub fn random_scalar(rng: &mut impl CryptoRngCore) -> Scalar {
    let mut b = [0u8; 64];
    rng.fill_bytes(&mut b);

    let s = Scalar::from_bytes_mod_order_wide(&b);

    b.zeroize();

    s
}

/// Write a CryptoNote varint (LEB128) to the provided buffer,
/// returning the number of bytes written
pub fn write_varint(mut v: u64, buff: &mut [u8; VARINT_MAX_LEN]) -> usize {
    let mut n = 0;

    while v >= 0x80 {
        buff[n] = (v as u8 & 0x7f) | 0x80;
        v >>= 7;
        n += 1;
    }

    buff[n] = v as u8;

    n + 1
}

/// Helper trait for streaming CryptoNote serializations into a hasher
pub(crate) trait VarintExt {
    fn update_varint(&mut self, v: u64);
}

impl VarintExt for Keccak256 {
    fn update_varint(&mut self, v: u64) {
        let mut b = [0u8; VARINT_MAX_LEN];
        let n = write_varint(v, &mut b);
        self.update(&b[..n]);
    }
}

#[cfg(test)]
mod test {
    use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
    use rand_core::OsRng;

    use super::*;

    #[test]
    fn keccak_vectors() {
        // Keccak-256 of the empty string (pre-NIST padding)
        assert_eq!(
            hex::encode(keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn varint_encoding() {
        let tests: &[(u64, &[u8])] = &[
            (0, &[0x00]),
            (1, &[0x01]),
            (0x7f, &[0x7f]),
            (0x80, &[0x80, 0x01]),
            (300, &[0xac, 0x02]),
            (3914525, &[0x9d, 0xf6, 0xee, 0x01]),
            (
                u64::MAX,
                &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
            ),
        ];

        for (v, e) in tests {
            let mut b = [0u8; VARINT_MAX_LEN];
            let n = write_varint(*v, &mut b);
            assert_eq!(&b[..n], *e, "varint encoding mismatch for {v}");
        }
    }

    #[test]
    fn canonical_scalars() {
        for _i in 0..16 {
            let s = random_scalar(&mut OsRng {});
            assert!(is_valid_scalar(&s.to_bytes()));
        }

        // Group order `l` is not canonical
        let l = hex::decode("edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010")
            .unwrap();
        assert!(!is_valid_scalar(l[..].try_into().unwrap()));

        // Nor is anything with the top bits set
        assert!(!is_valid_scalar(&[0xff; 32]));
    }

    #[test]
    fn base_multiples_are_valid_points() {
        for _i in 0..16 {
            let s = random_scalar(&mut OsRng {});
            let p = scalar_mult_base(&s);

            assert!(is_valid_point(&p.compress().to_bytes()));
            assert_eq!(p, scalar_mult(&s, &ED25519_BASEPOINT_POINT));
        }
    }

    #[test]
    fn invalid_points() {
        // Identity
        let mut identity = [0u8; 32];
        identity[0] = 1;
        assert!(!is_valid_point(&identity));

        // Order 2 point (y = -1)
        let mut torsion = [0xffu8; 32];
        torsion[0] = 0xec;
        torsion[31] = 0x7f;
        assert!(!is_valid_point(&torsion));

        // Mixed order point
        let s = random_scalar(&mut OsRng {});
        let p = scalar_mult_base(&s) + decompress_torsion(&torsion);
        assert!(!is_valid_point(&p.compress().to_bytes()));

        // Non-canonical encoding of a valid point (sign bit set with x = 0)
        let mut negative_identity = identity;
        negative_identity[31] |= 0x80;
        assert!(!is_valid_point(&negative_identity));
    }

    fn decompress_torsion(b: &[u8; 32]) -> EdwardsPoint {
        CompressedEdwardsY(*b).decompress().unwrap()
    }

    #[test]
    fn hash_to_point_vectors() {
        let tests = [
            (
                "5866666666666666666666666666666666666666666666666666666666666666",
                "6db5959b81f18f6cde673fc870005e26f6084f80d5c3f59f5f20adeb2db4eec5",
            ),
            (
                "8dd66e22bbd89fc26195fb3db5eae9d6de1c17b12136dce8349d7b8a64e617be",
                "9822951c0611181e79c836260d460e532409315ffad0fd5cdbcf81e43f5b4af3",
            ),
            (
                "0000000000000000000000000000000000000000000000000000000000000000",
                "2d2c4d74df05ba930eaab01825af274eaabcd217bf99dfd54fdf2efe574033f3",
            ),
        ];

        for (key, point) in tests {
            let key: [u8; 32] = hex::decode(key).unwrap().try_into().unwrap();

            assert_eq!(hex::encode(hash_to_point(&key).compress().as_bytes()), point);
        }
    }

    #[test]
    fn hash_to_point_is_valid() {
        for _i in 0..8 {
            let s = random_scalar(&mut OsRng {});
            let p = hash_to_point(&scalar_mult_base(&s).compress().to_bytes());

            assert!(p.is_torsion_free());
            assert!(!p.is_identity());
        }
    }

    #[test]
    fn point_addition() {
        let a = random_scalar(&mut OsRng {});
        let b = random_scalar(&mut OsRng {});

        assert_eq!(
            point_add(&scalar_mult_base(&a), &scalar_mult_base(&b)),
            scalar_mult_base(&(a + b))
        );
    }
}
