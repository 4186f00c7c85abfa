// Copyright (c) 2022-2023 The MobileCoin Foundation

//! CryptoNote (Schnorr-style) signatures over message digests

use curve25519_dalek::{scalar::Scalar, traits::IsIdentity};
use rand_core::CryptoRngCore;
use sha3::{Digest, Keccak256};

use super::{
    decompress_point, decompress_scalar, finalize_scalar,
    keys::{KeyPair, SecretKey},
    random_scalar, scalar_mult_base,
};
use crate::engine::Error;

/// Signature `(c, r)` scalar pair
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Signature {
    pub c: Scalar,
    pub r: Scalar,
}

impl Signature {
    /// Encode to `c || r`
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut b = [0u8; 64];
        b[..32].copy_from_slice(self.c.as_bytes());
        b[32..].copy_from_slice(self.r.as_bytes());
        b
    }

    /// Decode from `c || r`, returning [Error::InvalidScalar] for non-canonical scalars
    pub fn from_bytes(b: &[u8; 64]) -> Result<Self, Error> {
        let (c, r) = split(b);

        match (decompress_scalar(&c), decompress_scalar(&r)) {
            (Some(c), Some(r)) => Ok(Self { c, r }),
            _ => Err(Error::InvalidScalar),
        }
    }
}

/// Split a signature encoding into `c` and `r` components
pub(crate) fn split(b: &[u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut c = [0u8; 32];
    let mut r = [0u8; 32];
    c.copy_from_slice(&b[..32]);
    r.copy_from_slice(&b[32..]);
    (c, r)
}

/// Sign a 32-byte message digest
///
/// `c = H_s(digest || P || k·G)`, `r = k - c·x` with random `k`
pub fn generate_signature(
    rng: &mut impl CryptoRngCore,
    digest: &[u8; 32],
    keys: &KeyPair,
) -> Signature {
    let k = SecretKey::from_scalar(random_scalar(rng));
    let kg = scalar_mult_base(k.scalar());

    let mut h = Keccak256::new();
    h.update(digest);
    h.update(keys.public.as_bytes());
    h.update(kg.compress().as_bytes());
    let c = finalize_scalar(h);

    let r = k.scalar() - c * keys.private.scalar();

    Signature { c, r }
}

/// Check a signature over a 32-byte message digest
///
/// Returns `false` for any invalid signature, public key, or non-canonical scalar.
pub fn check_signature(digest: &[u8; 32], public_key: &[u8; 32], signature: &[u8; 64]) -> bool {
    let p = match decompress_point(public_key) {
        Some(p) => p,
        None => return false,
    };

    let s = match Signature::from_bytes(signature) {
        Ok(s) => s,
        Err(_) => return false,
    };

    // Recompute commitment `r·G + c·P`
    let comm = scalar_mult_base(&s.r) + s.c * p;
    if comm.is_identity() {
        return false;
    }

    let mut h = Keccak256::new();
    h.update(digest);
    h.update(public_key);
    h.update(comm.compress().as_bytes());
    let c = finalize_scalar(h);

    c == s.c
}

#[cfg(test)]
mod test {
    use rand::random;
    use rand_core::OsRng;

    use super::*;

    #[test]
    fn signature_vector() {
        let seed: [u8; 32] = core::array::from_fn(|i| i as u8);
        let keys = crate::wallet::WalletKeys::from_seed(&seed);

        let signature: [u8; 64] = hex::decode(
            "a3eb4aefc12e41b6639533e5b4ee704acc38304c99e837d903561099f2237e05\
             09230daf789984d6e91837a1ac35550905f03679dced0c5e67fe8b2b472d4103",
        )
        .unwrap()
        .try_into()
        .unwrap();

        let public_key = keys.spend.public.to_bytes();

        assert!(check_signature(&[0xa5; 32], &public_key, &signature));
        assert!(!check_signature(&[0xa4; 32], &public_key, &signature));
    }

    #[test]
    fn sign_verify() {
        let keys = KeyPair::random(&mut OsRng {});

        for _i in 0..8 {
            let digest: [u8; 32] = random();
            let sig = generate_signature(&mut OsRng {}, &digest, &keys);

            assert!(check_signature(&digest, keys.public.as_bytes(), &sig.to_bytes()));
        }
    }

    #[test]
    fn reject_modified() {
        let keys = KeyPair::random(&mut OsRng {});
        let other = KeyPair::random(&mut OsRng {});

        let digest: [u8; 32] = random();
        let sig = generate_signature(&mut OsRng {}, &digest, &keys).to_bytes();

        // Wrong digest
        let mut d = digest;
        d[0] ^= 0x01;
        assert!(!check_signature(&d, keys.public.as_bytes(), &sig));

        // Wrong key
        assert!(!check_signature(&digest, other.public.as_bytes(), &sig));

        // Private key passed as public key
        assert!(!check_signature(&digest, &keys.private.to_bytes(), &sig));

        // Bit flips in either scalar
        for i in [0, 31, 32, 63] {
            let mut s = sig;
            s[i] ^= 0x01;
            assert!(!check_signature(&digest, keys.public.as_bytes(), &s));
        }

        // Non-canonical response
        let mut s = sig;
        s[32..].copy_from_slice(&[0xff; 32]);
        assert!(!check_signature(&digest, keys.public.as_bytes(), &s));
    }

    #[test]
    fn signature_encoding() {
        let keys = KeyPair::random(&mut OsRng {});
        let sig = generate_signature(&mut OsRng {}, &random(), &keys);

        let decoded = Signature::from_bytes(&sig.to_bytes()).unwrap();
        assert_eq!(decoded, sig);

        assert_eq!(
            Signature::from_bytes(&[0xff; 64]).err(),
            Some(Error::InvalidScalar)
        );
    }
}
