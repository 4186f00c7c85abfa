// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Wallet keys and public addresses
//!
//! Wallet keys are derived deterministically from a 32-byte master seed,
//! `spend = H_s(seed)` and `view = H_s(spend)`.

use heapless::String;

use crate::{
    crypto::{
        hash_to_scalar, keccak256,
        keys::{KeyPair, PublicKey, SecretKey},
        write_varint, VARINT_MAX_LEN,
    },
    engine::Error,
    helpers::encode_base58,
};

/// TurtleCoin public address prefix (`TRTL`)
pub const TRTL_ADDRESS_PREFIX: u64 = 0x3bbb1d;

/// Encoded public address length
pub const ADDRESS_LEN: usize = 99;

/// Address checksum length
const CHECKSUM_LEN: usize = 4;

/// Encoded public address
pub type Address = String<ADDRESS_LEN>;

/// Wallet view and spend key pairs
#[derive(Clone, Debug, PartialEq)]
pub struct WalletKeys {
    pub spend: KeyPair,
    pub view: KeyPair,
}

impl WalletKeys {
    /// Derive wallet keys from the master seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let spend = SecretKey::from_scalar(hash_to_scalar(seed));
        let view = SecretKey::from_scalar(hash_to_scalar(&spend.to_bytes()[..]));

        Self {
            spend: KeyPair::from_private(spend),
            view: KeyPair::from_private(view),
        }
    }

    /// Load wallet keys from stored private keys
    pub fn from_private(spend: &[u8; 32], view: &[u8; 32]) -> Result<Self, Error> {
        Ok(Self {
            spend: KeyPair::from_private(SecretKey::try_from(spend)?),
            view: KeyPair::from_private(SecretKey::try_from(view)?),
        })
    }

    /// Compute the public address for these keys
    pub fn address(&self) -> Result<Address, Error> {
        encode_address(TRTL_ADDRESS_PREFIX, &self.spend.public, &self.view.public)
    }
}

/// Encode a public address,
/// `base58(varint(prefix) || spend || view || keccak256(..)[..4])`
pub fn encode_address(
    prefix: u64,
    spend_public: &PublicKey,
    view_public: &PublicKey,
) -> Result<Address, Error> {
    let mut b = [0u8; VARINT_MAX_LEN + 64 + CHECKSUM_LEN];

    let mut v = [0u8; VARINT_MAX_LEN];
    let mut n = write_varint(prefix, &mut v);
    b[..n].copy_from_slice(&v[..n]);

    b[n..][..32].copy_from_slice(spend_public.as_bytes());
    n += 32;
    b[n..][..32].copy_from_slice(view_public.as_bytes());
    n += 32;

    let checksum = keccak256(&b[..n]);
    b[n..][..CHECKSUM_LEN].copy_from_slice(&checksum[..CHECKSUM_LEN]);
    n += CHECKSUM_LEN;

    encode_base58(&b[..n]).map_err(|_| Error::EncodingFailed)
}

#[cfg(test)]
mod test {
    use super::*;

    /// Seed `00 01 .. 1f`
    const SEED: [u8; 32] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d,
        0x1e, 0x1f,
    ];

    #[test]
    fn wallet_keys_from_seed() {
        let k = WalletKeys::from_seed(&SEED);

        assert_eq!(
            hex::encode(&k.spend.private.to_bytes()[..]),
            "b039bf9f4adb213b27713da72243483edea5e526567e92b0321816a4e895bd0d"
        );
        assert_eq!(
            hex::encode(&k.view.private.to_bytes()[..]),
            "e320092b9153311eeea916cfbe92d153d1246fa554a9e17315e3733b91913808"
        );
        assert_eq!(
            hex::encode(k.spend.public.as_bytes()),
            "26d2dcb7437bd654212f1c1620d75e38c2f012f302545ddeb8e51246d9692dd5"
        );
        assert_eq!(
            hex::encode(k.view.public.as_bytes()),
            "3514a6ce309db05062a133aaffb5a7350dc19e0c6e6d8db4a6de13bb8fc9fece"
        );

        // Derivation is deterministic
        assert_eq!(k, WalletKeys::from_seed(&SEED));
    }

    #[test]
    fn wallet_address() {
        let k = WalletKeys::from_seed(&SEED);
        let a = k.address().unwrap();

        assert_eq!(a.len(), ADDRESS_LEN);
        assert!(a.starts_with("TRTL"));
        assert_eq!(
            a.as_str(),
            "TRTLuxUCAAaCHgFmSa5rq36VbtgJ7TSr61Pbn8uWhsiddNA9JK3BPaD98dsukDkyLdjmhnnhpowMDKUHnUSzJ5TpR3wATj6mvSR"
        );
    }

    #[test]
    fn wallet_keys_from_private() {
        let k = WalletKeys::from_seed(&SEED);

        let l = WalletKeys::from_private(&k.spend.private.to_bytes(), &k.view.private.to_bytes())
            .unwrap();
        assert_eq!(k, l);

        assert_eq!(
            WalletKeys::from_private(&[0xff; 32], &k.view.private.to_bytes()).err(),
            Some(Error::InvalidScalar)
        );
    }
}
