// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::Encode;
use zeroize::Zeroizing;

use ledger_proto::ApduError;
use ledger_trtl_apdu::ring::RingSignatures;

use crate::{apdu, wallet::Address};

/// [`Engine`][super::Engine] outputs (in response to events), typically encoded to response [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug)]
pub enum Output {
    None,

    /// Engine / transaction state
    State { state: super::State },

    /// Application version
    Version { major: u8, minor: u8, patch: u8 },

    /// Debug build flag
    IsDebug { debug: bool },

    /// Application identifier
    Ident { ident: &'static str },

    /// Wallet public keys
    PublicKeys {
        spend_public: [u8; 32],
        view_public: [u8; 32],
    },

    /// Exported private key
    PrivateKey { private_key: Zeroizing<[u8; 32]> },

    /// Wallet public address
    Address { address: Address },

    /// Result of a key, scalar or signature check
    Valid { valid: bool },

    /// Computed public key
    PublicKey { public_key: [u8; 32] },

    /// Generated key pair
    KeyPair {
        public_key: [u8; 32],
        private_key: Zeroizing<[u8; 32]>,
    },

    /// Computed key image
    KeyImage { key_image: [u8; 32] },

    /// Computed signature
    Signature { signature: [u8; 64] },

    /// Computed key derivation
    KeyDerivation { derivation: [u8; 32] },

    /// Prepared ring and the blinding scalar for its completion
    PreparedRing {
        k: Zeroizing<[u8; 32]>,
        signatures: RingSignatures,
    },

    /// Ring signatures
    RingSignatures { signatures: RingSignatures },

    /// Finalized transaction prefix hash
    TxPrefixHash {
        state: super::State,
        prefix_hash: [u8; 32],
    },

    /// Key image and ring signatures for a transaction input
    TxSignatures {
        state: super::State,
        input_index: u8,
        key_image: [u8; 32],
        signatures: RingSignatures,
    },
}

impl Output {
    /// Encode an [`Output`] object to a response [APDU]
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        match self {
            Output::None => Ok(0),
            Output::State { state } => {
                apdu::tx::TxInfo::new(state.state(), state.value()).encode(buff)
            }
            Output::Version {
                major,
                minor,
                patch,
            } => apdu::app_info::VersionResp::new(apdu::TRTL_PROTO_VERSION, *major, *minor, *patch)
                .encode(buff),
            Output::IsDebug { debug } => apdu::app_info::DebugResp {
                debug: *debug as u8,
            }
            .encode(buff),
            Output::Ident { ident } => apdu::app_info::IdentResp::new(ident).encode(buff),
            Output::PublicKeys {
                spend_public,
                view_public,
            } => apdu::wallet_keys::PublicKeysResp::new(*spend_public, *view_public).encode(buff),
            Output::PrivateKey { private_key } => {
                let mut r = apdu::keys::PrivateKeyResp::new(**private_key);
                let n = r.encode(buff);
                zeroize::Zeroize::zeroize(&mut r.private_key);
                n
            }
            Output::Address { address } => {
                apdu::wallet_keys::AddressResp::new(address.as_str()).encode(buff)
            }
            Output::Valid { valid } => apdu::keys::ValidResp::new(*valid).encode(buff),
            Output::PublicKey { public_key } => {
                apdu::keys::PublicKeyResp::new(*public_key).encode(buff)
            }
            Output::KeyPair {
                public_key,
                private_key,
            } => {
                let mut r = apdu::keys::KeyPairResp::new(*public_key, **private_key);
                let n = r.encode(buff);
                zeroize::Zeroize::zeroize(&mut r.private_key);
                n
            }
            Output::KeyImage { key_image } => {
                apdu::key_image::KeyImageResp::new(*key_image).encode(buff)
            }
            Output::Signature { signature } => {
                apdu::signature::SignatureResp::new(*signature).encode(buff)
            }
            Output::KeyDerivation { derivation } => {
                apdu::derivation::KeyDerivationResp::new(*derivation).encode(buff)
            }
            Output::PreparedRing { k, signatures } => {
                let mut r = apdu::ring::PrepareRingResp {
                    k: **k,
                    signatures: signatures.clone(),
                };
                let n = r.encode(buff);
                zeroize::Zeroize::zeroize(&mut r.k);
                n
            }
            Output::RingSignatures { signatures } => {
                apdu::ring::RingSignaturesResp::new(signatures.clone()).encode(buff)
            }
            Output::TxPrefixHash { state, prefix_hash } => {
                apdu::tx::TxPrefixHash::new(state.state(), *prefix_hash).encode(buff)
            }
            Output::TxSignatures {
                state,
                input_index,
                key_image,
                signatures,
            } => apdu::tx::TxSignatures {
                state: state.state(),
                input_index: *input_index,
                key_image: *key_image,
                signatures: signatures.clone(),
            }
            .encode(buff),
        }
    }
}

impl PartialEq<super::State> for Output {
    fn eq(&self, other: &super::State) -> bool {
        match self {
            Output::State { state } => state == other,
            _ => false,
        }
    }
}

impl crate::engine::State {
    /// Map [engine](crate::engine) states to [apdu][apdu::state::TxState] states for transmission
    pub fn state(&self) -> apdu::state::TxState {
        use crate::{apdu::state::TxState, engine::State};

        match self {
            State::Idle => TxState::Idle,
            State::ReceivingInputs(_) => TxState::ReceivingInputs,
            State::ReceivingOutputs(_) => TxState::ReceivingOutputs,
            State::OutputsReceived => TxState::OutputsReceived,
            State::PrefixFinalized => TxState::PrefixFinalized,
            State::Signing(_) => TxState::Signing,
            State::Complete => TxState::Complete,
            State::Aborted => TxState::Aborted,
        }
    }

    /// Progress counter for the current state (inputs / outputs loaded or inputs signed)
    pub fn value(&self) -> u16 {
        use crate::engine::State;

        match self {
            State::ReceivingInputs(n) | State::ReceivingOutputs(n) | State::Signing(n) => {
                *n as u16
            }
            _ => 0,
        }
    }
}
