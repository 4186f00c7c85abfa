// Copyright (c) 2022-2023 The MobileCoin Foundation

//! The [Engine] provides functionality required by hardware wallets.
//!
//! This handles [Event] inputs and returns [Output] responses to the caller,
//! see [apdu][crate::apdu] for APDU protocol / encoding specifications.
//!
//! Wallet keys and approvals are provided by the platform via the [Driver] trait.

use rand_core::{CryptoRngCore, OsRng};
use static_assertions::const_assert;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};
use zeroize::Zeroizing;

use ledger_trtl_apdu::{
    ring::{RingKeys, RingSignatures},
    RING_SIZE,
};

use crate::{
    crypto::{
        derivation::{
            derive_ephemeral, derive_public_key, derive_secret_key, generate_key_derivation,
            generate_key_image, KeyDerivation,
        },
        is_valid_point, is_valid_scalar,
        keys::{private_to_public, KeyPair, PublicKey, SecretKey},
        ring::{
            check_ring_signatures, complete_ring_signature, generate_ring_signatures,
            prepare_ring_signatures,
        },
        signature::{check_signature, generate_signature, Signature},
    },
    wallet::WalletKeys,
};

mod approval;
pub use approval::Approval;

mod error;
pub use error::Error;

mod event;
pub use event::Event;

mod function;
pub use function::Function;

mod output;
pub use output::Output;

mod tx;
pub use tx::{Transaction, TxInput, MAX_INPUTS};

/// Application identifier, returned by `GetIdent`
pub const IDENT: &str = "TRTL-LEDGER";

// Counters are reported as u8 / u16 values
const_assert!(MAX_INPUTS <= u8::MAX as usize);
const_assert!(RING_SIZE <= u8::MAX as usize);

/// Engine internal state enumeration
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter)]
pub enum State {
    /// Idle state, no transaction running
    Idle,
    /// Loading transaction inputs (count loaded)
    ReceivingInputs(u8),
    /// Loading transaction outputs (count loaded)
    ReceivingOutputs(u8),
    /// All outputs loaded, ready to finalize the prefix
    OutputsReceived,
    /// Prefix hashed, ready to request signing approval
    PrefixFinalized,
    /// Signing inputs (count signed)
    Signing(u8),
    /// Transaction complete
    Complete,
    /// Transaction aborted / denied
    Aborted,
}

/// Secure storage slots used by the [Engine]
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Slot {
    /// Master seed (provisioned by the platform)
    MasterSeed,
    /// Private spend key
    SpendKey,
    /// Private view key
    ViewKey,
}

/// [`Driver`] trait provides platform support for [`Engine`] instances
pub trait Driver {
    /// Load a value from secure storage
    fn load(&self, slot: Slot) -> Option<Zeroizing<[u8; 32]>>;

    /// Write a value to secure storage
    fn store(&mut self, slot: Slot, value: &[u8; 32]);

    /// Request user approval, returning `true` if approved
    fn approve(&mut self, req: &Approval) -> bool;
}

impl<T: Driver> Driver for &mut T {
    fn load(&self, slot: Slot) -> Option<Zeroizing<[u8; 32]>> {
        T::load(self, slot)
    }

    fn store(&mut self, slot: Slot, value: &[u8; 32]) {
        T::store(self, slot, value)
    }

    fn approve(&mut self, req: &Approval) -> bool {
        T::approve(self, req)
    }
}

/// Parse a decimal version component at compile time
const fn version_part(s: &str) -> u8 {
    let b = s.as_bytes();
    let mut v: u8 = 0;
    let mut i = 0;

    while i < b.len() {
        v = v.wrapping_mul(10).wrapping_add(b[i].wrapping_sub(b'0'));
        i += 1;
    }

    v
}

/// [Engine] provides hardware-independent support for TurtleCoin wallet operations
///
pub struct Engine<DRV: Driver, RNG: CryptoRngCore = OsRng> {
    state: State,

    function: Function,

    drv: DRV,
    rng: RNG,
}

impl<DRV: Driver> Engine<DRV> {
    /// Create a new engine instance with the provided driver,
    /// using the default [OsRng]
    pub const fn new(drv: DRV) -> Self {
        Self::new_with_rng(drv, OsRng {})
    }
}

impl<DRV: Driver, RNG: CryptoRngCore> Engine<DRV, RNG> {
    /// Create a new engine instance with the provided driver and rng
    pub const fn new_with_rng(drv: DRV, rng: RNG) -> Self {
        Self {
            state: State::Idle,
            function: Function::new(),
            drv,
            rng,
        }
    }

    /// Handle incoming events
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn update(&mut self, evt: &Event) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!("event: {} (state: {})", evt.name(), self.state);

        match (self.state, evt) {
            // Empty event, do nothing
            (_, Event::None) => (),

            // Application information
            (_, Event::GetVersion) => {
                return Ok(Output::Version {
                    major: version_part(env!("CARGO_PKG_VERSION_MAJOR")),
                    minor: version_part(env!("CARGO_PKG_VERSION_MINOR")),
                    patch: version_part(env!("CARGO_PKG_VERSION_PATCH")),
                })
            }
            (_, Event::IsDebug) => {
                return Ok(Output::IsDebug {
                    debug: cfg!(debug_assertions),
                })
            }
            (_, Event::GetIdent) => return Ok(Output::Ident { ident: IDENT }),

            // Wallet keys
            (_, Event::GetPublicKeys { confirm }) => {
                let keys = self.wallet_keys()?;
                self.confirm(*confirm, &Approval::PublicKeys)?;

                return Ok(Output::PublicKeys {
                    spend_public: keys.spend.public.to_bytes(),
                    view_public: keys.view.public.to_bytes(),
                });
            }
            (_, Event::GetPrivateViewKey) => {
                let keys = self.wallet_keys()?;
                self.approve(&Approval::ExportViewKey)?;

                return Ok(Output::PrivateKey {
                    private_key: keys.view.private.to_bytes(),
                });
            }
            (_, Event::GetPrivateSpendKey) => {
                let keys = self.wallet_keys()?;
                self.approve(&Approval::ExportSpendKey)?;

                return Ok(Output::PrivateKey {
                    private_key: keys.spend.private.to_bytes(),
                });
            }
            (_, Event::GetAddress { confirm }) => {
                let address = self.wallet_keys()?.address()?;
                self.confirm(*confirm, &Approval::Address(address.as_str()))?;

                return Ok(Output::Address { address });
            }
            (_, Event::ResetKeys { confirm }) => {
                self.confirm(*confirm, &Approval::ResetKeys)?;
                let keys = self.reset_keys()?;

                return Ok(Output::PublicKeys {
                    spend_public: keys.spend.public.to_bytes(),
                    view_public: keys.view.public.to_bytes(),
                });
            }

            // Key utilities
            (_, Event::CheckKey { public_key }) => {
                return Ok(Output::Valid {
                    valid: is_valid_point(public_key),
                })
            }
            (_, Event::CheckScalar { scalar }) => {
                return Ok(Output::Valid {
                    valid: is_valid_scalar(scalar),
                })
            }
            (_, Event::PrivateToPublic { private_key }) => {
                let public_key = private_to_public(private_key)?;

                return Ok(Output::PublicKey {
                    public_key: public_key.to_bytes(),
                });
            }
            (_, Event::GenerateRandomKeyPair) => {
                let k = KeyPair::random(&mut self.rng);

                return Ok(Output::KeyPair {
                    public_key: k.public.to_bytes(),
                    private_key: k.private.to_bytes(),
                });
            }

            // Key images
            (
                _,
                Event::GenerateKeyImage {
                    confirm,
                    tx_public_key,
                    output_index,
                    output_key,
                },
            ) => {
                let tx_public_key = PublicKey::try_from(tx_public_key)?;
                let keys = self.wallet_keys()?;
                let derivation = generate_key_derivation(&tx_public_key, &keys.view.private);

                return self.key_image(*confirm, &keys, &derivation, *output_index, output_key);
            }
            (
                _,
                Event::GenerateKeyImagePrimitive {
                    confirm,
                    derivation,
                    output_index,
                    output_key,
                },
            ) => {
                let derivation = KeyDerivation::try_from(derivation)?;
                let keys = self.wallet_keys()?;

                return self.key_image(*confirm, &keys, &derivation, *output_index, output_key);
            }

            // Signatures
            (
                _,
                Event::GenerateSignature {
                    confirm: _,
                    message_digest,
                },
            ) => {
                self.check_idle()?;

                let keys = self.wallet_keys()?;
                self.approve(&Approval::Signature)?;

                let s = generate_signature(&mut self.rng, message_digest, &keys.spend);

                return Ok(Output::Signature {
                    signature: s.to_bytes(),
                });
            }
            (
                _,
                Event::CheckSignature {
                    message_digest,
                    public_key,
                    signature,
                },
            ) => {
                return Ok(Output::Valid {
                    valid: check_signature(message_digest, public_key, signature),
                })
            }

            // Key derivation
            (
                _,
                Event::GenerateKeyDerivation {
                    confirm,
                    tx_public_key,
                },
            ) => {
                let tx_public_key = PublicKey::try_from(tx_public_key)?;
                let keys = self.wallet_keys()?;
                self.confirm(*confirm, &Approval::KeyDerivation)?;

                let d = generate_key_derivation(&tx_public_key, &keys.view.private);

                return Ok(Output::KeyDerivation {
                    derivation: *d.as_bytes(),
                });
            }
            (
                _,
                Event::DerivePublicKey {
                    confirm,
                    derivation,
                    output_index,
                },
            ) => {
                let d = KeyDerivation::try_from(derivation)?;
                let keys = self.wallet_keys()?;
                self.confirm(*confirm, &Approval::DerivePublicKey)?;

                let p = derive_public_key(&d, *output_index, &keys.spend.public);

                return Ok(Output::PublicKey {
                    public_key: p.to_bytes(),
                });
            }
            (
                _,
                Event::DeriveSecretKey {
                    derivation,
                    output_index,
                },
            ) => {
                let d = KeyDerivation::try_from(derivation)?;
                let keys = self.wallet_keys()?;
                self.approve(&Approval::DeriveSecretKey)?;

                let x = derive_secret_key(&d, *output_index, &keys.spend.private);

                return Ok(Output::PrivateKey {
                    private_key: x.to_bytes(),
                });
            }

            // Ring signatures
            (
                _,
                Event::PrepareRingSignatures {
                    prefix_hash,
                    key_image,
                    public_keys,
                    real_index,
                },
            ) => {
                let mut sigs = [Signature::default(); RING_SIZE];
                let n = public_keys.len();

                let k = prepare_ring_signatures(
                    &mut self.rng,
                    prefix_hash,
                    key_image,
                    public_keys,
                    *real_index as usize,
                    &mut sigs[..n],
                )?;

                return Ok(Output::PreparedRing {
                    k: k.to_bytes(),
                    signatures: ring_signatures(&sigs[..n])?,
                });
            }
            (
                _,
                Event::CompleteRingSignature {
                    confirm: _,
                    tx_public_key,
                    output_index,
                    output_key,
                    k,
                    signature,
                },
            ) => {
                self.check_idle()?;

                let tx_public_key = PublicKey::try_from(tx_public_key)?;
                let output_key = PublicKey::try_from(output_key)?;
                let k = SecretKey::try_from(&**k)?;

                let keys = self.wallet_keys()?;
                let d = generate_key_derivation(&tx_public_key, &keys.view.private);
                let x = derive_ephemeral(&d, *output_index, &output_key, &keys.spend)?;

                // The response reveals the one-time key to anyone holding `k`
                self.approve(&Approval::RingSignatures)?;

                let s = complete_ring_signature(&k, &x, signature)?;

                return Ok(Output::Signature {
                    signature: s.to_bytes(),
                });
            }
            (
                _,
                Event::GenerateRingSignatures {
                    confirm: _,
                    tx_public_key,
                    output_index,
                    output_key,
                    prefix_hash,
                    public_keys,
                    real_index,
                },
            ) => {
                self.check_idle()?;

                return self.ring_sign(
                    tx_public_key,
                    *output_index,
                    output_key,
                    prefix_hash,
                    public_keys,
                    *real_index as usize,
                );
            }
            (
                _,
                Event::CheckRingSignatures {
                    prefix_hash,
                    key_image,
                    public_keys,
                    signatures,
                },
            ) => {
                return Ok(Output::Valid {
                    valid: check_ring_signatures(prefix_hash, key_image, public_keys, signatures),
                })
            }

            // Start a transaction, discarding any transaction in progress
            (
                _,
                Event::TxStart {
                    unlock_time,
                    num_inputs,
                    num_outputs,
                    tx_public_key,
                    payment_id,
                },
            ) => {
                let r = self.tx_start(
                    *unlock_time,
                    *num_inputs,
                    *num_outputs,
                    tx_public_key,
                    *payment_id,
                );
                return self.tx_result(r);
            }

            // Load transaction inputs
            (
                State::ReceivingInputs(n),
                Event::TxLoadInput {
                    real_index,
                    output_index,
                    amount,
                    tx_public_key,
                    offsets,
                    public_keys,
                },
            ) => {
                let r = self.tx_load_input(
                    n,
                    *real_index as usize,
                    *output_index,
                    *amount,
                    tx_public_key,
                    offsets,
                    public_keys,
                );
                return self.tx_result(r);
            }

            // Load transaction outputs
            (State::ReceivingOutputs(n), Event::TxLoadOutput { amount, output_key }) => {
                let r = self.tx_load_output(n, *amount, output_key);
                return self.tx_result(r);
            }

            // Hash the transaction prefix
            (State::OutputsReceived, Event::TxFinalizePrefix) => {
                let r = self.tx_finalize();
                return self.tx_result(r);
            }

            // Request approval to sign
            (State::PrefixFinalized, Event::TxSign) => {
                let r = self.tx_sign();
                return self.tx_result(r);
            }

            // Sign inputs in order
            (State::Signing(n), Event::TxSignInput { input_index }) if *input_index == n => {
                let r = self.tx_sign_input(n);
                return self.tx_result(r);
            }

            // Abort transaction
            (_, Event::TxReset) => self.tx_abort(),

            // Fetch transaction state / information
            (_, Event::TxGetInfo) => (),

            // Handle unexpected events
            _e => {
                #[cfg(feature = "log")]
                log::error!("Unexpected event in state {:?}: {}", self.state, _e.1.name());

                return Err(Error::TransactionState);
            }
        }

        // Default to returning updated state
        Ok(Output::State { state: self.state })
    }

    /// Fetch current engine state
    pub fn state(&self) -> State {
        self.state
    }

    /// Fetch the platform driver
    pub fn driver(&mut self) -> &mut DRV {
        &mut self.drv
    }

    /// Fetch the transaction in progress, if any
    pub fn transaction(&self) -> Option<&Transaction> {
        self.function.tx_ref()
    }

    /// Reset engine state, discarding any transaction in progress
    pub fn reset(&mut self) {
        self.function.clear();
        self.state = State::Idle;
    }

    /// Load wallet keys from storage, provisioning these from the master seed on first use
    #[cfg_attr(feature = "noinline", inline(never))]
    fn wallet_keys(&mut self) -> Result<WalletKeys, Error> {
        if let (Some(spend), Some(view)) =
            (self.drv.load(Slot::SpendKey), self.drv.load(Slot::ViewKey))
        {
            return WalletKeys::from_private(&spend, &view);
        }

        #[cfg(feature = "log")]
        log::info!("provisioning wallet keys");

        self.reset_keys()
    }

    /// Re-derive wallet keys from the master seed and write these to storage
    #[cfg_attr(feature = "noinline", inline(never))]
    fn reset_keys(&mut self) -> Result<WalletKeys, Error> {
        let seed = match self.drv.load(Slot::MasterSeed) {
            Some(s) => s,
            None => {
                #[cfg(feature = "log")]
                log::error!("master seed unavailable");

                return Err(Error::InternalError);
            }
        };

        let keys = WalletKeys::from_seed(&seed);

        self.drv.store(Slot::SpendKey, &keys.spend.private.to_bytes());
        self.drv.store(Slot::ViewKey, &keys.view.private.to_bytes());

        Ok(keys)
    }

    /// Request user approval
    fn approve(&mut self, req: &Approval) -> Result<(), Error> {
        #[cfg(feature = "log")]
        log::info!("approval request: {}", req.title());

        if self.drv.approve(req) {
            return Ok(());
        }

        #[cfg(feature = "log")]
        log::warn!("approval denied: {}", req.title());

        Err(Error::OperationNotPermitted)
    }

    /// Request user approval where confirmation is requested
    fn confirm(&mut self, confirm: bool, req: &Approval) -> Result<(), Error> {
        match confirm {
            true => self.approve(req),
            false => Ok(()),
        }
    }

    /// Check no transaction is in progress, standalone signing
    /// is not available while a transaction is being loaded or signed
    fn check_idle(&self) -> Result<(), Error> {
        match self.state {
            State::Idle | State::Complete | State::Aborted => Ok(()),
            _state => {
                #[cfg(feature = "log")]
                log::error!("signing unavailable in state {:?}", _state);

                Err(Error::TransactionState)
            }
        }
    }

    /// Compute a key image for an owned output
    fn key_image(
        &mut self,
        confirm: bool,
        keys: &WalletKeys,
        derivation: &KeyDerivation,
        output_index: u32,
        output_key: &[u8; 32],
    ) -> Result<Output, Error> {
        let output_key = PublicKey::try_from(output_key)?;
        let x = derive_ephemeral(derivation, output_index, &output_key, &keys.spend)?;

        self.confirm(confirm, &Approval::KeyImage)?;

        Ok(Output::KeyImage {
            key_image: generate_key_image(&output_key, &x),
        })
    }

    /// Generate ring signatures for an owned output
    #[cfg_attr(feature = "noinline", inline(never))]
    fn ring_sign(
        &mut self,
        tx_public_key: &[u8; 32],
        output_index: u32,
        output_key: &[u8; 32],
        prefix_hash: &[u8; 32],
        public_keys: &RingKeys,
        real_index: usize,
    ) -> Result<Output, Error> {
        if public_keys.get(real_index) != Some(output_key) {
            return Err(Error::InvalidIndex);
        }

        let tx_public_key = PublicKey::try_from(tx_public_key)?;
        let output_key = PublicKey::try_from(output_key)?;

        let keys = self.wallet_keys()?;
        let d = generate_key_derivation(&tx_public_key, &keys.view.private);
        let x = derive_ephemeral(&d, output_index, &output_key, &keys.spend)?;
        let key_image = generate_key_image(&output_key, &x);

        self.approve(&Approval::RingSignatures)?;

        let mut sigs = [Signature::default(); RING_SIZE];
        let n = public_keys.len();

        generate_ring_signatures(
            &mut self.rng,
            prefix_hash,
            &key_image,
            public_keys,
            &x,
            real_index,
            &mut sigs[..n],
        )?;

        Ok(Output::RingSignatures {
            signatures: ring_signatures(&sigs[..n])?,
        })
    }

    /// Abort any transaction on error
    fn tx_result(&mut self, r: Result<Output, Error>) -> Result<Output, Error> {
        if let Err(_e) = &r {
            #[cfg(feature = "log")]
            log::error!("transaction aborted: {:?}", _e);

            self.tx_abort();
        }

        r
    }

    /// Abort the current transaction, wiping the transaction context
    fn tx_abort(&mut self) {
        self.function.clear();
        self.state = State::Aborted;
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    fn tx_start(
        &mut self,
        unlock_time: u64,
        num_inputs: u8,
        num_outputs: u8,
        tx_public_key: &[u8; 32],
        payment_id: Option<[u8; 32]>,
    ) -> Result<Output, Error> {
        // Clear prior transaction before validating the new one
        self.function.clear();

        let tx_public_key = PublicKey::try_from(tx_public_key)?;

        self.function.tx_init(
            unlock_time,
            num_inputs as usize,
            num_outputs as usize,
            tx_public_key,
            payment_id,
        )?;

        self.state = State::ReceivingInputs(0);

        Ok(Output::State { state: self.state })
    }

    #[allow(clippy::too_many_arguments)]
    #[cfg_attr(feature = "noinline", inline(never))]
    fn tx_load_input(
        &mut self,
        n: u8,
        real_index: usize,
        output_index: u32,
        amount: u64,
        tx_public_key: &[u8; 32],
        offsets: &[u32],
        public_keys: &RingKeys,
    ) -> Result<Output, Error> {
        // Check ring members prior to use
        if public_keys.iter().any(|k| !is_valid_point(k)) {
            return Err(Error::InvalidPoint);
        }

        let output_key = public_keys.get(real_index).ok_or(Error::InvalidIndex)?;
        let output_key = PublicKey::try_from(output_key)?;
        let tx_public_key = PublicKey::try_from(tx_public_key)?;

        // Recover the one-time key for the owned output
        let keys = self.wallet_keys()?;
        let d = generate_key_derivation(&tx_public_key, &keys.view.private);
        let ephemeral = derive_ephemeral(&d, output_index, &output_key, &keys.spend)?;
        let key_image = generate_key_image(&output_key, &ephemeral);

        let tx = self.function.tx().ok_or(Error::InternalError)?;
        tx.add_input(
            amount,
            offsets,
            TxInput {
                real_index,
                key_image,
                public_keys: public_keys.clone(),
                ephemeral,
            },
        )?;

        self.state = match n as usize + 1 == tx.num_inputs() {
            true => State::ReceivingOutputs(0),
            false => State::ReceivingInputs(n + 1),
        };

        Ok(Output::State { state: self.state })
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    fn tx_load_output(
        &mut self,
        n: u8,
        amount: u64,
        output_key: &[u8; 32],
    ) -> Result<Output, Error> {
        let output_key = PublicKey::try_from(output_key)?;

        let tx = self.function.tx().ok_or(Error::InternalError)?;
        tx.add_output(amount, &output_key)?;

        self.state = match n as usize + 1 == tx.num_outputs() {
            true => State::OutputsReceived,
            false => State::ReceivingOutputs(n + 1),
        };

        Ok(Output::State { state: self.state })
    }

    fn tx_finalize(&mut self) -> Result<Output, Error> {
        let tx = self.function.tx().ok_or(Error::InternalError)?;
        let prefix_hash = tx.finalize()?;

        #[cfg(feature = "log")]
        log::debug!("prefix hash: {:02x?}", prefix_hash);

        self.state = State::PrefixFinalized;

        Ok(Output::TxPrefixHash {
            state: self.state,
            prefix_hash,
        })
    }

    fn tx_sign(&mut self) -> Result<Output, Error> {
        let tx = self.function.tx_ref().ok_or(Error::InternalError)?;

        let req = Approval::Transaction {
            amount: tx.amount(),
            fee: tx.fee(),
            num_inputs: tx.num_inputs() as u8,
            num_outputs: tx.num_outputs() as u8,
        };

        #[cfg(feature = "log")]
        {
            let (mut a, mut f) = ([0u8; 32], [0u8; 32]);
            log::info!(
                "transaction: {:?} (fee: {:?})",
                req.amount(&mut a),
                req.fee(&mut f)
            );
        }

        self.approve(&req)?;

        self.state = State::Signing(0);

        Ok(Output::State { state: self.state })
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    fn tx_sign_input(&mut self, n: u8) -> Result<Output, Error> {
        let tx = self.function.tx_ref().ok_or(Error::InternalError)?;
        let prefix_hash = tx.prefix_hash().ok_or(Error::TransactionState)?;
        let input = tx.input(n as usize).ok_or(Error::InvalidIndex)?;

        let mut sigs = [Signature::default(); RING_SIZE];
        let len = input.public_keys.len();

        generate_ring_signatures(
            &mut self.rng,
            prefix_hash,
            &input.key_image,
            &input.public_keys,
            &input.ephemeral,
            input.real_index,
            &mut sigs[..len],
        )?;

        let signatures = ring_signatures(&sigs[..len])?;
        let key_image = input.key_image;
        let last = n as usize + 1 == tx.num_inputs();

        // Wipe the transaction context once all inputs are signed
        self.state = match last {
            true => {
                self.function.clear();
                State::Complete
            }
            false => State::Signing(n + 1),
        };

        Ok(Output::TxSignatures {
            state: self.state,
            input_index: n,
            key_image,
            signatures,
        })
    }
}

/// Encode signatures for transmission
fn ring_signatures(sigs: &[Signature]) -> Result<RingSignatures, Error> {
    let mut r = RingSignatures::new();

    for s in sigs {
        r.push(s.to_bytes()).map_err(|_| Error::InvalidLength)?;
    }

    Ok(r)
}

#[cfg(test)]
mod test {
    extern crate std;

    use std::vec::Vec;

    use rand::random;
    use rand_core::OsRng;
    use strum::IntoEnumIterator;

    use super::*;

    /// Seed `00 01 .. 1f`
    const SEED: [u8; 32] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d,
        0x1e, 0x1f,
    ];

    /// Owned output for test transactions
    pub struct TestOutput {
        pub tx_public_key: [u8; 32],
        pub output_index: u32,
        pub ring: RingKeys,
    }

    impl TestOutput {
        /// Build an output owned by `keys` at `real_index` in a random ring
        pub fn new(keys: &WalletKeys, output_index: u32, real_index: usize) -> Self {
            let r = KeyPair::random(&mut OsRng {});

            let d = generate_key_derivation(&keys.view.public, &r.private);
            let p = derive_public_key(&d, output_index, &keys.spend.public);

            let mut ring = RingKeys::new();
            for i in 0..RING_SIZE {
                let k = match i == real_index {
                    true => p.to_bytes(),
                    false => KeyPair::random(&mut OsRng {}).public.to_bytes(),
                };
                ring.push(k).unwrap();
            }

            Self {
                tx_public_key: r.public.to_bytes(),
                output_index,
                ring,
            }
        }
    }

    lazy_static::lazy_static! {
        pub static ref OUTPUT: TestOutput = TestOutput::new(&WalletKeys::from_seed(&SEED), 1, 2);

        /// Valid transaction events and their required states
        pub static ref TESTS: [(State, Event); 6] = [
            (State::Idle, Event::TxStart{
                unlock_time: 0,
                num_inputs: 1,
                num_outputs: 1,
                tx_public_key: KeyPair::random(&mut OsRng{}).public.to_bytes(),
                payment_id: None,
            }),

            (State::ReceivingInputs(0), Event::TxLoadInput {
                real_index: 2,
                output_index: OUTPUT.output_index,
                amount: 1000,
                tx_public_key: OUTPUT.tx_public_key,
                offsets: heapless::Vec::from_slice(&[10, 20, 30, 40]).unwrap(),
                public_keys: OUTPUT.ring.clone(),
            }),

            (State::ReceivingOutputs(0), Event::TxLoadOutput {
                amount: 900,
                output_key: KeyPair::random(&mut OsRng{}).public.to_bytes(),
            }),

            (State::OutputsReceived, Event::TxFinalizePrefix),

            (State::PrefixFinalized, Event::TxSign),

            (State::Signing(0), Event::TxSignInput{ input_index: 0 }),
        ];
    }

    /// Driver implementation for test use
    pub struct TestDriver {
        pub seed: Option<[u8; 32]>,
        pub spend: Option<[u8; 32]>,
        pub view: Option<[u8; 32]>,
        pub approve: bool,
        pub requests: Vec<&'static str>,
    }

    impl TestDriver {
        /// Create a new test driver with a fixed seed, approving all requests
        pub fn new() -> Self {
            Self {
                seed: Some(SEED),
                spend: None,
                view: None,
                approve: true,
                requests: Vec::new(),
            }
        }
    }

    impl Driver for TestDriver {
        fn load(&self, slot: Slot) -> Option<Zeroizing<[u8; 32]>> {
            let v = match slot {
                Slot::MasterSeed => self.seed,
                Slot::SpendKey => self.spend,
                Slot::ViewKey => self.view,
            };
            v.map(Zeroizing::new)
        }

        fn store(&mut self, slot: Slot, value: &[u8; 32]) {
            match slot {
                Slot::MasterSeed => self.seed = Some(*value),
                Slot::SpendKey => self.spend = Some(*value),
                Slot::ViewKey => self.view = Some(*value),
            }
        }

        fn approve(&mut self, req: &Approval) -> bool {
            self.requests.push(req.title());
            self.approve
        }
    }

    /// Step through valid events and states
    #[test]
    fn valid_events() {
        let mut e = Engine::new(TestDriver::new());

        for (state, evt) in &*TESTS {
            assert_eq!(e.state(), *state);

            // Fire expected event
            let r = e.update(evt);

            // Check response is okay
            assert!(r.is_ok(), "event {evt:?} failed, error response: {r:?}");
        }

        assert_eq!(e.state(), State::Complete);
        assert!(e.transaction().is_none());
    }

    /// Ensure we're handling unexpected events
    #[test]
    fn invalid_events() {
        for (okay_state, evt) in &*TESTS {
            // Transactions may be started from any state
            if let Event::TxStart { .. } = evt {
                continue;
            }

            // Fire the same event to every other state
            for state in State::iter() {
                if state == *okay_state {
                    continue;
                }

                let mut e = Engine::new(TestDriver::new());
                e.state = state;

                // Fire incorrect event
                let r = e.update(evt);

                // Check engine reports event error and state is unchanged
                assert_eq!(r, Err(Error::TransactionState), "event {evt:?} in {state:?}");
                assert_eq!(e.state(), state);
            }
        }
    }

    #[test]
    fn finalize_in_idle() {
        let mut e = Engine::new(TestDriver::new());

        let r = e.update(&Event::TxFinalizePrefix);

        assert_eq!(r, Err(Error::TransactionState));
        assert_eq!(e.state(), State::Idle);
    }

    #[test]
    fn sign_input_out_of_order() {
        let mut e = Engine::new(TestDriver::new());

        for (_state, evt) in &TESTS[..5] {
            e.update(evt).unwrap();
        }
        assert_eq!(e.state(), State::Signing(0));

        let r = e.update(&Event::TxSignInput { input_index: 1 });
        assert_eq!(r, Err(Error::TransactionState));
        assert_eq!(e.state(), State::Signing(0));
    }

    #[test]
    fn reset_keys_is_deterministic() {
        let mut e = Engine::new(TestDriver::new());

        let a = e.update(&Event::ResetKeys { confirm: false }).unwrap();
        let spend = e.drv.spend;
        let view = e.drv.view;

        let b = e.update(&Event::ResetKeys { confirm: false }).unwrap();

        assert_eq!(a, b);
        assert_eq!(spend, e.drv.spend);
        assert_eq!(view, e.drv.view);

        let keys = WalletKeys::from_seed(&SEED);
        assert_eq!(
            a,
            Output::PublicKeys {
                spend_public: keys.spend.public.to_bytes(),
                view_public: keys.view.public.to_bytes(),
            }
        );
    }

    #[test]
    fn keys_provisioned_on_first_use() {
        let mut e = Engine::new(TestDriver::new());
        assert!(e.drv.spend.is_none());

        e.update(&Event::GetPublicKeys { confirm: false }).unwrap();

        let keys = WalletKeys::from_seed(&SEED);
        assert_eq!(e.drv.spend, Some(*keys.spend.private.to_bytes()));
        assert_eq!(e.drv.view, Some(*keys.view.private.to_bytes()));
        assert!(e.drv.requests.is_empty());
    }

    #[test]
    fn missing_seed() {
        let mut d = TestDriver::new();
        d.seed = None;

        let mut e = Engine::new(d);

        assert_eq!(
            e.update(&Event::GetPublicKeys { confirm: false }),
            Err(Error::InternalError)
        );
        assert_eq!(
            e.update(&Event::ResetKeys { confirm: false }),
            Err(Error::InternalError)
        );
    }

    #[test]
    fn approvals() {
        let mut d = TestDriver::new();
        d.approve = false;

        let mut e = Engine::new(d);

        // Private exports always require approval
        for evt in [
            Event::GetPrivateViewKey,
            Event::GetPrivateSpendKey,
            Event::DeriveSecretKey {
                derivation: KeyPair::random(&mut OsRng {}).public.to_bytes(),
                output_index: 0,
            },
        ] {
            assert_eq!(e.update(&evt), Err(Error::OperationNotPermitted));
        }

        // Others only where confirmation is requested
        assert!(e.update(&Event::GetPublicKeys { confirm: false }).is_ok());
        assert_eq!(
            e.update(&Event::GetPublicKeys { confirm: true }),
            Err(Error::OperationNotPermitted)
        );
        assert_eq!(
            e.update(&Event::GetAddress { confirm: true }),
            Err(Error::OperationNotPermitted)
        );

        assert_eq!(
            &e.drv.requests,
            &[
                "Export view key",
                "Export spend key",
                "Export output key",
                "Export public keys",
                "Confirm address"
            ]
        );

        // Approved exports return wallet keys
        e.drv.approve = true;

        let keys = WalletKeys::from_seed(&SEED);
        let r = e.update(&Event::GetPrivateSpendKey).unwrap();
        assert_eq!(
            r,
            Output::PrivateKey {
                private_key: keys.spend.private.to_bytes()
            }
        );
    }

    #[test]
    fn signing_requires_approval() {
        let mut d = TestDriver::new();
        d.approve = false;

        let mut e = Engine::new(d);

        // Derivations are available without confirmation
        assert!(e
            .update(&Event::GenerateKeyDerivation {
                confirm: false,
                tx_public_key: OUTPUT.tx_public_key,
            })
            .is_ok());

        // Completing with a known `k` and `c` would reveal the one-time key
        let mut one = [0u8; 32];
        one[0] = 1;
        let mut partial = [0u8; 64];
        partial[0] = 1;

        assert_eq!(
            e.update(&Event::CompleteRingSignature {
                confirm: false,
                tx_public_key: OUTPUT.tx_public_key,
                output_index: OUTPUT.output_index,
                output_key: OUTPUT.ring[2],
                k: Zeroizing::new(one),
                signature: partial,
            }),
            Err(Error::OperationNotPermitted)
        );

        assert_eq!(
            e.update(&Event::GenerateRingSignatures {
                confirm: false,
                tx_public_key: OUTPUT.tx_public_key,
                output_index: OUTPUT.output_index,
                output_key: OUTPUT.ring[2],
                prefix_hash: [0x42; 32],
                public_keys: OUTPUT.ring.clone(),
                real_index: 2,
            }),
            Err(Error::OperationNotPermitted)
        );

        assert_eq!(
            e.update(&Event::GenerateSignature {
                confirm: false,
                message_digest: [0x42; 32],
            }),
            Err(Error::OperationNotPermitted)
        );

        assert_eq!(
            &e.drv.requests,
            &["Sign ring", "Sign ring", "Sign message"]
        );
    }

    #[test]
    fn signing_unavailable_during_tx() {
        let mut e = Engine::new(TestDriver::new());

        for (_state, evt) in &TESTS[..2] {
            e.update(evt).unwrap();
        }
        assert_eq!(e.state(), State::ReceivingOutputs(0));

        let events = [
            Event::GenerateSignature {
                confirm: true,
                message_digest: [0x42; 32],
            },
            Event::GenerateRingSignatures {
                confirm: true,
                tx_public_key: OUTPUT.tx_public_key,
                output_index: OUTPUT.output_index,
                output_key: OUTPUT.ring[2],
                prefix_hash: [0x42; 32],
                public_keys: OUTPUT.ring.clone(),
                real_index: 2,
            },
        ];

        for evt in &events {
            assert_eq!(e.update(evt), Err(Error::TransactionState), "{evt:?}");
            assert_eq!(e.state(), State::ReceivingOutputs(0));
        }
        assert!(e.drv.requests.is_empty());
        assert!(e.transaction().is_some());

        // Available again once the transaction is aborted
        e.update(&Event::TxReset).unwrap();
        assert!(e.update(&events[0]).is_ok());
    }

    #[test]
    fn tx_denied() {
        let mut e = Engine::new(TestDriver::new());

        for (_state, evt) in &TESTS[..4] {
            e.update(evt).unwrap();
        }
        assert_eq!(e.state(), State::PrefixFinalized);

        e.drv.approve = false;

        let r = e.update(&Event::TxSign);
        assert_eq!(r, Err(Error::OperationNotPermitted));
        assert_eq!(e.state(), State::Aborted);
        assert!(e.transaction().is_none());

        // Signing is no longer reachable
        let r = e.update(&Event::TxSignInput { input_index: 0 });
        assert_eq!(r, Err(Error::TransactionState));
    }

    #[test]
    fn tx_error_aborts() {
        let mut e = Engine::new(TestDriver::new());
        e.update(&TESTS[0].1).unwrap();

        // Wrong output index for the owned output
        let r = e.update(&Event::TxLoadInput {
            real_index: 2,
            output_index: OUTPUT.output_index + 3,
            amount: 1000,
            tx_public_key: OUTPUT.tx_public_key,
            offsets: heapless::Vec::from_slice(&[10, 20, 30, 40]).unwrap(),
            public_keys: OUTPUT.ring.clone(),
        });

        assert_eq!(r, Err(Error::InvalidIndex));
        assert_eq!(e.state(), State::Aborted);
        assert!(e.transaction().is_none());

        // Restart following abort
        assert!(e.update(&TESTS[0].1).is_ok());
        assert_eq!(e.state(), State::ReceivingInputs(0));
    }

    #[test]
    fn tx_outputs_exceed_inputs() {
        let mut e = Engine::new(TestDriver::new());
        e.update(&TESTS[0].1).unwrap();
        e.update(&TESTS[1].1).unwrap();

        e.update(&Event::TxLoadOutput {
            amount: 1001,
            output_key: KeyPair::random(&mut OsRng {}).public.to_bytes(),
        })
        .unwrap();

        assert_eq!(e.update(&Event::TxFinalizePrefix), Err(Error::InvalidAmount));
        assert_eq!(e.state(), State::Aborted);
    }

    #[test]
    fn tx_reset() {
        let mut e = Engine::new(TestDriver::new());

        for (_state, evt) in &TESTS[..3] {
            e.update(evt).unwrap();
        }

        let r = e.update(&Event::TxReset).unwrap();
        assert_eq!(r, State::Aborted);
        assert!(e.transaction().is_none());

        e.reset();
        assert_eq!(e.state(), State::Idle);
    }

    #[test]
    fn tx_signatures_verify() {
        let mut e = Engine::new(TestDriver::new());

        for (_state, evt) in &TESTS[..3] {
            e.update(evt).unwrap();
        }

        let prefix_hash = match e.update(&Event::TxFinalizePrefix).unwrap() {
            Output::TxPrefixHash { prefix_hash, .. } => prefix_hash,
            r => panic!("unexpected response: {r:?}"),
        };

        let r = e.update(&Event::TxSign).unwrap();
        assert_eq!(r, State::Signing(0));

        let r = e.update(&Event::TxSignInput { input_index: 0 }).unwrap();
        let (key_image, signatures) = match r {
            Output::TxSignatures {
                state: State::Complete,
                input_index: 0,
                key_image,
                signatures,
            } => (key_image, signatures),
            r => panic!("unexpected response: {r:?}"),
        };

        // Key image matches the standalone command
        let r = e
            .update(&Event::GenerateKeyImage {
                confirm: false,
                tx_public_key: OUTPUT.tx_public_key,
                output_index: OUTPUT.output_index,
                output_key: OUTPUT.ring[2],
            })
            .unwrap();
        assert_eq!(r, Output::KeyImage { key_image });

        assert!(check_ring_signatures(
            &prefix_hash,
            &key_image,
            &OUTPUT.ring,
            &signatures
        ));

        assert!(e.drv.requests.contains(&"Sign transaction"));
    }

    #[test]
    fn app_info() {
        let mut e = Engine::new(TestDriver::new());

        assert_eq!(
            e.update(&Event::GetIdent),
            Ok(Output::Ident {
                ident: "TRTL-LEDGER"
            })
        );
        assert_eq!(
            e.update(&Event::GetVersion),
            Ok(Output::Version {
                major: 0,
                minor: 1,
                patch: 0
            })
        );
        assert_eq!(version_part("12"), 12);
    }

    #[test]
    fn key_utilities() {
        let mut e = Engine::new(TestDriver::new());

        let (public_key, private_key) = match e.update(&Event::GenerateRandomKeyPair).unwrap() {
            Output::KeyPair {
                public_key,
                private_key,
            } => (public_key, private_key),
            r => panic!("unexpected response: {r:?}"),
        };

        assert_eq!(
            e.update(&Event::CheckKey { public_key }),
            Ok(Output::Valid { valid: true })
        );
        assert_eq!(
            e.update(&Event::CheckScalar {
                scalar: *private_key
            }),
            Ok(Output::Valid { valid: true })
        );
        assert_eq!(
            e.update(&Event::PrivateToPublic {
                private_key: private_key.clone()
            }),
            Ok(Output::PublicKey { public_key })
        );

        // Public key supplied as a private key
        assert_eq!(
            e.update(&Event::CheckScalar { scalar: [0xff; 32] }),
            Ok(Output::Valid { valid: false })
        );
        assert_eq!(
            e.update(&Event::PrivateToPublic {
                private_key: Zeroizing::new([0xff; 32])
            }),
            Err(Error::InvalidScalar)
        );
    }

    #[test]
    fn derivations() {
        let mut e = Engine::new(TestDriver::new());

        let derivation = match e
            .update(&Event::GenerateKeyDerivation {
                confirm: false,
                tx_public_key: OUTPUT.tx_public_key,
            })
            .unwrap()
        {
            Output::KeyDerivation { derivation } => derivation,
            r => panic!("unexpected response: {r:?}"),
        };

        let public_key = match e
            .update(&Event::DerivePublicKey {
                confirm: false,
                derivation,
                output_index: OUTPUT.output_index,
            })
            .unwrap()
        {
            Output::PublicKey { public_key } => public_key,
            r => panic!("unexpected response: {r:?}"),
        };
        assert_eq!(public_key, OUTPUT.ring[2]);

        let private_key = match e
            .update(&Event::DeriveSecretKey {
                derivation,
                output_index: OUTPUT.output_index,
            })
            .unwrap()
        {
            Output::PrivateKey { private_key } => private_key,
            r => panic!("unexpected response: {r:?}"),
        };
        assert_eq!(
            private_to_public(&private_key).unwrap().to_bytes(),
            public_key
        );

        // Primitive key image matches
        let a = e
            .update(&Event::GenerateKeyImagePrimitive {
                confirm: false,
                derivation,
                output_index: OUTPUT.output_index,
                output_key: public_key,
            })
            .unwrap();
        let b = e
            .update(&Event::GenerateKeyImage {
                confirm: false,
                tx_public_key: OUTPUT.tx_public_key,
                output_index: OUTPUT.output_index,
                output_key: public_key,
            })
            .unwrap();
        assert_eq!(a, b);

        // Identity point as the transaction key
        let mut identity = [0u8; 32];
        identity[0] = 1;

        assert_eq!(
            e.update(&Event::GenerateKeyDerivation {
                confirm: false,
                tx_public_key: identity,
            }),
            Err(Error::InvalidPoint)
        );
    }

    #[test]
    fn signatures() {
        let mut e = Engine::new(TestDriver::new());
        let keys = WalletKeys::from_seed(&SEED);
        let message_digest: [u8; 32] = random();

        let signature = match e
            .update(&Event::GenerateSignature {
                confirm: false,
                message_digest,
            })
            .unwrap()
        {
            Output::Signature { signature } => signature,
            r => panic!("unexpected response: {r:?}"),
        };

        assert_eq!(
            e.update(&Event::CheckSignature {
                message_digest,
                public_key: keys.spend.public.to_bytes(),
                signature,
            }),
            Ok(Output::Valid { valid: true })
        );
        assert_eq!(
            e.update(&Event::CheckSignature {
                message_digest,
                public_key: *keys.spend.private.to_bytes(),
                signature,
            }),
            Ok(Output::Valid { valid: false })
        );
    }

    #[test]
    fn rings() {
        let mut e = Engine::new(TestDriver::new());
        let prefix_hash: [u8; 32] = random();

        // One-shot generation
        let signatures = match e
            .update(&Event::GenerateRingSignatures {
                confirm: false,
                tx_public_key: OUTPUT.tx_public_key,
                output_index: OUTPUT.output_index,
                output_key: OUTPUT.ring[2],
                prefix_hash,
                public_keys: OUTPUT.ring.clone(),
                real_index: 2,
            })
            .unwrap()
        {
            Output::RingSignatures { signatures } => signatures,
            r => panic!("unexpected response: {r:?}"),
        };

        let key_image = match e
            .update(&Event::GenerateKeyImage {
                confirm: false,
                tx_public_key: OUTPUT.tx_public_key,
                output_index: OUTPUT.output_index,
                output_key: OUTPUT.ring[2],
            })
            .unwrap()
        {
            Output::KeyImage { key_image } => key_image,
            r => panic!("unexpected response: {r:?}"),
        };

        assert_eq!(
            e.update(&Event::CheckRingSignatures {
                prefix_hash,
                key_image,
                public_keys: OUTPUT.ring.clone(),
                signatures: signatures.clone(),
            }),
            Ok(Output::Valid { valid: true })
        );

        // Reversed signatures fail
        let mut reversed = signatures.clone();
        reversed.reverse();
        assert_eq!(
            e.update(&Event::CheckRingSignatures {
                prefix_hash,
                key_image,
                public_keys: OUTPUT.ring.clone(),
                signatures: reversed,
            }),
            Ok(Output::Valid { valid: false })
        );

        // Real index not matching the output key
        assert_eq!(
            e.update(&Event::GenerateRingSignatures {
                confirm: false,
                tx_public_key: OUTPUT.tx_public_key,
                output_index: OUTPUT.output_index,
                output_key: OUTPUT.ring[2],
                prefix_hash,
                public_keys: OUTPUT.ring.clone(),
                real_index: 1,
            }),
            Err(Error::InvalidIndex)
        );

        // Prepare and complete
        let (k, mut signatures) = match e
            .update(&Event::PrepareRingSignatures {
                prefix_hash,
                key_image,
                public_keys: OUTPUT.ring.clone(),
                real_index: 2,
            })
            .unwrap()
        {
            Output::PreparedRing { k, signatures } => (k, signatures),
            r => panic!("unexpected response: {r:?}"),
        };

        // Wrong output index fails
        assert_eq!(
            e.update(&Event::CompleteRingSignature {
                confirm: false,
                tx_public_key: OUTPUT.tx_public_key,
                output_index: OUTPUT.output_index + 3,
                output_key: OUTPUT.ring[2],
                k: k.clone(),
                signature: signatures[2],
            }),
            Err(Error::InvalidIndex)
        );

        signatures[2] = match e
            .update(&Event::CompleteRingSignature {
                confirm: false,
                tx_public_key: OUTPUT.tx_public_key,
                output_index: OUTPUT.output_index,
                output_key: OUTPUT.ring[2],
                k,
                signature: signatures[2],
            })
            .unwrap()
        {
            Output::Signature { signature } => signature,
            r => panic!("unexpected response: {r:?}"),
        };

        assert!(check_ring_signatures(
            &prefix_hash,
            &key_image,
            &OUTPUT.ring,
            &signatures
        ));
    }
}
