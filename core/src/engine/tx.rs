// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction context, holding loaded inputs and the streaming prefix hash.
//!
//! The prefix is serialized in CryptoNote order as inputs and outputs are
//! loaded, so only the per-input signing material is retained:
//!
//! ```text
//! varint(version) varint(unlock_time)
//! varint(num_inputs)  { 0x02 varint(amount) varint(ring_size) varint(offset)* key_image }
//! varint(num_outputs) { varint(amount) 0x02 output_key }
//! varint(extra_len)   0x01 tx_public_key [0x02 0x21 0x00 payment_id]
//! ```

use heapless::Vec;
use sha3::{Digest, Keccak256};

use ledger_trtl_apdu::ring::RingKeys;

use super::Error;
use crate::crypto::{
    derivation::KeyImage,
    keys::{PublicKey, SecretKey},
    VarintExt,
};

/// Maximum number of inputs per transaction
pub const MAX_INPUTS: usize = 8;

/// Transaction prefix version
const TX_VERSION: u64 = 1;

/// `txin_to_key` variant tag
const TXIN_TO_KEY: u8 = 0x02;

/// `txout_to_key` variant tag
const TXOUT_TO_KEY: u8 = 0x02;

/// Extra field tags
const TX_EXTRA_PUBKEY: u8 = 0x01;
const TX_EXTRA_NONCE: u8 = 0x02;
const TX_EXTRA_NONCE_PAYMENT_ID: u8 = 0x00;

/// Maximum encoded extra length (public key and payment id nonce)
const TX_EXTRA_MAX_LEN: usize = 1 + 32 + 3 + 32;

/// Transaction input loaded for signing
pub struct TxInput {
    /// Index of the owned output within the ring
    pub real_index: usize,
    /// Key image for the owned output
    pub key_image: KeyImage,
    /// Ring public keys
    pub public_keys: RingKeys,
    /// One-time private key for the owned output
    pub(crate) ephemeral: SecretKey,
}

/// Transaction context
pub struct Transaction {
    num_inputs: usize,
    num_outputs: usize,

    tx_public_key: PublicKey,
    payment_id: Option<[u8; 32]>,

    inputs: Vec<TxInput, MAX_INPUTS>,
    outputs: usize,

    input_amount: u64,
    output_amount: u64,

    hasher: Keccak256,
    prefix_hash: Option<[u8; 32]>,
}

impl Transaction {
    /// Create a new transaction context, writing the prefix header
    pub fn new(
        unlock_time: u64,
        num_inputs: usize,
        num_outputs: usize,
        tx_public_key: PublicKey,
        payment_id: Option<[u8; 32]>,
    ) -> Result<Self, Error> {
        if num_inputs == 0 || num_inputs > MAX_INPUTS || num_outputs == 0 {
            return Err(Error::InvalidLength);
        }

        let mut hasher = Keccak256::new();
        hasher.update_varint(TX_VERSION);
        hasher.update_varint(unlock_time);
        hasher.update_varint(num_inputs as u64);

        Ok(Self {
            num_inputs,
            num_outputs,
            tx_public_key,
            payment_id,
            inputs: Vec::new(),
            outputs: 0,
            input_amount: 0,
            output_amount: 0,
            hasher,
            prefix_hash: None,
        })
    }

    /// Add an input to the transaction
    pub fn add_input(&mut self, amount: u64, offsets: &[u32], input: TxInput) -> Result<(), Error> {
        if self.inputs.len() >= self.num_inputs || offsets.len() != input.public_keys.len() {
            return Err(Error::InvalidLength);
        }

        self.input_amount = self
            .input_amount
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        self.hasher.update([TXIN_TO_KEY]);
        self.hasher.update_varint(amount);
        self.hasher.update_varint(offsets.len() as u64);
        for o in offsets {
            self.hasher.update_varint(*o as u64);
        }
        self.hasher.update(input.key_image);

        self.inputs
            .push(input)
            .map_err(|_| Error::InvalidLength)?;

        // Outputs follow the final input
        if self.inputs.len() == self.num_inputs {
            self.hasher.update_varint(self.num_outputs as u64);
        }

        Ok(())
    }

    /// Add an output to the transaction
    pub fn add_output(&mut self, amount: u64, output_key: &PublicKey) -> Result<(), Error> {
        if self.inputs.len() != self.num_inputs || self.outputs >= self.num_outputs {
            return Err(Error::InvalidLength);
        }

        self.output_amount = self
            .output_amount
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        self.hasher.update_varint(amount);
        self.hasher.update([TXOUT_TO_KEY]);
        self.hasher.update(output_key.as_bytes());

        self.outputs += 1;

        Ok(())
    }

    /// Write the extra field and compute the prefix hash
    pub fn finalize(&mut self) -> Result<[u8; 32], Error> {
        if self.inputs.len() != self.num_inputs
            || self.outputs != self.num_outputs
            || self.prefix_hash.is_some()
        {
            return Err(Error::TransactionState);
        }

        if self.output_amount > self.input_amount {
            return Err(Error::InvalidAmount);
        }

        let mut extra = [0u8; TX_EXTRA_MAX_LEN];
        extra[0] = TX_EXTRA_PUBKEY;
        extra[1..33].copy_from_slice(self.tx_public_key.as_bytes());
        let mut n = 33;

        if let Some(payment_id) = &self.payment_id {
            extra[n..][..3].copy_from_slice(&[TX_EXTRA_NONCE, 33, TX_EXTRA_NONCE_PAYMENT_ID]);
            extra[n + 3..][..32].copy_from_slice(payment_id);
            n += 35;
        }

        self.hasher.update_varint(n as u64);
        self.hasher.update(&extra[..n]);

        let h: [u8; 32] = core::mem::take(&mut self.hasher).finalize().into();
        self.prefix_hash = Some(h);

        Ok(h)
    }

    /// Fetch the prefix hash (once finalized)
    pub fn prefix_hash(&self) -> Option<&[u8; 32]> {
        self.prefix_hash.as_ref()
    }

    /// Fetch the expected number of inputs
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Fetch the expected number of outputs
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Fetch a loaded input
    pub fn input(&self, index: usize) -> Option<&TxInput> {
        self.inputs.get(index)
    }

    /// Total output amount (excluding fee)
    pub fn amount(&self) -> u64 {
        self.output_amount
    }

    /// Transaction fee, `Σinputs - Σoutputs`
    pub fn fee(&self) -> u64 {
        self.input_amount.saturating_sub(self.output_amount)
    }
}
