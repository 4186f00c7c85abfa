// Copyright (c) 2022-2023 The MobileCoin Foundation

use crate::helpers::fmt_amount;

/// User approval requests, passed to [`Driver::approve`][super::Driver::approve]
/// prior to releasing sensitive values or signatures
#[derive(Clone, PartialEq, Debug)]
pub enum Approval<'a> {
    /// Export wallet public keys
    PublicKeys,
    /// Export the private view key
    ExportViewKey,
    /// Export the private spend key
    ExportSpendKey,
    /// Display the wallet address
    Address(&'a str),
    /// Re-derive wallet keys from the master seed
    ResetKeys,
    /// Generate a key image for an owned output
    KeyImage,
    /// Sign a message digest
    Signature,
    /// Generate a key derivation with the view key
    KeyDerivation,
    /// Derive an output public key
    DerivePublicKey,
    /// Derive (and export) an output private key
    DeriveSecretKey,
    /// Sign a ring
    RingSignatures,
    /// Sign a transaction
    Transaction {
        amount: u64,
        fee: u64,
        num_inputs: u8,
        num_outputs: u8,
    },
}

impl<'a> Approval<'a> {
    /// Short title for the approval request
    pub fn title(&self) -> &'static str {
        match self {
            Approval::PublicKeys => "Export public keys",
            Approval::ExportViewKey => "Export view key",
            Approval::ExportSpendKey => "Export spend key",
            Approval::Address(_) => "Confirm address",
            Approval::ResetKeys => "Reset keys",
            Approval::KeyImage => "Generate key image",
            Approval::Signature => "Sign message",
            Approval::KeyDerivation => "Key derivation",
            Approval::DerivePublicKey => "Derive public key",
            Approval::DeriveSecretKey => "Export output key",
            Approval::RingSignatures => "Sign ring",
            Approval::Transaction { .. } => "Sign transaction",
        }
    }

    /// Render the transaction amount, where present
    pub fn amount<'b>(&self, buff: &'b mut [u8]) -> Option<&'b str> {
        match self {
            Approval::Transaction { amount, .. } => Some(fmt_amount(*amount, buff)),
            _ => None,
        }
    }

    /// Render the transaction fee, where present
    pub fn fee<'b>(&self, buff: &'b mut [u8]) -> Option<&'b str> {
        match self {
            Approval::Transaction { fee, .. } => Some(fmt_amount(*fee, buff)),
            _ => None,
        }
    }
}
