// Copyright (c) 2022-2023 The MobileCoin Foundation

//! TurtleCoin hardware wallet core
//!
//! This provides a common [Engine][engine] supporting CryptoNote key management,
//! key image generation, and transaction signing for execution on hardware wallets.
//!
//! Interactions with the [Engine][engine] are performed via [Event][engine::Event]s and [Output][engine::Output]s,
//! see [ledger_trtl_apdu] for APDU objects and wire encodings.
//!
//! ## Operations
//!
//! Prior to interacting with a hardware wallet the client should issue a
//! [`VersionReq`][ledger_trtl_apdu::app_info::VersionReq] and
//! [`IdentReq`][ledger_trtl_apdu::app_info::IdentReq] to check the
//! protocol version and application identity.
//!
//! ### Requesting wallet keys
//!
//! Wallet public keys can be requested via [`PublicKeysReq`][ledger_trtl_apdu::wallet_keys::PublicKeysReq],
//! and the wallet address via [`AddressReq`][ledger_trtl_apdu::wallet_keys::AddressReq].
//! Private keys may be exported only with user approval.
//!
//! Wallet keys are derived from the master seed provided by the
//! [`Driver`][engine::Driver] on first use, and may be re-derived via
//! [`ResetKeysReq`][ledger_trtl_apdu::wallet_keys::ResetKeysReq].
//!
//! ### Key Image Scanning
//!
//! Key images can be recovered via [`KeyImageReq`][ledger_trtl_apdu::key_image::KeyImageReq] request,
//! returning a [`KeyImageResp`][ledger_trtl_apdu::key_image::KeyImageResp] APDU containing the computed
//! key image.
//!
//! ### Executing a transaction
//!
//! Transactions are streamed to the device one element at a time, the
//! prefix hash is computed incrementally and only per-input signing material
//! is retained.
//!
//! Unless otherwise documented each transaction operation returns a
//! [`TxInfo`][ledger_trtl_apdu::tx::TxInfo] response containing the current
//! [transaction state][ledger_trtl_apdu::state::TxState]. Any error during
//! a transaction discards the transaction context.
//!
//! 1. Issue [`TxStart`][ledger_trtl_apdu::tx::TxStart] with the input / output counts,
//!    unlock time, transaction public key and optional payment id
//! 2. Issue [`TxLoadInput`][ledger_trtl_apdu::tx::TxLoadInput] for each input
//! 3. Issue [`TxLoadOutput`][ledger_trtl_apdu::tx::TxLoadOutput] for each output
//! 4. Issue [`TxFinalizePrefix`][ledger_trtl_apdu::tx::TxFinalizePrefix] to fetch the
//!    [`TxPrefixHash`][ledger_trtl_apdu::tx::TxPrefixHash]
//! 5. Issue [`TxSign`][ledger_trtl_apdu::tx::TxSign] to request user approval
//! 6. Issue [`TxSignInput`][ledger_trtl_apdu::tx::TxSignInput] for each input in order, returning
//!    [`TxSignatures`][ledger_trtl_apdu::tx::TxSignatures] containing the key image and ring signatures
//!
//! [`TxReset`][ledger_trtl_apdu::tx::TxReset] may be issued at any time to abort a transaction.
//!

#![cfg_attr(not(feature = "std"), no_std)]

pub use ledger_trtl_apdu::{self as apdu};

pub mod crypto;

pub mod engine;

pub mod helpers;

pub mod wallet;
