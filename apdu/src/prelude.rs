// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    app_info::{DebugReq, DebugResp, IdentReq, IdentResp, VersionReq, VersionResp},
    derivation::{DerivePublicKeyReq, DeriveSecretKeyReq, KeyDerivationReq, KeyDerivationResp},
    key_image::{KeyImagePrimitiveReq, KeyImageReq, KeyImageResp},
    keys::{
        CheckKeyReq, CheckScalarReq, KeyPairResp, PrivateKeyResp, PrivateToPublicReq,
        PublicKeyResp, RandomKeyPairReq, ValidResp,
    },
    ring::{
        CheckRingReq, CompleteRingReq, GenerateRingReq, PrepareRingReq, PrepareRingResp,
        RingKeys, RingSignatures, RingSignaturesResp,
    },
    signature::{CheckSignatureReq, SignatureReq, SignatureResp},
    state::TxState,
    tx::{
        TxFinalizePrefix, TxFlags, TxInfo, TxInfoReq, TxLoadInput, TxLoadOutput, TxPrefixHash,
        TxReset, TxSign, TxSignInput, TxSignatures, TxStart,
    },
    wallet_keys::{
        AddressReq, AddressResp, PrivateSpendKeyReq, PrivateViewKeyReq, PublicKeysReq,
        PublicKeysResp, ResetKeysReq,
    },
    RequestFlags,
};
