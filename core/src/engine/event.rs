// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::Decode;
use strum::IntoStaticStr;
use zeroize::Zeroizing;

use ledger_proto::{ApduError, ApduStatic};
use ledger_trtl_apdu::{prelude::*, tx::RingOffsets};

/// [`Engine`][super::Engine] input events, typically decoded from request [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug, IntoStaticStr)]
pub enum Event {
    None,

    /// Fetch application version
    GetVersion,
    /// Check for a debug build
    IsDebug,
    /// Fetch application identifier
    GetIdent,

    /// Fetch wallet public keys
    GetPublicKeys {
        confirm: bool,
    },
    /// Export the private view key
    GetPrivateViewKey,
    /// Export the private spend key
    GetPrivateSpendKey,
    /// Fetch the wallet public address
    GetAddress {
        confirm: bool,
    },
    /// Re-derive wallet keys from the master seed
    ResetKeys {
        confirm: bool,
    },

    /// Check a point is a valid public key
    CheckKey {
        public_key: [u8; 32],
    },
    /// Check a scalar is canonical
    CheckScalar {
        scalar: [u8; 32],
    },
    /// Compute the public key for a private key
    PrivateToPublic {
        private_key: Zeroizing<[u8; 32]>,
    },
    /// Generate a random key pair
    GenerateRandomKeyPair,

    /// Generate a key image for an owned output
    GenerateKeyImage {
        confirm: bool,
        tx_public_key: [u8; 32],
        output_index: u32,
        output_key: [u8; 32],
    },
    /// Generate a key image for an owned output from a key derivation
    GenerateKeyImagePrimitive {
        confirm: bool,
        derivation: [u8; 32],
        output_index: u32,
        output_key: [u8; 32],
    },

    /// Sign a message digest with the spend key
    GenerateSignature {
        confirm: bool,
        message_digest: [u8; 32],
    },
    /// Check a signature
    CheckSignature {
        message_digest: [u8; 32],
        public_key: [u8; 32],
        signature: [u8; 64],
    },

    /// Generate a key derivation using the view key
    GenerateKeyDerivation {
        confirm: bool,
        tx_public_key: [u8; 32],
    },
    /// Derive an output public key using the spend key
    DerivePublicKey {
        confirm: bool,
        derivation: [u8; 32],
        output_index: u32,
    },
    /// Derive an output private key using the spend key
    DeriveSecretKey {
        derivation: [u8; 32],
        output_index: u32,
    },

    /// Prepare ring signatures for later completion
    PrepareRingSignatures {
        prefix_hash: [u8; 32],
        key_image: [u8; 32],
        public_keys: RingKeys,
        real_index: u8,
    },
    /// Complete the real entry of a prepared ring
    CompleteRingSignature {
        confirm: bool,
        tx_public_key: [u8; 32],
        output_index: u32,
        output_key: [u8; 32],
        k: Zeroizing<[u8; 32]>,
        signature: [u8; 64],
    },
    /// Generate ring signatures for an owned output
    GenerateRingSignatures {
        confirm: bool,
        tx_public_key: [u8; 32],
        output_index: u32,
        output_key: [u8; 32],
        prefix_hash: [u8; 32],
        public_keys: RingKeys,
        real_index: u8,
    },
    /// Check ring signatures
    CheckRingSignatures {
        prefix_hash: [u8; 32],
        key_image: [u8; 32],
        public_keys: RingKeys,
        signatures: RingSignatures,
    },

    /// Fetch transaction state
    TxGetInfo,

    /// Start a transaction
    TxStart {
        unlock_time: u64,
        num_inputs: u8,
        num_outputs: u8,
        tx_public_key: [u8; 32],
        payment_id: Option<[u8; 32]>,
    },

    /// Load a transaction input
    TxLoadInput {
        real_index: u8,
        output_index: u32,
        amount: u64,
        tx_public_key: [u8; 32],
        offsets: RingOffsets,
        public_keys: RingKeys,
    },

    /// Load a transaction output
    TxLoadOutput {
        amount: u64,
        output_key: [u8; 32],
    },

    /// Finalize the transaction prefix
    TxFinalizePrefix,

    /// Request approval to sign the transaction
    TxSign,

    /// Fetch signatures for a transaction input
    TxSignInput {
        input_index: u8,
    },

    /// Abort the current transaction
    TxReset,
}

/// Helper for decoding APDUs to events
fn decode_event<'a, T>(buff: &'a [u8]) -> Result<Event, ApduError>
where
    T: Decode<'a, Error = ApduError>,
    Event: From<T::Output>,
{
    T::decode(buff).map(|(v, _n)| Event::from(v))
}

impl Event {
    /// Parse an incoming APDU to engine event
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn parse(ins: u8, buff: &[u8]) -> Result<Self, ApduError> {
        match ins {
            VersionReq::INS => decode_event::<VersionReq>(buff),
            DebugReq::INS => decode_event::<DebugReq>(buff),
            IdentReq::INS => decode_event::<IdentReq>(buff),

            PublicKeysReq::INS => decode_event::<PublicKeysReq>(buff),
            PrivateViewKeyReq::INS => decode_event::<PrivateViewKeyReq>(buff),
            PrivateSpendKeyReq::INS => decode_event::<PrivateSpendKeyReq>(buff),
            AddressReq::INS => decode_event::<AddressReq>(buff),
            ResetKeysReq::INS => decode_event::<ResetKeysReq>(buff),

            CheckKeyReq::INS => decode_event::<CheckKeyReq>(buff),
            CheckScalarReq::INS => decode_event::<CheckScalarReq>(buff),
            PrivateToPublicReq::INS => decode_event::<PrivateToPublicReq>(buff),
            RandomKeyPairReq::INS => decode_event::<RandomKeyPairReq>(buff),

            KeyImageReq::INS => decode_event::<KeyImageReq>(buff),
            KeyImagePrimitiveReq::INS => decode_event::<KeyImagePrimitiveReq>(buff),

            SignatureReq::INS => decode_event::<SignatureReq>(buff),
            CheckSignatureReq::INS => decode_event::<CheckSignatureReq>(buff),

            KeyDerivationReq::INS => decode_event::<KeyDerivationReq>(buff),
            DerivePublicKeyReq::INS => decode_event::<DerivePublicKeyReq>(buff),
            DeriveSecretKeyReq::INS => decode_event::<DeriveSecretKeyReq>(buff),

            PrepareRingReq::INS => decode_event::<PrepareRingReq>(buff),
            CompleteRingReq::INS => decode_event::<CompleteRingReq>(buff),
            GenerateRingReq::INS => decode_event::<GenerateRingReq>(buff),
            CheckRingReq::INS => decode_event::<CheckRingReq>(buff),

            TxInfoReq::INS => decode_event::<TxInfoReq>(buff),
            TxStart::INS => decode_event::<TxStart>(buff),
            TxLoadInput::INS => decode_event::<TxLoadInput>(buff),
            TxLoadOutput::INS => decode_event::<TxLoadOutput>(buff),
            TxFinalizePrefix::INS => decode_event::<TxFinalizePrefix>(buff),
            TxSign::INS => decode_event::<TxSign>(buff),
            TxSignInput::INS => decode_event::<TxSignInput>(buff),
            TxReset::INS => decode_event::<TxReset>(buff),

            _ => Err(ApduError::InvalidEncoding),
        }
    }

    /// Fetch event name, used for logging without exposing event contents
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl From<VersionReq> for Event {
    fn from(_: VersionReq) -> Self {
        Event::GetVersion
    }
}

impl From<DebugReq> for Event {
    fn from(_: DebugReq) -> Self {
        Event::IsDebug
    }
}

impl From<IdentReq> for Event {
    fn from(_: IdentReq) -> Self {
        Event::GetIdent
    }
}

impl From<PublicKeysReq> for Event {
    fn from(a: PublicKeysReq) -> Self {
        Event::GetPublicKeys {
            confirm: a.flags.contains(RequestFlags::CONFIRM),
        }
    }
}

impl From<PrivateViewKeyReq> for Event {
    fn from(_: PrivateViewKeyReq) -> Self {
        Event::GetPrivateViewKey
    }
}

impl From<PrivateSpendKeyReq> for Event {
    fn from(_: PrivateSpendKeyReq) -> Self {
        Event::GetPrivateSpendKey
    }
}

impl From<AddressReq> for Event {
    fn from(a: AddressReq) -> Self {
        Event::GetAddress {
            confirm: a.flags.contains(RequestFlags::CONFIRM),
        }
    }
}

impl From<ResetKeysReq> for Event {
    fn from(a: ResetKeysReq) -> Self {
        Event::ResetKeys {
            confirm: a.flags.contains(RequestFlags::CONFIRM),
        }
    }
}

impl From<CheckKeyReq> for Event {
    fn from(a: CheckKeyReq) -> Self {
        Event::CheckKey {
            public_key: a.public_key,
        }
    }
}

impl From<CheckScalarReq> for Event {
    fn from(a: CheckScalarReq) -> Self {
        Event::CheckScalar { scalar: a.scalar }
    }
}

impl From<PrivateToPublicReq> for Event {
    fn from(a: PrivateToPublicReq) -> Self {
        Event::PrivateToPublic {
            private_key: Zeroizing::new(a.private_key),
        }
    }
}

impl From<RandomKeyPairReq> for Event {
    fn from(_: RandomKeyPairReq) -> Self {
        Event::GenerateRandomKeyPair
    }
}

impl From<KeyImageReq> for Event {
    fn from(a: KeyImageReq) -> Self {
        Event::GenerateKeyImage {
            confirm: a.flags.contains(RequestFlags::CONFIRM),
            tx_public_key: a.tx_public_key,
            output_index: a.output_index,
            output_key: a.output_key,
        }
    }
}

impl From<KeyImagePrimitiveReq> for Event {
    fn from(a: KeyImagePrimitiveReq) -> Self {
        Event::GenerateKeyImagePrimitive {
            confirm: a.flags.contains(RequestFlags::CONFIRM),
            derivation: a.derivation,
            output_index: a.output_index,
            output_key: a.output_key,
        }
    }
}

impl From<SignatureReq> for Event {
    fn from(a: SignatureReq) -> Self {
        Event::GenerateSignature {
            confirm: a.flags.contains(RequestFlags::CONFIRM),
            message_digest: a.message_digest,
        }
    }
}

impl From<CheckSignatureReq> for Event {
    fn from(a: CheckSignatureReq) -> Self {
        Event::CheckSignature {
            message_digest: a.message_digest,
            public_key: a.public_key,
            signature: a.signature,
        }
    }
}

impl From<KeyDerivationReq> for Event {
    fn from(a: KeyDerivationReq) -> Self {
        Event::GenerateKeyDerivation {
            confirm: a.flags.contains(RequestFlags::CONFIRM),
            tx_public_key: a.tx_public_key,
        }
    }
}

impl From<DerivePublicKeyReq> for Event {
    fn from(a: DerivePublicKeyReq) -> Self {
        Event::DerivePublicKey {
            confirm: a.flags.contains(RequestFlags::CONFIRM),
            derivation: a.derivation,
            output_index: a.output_index,
        }
    }
}

impl From<DeriveSecretKeyReq> for Event {
    fn from(a: DeriveSecretKeyReq) -> Self {
        Event::DeriveSecretKey {
            derivation: a.derivation,
            output_index: a.output_index,
        }
    }
}

impl From<PrepareRingReq> for Event {
    fn from(a: PrepareRingReq) -> Self {
        Event::PrepareRingSignatures {
            prefix_hash: a.prefix_hash,
            key_image: a.key_image,
            public_keys: a.public_keys,
            real_index: a.real_index,
        }
    }
}

impl From<CompleteRingReq> for Event {
    fn from(a: CompleteRingReq) -> Self {
        Event::CompleteRingSignature {
            confirm: a.flags.contains(RequestFlags::CONFIRM),
            tx_public_key: a.tx_public_key,
            output_index: a.output_index,
            output_key: a.output_key,
            k: Zeroizing::new(a.k),
            signature: a.signature,
        }
    }
}

impl From<GenerateRingReq> for Event {
    fn from(a: GenerateRingReq) -> Self {
        Event::GenerateRingSignatures {
            confirm: a.flags.contains(RequestFlags::CONFIRM),
            tx_public_key: a.tx_public_key,
            output_index: a.output_index,
            output_key: a.output_key,
            prefix_hash: a.prefix_hash,
            public_keys: a.public_keys,
            real_index: a.real_index,
        }
    }
}

impl From<CheckRingReq> for Event {
    fn from(a: CheckRingReq) -> Self {
        Event::CheckRingSignatures {
            prefix_hash: a.prefix_hash,
            key_image: a.key_image,
            public_keys: a.public_keys,
            signatures: a.signatures,
        }
    }
}

impl From<TxInfoReq> for Event {
    fn from(_: TxInfoReq) -> Self {
        Event::TxGetInfo
    }
}

impl From<TxStart> for Event {
    fn from(a: TxStart) -> Self {
        Event::TxStart {
            unlock_time: a.unlock_time,
            num_inputs: a.num_inputs,
            num_outputs: a.num_outputs,
            tx_public_key: a.tx_public_key,
            payment_id: a.payment_id(),
        }
    }
}

impl From<TxLoadInput> for Event {
    fn from(a: TxLoadInput) -> Self {
        Event::TxLoadInput {
            real_index: a.real_index,
            output_index: a.output_index,
            amount: a.amount,
            tx_public_key: a.tx_public_key,
            offsets: a.offsets,
            public_keys: a.public_keys,
        }
    }
}

impl From<TxLoadOutput> for Event {
    fn from(a: TxLoadOutput) -> Self {
        Event::TxLoadOutput {
            amount: a.amount,
            output_key: a.output_key,
        }
    }
}

impl From<TxFinalizePrefix> for Event {
    fn from(_: TxFinalizePrefix) -> Self {
        Event::TxFinalizePrefix
    }
}

impl From<TxSign> for Event {
    fn from(_: TxSign) -> Self {
        Event::TxSign
    }
}

impl From<TxSignInput> for Event {
    fn from(a: TxSignInput) -> Self {
        Event::TxSignInput {
            input_index: a.input_index,
        }
    }
}

impl From<TxReset> for Event {
    fn from(_: TxReset) -> Self {
        Event::TxReset
    }
}
