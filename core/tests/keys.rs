use ledger_trtl_core::{
    apdu::{app_info::*, derivation::*, keys::*, signature::*, wallet_keys::*, RequestFlags},
    crypto::keys::KeyPair,
    engine::{Engine, Error, Event},
};

mod helpers;
use helpers::*;

#[test]
fn app_info() -> anyhow::Result<()> {
    let mut e = TestEngine::new(MNEMONIC)?;
    let mut buff = [0u8; 256];

    let v: VersionResp = e.exchange(VersionReq {}, &mut buff)?;
    assert_eq!(v.proto, ledger_trtl_core::apdu::TRTL_PROTO_VERSION);
    assert_eq!((v.major, v.minor, v.patch), (0, 1, 0));

    let i: IdentResp = e.exchange(IdentReq {}, &mut buff)?;
    assert_eq!(i.ident, "TRTL-LEDGER");

    let d: DebugResp = e.exchange(DebugReq {}, &mut buff)?;
    assert_eq!(d.debug, cfg!(debug_assertions) as u8);

    Ok(())
}

#[test]
fn wallet_keys_and_address() -> anyhow::Result<()> {
    let mut e = TestEngine::new(MNEMONIC)?;
    let keys = wallet_keys(MNEMONIC)?;
    let mut buff = [0u8; 256];

    let r: PublicKeysResp = e.exchange(PublicKeysReq::new(RequestFlags::empty()), &mut buff)?;
    assert_eq!(r.spend_public, keys.spend.public.to_bytes());
    assert_eq!(r.view_public, keys.view.public.to_bytes());

    let expected = keys.address()?;
    let r: AddressResp = e.exchange(AddressReq::new(RequestFlags::CONFIRM), &mut buff)?;
    assert_eq!(r.address, expected.as_str());
    assert_eq!(r.address.len(), 99);
    assert!(r.address.starts_with("TRTL"));

    // Confirmation only for the address request
    assert_eq!(&e.engine.driver().requests, &["Confirm address"]);

    // Reset re-derives the same keys
    let r: PublicKeysResp = e.exchange(ResetKeysReq::new(RequestFlags::empty()), &mut buff)?;
    assert_eq!(r.spend_public, keys.spend.public.to_bytes());

    Ok(())
}

#[test]
fn private_key_export() -> anyhow::Result<()> {
    let mut e = TestEngine::new(MNEMONIC)?;
    let keys = wallet_keys(MNEMONIC)?;
    let mut buff = [0u8; 256];

    // Denied exports return no key material
    e.approve(false);

    let r = e.exchange::<_, PrivateKeyResp>(PrivateViewKeyReq {}, &mut buff);
    assert_eq!(engine_error(r), Some(Error::OperationNotPermitted));

    let r = e.exchange::<_, PrivateKeyResp>(PrivateSpendKeyReq {}, &mut buff);
    assert_eq!(engine_error(r), Some(Error::OperationNotPermitted));

    // Approved exports match the mnemonic-derived keys
    e.approve(true);

    let r: PrivateKeyResp = e.exchange(PrivateViewKeyReq {}, &mut buff)?;
    assert_eq!(r.private_key, *keys.view.private.to_bytes());

    let r: PrivateKeyResp = e.exchange(PrivateSpendKeyReq {}, &mut buff)?;
    assert_eq!(r.private_key, *keys.spend.private.to_bytes());

    Ok(())
}

#[test]
fn keys_persist_across_engines() -> anyhow::Result<()> {
    init_logging();

    let mut d = TestDriver::new(seed(MNEMONIC)?);

    let a = {
        let mut e = Engine::new(&mut d);
        e.update(&Event::GetPublicKeys { confirm: false })?
    };

    // Keys are provisioned to storage on first use
    let keys = wallet_keys(MNEMONIC)?;
    assert_eq!(d.slots[1], Some(*keys.spend.private.to_bytes()));
    assert_eq!(d.slots[2], Some(*keys.view.private.to_bytes()));

    // Stored keys are used without the seed
    d.slots[0] = None;

    let mut e = Engine::new(&mut d);
    let b = e.update(&Event::GetPublicKeys { confirm: false })?;
    assert_eq!(a, b);

    // Resetting requires the seed
    assert_eq!(
        e.update(&Event::ResetKeys { confirm: false }),
        Err(Error::InternalError)
    );

    Ok(())
}

#[test]
fn key_utilities() -> anyhow::Result<()> {
    let mut e = TestEngine::new(MNEMONIC)?;
    let mut buff = [0u8; 256];

    let k: KeyPairResp = e.exchange(RandomKeyPairReq {}, &mut buff)?;

    let r: ValidResp = e.exchange(CheckKeyReq::new(k.public_key), &mut buff)?;
    assert_eq!(r.valid, 1);

    let r: ValidResp = e.exchange(CheckScalarReq::new(k.private_key), &mut buff)?;
    assert_eq!(r.valid, 1);

    let r: PublicKeyResp = e.exchange(PrivateToPublicReq::new(k.private_key), &mut buff)?;
    assert_eq!(r.public_key, k.public_key);

    // Non-canonical scalar
    let r: ValidResp = e.exchange(CheckScalarReq::new([0xff; 32]), &mut buff)?;
    assert_eq!(r.valid, 0);

    let r = e.exchange::<_, PublicKeyResp>(PrivateToPublicReq::new([0xff; 32]), &mut buff);
    assert_eq!(engine_error(r), Some(Error::InvalidScalar));

    // Identity is not a valid public key
    let mut identity = [0u8; 32];
    identity[0] = 1;

    let r: ValidResp = e.exchange(CheckKeyReq::new(identity), &mut buff)?;
    assert_eq!(r.valid, 0);

    Ok(())
}

#[test]
fn derivations() -> anyhow::Result<()> {
    let mut e = TestEngine::new(MNEMONIC)?;
    let keys = wallet_keys(MNEMONIC)?;
    let mut buff = [0u8; 256];

    // Sender side, using the recipient's view public key
    let tx_key = KeyPair::random(&mut rand_core::OsRng {});

    let d: KeyDerivationResp =
        e.exchange(KeyDerivationReq::new(RequestFlags::empty(), tx_key.public.to_bytes()), &mut buff)?;

    let p: PublicKeyResp = e.exchange(
        DerivePublicKeyReq::new(RequestFlags::empty(), 3, d.derivation),
        &mut buff,
    )?;

    e.approve(false);
    let r = e.exchange::<_, PrivateKeyResp>(DeriveSecretKeyReq::new(3, d.derivation), &mut buff);
    assert_eq!(engine_error(r), Some(Error::OperationNotPermitted));

    e.approve(true);
    let x: PrivateKeyResp = e.exchange(DeriveSecretKeyReq::new(3, d.derivation), &mut buff)?;

    // Derived key pair matches
    let r: PublicKeyResp = e.exchange(PrivateToPublicReq::new(x.private_key), &mut buff)?;
    assert_eq!(r.public_key, p.public_key);

    // Derived output key differs from the spend key
    assert_ne!(p.public_key, keys.spend.public.to_bytes());

    Ok(())
}

#[test]
fn signatures() -> anyhow::Result<()> {
    let mut e = TestEngine::new(MNEMONIC)?;
    let keys = wallet_keys(MNEMONIC)?;
    let mut buff = [0u8; 256];

    let digest = [0x5a; 32];

    let s: SignatureResp = e.exchange(SignatureReq::new(RequestFlags::CONFIRM, digest), &mut buff)?;

    let r: ValidResp = e.exchange(
        CheckSignatureReq::new(digest, keys.spend.public.to_bytes(), s.signature),
        &mut buff,
    )?;
    assert_eq!(r.valid, 1);

    // Wrong digest
    let r: ValidResp = e.exchange(
        CheckSignatureReq::new([0xa5; 32], keys.spend.public.to_bytes(), s.signature),
        &mut buff,
    )?;
    assert_eq!(r.valid, 0);

    // Wrong key
    let r: ValidResp = e.exchange(
        CheckSignatureReq::new(digest, keys.view.public.to_bytes(), s.signature),
        &mut buff,
    )?;
    assert_eq!(r.valid, 0);

    assert_eq!(&e.engine.driver().requests, &["Sign message"]);

    Ok(())
}
