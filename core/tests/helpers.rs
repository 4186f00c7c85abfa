#![allow(unused)]

use core::fmt::Debug;

use bip39::{Language, Mnemonic, Seed};
use encdec::{EncDec, Encode};
use log::{debug, trace};
use zeroize::Zeroizing;

use ledger_trtl_core::{
    apdu::{ApduError, ApduStatic, MAX_APDU_LEN},
    engine::{Approval, Driver, Engine, Event, Slot},
    wallet::WalletKeys,
};

pub const MNEMONIC: &str = "duck deal pretty pen thunder economy wide common goose fit engine main aisle curtain choose cube claim snake enroll detect brief history float unit";

/// Setup logging for tests
pub fn init_logging() {
    let _ = simplelog::SimpleLogger::init(log::LevelFilter::Debug, Default::default());
}

/// Derive a master seed from a BIP39 mnemonic
pub fn seed(mnemonic: &str) -> anyhow::Result<[u8; 32]> {
    let mnemonic = Mnemonic::from_phrase(mnemonic, Language::English)?;
    let seed = Seed::new(&mnemonic, "");

    let mut b = [0u8; 32];
    b.copy_from_slice(&seed.as_bytes()[..32]);
    Ok(b)
}

/// Wallet keys expected for a given mnemonic
pub fn wallet_keys(mnemonic: &str) -> anyhow::Result<WalletKeys> {
    Ok(WalletKeys::from_seed(&seed(mnemonic)?))
}

/// Driver implementation for test use
pub struct TestDriver {
    pub slots: [Option<[u8; 32]>; 3],
    pub approve: bool,
    pub requests: Vec<String>,
}

impl TestDriver {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            slots: [Some(seed), None, None],
            approve: true,
            requests: Vec::new(),
        }
    }

    fn index(slot: Slot) -> usize {
        match slot {
            Slot::MasterSeed => 0,
            Slot::SpendKey => 1,
            Slot::ViewKey => 2,
        }
    }
}

impl Driver for TestDriver {
    fn load(&self, slot: Slot) -> Option<Zeroizing<[u8; 32]>> {
        self.slots[Self::index(slot)].map(Zeroizing::new)
    }

    fn store(&mut self, slot: Slot, value: &[u8; 32]) {
        self.slots[Self::index(slot)] = Some(*value);
    }

    fn approve(&mut self, req: &Approval) -> bool {
        let mut a = [0u8; 32];
        let mut f = [0u8; 32];
        debug!(
            "approve: {} (amount: {:?}, fee: {:?}): {}",
            req.title(),
            req.amount(&mut a),
            req.fee(&mut f),
            self.approve
        );

        self.requests.push(req.title().to_string());
        self.approve
    }
}

/// Engine wrapper, exchanging APDUs with the engine as a host would
pub struct TestEngine {
    pub engine: Engine<TestDriver>,
}

impl TestEngine {
    pub fn new(mnemonic: &str) -> anyhow::Result<Self> {
        init_logging();

        Ok(Self {
            engine: Engine::new(TestDriver::new(seed(mnemonic)?)),
        })
    }

    /// Set whether approval requests are accepted
    pub fn approve(&mut self, approve: bool) {
        self.engine.driver().approve = approve;
    }

    /// Encode a request, execute this via the engine, and decode the response
    pub fn exchange<'a, REQ, ANS>(&mut self, req: REQ, buff: &'a mut [u8]) -> anyhow::Result<ANS>
    where
        REQ: Encode<Error = ApduError> + ApduStatic + Debug,
        ANS: EncDec<'a, ApduError> + Debug,
    {
        debug!("cmd: {:?}", req);

        // Encode command to APDU (skipping header)
        let n = req
            .encode(buff)
            .map_err(|e| anyhow::anyhow!("encode failed: {e:?}"))?;

        assert!(
            n <= MAX_APDU_LEN,
            "encoded command maximum length exceeded for: {req:?} ({n} bytes)"
        );

        trace!("encoded: {}", hex::encode(&buff[..n]));

        // Decode APDU to event
        let evt = Event::parse(REQ::INS, &buff[..n])
            .map_err(|e| anyhow::anyhow!("decode failed: {e:?}"))?;

        // Handle event
        let r = self.engine.update(&evt)?;

        // Encode output to response APDU
        let n = r
            .encode(buff)
            .map_err(|e| anyhow::anyhow!("response encode failed: {e:?}"))?;

        // Decode response APDU
        let buff: &'a [u8] = buff;
        let (a, _) =
            ANS::decode(&buff[..n]).map_err(|e| anyhow::anyhow!("response decode failed: {e:?}"))?;

        debug!("resp: {:?}", a);

        Ok(a)
    }
}

/// Fetch the engine error from an exchange result
pub fn engine_error<T: Debug>(r: anyhow::Result<T>) -> Option<ledger_trtl_core::engine::Error> {
    match r {
        Ok(_) => None,
        Err(e) => e.downcast_ref().copied(),
    }
}

/// Map APDU construction errors
pub fn apdu<T>(r: Result<T, ApduError>) -> anyhow::Result<T> {
    r.map_err(|e| anyhow::anyhow!("apdu error: {e:?}"))
}

/// Output owned by a wallet, placed in a ring of random decoys
pub struct OwnedOutput {
    pub tx_public_key: [u8; 32],
    pub output_index: u32,
    pub output_key: [u8; 32],
    pub real_index: usize,
    pub ring: Vec<[u8; 32]>,
}

impl OwnedOutput {
    pub fn new(keys: &WalletKeys, output_index: u32, real_index: usize, ring_size: usize) -> Self {
        use ledger_trtl_core::crypto::{
            derivation::{derive_public_key, generate_key_derivation},
            keys::KeyPair,
        };

        let r = KeyPair::random(&mut rand_core::OsRng {});

        let d = generate_key_derivation(&keys.view.public, &r.private);
        let output_key = derive_public_key(&d, output_index, &keys.spend.public).to_bytes();

        let ring = (0..ring_size)
            .map(|i| match i == real_index {
                true => output_key,
                false => KeyPair::random(&mut rand_core::OsRng {}).public.to_bytes(),
            })
            .collect();

        Self {
            tx_public_key: r.public.to_bytes(),
            output_index,
            output_key,
            real_index,
            ring,
        }
    }
}
