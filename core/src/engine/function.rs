// Copyright (c) 2022-2023 The MobileCoin Foundation

use super::{tx::Transaction, Error};
use crate::crypto::keys::PublicKey;

/// Function context, holding transient state for multi-step operations
pub struct Function {
    inner: FunctionType,
}

impl Default for Function {
    fn default() -> Self {
        Self {
            inner: FunctionType::None,
        }
    }
}

/// Enum for internal state machines to allow storage to be shared between functions
#[allow(clippy::large_enum_variant)]
enum FunctionType {
    None,
    Tx(Transaction),
}

impl Function {
    /// Create a new / empty function context
    pub const fn new() -> Self {
        Self {
            inner: FunctionType::None,
        }
    }

    /// Setup transaction context
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn tx_init(
        &mut self,
        unlock_time: u64,
        num_inputs: usize,
        num_outputs: usize,
        tx_public_key: PublicKey,
        payment_id: Option<[u8; 32]>,
    ) -> Result<&mut Transaction, Error> {
        // Clear function prior to init (executes drop)
        self.clear();

        // Setup transaction context
        self.inner = FunctionType::Tx(Transaction::new(
            unlock_time,
            num_inputs,
            num_outputs,
            tx_public_key,
            payment_id,
        )?);

        // Return transaction context
        match &mut self.inner {
            FunctionType::Tx(t) => Ok(t),
            _ => Err(Error::InternalError),
        }
    }

    /// Fetch transaction context
    pub fn tx(&mut self) -> Option<&mut Transaction> {
        match &mut self.inner {
            FunctionType::Tx(t) => Some(t),
            _ => None,
        }
    }

    /// Fetch transaction context
    pub fn tx_ref(&self) -> Option<&Transaction> {
        match &self.inner {
            FunctionType::Tx(t) => Some(t),
            _ => None,
        }
    }

    /// Clear context, dropping (and wiping) any held key material
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn clear(&mut self) {
        self.inner = FunctionType::None;
    }
}
