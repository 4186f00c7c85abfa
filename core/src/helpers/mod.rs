// Copyright (c) 2022-2023 The MobileCoin Foundation

use core::str::from_utf8;

use emstr::{helpers::Fractional, EncodeStr};

mod base58;
pub use base58::{encode_base58, ENCODED_BLOCK_SIZES, FULL_BLOCK_SIZE};

/// Atomic units per TRTL
const SCALAR_TRTL: i64 = 100;

/// Maximum significant characters prior to truncation
const TRTL_MAX_SF: usize = 16;

/// Format helper for TRTL amounts, used when rendering approval requests
pub fn fmt_amount(value: u64, buff: &mut [u8]) -> &str {
    let value = match i64::try_from(value) {
        Ok(v) => v,
        Err(_) => return "AMOUNT_OVERFLOW",
    };

    // Compute and write value using scalar
    let mut n = match emstr::write!(&mut buff[..], Fractional::<i64>::new(value, SCALAR_TRTL)) {
        Ok(v) => v,
        Err(_) => return "ENCODE_ERR",
    };

    // Backtrack and truncate values if max chars is exceeded
    if n > TRTL_MAX_SF {
        n = TRTL_MAX_SF;
        buff[n] = b'.';
        buff[n + 1] = b'.';
        n += 2;
    }

    // NOTE: names must be hardcoded to avoid PIC issues on the device
    match emstr::write!(&mut buff[n..], " TRTL") {
        Ok(v) => n += v,
        Err(_) => return "ENCODE_ERR",
    }

    match from_utf8(&buff[..n]) {
        Ok(v) => v,
        Err(_) => "INVALID_UTF8",
    }
}
