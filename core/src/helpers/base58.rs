// Copyright (c) 2022-2023 The MobileCoin Foundation

//! CryptoNote block base58
//!
//! Input is split into 8-byte blocks, each encoded (big-endian) to a fixed
//! 11 characters, with the final partial block encoded to
//! [ENCODED_BLOCK_SIZES]`[len]` characters. Blocks are left-padded with `1`.

use heapless::String;

/// Full input block size
pub const FULL_BLOCK_SIZE: usize = 8;

/// Encoded size for input blocks of length `0..=8`
pub const ENCODED_BLOCK_SIZES: [usize; FULL_BLOCK_SIZE + 1] = [0, 2, 3, 5, 6, 7, 9, 10, 11];

const FULL_ENCODED_BLOCK_SIZE: usize = ENCODED_BLOCK_SIZES[FULL_BLOCK_SIZE];

/// Encode a single block, appending to the output string
fn encode_block<const N: usize>(block: &[u8], out: &mut String<N>) -> Result<(), ()> {
    let size = ENCODED_BLOCK_SIZES[block.len()];

    let mut tmp = [0u8; 16];
    let n = bs58::encode(block).into(&mut tmp[..]).map_err(|_| ())?;

    // bs58 maps each leading zero byte to `1`, strip these and pad to the block size
    let digits = tmp[..n].iter().skip_while(|c| **c == b'1').count();
    if digits > size {
        return Err(());
    }

    for _i in 0..size - digits {
        out.push('1')?;
    }
    for c in &tmp[n - digits..n] {
        out.push(*c as char)?;
    }

    Ok(())
}

/// Encode data using CryptoNote block base58
pub fn encode_base58<const N: usize>(data: &[u8]) -> Result<String<N>, ()> {
    let mut out = String::new();

    let full = data.len() / FULL_BLOCK_SIZE;
    if full * FULL_ENCODED_BLOCK_SIZE + ENCODED_BLOCK_SIZES[data.len() % FULL_BLOCK_SIZE] > N {
        return Err(());
    }

    for block in data.chunks(FULL_BLOCK_SIZE) {
        encode_block(block, &mut out)?;
    }

    Ok(out)
}
