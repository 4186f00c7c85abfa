// Copyright (c) 2022-2023 The MobileCoin Foundation

use heapless::Vec;
use ledger_proto::ApduError;

/// Encoding helper for fixed length byte arrays (keys, scalars, reserved fields)
pub(crate) mod arr {
    use encdec::Error;

    pub fn enc<const N: usize>(d: &[u8; N], buff: &mut [u8]) -> Result<usize, Error> {
        if buff.len() < d.len() {
            return Err(Error::Length);
        }

        buff[..d.len()].copy_from_slice(&d[..]);

        Ok(d.len())
    }

    pub fn enc_len<const N: usize>(d: &[u8; N]) -> Result<usize, Error> {
        Ok(d.len())
    }

    pub fn dec<const N: usize>(buff: &[u8]) -> Result<([u8; N], usize), Error> {
        if buff.len() < N {
            return Err(Error::Length);
        }

        let mut d = [0u8; N];
        d.copy_from_slice(&buff[..N]);

        Ok((d, N))
    }
}

/// Write a list of fixed length entries to the provided buffer
pub(crate) fn enc_list<const N: usize, const M: usize>(
    list: &Vec<[u8; N], M>,
    buff: &mut [u8],
) -> Result<usize, ApduError> {
    let len = list.len() * N;
    if buff.len() < len {
        return Err(ApduError::InvalidLength);
    }

    for (i, v) in list.iter().enumerate() {
        buff[i * N..][..N].copy_from_slice(v);
    }

    Ok(len)
}

/// Read `count` fixed length entries from the provided buffer
pub(crate) fn dec_list<const N: usize, const M: usize>(
    count: usize,
    buff: &[u8],
) -> Result<(Vec<[u8; N], M>, usize), ApduError> {
    // Check count against capacity prior to reading
    if count > M {
        return Err(ApduError::InvalidEncoding);
    }

    let len = count * N;
    if buff.len() < len {
        return Err(ApduError::InvalidLength);
    }

    let mut list = Vec::new();
    for c in buff[..len].chunks_exact(N) {
        let mut d = [0u8; N];
        d.copy_from_slice(c);

        list.push(d).map_err(|_| ApduError::InvalidLength)?;
    }

    Ok((list, len))
}

/// Read a fixed length array, returning the array and remaining buffer
pub(crate) fn take<const N: usize>(buff: &[u8]) -> Result<([u8; N], &[u8]), ApduError> {
    if buff.len() < N {
        return Err(ApduError::InvalidLength);
    }

    let mut d = [0u8; N];
    d.copy_from_slice(&buff[..N]);

    Ok((d, &buff[N..]))
}

/// Write a fixed length array, returning the number of bytes written
pub(crate) fn put(d: &[u8], buff: &mut [u8]) -> Result<usize, ApduError> {
    if buff.len() < d.len() {
        return Err(ApduError::InvalidLength);
    }

    buff[..d.len()].copy_from_slice(d);

    Ok(d.len())
}
