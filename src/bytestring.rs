//! Length-prefixed opaque byte blob codec (component B).

use crate::error::{KernelError, Result};

const LENGTH_WIDTH: usize = 4;

/// Encode `data` as a 4-byte big-endian length prefix followed by the bytes.
pub fn encode_bytestring(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() > u32::MAX as usize {
        return Err(KernelError::Encode("bytestring too long to encode".into()));
    }
    let mut out = Vec::with_capacity(LENGTH_WIDTH + data.len());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
    Ok(out)
}

/// Decode a length-prefixed byte blob from the front of `data`, returning
/// the blob and the total number of bytes consumed (trailing bytes beyond
/// the decoded length are ignored, not an error).
pub fn decode_bytestring(data: &[u8]) -> Result<(Vec<u8>, usize)> {
    if data.len() < LENGTH_WIDTH {
        return Err(KernelError::Decode("truncated bytestring length".into()));
    }
    let len = u32::from_be_bytes(data[..LENGTH_WIDTH].try_into().unwrap()) as usize;
    let end = LENGTH_WIDTH + len;
    if data.len() < end {
        return Err(KernelError::Decode("truncated bytestring payload".into()));
    }
    Ok((data[LENGTH_WIDTH..end].to_vec(), end))
}
