//! Fixed-width little-endian packing of tensor elements.
//!
//! Inputs go out as `u32` and outputs come back as `i32` (or `f32` for
//! classifier scores); the two directions are kept as separate functions so
//! no single element type is implied for a tensor.

use bytes::{BufMut, Bytes, BytesMut};

use crate::CodecError;

const WIDTH: usize = 4;

/// Packs each value as 4 little-endian bytes, in order.
pub fn encode_u32(values: &[u32]) -> Bytes {
    let mut buf = BytesMut::with_capacity(values.len() * WIDTH);
    for v in values {
        buf.put_u32_le(*v);
    }
    buf.freeze()
}

pub fn decode_i32(bytes: &[u8]) -> Result<Vec<i32>, CodecError> {
    check_width(bytes)?;
    Ok(bytes
        .chunks_exact(WIDTH)
        .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Decodes `count` elements starting at element `start`.
pub fn decode_i32_slice(bytes: &[u8], start: usize, count: usize) -> Result<Vec<i32>, CodecError> {
    decode_i32(element_span(bytes, start, count)?)
}

pub fn decode_f32(bytes: &[u8]) -> Result<Vec<f32>, CodecError> {
    check_width(bytes)?;
    Ok(bytes
        .chunks_exact(WIDTH)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

pub fn decode_f32_slice(bytes: &[u8], start: usize, count: usize) -> Result<Vec<f32>, CodecError> {
    decode_f32(element_span(bytes, start, count)?)
}

fn check_width(bytes: &[u8]) -> Result<(), CodecError> {
    if !bytes.len().is_multiple_of(WIDTH) {
        return Err(CodecError::MalformedPayload {
            len: bytes.len(),
            width: WIDTH,
        });
    }
    Ok(())
}

fn element_span(bytes: &[u8], start: usize, count: usize) -> Result<&[u8], CodecError> {
    let out_of_range = CodecError::IndexOutOfRange {
        start,
        end: start.saturating_add(count),
        available: bytes.len() / WIDTH,
    };
    let lo = start.checked_mul(WIDTH).ok_or(out_of_range.clone())?;
    let hi = start
        .checked_add(count)
        .and_then(|end| end.checked_mul(WIDTH))
        .ok_or(out_of_range.clone())?;
    bytes.get(lo..hi).ok_or(out_of_range)
}
