//! Variable-byte integer codec.
//!
//! Each byte carries 7 data bits. Groups are written least significant first
//! and the final byte of a value has its high bit set.

/// Append the variable-byte form of `value` to `out`.
pub fn encode(value: u32, out: &mut Vec<u8>) {
    let mut v = value;
    loop {
        let byte = (v & 0x7F) as u8;
        v >>= 7;
        if v == 0 {
            out.push(byte | 0x80);
            break;
        }
        out.push(byte);
    }
}

/// Decode one value starting at `*pos`, advancing `*pos` past it.
///
/// Returns `None` on truncated input or a value wider than 32 bits.
pub fn decode(input: &[u8], pos: &mut usize) -> Option<u32> {
    let mut result: u32 = 0;
    let mut shift = 0u32;
    loop {
        let byte = *input.get(*pos)?;
        *pos += 1;
        let group = (byte & 0x7F) as u32;
        if shift == 28 && group > 0x0F {
            return None;
        }
        result |= group << shift;
        if byte & 0x80 != 0 {
            return Some(result);
        }
        shift += 7;
        if shift > 28 {
            return None;
        }
    }
}

/// Number of bytes `encode` emits for `value`.
pub fn encoded_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0xFFF_FFFF => 4,
        _ => 5,
    }
}
