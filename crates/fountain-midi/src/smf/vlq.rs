//! Variable-length quantities for delta times.

/// Largest value a four-byte VLQ can hold.
pub const VLQ_MAX: u32 = 0x0FFF_FFFF;

/// Append `value` using the fewest bytes. Values above [`VLQ_MAX`] are
/// written as [`VLQ_MAX`].
pub fn write_vlq(value: u32, out: &mut Vec<u8>) {
    let value = value.min(VLQ_MAX);
    for shift in [21, 14, 7] {
        if value >> shift != 0 {
            out.push(((value >> shift) & 0x7F) as u8 | 0x80);
        }
    }
    out.push((value & 0x7F) as u8);
}

/// Encoded length of `value` in bytes.
pub fn vlq_len(value: u32) -> usize {
    match value.min(VLQ_MAX) {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x001F_FFFF => 3,
        _ => 4,
    }
}

/// Decode a VLQ from the start of `bytes`, returning the value and the
/// number of bytes consumed.
pub fn read_vlq(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value = 0u32;
    for (i, &b) in bytes.iter().take(4).enumerate() {
        value = (value << 7) | u32::from(b & 0x7F);
        if b & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}
