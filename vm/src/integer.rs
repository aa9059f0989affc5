//! Integers on the VM stack are little-endian two's-complement byte
//! arrays of minimal length. Zero is the empty array.

/// Minimal two's-complement form of a non-negative integer.
///
/// A trailing `0x00` is kept whenever the most significant byte would
/// otherwise have its top bit set, so the value is never read back as
/// negative.
pub fn encode_u64(value: u64) -> Vec<u8> {
  let mut bytes = value.to_le_bytes().to_vec();
  while bytes.last() == Some(&0) {
    bytes.pop();
  }
  if bytes.last().map_or(false, |b| b & 0x80 != 0) {
    bytes.push(0);
  }
  bytes
}

/// Reads a stack integer that must fit an unsigned 64-bit value.
///
/// Returns `None` for negative values and for anything wider than
/// 64 bits once redundant sign bytes are dropped.
pub fn decode_u64(bytes: &[u8]) -> Option<u64> {
  if bytes.last().map_or(false, |b| b & 0x80 != 0) {
    return None;
  }

  let mut end = bytes.len();
  while end > 0 && bytes[end - 1] == 0 {
    end -= 1;
  }
  if end > 8 {
    return None;
  }

  let mut buf = [0u8; 8];
  buf[..end].copy_from_slice(&bytes[..end]);
  Some(u64::from_le_bytes(buf))
}
