//! Wire codec shared by scripts, transactions and contract query results.
//!
//! Every variable-length field on the wire is a var-uint length tag
//! followed by the raw bytes. Lengths below `0xFD` fit in a single byte,
//! larger ones are escaped with a marker byte and a fixed-width
//! little-endian integer.

use {crate::Address, thiserror::Error};

const MARKER_U16: u8 = 0xFD;
const MARKER_U32: u8 = 0xFE;
const MARKER_U64: u8 = 0xFF;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error(
    "Truncated input at offset {offset}: needed {needed} bytes, {available} \
     available"
  )]
  TruncatedInput {
    offset: usize,
    needed: u64,
    available: usize,
  },

  #[error("Non-canonical length prefix at offset {0}")]
  NonCanonicalLength(usize),

  #[error("Invalid UTF-8 string at offset {0}")]
  InvalidUtf8(usize),
}

/// Append-only writer for the wire format.
#[derive(Debug, Clone, Default)]
pub struct Sink {
  buffer: Vec<u8>,
}

impl Sink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      buffer: Vec::with_capacity(capacity),
    }
  }

  pub fn write_u8(&mut self, value: u8) -> &mut Self {
    self.buffer.push(value);
    self
  }

  pub fn write_u16(&mut self, value: u16) -> &mut Self {
    self.write_bytes(&value.to_le_bytes())
  }

  pub fn write_u32(&mut self, value: u32) -> &mut Self {
    self.write_bytes(&value.to_le_bytes())
  }

  pub fn write_u64(&mut self, value: u64) -> &mut Self {
    self.write_bytes(&value.to_le_bytes())
  }

  pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
    self.buffer.extend_from_slice(bytes);
    self
  }

  pub fn write_var_uint(&mut self, value: u64) -> &mut Self {
    if value < MARKER_U16 as u64 {
      self.write_u8(value as u8)
    } else if value <= u16::MAX as u64 {
      self.write_u8(MARKER_U16).write_u16(value as u16)
    } else if value <= u32::MAX as u64 {
      self.write_u8(MARKER_U32).write_u32(value as u32)
    } else {
      self.write_u8(MARKER_U64).write_u64(value)
    }
  }

  pub fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self {
    self.write_var_uint(bytes.len() as u64).write_bytes(bytes)
  }

  pub fn write_var_str(&mut self, value: &str) -> &mut Self {
    self.write_var_bytes(value.as_bytes())
  }

  pub fn write_address(&mut self, address: &Address) -> &mut Self {
    self.write_bytes(address.as_ref())
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.buffer
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.buffer
  }
}

/// Zero-copy reader over a borrowed buffer.
///
/// Reads never go past the end of the buffer, and a var-bytes length
/// is checked against the remaining input before anything is sliced.
#[derive(Debug, Clone)]
pub struct Source<'a> {
  data: &'a [u8],
  pos: usize,
}

impl<'a> Source<'a> {
  pub fn new(data: &'a [u8]) -> Self {
    Self { data, pos: 0 }
  }

  /// Offset of the next unread byte.
  pub fn position(&self) -> usize {
    self.pos
  }

  pub fn remaining(&self) -> usize {
    self.data.len() - self.pos
  }

  pub fn is_empty(&self) -> bool {
    self.remaining() == 0
  }

  /// Returns the next byte without consuming it.
  pub fn peek_u8(&self) -> Option<u8> {
    self.data.get(self.pos).copied()
  }

  pub fn read_bytes(&mut self, len: u64) -> Result<&'a [u8], Error> {
    if len > self.remaining() as u64 {
      return Err(Error::TruncatedInput {
        offset: self.pos,
        needed: len,
        available: self.remaining(),
      });
    }
    let len = len as usize;
    let bytes = &self.data[self.pos..self.pos + len];
    self.pos += len;
    Ok(bytes)
  }

  fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
    let mut out = [0u8; N];
    out.copy_from_slice(self.read_bytes(N as u64)?);
    Ok(out)
  }

  pub fn read_u8(&mut self) -> Result<u8, Error> {
    Ok(self.read_array::<1>()?[0])
  }

  pub fn read_u16(&mut self) -> Result<u16, Error> {
    Ok(u16::from_le_bytes(self.read_array()?))
  }

  pub fn read_u32(&mut self) -> Result<u32, Error> {
    Ok(u32::from_le_bytes(self.read_array()?))
  }

  pub fn read_u64(&mut self) -> Result<u64, Error> {
    Ok(u64::from_le_bytes(self.read_array()?))
  }

  pub fn read_var_uint(&mut self) -> Result<u64, Error> {
    let start = self.pos;
    let (value, min) = match self.read_u8()? {
      MARKER_U16 => (self.read_u16()? as u64, MARKER_U16 as u64),
      MARKER_U32 => (self.read_u32()? as u64, u16::MAX as u64 + 1),
      MARKER_U64 => (self.read_u64()?, u32::MAX as u64 + 1),
      small => return Ok(small as u64),
    };
    if value < min {
      return Err(Error::NonCanonicalLength(start));
    }
    Ok(value)
  }

  pub fn read_var_bytes(&mut self) -> Result<&'a [u8], Error> {
    let len = self.read_var_uint()?;
    self.read_bytes(len)
  }

  pub fn read_var_string(&mut self) -> Result<String, Error> {
    let start = self.pos;
    let bytes = self.read_var_bytes()?;
    String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidUtf8(start))
  }

  pub fn read_address(&mut self) -> Result<Address, Error> {
    Ok(Address::new(self.read_array()?))
  }
}
