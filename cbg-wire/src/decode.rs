use std::str::Utf8Error;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
  #[error("unexpected end of input")]
  UnexpectedEnd,

  #[error("expected initial byte {expected:#04x}, found {found:#04x}")]
  InitialByte { expected: u8, found: u8 },

  #[error("expected {expected}, found initial byte {found:#04x}")]
  Unexpected {
    expected: &'static str,
    found: u8,
  },

  #[error("invalid additional info {0}")]
  AdditionalInfo(u8),

  #[error("array length mismatch: expected {expected}, found {found}")]
  ArrayLength { expected: usize, found: usize },

  #[error("missing break, found {found:#04x}")]
  MissingBreak { found: u8 },

  #[error("invalid UTF-8 in string")]
  InvalidUtf8(#[from] Utf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Zero-copy decode cursor over a byte buffer.
///
/// The schema is known at decode time, so fixed-width reads validate the
/// initial byte against the one (or, for signed integers, one of two)
/// expected constants instead of dispatching on it. Variable-length reads
/// check the major type and then branch on the additional info.
pub struct Reader<'a> {
  data: &'a [u8],
  pos: usize,
}

impl<'a> Reader<'a> {
  pub fn new(data: &'a [u8]) -> Self {
    Reader { data, pos: 0 }
  }

  pub fn position(&self) -> usize {
    self.pos
  }

  pub fn remaining(&self) -> usize {
    self.data.len() - self.pos
  }

  pub fn at_end(&self) -> bool {
    self.pos == self.data.len()
  }

  /// The next initial byte, without consuming it. Union decoders dispatch
  /// on its major type (6 for payload variants, 0 for unit variants).
  pub fn peek(&self) -> Result<u8> {
    self.data.get(self.pos).copied().ok_or(Error::UnexpectedEnd)
  }

  pub fn read_bool(&mut self) -> Result<bool> {
    match self.byte()? {
      0xf4 => Ok(false),
      0xf5 => Ok(true),
      found => Err(Error::Unexpected {
        expected: "bool (0xf4 or 0xf5)",
        found,
      }),
    }
  }

  /// Consumes a null item if one is next. Struct decoders use this to
  /// detect absent optional fields.
  pub fn take_null(&mut self) -> Result<bool> {
    if self.peek()? == 0xf6 {
      self.pos += 1;
      return Ok(true);
    }
    Ok(false)
  }

  // Fixed-width unsigned integers.

  pub fn read_u8(&mut self) -> Result<u8> {
    self.exact_header(0x18)?;
    self.byte()
  }

  pub fn read_u16(&mut self) -> Result<u16> {
    self.exact_header(0x19)?;
    self.be16()
  }

  pub fn read_u32(&mut self) -> Result<u32> {
    self.exact_header(0x1a)?;
    self.be32()
  }

  pub fn read_u64(&mut self) -> Result<u64> {
    self.exact_header(0x1b)?;
    self.be64()
  }

  // Fixed-width signed integers: one of two headers.

  pub fn read_i8(&mut self) -> Result<i8> {
    match self.byte()? {
      0x18 => Ok(self.byte()? as i8),
      0x38 => Ok(-1 - self.byte()? as i8),
      found => Err(Error::Unexpected {
        expected: "i8 (0x18 or 0x38)",
        found,
      }),
    }
  }

  pub fn read_i16(&mut self) -> Result<i16> {
    match self.byte()? {
      0x19 => Ok(self.be16()? as i16),
      0x39 => Ok(-1 - self.be16()? as i16),
      found => Err(Error::Unexpected {
        expected: "i16 (0x19 or 0x39)",
        found,
      }),
    }
  }

  pub fn read_i32(&mut self) -> Result<i32> {
    match self.byte()? {
      0x1a => Ok(self.be32()? as i32),
      0x3a => Ok(-1 - self.be32()? as i32),
      found => Err(Error::Unexpected {
        expected: "i32 (0x1a or 0x3a)",
        found,
      }),
    }
  }

  pub fn read_i64(&mut self) -> Result<i64> {
    match self.byte()? {
      0x1b => Ok(self.be64()? as i64),
      0x3b => Ok(-1 - self.be64()? as i64),
      found => Err(Error::Unexpected {
        expected: "i64 (0x1b or 0x3b)",
        found,
      }),
    }
  }

  // Varints.

  pub fn read_uvarint(&mut self) -> Result<u64> {
    let b = self.byte()?;
    if b >> 5 != 0 {
      return Err(Error::Unexpected {
        expected: "unsigned integer",
        found: b,
      });
    }
    self.arg(b & 0x1f)
  }

  pub fn read_ivarint(&mut self) -> Result<i64> {
    let b = self.byte()?;
    if b >> 5 > 1 {
      return Err(Error::Unexpected {
        expected: "integer",
        found: b,
      });
    }
    let v = self.arg(b & 0x1f)?;
    if b >> 5 == 0 {
      Ok(v as i64)
    } else {
      Ok(-1 - v as i64)
    }
  }

  // Floats.

  pub fn read_f16(&mut self) -> Result<f32> {
    self.exact_header(0xf9)?;
    Ok(half::f16::from_bits(self.be16()?).to_f32())
  }

  pub fn read_f32(&mut self) -> Result<f32> {
    self.exact_header(0xfa)?;
    Ok(f32::from_bits(self.be32()?))
  }

  pub fn read_f64(&mut self) -> Result<f64> {
    self.exact_header(0xfb)?;
    Ok(f64::from_bits(self.be64()?))
  }

  // Strings and bytes, zero-copy.

  pub fn read_str(&mut self) -> Result<&'a str> {
    let len = self.length_header(3, "string")?;
    Ok(std::str::from_utf8(self.take(len)?)?)
  }

  pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
    let len = self.length_header(2, "byte string")?;
    self.take(len)
  }

  // Structure headers.

  pub fn read_array_header(&mut self) -> Result<usize> {
    self.length_header(4, "array")
  }

  /// Reads a definite-length array header and checks the length against
  /// the schema's fixed count.
  pub fn read_fixed_array_header(&mut self, expected: usize) -> Result<()> {
    let found = self.read_array_header()?;
    if found != expected {
      return Err(Error::ArrayLength { expected, found });
    }
    Ok(())
  }

  pub fn read_indefinite_array_header(&mut self) -> Result<()> {
    self.exact_header(0x9f)
  }

  pub fn read_break(&mut self) -> Result<()> {
    match self.byte()? {
      0xff => Ok(()),
      found => Err(Error::MissingBreak { found }),
    }
  }

  pub fn read_tag_header(&mut self) -> Result<u64> {
    let b = self.byte()?;
    if b >> 5 != 6 {
      return Err(Error::Unexpected {
        expected: "tag",
        found: b,
      });
    }
    self.arg(b & 0x1f)
  }

  /// Advances past exactly one item of any form. Used for the unknown
  /// ranks of a newer struct and for unknown union payloads.
  pub fn skip(&mut self) -> Result<()> {
    let b = self.byte()?;
    let major = b >> 5;
    let ai = b & 0x1f;

    if major == 7 {
      match ai {
        0..=23 => {}
        24 => {
          self.take(1)?;
        }
        25 => {
          self.take(2)?;
        }
        26 => {
          self.take(4)?;
        }
        27 => {
          self.take(8)?;
        }
        _ => return Err(Error::AdditionalInfo(ai)),
      }
      return Ok(());
    }

    if ai == 31 {
      match major {
        2..=5 => {
          while self.peek()? != 0xff {
            self.skip()?;
          }
          self.pos += 1;
          return Ok(());
        }
        _ => return Err(Error::AdditionalInfo(ai)),
      }
    }

    let arg = self.arg(ai)?;
    match major {
      0 | 1 => {}
      2 | 3 => {
        self.take(arg as usize)?;
      }
      4 => {
        for _ in 0..arg {
          self.skip()?;
        }
      }
      5 => {
        for _ in 0..arg.saturating_mul(2) {
          self.skip()?;
        }
      }
      _ => {
        // major 6: the wrapped item follows
        self.skip()?;
      }
    }
    Ok(())
  }

  // --- raw helpers ---

  fn byte(&mut self) -> Result<u8> {
    let b = self.peek()?;
    self.pos += 1;
    Ok(b)
  }

  fn take(&mut self, n: usize) -> Result<&'a [u8]> {
    if self.remaining() < n {
      return Err(Error::UnexpectedEnd);
    }
    let slice = &self.data[self.pos..self.pos + n];
    self.pos += n;
    Ok(slice)
  }

  fn be16(&mut self) -> Result<u16> {
    Ok(u16::from_be_bytes(self.take(2)?.try_into().unwrap()))
  }

  fn be32(&mut self) -> Result<u32> {
    Ok(u32::from_be_bytes(self.take(4)?.try_into().unwrap()))
  }

  fn be64(&mut self) -> Result<u64> {
    Ok(u64::from_be_bytes(self.take(8)?.try_into().unwrap()))
  }

  fn exact_header(&mut self, expected: u8) -> Result<()> {
    let found = self.byte()?;
    if found != expected {
      return Err(Error::InitialByte { expected, found });
    }
    Ok(())
  }

  fn length_header(&mut self, major: u8, what: &'static str) -> Result<usize> {
    let b = self.byte()?;
    if b >> 5 != major {
      return Err(Error::Unexpected {
        expected: what,
        found: b,
      });
    }
    Ok(self.arg(b & 0x1f)? as usize)
  }

  fn arg(&mut self, ai: u8) -> Result<u64> {
    match ai {
      0..=23 => Ok(ai as u64),
      24 => Ok(self.byte()? as u64),
      25 => Ok(self.be16()? as u64),
      26 => Ok(self.be32()? as u64),
      27 => self.be64(),
      _ => Err(Error::AdditionalInfo(ai)),
    }
  }
}
