use half::f16;

/// Growable encode buffer.
///
/// Fixed-width writers always emit the declared width; the length-carrying
/// writers use the smallest additional-info form that fits.
pub struct Writer {
  buf: Vec<u8>,
}

impl Writer {
  pub fn new() -> Self {
    Writer {
      buf: Vec::with_capacity(256),
    }
  }

  pub fn finish(self) -> Vec<u8> {
    self.buf
  }

  pub fn as_slice(&self) -> &[u8] {
    &self.buf
  }

  pub fn len(&self) -> usize {
    self.buf.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buf.is_empty()
  }

  pub fn write_bool(&mut self, v: bool) {
    self.buf.push(if v { 0xf5 } else { 0xf4 });
  }

  pub fn write_null(&mut self) {
    self.buf.push(0xf6);
  }

  // Fixed-width unsigned integers, always full width.

  pub fn write_u8(&mut self, v: u8) {
    self.buf.push(0x18);
    self.buf.push(v);
  }

  pub fn write_u16(&mut self, v: u16) {
    self.buf.push(0x19);
    self.buf.extend_from_slice(&v.to_be_bytes());
  }

  pub fn write_u32(&mut self, v: u32) {
    self.buf.push(0x1a);
    self.buf.extend_from_slice(&v.to_be_bytes());
  }

  pub fn write_u64(&mut self, v: u64) {
    self.buf.push(0x1b);
    self.buf.extend_from_slice(&v.to_be_bytes());
  }

  // Fixed-width signed integers: major 0 for v >= 0, major 1 over
  // -1 - v otherwise, at the same width either way.

  pub fn write_i8(&mut self, v: i8) {
    if v >= 0 {
      self.buf.push(0x18);
      self.buf.push(v as u8);
    } else {
      self.buf.push(0x38);
      self.buf.push((-1 - v) as u8);
    }
  }

  pub fn write_i16(&mut self, v: i16) {
    if v >= 0 {
      self.buf.push(0x19);
      self.buf.extend_from_slice(&(v as u16).to_be_bytes());
    } else {
      self.buf.push(0x39);
      self.buf.extend_from_slice(&((-1 - v) as u16).to_be_bytes());
    }
  }

  pub fn write_i32(&mut self, v: i32) {
    if v >= 0 {
      self.buf.push(0x1a);
      self.buf.extend_from_slice(&(v as u32).to_be_bytes());
    } else {
      self.buf.push(0x3a);
      self.buf.extend_from_slice(&((-1 - v) as u32).to_be_bytes());
    }
  }

  pub fn write_i64(&mut self, v: i64) {
    if v >= 0 {
      self.buf.push(0x1b);
      self.buf.extend_from_slice(&(v as u64).to_be_bytes());
    } else {
      self.buf.push(0x3b);
      self.buf.extend_from_slice(&((-1 - v) as u64).to_be_bytes());
    }
  }

  // Varints, minimal CBOR encoding.

  pub fn write_uvarint(&mut self, v: u64) {
    self.minimal_header(0, v);
  }

  pub fn write_ivarint(&mut self, v: i64) {
    if v >= 0 {
      self.minimal_header(0, v as u64);
    } else {
      self.minimal_header(1, (-1 - v) as u64);
    }
  }

  // Floats, never downcast.

  pub fn write_f16(&mut self, v: f32) {
    self.buf.push(0xf9);
    self.buf.extend_from_slice(&f16::from_f32(v).to_be_bytes());
  }

  pub fn write_f32(&mut self, v: f32) {
    self.buf.push(0xfa);
    self.buf.extend_from_slice(&v.to_be_bytes());
  }

  pub fn write_f64(&mut self, v: f64) {
    self.buf.push(0xfb);
    self.buf.extend_from_slice(&v.to_be_bytes());
  }

  pub fn write_str(&mut self, v: &str) {
    self.minimal_header(3, v.len() as u64);
    self.buf.extend_from_slice(v.as_bytes());
  }

  pub fn write_bytes(&mut self, v: &[u8]) {
    self.minimal_header(2, v.len() as u64);
    self.buf.extend_from_slice(v);
  }

  // Structure headers.

  pub fn write_array_header(&mut self, len: usize) {
    self.minimal_header(4, len as u64);
  }

  pub fn write_indefinite_array_header(&mut self) {
    self.buf.push(0x9f);
  }

  pub fn write_break(&mut self) {
    self.buf.push(0xff);
  }

  pub fn write_tag_header(&mut self, tag: u64) {
    self.minimal_header(6, tag);
  }

  fn minimal_header(&mut self, major: u8, n: u64) {
    if n < 24 {
      self.buf.push(major << 5 | n as u8);
    } else if n <= u8::MAX as u64 {
      self.buf.push(major << 5 | 24);
      self.buf.push(n as u8);
    } else if n <= u16::MAX as u64 {
      self.buf.push(major << 5 | 25);
      self.buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= u32::MAX as u64 {
      self.buf.push(major << 5 | 26);
      self.buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
      self.buf.push(major << 5 | 27);
      self.buf.extend_from_slice(&n.to_be_bytes());
    }
  }
}

impl Default for Writer {
  fn default() -> Self {
    Self::new()
  }
}
