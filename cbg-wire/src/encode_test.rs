use super::encode::Writer;

fn emit(f: impl FnOnce(&mut Writer)) -> Vec<u8> {
  let mut w = Writer::new();
  f(&mut w);
  w.finish()
}

#[test]
fn test_bool() {
  assert_eq!(emit(|w| w.write_bool(false)), [0xf4]);
  assert_eq!(emit(|w| w.write_bool(true)), [0xf5]);
  assert_eq!(emit(|w| w.write_null()), [0xf6]);
}

#[test]
fn test_fixed_width_unsigned() {
  assert_eq!(emit(|w| w.write_u8(0)), [0x18, 0x00]);
  assert_eq!(emit(|w| w.write_u8(255)), [0x18, 0xff]);
  assert_eq!(emit(|w| w.write_u16(1)), [0x19, 0x00, 0x01]);
  assert_eq!(emit(|w| w.write_u32(1)), [0x1a, 0x00, 0x00, 0x00, 0x01]);
  assert_eq!(
    emit(|w| w.write_u64(1)),
    [0x1b, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01]
  );
}

#[test]
fn test_fixed_width_signed() {
  assert_eq!(emit(|w| w.write_i8(5)), [0x18, 0x05]);
  assert_eq!(emit(|w| w.write_i8(-5)), [0x38, 0x04]);
  assert_eq!(emit(|w| w.write_i8(i8::MIN)), [0x38, 0x7f]);
  assert_eq!(emit(|w| w.write_i16(-1000)), [0x39, 0x03, 0xe7]);
  assert_eq!(
    emit(|w| w.write_i32(-100_000)),
    [0x3a, 0x00, 0x01, 0x86, 0x9f]
  );
  assert_eq!(
    emit(|w| w.write_i64(-1)),
    [0x3b, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
  );
  assert_eq!(
    emit(|w| w.write_i64(i64::MIN)),
    [0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
  );
}

#[test]
fn test_uvarint_minimal() {
  assert_eq!(emit(|w| w.write_uvarint(0)), [0x00]);
  assert_eq!(emit(|w| w.write_uvarint(23)), [0x17]);
  assert_eq!(emit(|w| w.write_uvarint(24)), [0x18, 0x18]);
  assert_eq!(emit(|w| w.write_uvarint(255)), [0x18, 0xff]);
  assert_eq!(emit(|w| w.write_uvarint(256)), [0x19, 0x01, 0x00]);
  assert_eq!(emit(|w| w.write_uvarint(65535)), [0x19, 0xff, 0xff]);
  assert_eq!(
    emit(|w| w.write_uvarint(65536)),
    [0x1a, 0x00, 0x01, 0x00, 0x00]
  );
  assert_eq!(
    emit(|w| w.write_uvarint(1 << 32)),
    [0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
  );
}

#[test]
fn test_ivarint_minimal() {
  assert_eq!(emit(|w| w.write_ivarint(0)), [0x00]);
  assert_eq!(emit(|w| w.write_ivarint(-1)), [0x20]);
  assert_eq!(emit(|w| w.write_ivarint(-24)), [0x37]);
  assert_eq!(emit(|w| w.write_ivarint(-25)), [0x38, 0x18]);
  assert_eq!(emit(|w| w.write_ivarint(1000)), [0x19, 0x03, 0xe8]);
  assert_eq!(emit(|w| w.write_ivarint(-1000)), [0x39, 0x03, 0xe7]);
}

#[test]
fn test_floats_keep_declared_width() {
  assert_eq!(emit(|w| w.write_f16(1.5)), [0xf9, 0x3e, 0x00]);
  // 1.0 fits in f16 but f32 still writes four bytes
  assert_eq!(emit(|w| w.write_f32(1.0)), [0xfa, 0x3f, 0x80, 0x00, 0x00]);
  assert_eq!(
    emit(|w| w.write_f64(1.0)),
    [0xfb, 0x3f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
  );
}

#[test]
fn test_string() {
  assert_eq!(emit(|w| w.write_str("")), [0x60]);
  assert_eq!(emit(|w| w.write_str("hi")), [0x62, 0x68, 0x69]);
  let long = "x".repeat(24);
  let encoded = emit(|w| w.write_str(&long));
  assert_eq!(&encoded[..2], [0x78, 0x18]);
  assert_eq!(encoded.len(), 2 + 24);
}

#[test]
fn test_bytes() {
  assert_eq!(emit(|w| w.write_bytes(&[0xde, 0xad])), [0x42, 0xde, 0xad]);
  assert_eq!(emit(|w| w.write_bytes(&[])), [0x40]);
}

#[test]
fn test_structure_headers() {
  assert_eq!(emit(|w| w.write_array_header(0)), [0x80]);
  assert_eq!(emit(|w| w.write_array_header(3)), [0x83]);
  assert_eq!(emit(|w| w.write_array_header(30)), [0x98, 0x1e]);
  assert_eq!(emit(|w| w.write_indefinite_array_header()), [0x9f]);
  assert_eq!(emit(|w| w.write_break()), [0xff]);
  assert_eq!(emit(|w| w.write_tag_header(1)), [0xc1]);
  assert_eq!(emit(|w| w.write_tag_header(42)), [0xd8, 0x2a]);
}

#[test]
fn test_fixed_width_sizes_are_value_independent() {
  for v in [0u32, 1, 23, 24, 255, 65536, u32::MAX] {
    assert_eq!(emit(|w| w.write_u32(v)).len(), 5);
  }
  for v in [0i16, -1, i16::MIN, i16::MAX] {
    assert_eq!(emit(|w| w.write_i16(v)).len(), 3);
  }
}
