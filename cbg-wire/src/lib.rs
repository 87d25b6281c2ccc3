//! Wire-format runtime for cboragen codecs.
//!
//! The wire format is a constrained profile of RFC 8949 CBOR. A CBOR item
//! starts with an initial byte `(major << 5) | ai`; additional-info values
//! 0-23 carry the argument inline, 24/25/26/27 take 1/2/4/8 big-endian
//! argument bytes, and 31 marks indefinite length (for major 7 it is the
//! break symbol).
//!
//! Every schema type maps to a fixed byte shape, and generated codecs as
//! well as hand-written ones must reproduce it exactly:
//!
//! | Schema type | Wire shape | Size |
//! |-------------|------------|------|
//! | `bool` | `F4` / `F5` | 1 |
//! | `u8` | `18` + 1 byte | 2 |
//! | `u16` | `19` + 2 bytes | 3 |
//! | `u32` | `1A` + 4 bytes | 5 |
//! | `u64` | `1B` + 8 bytes | 9 |
//! | `iN >= 0` | major 0, same width as `uN` | as `uN` |
//! | `iN < 0` | major 1 over `-1 - v`, same width | as `uN` |
//! | `uvarint` | major 0, minimal header | 1-9 |
//! | `ivarint` | major 0/1, minimal header | 1-9 |
//! | `f16` | `F9` + 2 bytes | 3 |
//! | `f32` | `FA` + 4 bytes | 5 |
//! | `f64` | `FB` + 8 bytes | 9 |
//! | `string` | major 3, minimal length header + UTF-8 | 1-9 + n |
//! | `[]u8` | major 2, minimal length header + bytes | 1-9 + n |
//!
//! Fixed-width scalars always occupy their declared width; a `u32` with
//! value 1 is `1A 00 00 00 01`, never `01`. Floats are never downcast to
//! a narrower float on the wire.
//!
//! Compound types:
//!
//! * **struct** -- definite-length array whose length is the highest rank
//!   written plus one. Absent fields below that rank encode null (`F6`);
//!   trailing absent fields are omitted. Decoders skip items at ranks they
//!   do not know.
//! * **enum** -- `uvarint` of the variant tag.
//! * **union** -- payload variants are a CBOR tag (major 6) numbered by
//!   the variant tag wrapping the payload; unit variants are a `uvarint`
//!   of the tag. Decoders dispatch on the initial byte's major type.
//! * **optional `?T`** -- the union `{ 0 none, 1 some: T }`: `00` for
//!   none, `C1` + payload for some.
//! * **`[]T`** -- definite-length array of the element encodings.
//! * **`[N]T`** -- definite-length array whose length must equal `N`.
//! * **`[.f]T`** -- indefinite-length array (`9F` .. `FF`); the element
//!   count comes from the previously decoded sibling field `f`.
//!
//! The only major-6 tag numbers ever emitted are schema union-variant
//! tags (including optional's variant 1). No IANA semantic tags are
//! produced, and decoders are not required to recognize any.
//!
//! Unknown enum values and union tag numbers are not decode errors; the
//! integer is handed back to the caller so newer writers interoperate
//! with older readers.

pub mod decode;
pub mod encode;

pub use decode::{Error, Reader};
pub use encode::Writer;


#[cfg(test)]
mod encode_test;
