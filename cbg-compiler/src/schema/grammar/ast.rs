use bumpalo::collections::vec::Vec;

use crate::schema::span::Span;

pub struct Schema<'a> {
  pub imports: Vec<'a, Import<'a>>,
  pub defs: Vec<'a, Def<'a>>,
}

pub struct Import<'a> {
  pub namespace: &'a str,
  pub path: &'a str,
  pub span: Span,
}

pub struct Def<'a> {
  pub doc: Option<&'a str>,
  pub name: &'a str,
  pub ty: TypeExpr<'a>,
  pub span: Span,
  pub name_span: Span,
}

pub struct TypeExpr<'a> {
  pub span: Span,
  pub kind: TypeKind<'a>,
}

pub enum TypeKind<'a> {
  Bool,
  String,
  Bytes,
  Int(IntKind),
  Float(FloatKind),
  Option(&'a TypeExpr<'a>),
  Array(ArrayLen<'a>, &'a TypeExpr<'a>),
  Struct(Vec<'a, Field<'a>>),
  Enum(Vec<'a, EnumVariant<'a>>),
  Union(Vec<'a, UnionVariant<'a>>),
  Named(&'a str),
  Qualified(&'a str, &'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntKind {
  U8,
  U16,
  U32,
  U64,
  I8,
  I16,
  I32,
  I64,
  Uvarint,
  Ivarint,
}

impl IntKind {
  pub fn is_unsigned(self) -> bool {
    matches!(
      self,
      IntKind::U8 | IntKind::U16 | IntKind::U32 | IntKind::U64 | IntKind::Uvarint
    )
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatKind {
  F16,
  F32,
  F64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayLen<'a> {
  /// `[]T` -- length on the wire.
  Variable,
  /// `[N]T` -- length fixed by the schema.
  Fixed(u64),
  /// `[.name]T` -- length decoded from the named sibling field.
  External(&'a str),
}

pub struct Field<'a> {
  pub doc: Option<&'a str>,
  pub rank: u64,
  pub name: &'a str,
  pub ty: TypeExpr<'a>,
  pub span: Span,
  pub name_span: Span,
}

pub struct EnumVariant<'a> {
  pub doc: Option<&'a str>,
  pub tag: u64,
  pub name: &'a str,
  pub span: Span,
}

pub struct UnionVariant<'a> {
  pub doc: Option<&'a str>,
  pub tag: u64,
  pub name: &'a str,
  pub payload: Option<TypeExpr<'a>>,
  pub span: Span,
}
