//! Semantic validation over a parsed schema.
//!
//! The parser accepts anything the grammar allows; this pass reports the
//! schema-level problems a code emitter cannot work around: duplicate
//! names, duplicate wire identifiers, unresolved references, and invalid
//! external-length arrays.

use std::collections::{HashMap, HashSet};

use crate::schema::diagnostics::{Diagnostics, Severity};
use crate::schema::grammar::ast::{ArrayLen, Field, Schema, TypeExpr, TypeKind};
use crate::schema::span::Span;
use crate::util::first_duplicate;

pub fn check(schema: &Schema, diagnostics: &mut Diagnostics) {
  let mut seen: HashMap<&str, Span> = HashMap::new();
  for def in schema.defs.iter() {
    if let Some(&prev) = seen.get(def.name) {
      diagnostics.emit_with_note(
        Severity::Error,
        def.name_span,
        format!("duplicate definition `{}`", def.name),
        Some(prev),
        "previously defined here",
      );
    } else {
      seen.insert(def.name, def.name_span);
    }
  }

  let ctx = Context {
    defined: schema.defs.iter().map(|d| d.name).collect(),
    namespaces: schema.imports.iter().map(|i| i.namespace).collect(),
  };
  for def in schema.defs.iter() {
    check_type(&def.ty, &ctx, diagnostics);
  }
}

struct Context<'a> {
  defined: HashSet<&'a str>,
  namespaces: HashSet<&'a str>,
}

fn check_type(ty: &TypeExpr, ctx: &Context, diagnostics: &mut Diagnostics) {
  match &ty.kind {
    TypeKind::Option(inner) => check_type(inner, ctx, diagnostics),
    TypeKind::Array(len, elem) => {
      if let ArrayLen::External(name) = len {
        diagnostics.emit(
          Severity::Error,
          ty.span,
          format!("`[.{}]` is only valid directly on a struct field", name),
        );
      }
      check_type(elem, ctx, diagnostics);
    }
    TypeKind::Struct(fields) => check_struct(fields, ctx, diagnostics),
    TypeKind::Enum(variants) => {
      check_tags(variants.iter().map(|v| (v.tag, v.span)), diagnostics);
      check_names(variants.iter().map(|v| (v.name, v.span)), "variant", diagnostics);
    }
    TypeKind::Union(variants) => {
      check_tags(variants.iter().map(|v| (v.tag, v.span)), diagnostics);
      for variant in variants.iter() {
        if let Some(payload) = &variant.payload {
          check_type(payload, ctx, diagnostics);
        }
      }
      check_names(variants.iter().map(|v| (v.name, v.span)), "variant", diagnostics);
    }
    TypeKind::Named(name) => {
      if !ctx.defined.contains(name) {
        diagnostics.emit(
          Severity::Error,
          ty.span,
          format!("unknown type `{}`", name),
        );
      }
    }
    TypeKind::Qualified(namespace, _) => {
      if !ctx.namespaces.contains(namespace) {
        diagnostics.emit(
          Severity::Error,
          ty.span,
          format!("unknown namespace `{}`", namespace),
        );
      }
    }
    TypeKind::Bool
    | TypeKind::String
    | TypeKind::Bytes
    | TypeKind::Int(_)
    | TypeKind::Float(_) => {}
  }
}

fn check_struct(fields: &[Field], ctx: &Context, diagnostics: &mut Diagnostics) {
  check_names(
    fields.iter().map(|f| (f.name, f.name_span)),
    "field",
    diagnostics,
  );
  if let Some(rank) = first_duplicate(fields.iter().map(|f| f.rank)) {
    let first = fields.iter().find(|f| f.rank == rank).unwrap();
    let dup = fields.iter().filter(|f| f.rank == rank).nth(1).unwrap();
    diagnostics.emit_with_note(
      Severity::Error,
      dup.span,
      format!("duplicate field rank {}", rank),
      Some(first.span),
      "first used here",
    );
  }
  for field in fields {
    match &field.ty.kind {
      TypeKind::Array(ArrayLen::External(name), elem) => {
        check_length_field(field, name, fields, diagnostics);
        check_type(elem, ctx, diagnostics);
      }
      _ => check_type(&field.ty, ctx, diagnostics),
    }
  }
}

// The length of a `[.name]T` field comes from a sibling that must exist,
// hold an unsigned integer, and decode before the array itself.
fn check_length_field(
  field: &Field,
  name: &str,
  fields: &[Field],
  diagnostics: &mut Diagnostics,
) {
  let Some(sibling) = fields.iter().find(|f| f.name == name) else {
    diagnostics.emit(
      Severity::Error,
      field.ty.span,
      format!("length field `{}` not found in this struct", name),
    );
    return;
  };
  let unsigned = matches!(&sibling.ty.kind, TypeKind::Int(k) if k.is_unsigned());
  if !unsigned {
    diagnostics.emit_with_note(
      Severity::Error,
      field.ty.span,
      format!("length field `{}` must be an unsigned integer", name),
      Some(sibling.span),
      "length field defined here",
    );
  } else if sibling.rank >= field.rank {
    diagnostics.emit_with_note(
      Severity::Error,
      field.ty.span,
      format!(
        "length field `{}` must have a lower rank than the array it sizes",
        name
      ),
      Some(sibling.span),
      "length field defined here",
    );
  }
}

fn check_tags(
  tags: impl Iterator<Item = (u64, Span)> + Clone,
  diagnostics: &mut Diagnostics,
) {
  if let Some(tag) = first_duplicate(tags.clone().map(|(t, _)| t)) {
    let mut spans = tags.filter(|&(t, _)| t == tag).map(|(_, s)| s);
    let first = spans.next().unwrap();
    let dup = spans.next().unwrap();
    diagnostics.emit_with_note(
      Severity::Error,
      dup,
      format!("duplicate variant tag {}", tag),
      Some(first),
      "first used here",
    );
  }
}

fn check_names<'s>(
  names: impl Iterator<Item = (&'s str, Span)>,
  what: &str,
  diagnostics: &mut Diagnostics,
) {
  let mut seen: HashMap<&str, Span> = HashMap::new();
  for (name, span) in names {
    if let Some(&prev) = seen.get(name) {
      diagnostics.emit_with_note(
        Severity::Error,
        span,
        format!("duplicate {} name `{}`", what, name),
        Some(prev),
        "previously defined here",
      );
    } else {
      seen.insert(name, span);
    }
  }
}
