use std::path::{Path, PathBuf};

use anyhow::Result;
use bumpalo::Bump;
use cbg_compiler::schema::check::check;
use cbg_compiler::schema::diagnostics::{render_diagnostics, Diagnostics};
use cbg_compiler::schema::grammar::ast::{ArrayLen, Schema, TypeKind};
use cbg_compiler::schema::grammar::lexer::{Lexer, TokenKind};
use cbg_compiler::schema::grammar::parse;
use cbg_compiler::schema::loader::Loader;
use clap::Parser;

/// cboragen schema parser tool.
#[derive(Parser)]
#[command(version)]
struct Opts {
  /// Dump the token stream instead of parsing.
  #[arg(long)]
  tokens: bool,

  /// Disable colored diagnostics.
  #[arg(long)]
  no_color: bool,

  /// Schema file to parse.
  file: PathBuf,
}

fn main() -> Result<()> {
  if std::env::var("RUST_LOG").is_err() {
    std::env::set_var("RUST_LOG", "info");
  }
  pretty_env_logger::init_timed();
  let opts: Opts = Opts::parse();

  let source = std::fs::read_to_string(&opts.file)?;
  let filename = opts.file.display().to_string();
  let use_color = !opts.no_color;

  if opts.tokens {
    return dump_tokens(&source, &filename, use_color);
  }

  let alloc = Bump::new();
  let mut result = parse(&alloc, &source);
  let Some(schema) = result.schema.take() else {
    anyhow::bail!("parse returned no schema");
  };
  check(&schema, &mut result.diagnostics);
  log::debug!(
    "parsed {} imports and {} definitions from {}",
    schema.imports.len(),
    schema.defs.len(),
    filename
  );

  let mut loader = Loader::new(&alloc);
  let base_dir = opts.file.parent().unwrap_or_else(|| Path::new("."));
  loader.resolve_imports(&schema, base_dir, &mut result.diagnostics);

  let mut errors = result.diagnostics.has_errors();
  if !result.diagnostics.is_empty() {
    render_diagnostics(
      &mut std::io::stderr().lock(),
      &source,
      &filename,
      &result.diagnostics,
      use_color,
    )?;
  }
  for module in loader.modules().values() {
    if !module.diagnostics.is_empty() {
      render_diagnostics(
        &mut std::io::stderr().lock(),
        module.source,
        &module.path.display().to_string(),
        &module.diagnostics,
        use_color,
      )?;
    }
    errors = errors || module.diagnostics.has_errors();
  }
  if errors {
    std::process::exit(1);
  }

  println!("{}", serde_json::to_string_pretty(&summary(&filename, &schema))?);
  Ok(())
}

fn dump_tokens(source: &str, filename: &str, use_color: bool) -> Result<()> {
  let mut diagnostics = Diagnostics::new();
  let mut lexer = Lexer::new(source);
  loop {
    let tok = lexer.next(&mut diagnostics);
    match tok.kind {
      TokenKind::Integer
      | TokenKind::Str
      | TokenKind::Ident
      | TokenKind::TypeIdent
      | TokenKind::DocComment => {
        println!(
          "{}..{}  {}  {:?}",
          tok.span.start,
          tok.span.end,
          tok.kind.name(),
          tok.span.slice(source)
        );
      }
      _ => {
        println!("{}..{}  {}", tok.span.start, tok.span.end, tok.kind.name());
      }
    }
    if tok.kind == TokenKind::Eof {
      break;
    }
  }
  if !diagnostics.is_empty() {
    render_diagnostics(
      &mut std::io::stderr().lock(),
      source,
      filename,
      &diagnostics,
      use_color,
    )?;
  }
  if diagnostics.has_errors() {
    std::process::exit(1);
  }
  Ok(())
}

fn summary(filename: &str, schema: &Schema) -> serde_json::Value {
  serde_json::json!({
    "file": filename,
    "imports": schema
      .imports
      .iter()
      .map(|i| {
        serde_json::json!({
          "namespace": i.namespace,
          "path": i.path,
        })
      })
      .collect::<Vec<_>>(),
    "definitions": schema
      .defs
      .iter()
      .map(|d| {
        serde_json::json!({
          "name": d.name,
          "type": type_summary(&d.ty.kind),
          "doc": d.doc,
        })
      })
      .collect::<Vec<_>>(),
  })
}

fn type_summary(kind: &TypeKind) -> String {
  match kind {
    TypeKind::Bool => "bool".to_string(),
    TypeKind::String => "string".to_string(),
    TypeKind::Bytes => "bytes".to_string(),
    TypeKind::Int(k) => format!("{:?}", k).to_lowercase(),
    TypeKind::Float(k) => format!("{:?}", k).to_lowercase(),
    TypeKind::Option(inner) => format!("?{}", type_summary(&inner.kind)),
    TypeKind::Array(len, elem) => match len {
      ArrayLen::Variable => format!("[]{}", type_summary(&elem.kind)),
      ArrayLen::Fixed(n) => format!("[{}]{}", n, type_summary(&elem.kind)),
      ArrayLen::External(field) => format!("[.{}]{}", field, type_summary(&elem.kind)),
    },
    TypeKind::Struct(fields) => format!("struct ({} fields)", fields.len()),
    TypeKind::Enum(variants) => format!("enum ({} variants)", variants.len()),
    TypeKind::Union(variants) => format!("union ({} variants)", variants.len()),
    TypeKind::Named(name) => (*name).to_string(),
    TypeKind::Qualified(namespace, name) => format!("{}.{}", namespace, name),
  }
}
