//! Import resolution: a thin loop over the parser and the filesystem.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use bumpalo::Bump;
use log::warn;

use crate::schema::diagnostics::{Diagnostics, Severity};
use crate::schema::grammar::{self, ast::Schema};
use crate::schema::span::Span;

/// One imported schema file, keyed by its namespace in the [`Loader`].
pub struct Module<'a> {
  pub path: PathBuf,
  pub source: &'a str,
  pub schema: Schema<'a>,
  pub diagnostics: Diagnostics,
}

/// Resolves the imports of a parsed schema against a base directory.
///
/// Each file's bytes are copied into the shared arena so the parsed
/// schemas all borrow from one allocation scope. Namespaces resolve at
/// most once; an unreadable file degrades to a warning on the importing
/// module and resolution continues.
pub struct Loader<'a> {
  alloc: &'a Bump,
  modules: HashMap<String, Module<'a>>,
  claimed: HashSet<String>,
}

impl<'a> Loader<'a> {
  pub fn new(alloc: &'a Bump) -> Self {
    Loader {
      alloc,
      modules: HashMap::new(),
      claimed: HashSet::new(),
    }
  }

  pub fn resolve_imports(
    &mut self,
    schema: &Schema<'a>,
    base_dir: &Path,
    diagnostics: &mut Diagnostics,
  ) {
    for import in schema.imports.iter() {
      self.resolve_one(import.namespace, import.path, import.span, base_dir, diagnostics);
    }
  }

  pub fn modules(&self) -> &HashMap<String, Module<'a>> {
    &self.modules
  }

  pub fn into_modules(self) -> HashMap<String, Module<'a>> {
    self.modules
  }

  fn resolve_one(
    &mut self,
    namespace: &str,
    rel_path: &str,
    span: Span,
    base_dir: &Path,
    importer: &mut Diagnostics,
  ) {
    if !self.claimed.insert(namespace.to_string()) {
      return;
    }
    let path = base_dir.join(rel_path);
    let text = match fs::read_to_string(&path) {
      Ok(text) => text,
      Err(err) => {
        warn!("cannot read import {}: {}", path.display(), err);
        importer.emit(
          Severity::Warning,
          span,
          format!("cannot read import `{}`: {}", path.display(), err),
        );
        return;
      }
    };
    let source: &'a str = self.alloc.alloc_str(&text);
    let mut result = grammar::parse(self.alloc, source);
    let Some(schema) = result.schema.take() else {
      return;
    };

    // Transitive imports resolve against this file's directory, with
    // warnings landing on this module's diagnostics.
    let mut diagnostics = result.diagnostics;
    let child_base = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    let children: Vec<(&'a str, &'a str, Span)> = schema
      .imports
      .iter()
      .map(|i| (i.namespace, i.path, i.span))
      .collect();
    for (ns, child_path, child_span) in children {
      self.resolve_one(ns, child_path, child_span, &child_base, &mut diagnostics);
    }

    self.modules.insert(
      namespace.to_string(),
      Module {
        path,
        source,
        schema,
        diagnostics,
      },
    );
  }
}
