pub mod ast;
pub mod lexer;
pub mod parser;

#[cfg(test)]
mod lexer_test;


use bumpalo::Bump;

use crate::schema::diagnostics::Diagnostics;

pub struct ParseResult<'a> {
  pub schema: Option<ast::Schema<'a>>,
  pub diagnostics: Diagnostics,
}

impl<'a> ParseResult<'a> {
  pub fn has_errors(&self) -> bool {
    self.diagnostics.has_errors()
  }
}

/// Parses one source buffer into a schema.
///
/// Every AST node lives in `alloc` and borrows from `input`, so both must
/// outlive the result; dropping the arena frees the whole parse at once.
/// A schema is returned even when error diagnostics were emitted. Callers
/// must gate on `has_errors` before trusting it.
pub fn parse<'a>(alloc: &'a Bump, input: &'a str) -> ParseResult<'a> {
  let mut diagnostics = Diagnostics::new();
  let schema = parser::Parser::new(alloc, input, &mut diagnostics).parse_schema();
  ParseResult {
    schema: Some(schema),
    diagnostics,
  }
}
