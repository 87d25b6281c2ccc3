use bumpalo::collections::vec::Vec as BumpVec;
use bumpalo::Bump;

use super::ast::{
  ArrayLen, Def, EnumVariant, Field, FloatKind, Import, IntKind, Schema, TypeExpr, TypeKind,
  UnionVariant,
};
use super::lexer::{doc_comment_text, string_text, Lexer, Token, TokenKind};
use crate::schema::diagnostics::{Diagnostics, Severity};
use crate::schema::span::Span;

/// Recursive-descent parser over the token stream.
///
/// One token of lookahead, plus two buffered tokens so a top-level
/// `identifier` can be disambiguated into an import without re-lexing.
/// Errors are accumulated and recovered from; every failing production
/// emits exactly one diagnostic before its recovery runs.
pub struct Parser<'a, 'd> {
  alloc: &'a Bump,
  source: &'a str,
  lexer: Lexer<'a>,
  diagnostics: &'d mut Diagnostics,
  buf: [Token; 3],
  buf_len: usize,
}

impl<'a, 'd> Parser<'a, 'd> {
  pub fn new(alloc: &'a Bump, source: &'a str, diagnostics: &'d mut Diagnostics) -> Self {
    let dummy = Token {
      kind: TokenKind::Eof,
      span: Span::new(0, 0),
    };
    Parser {
      alloc,
      source,
      lexer: Lexer::new(source),
      diagnostics,
      buf: [dummy; 3],
      buf_len: 0,
    }
  }

  pub fn parse_schema(mut self) -> Schema<'a> {
    let mut imports = BumpVec::new_in(self.alloc);
    let mut defs = BumpVec::new_in(self.alloc);
    loop {
      self.skip_newlines();
      let doc = self.take_docs();
      self.skip_newlines();
      let tok = self.peek();
      match tok.kind {
        TokenKind::Eof => break,
        TokenKind::TypeIdent => match self.parse_type_def(doc) {
          Some(def) => defs.push(def),
          None => self.recover_top_level(),
        },
        TokenKind::Ident
          if self.peek2().kind == TokenKind::Eq && self.peek3().kind == TokenKind::At =>
        {
          match self.parse_import() {
            Some(import) => imports.push(import),
            None => self.recover_top_level(),
          }
        }
        _ => {
          self.error_at(
            tok,
            format!(
              "expected type definition or import, found {}",
              tok.kind.describe()
            ),
          );
          self.recover_top_level();
        }
      }
    }
    Schema { imports, defs }
  }

  // --- token plumbing ---

  fn fill(&mut self, n: usize) {
    while self.buf_len < n {
      self.buf[self.buf_len] = self.lexer.next(self.diagnostics);
      self.buf_len += 1;
    }
  }

  fn peek(&mut self) -> Token {
    self.fill(1);
    self.buf[0]
  }

  fn peek2(&mut self) -> Token {
    self.fill(2);
    self.buf[1]
  }

  fn peek3(&mut self) -> Token {
    self.fill(3);
    self.buf[2]
  }

  fn bump(&mut self) -> Token {
    self.fill(1);
    let tok = self.buf[0];
    self.buf[0] = self.buf[1];
    self.buf[1] = self.buf[2];
    self.buf_len -= 1;
    tok
  }

  fn at(&mut self, kind: TokenKind) -> bool {
    self.peek().kind == kind
  }

  fn eat(&mut self, kind: TokenKind) -> Option<Token> {
    if self.at(kind) {
      Some(self.bump())
    } else {
      None
    }
  }

  fn expect(&mut self, kind: TokenKind) -> Option<Token> {
    let tok = self.peek();
    if tok.kind == kind {
      return Some(self.bump());
    }
    self.error_at(
      tok,
      format!(
        "expected {}, found {}",
        kind.describe(),
        tok.kind.describe()
      ),
    );
    None
  }

  fn error_at(&mut self, tok: Token, message: String) {
    self.diagnostics.emit(Severity::Error, tok.span, message);
  }

  fn text(&self, span: Span) -> &'a str {
    span.slice(self.source)
  }

  fn skip_newlines(&mut self) {
    while self.eat(TokenKind::Newline).is_some() {}
  }

  fn skip_separators(&mut self) {
    loop {
      match self.peek().kind {
        TokenKind::Comma | TokenKind::Newline => {
          self.bump();
        }
        _ => break,
      }
    }
  }

  // --- recovery ---

  // Top-level panic mode: advance past the offending token, then
  // synchronize on a type identifier, a doc comment, an identifier at the
  // start of a line, or eof.
  fn recover_top_level(&mut self) {
    if self.peek().kind != TokenKind::Eof {
      self.bump();
    }
    let mut after_newline = false;
    loop {
      let tok = self.peek();
      match tok.kind {
        TokenKind::Eof | TokenKind::TypeIdent | TokenKind::DocComment => break,
        TokenKind::Newline => {
          after_newline = true;
          self.bump();
        }
        TokenKind::Ident if after_newline => break,
        _ => {
          after_newline = false;
          self.bump();
        }
      }
    }
  }

  // Body panic mode: synchronize on the next separator or closing brace.
  fn recover_body(&mut self) {
    loop {
      match self.peek().kind {
        TokenKind::Comma | TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof => break,
        _ => {
          self.bump();
        }
      }
    }
  }

  // --- doc comments ---

  // Consecutive `///` lines gather into one string. A single line is a
  // zero-copy slice of the source; joined lines go into the arena.
  fn take_docs(&mut self) -> Option<&'a str> {
    if !self.at(TokenKind::DocComment) {
      return None;
    }
    let first = self.bump();
    let first_text = doc_comment_text(first.span, self.source);
    let mut joined: Option<String> = None;
    while self.peek().kind == TokenKind::Newline && self.peek2().kind == TokenKind::DocComment {
      self.bump();
      let tok = self.bump();
      let line = doc_comment_text(tok.span, self.source);
      let buf = joined.get_or_insert_with(|| first_text.to_string());
      buf.push('\n');
      buf.push_str(line);
    }
    Some(match joined {
      Some(s) => self.alloc.alloc_str(&s),
      None => first_text,
    })
  }

  // --- top-level forms ---

  fn parse_import(&mut self) -> Option<Import<'a>> {
    let ns_tok = self.bump();
    self.expect(TokenKind::Eq)?;
    self.expect(TokenKind::At)?;
    let word = self.peek();
    if word.kind != TokenKind::Ident || self.text(word.span) != "import" {
      self.error_at(
        word,
        format!("expected `import`, found {}", word.kind.describe()),
      );
      return None;
    }
    self.bump();
    self.expect(TokenKind::LParen)?;
    let path_tok = self.expect(TokenKind::Str)?;
    let close = self.expect(TokenKind::RParen)?;
    Some(Import {
      namespace: self.text(ns_tok.span),
      path: string_text(path_tok.span, self.source),
      span: ns_tok.span.merge(close.span),
    })
  }

  fn parse_type_def(&mut self, doc: Option<&'a str>) -> Option<Def<'a>> {
    let name_tok = self.bump();
    self.expect(TokenKind::Eq)?;
    let ty = self.parse_type_expr()?;
    let span = name_tok.span.merge(ty.span);
    Some(Def {
      doc,
      name: self.text(name_tok.span),
      ty,
      span,
      name_span: name_tok.span,
    })
  }

  // --- type expressions ---

  fn parse_type_expr(&mut self) -> Option<TypeExpr<'a>> {
    let tok = self.peek();
    if let Some(kind) = primitive_kind(tok.kind) {
      self.bump();
      return Some(TypeExpr {
        span: tok.span,
        kind,
      });
    }
    match tok.kind {
      TokenKind::Question => {
        self.bump();
        let inner = self.parse_type_expr()?;
        let span = tok.span.merge(inner.span);
        Some(TypeExpr {
          span,
          kind: TypeKind::Option(self.alloc.alloc(inner)),
        })
      }
      TokenKind::LBracket => self.parse_array(),
      TokenKind::KwStruct => self.parse_struct(),
      TokenKind::KwEnum => self.parse_enum(),
      TokenKind::KwUnion => self.parse_union(),
      TokenKind::TypeIdent => {
        self.bump();
        Some(TypeExpr {
          span: tok.span,
          kind: TypeKind::Named(self.text(tok.span)),
        })
      }
      TokenKind::Ident => {
        let ns_tok = self.bump();
        self.expect(TokenKind::Dot)?;
        let name_tok = self.expect(TokenKind::TypeIdent)?;
        Some(TypeExpr {
          span: ns_tok.span.merge(name_tok.span),
          kind: TypeKind::Qualified(self.text(ns_tok.span), self.text(name_tok.span)),
        })
      }
      _ => {
        self.error_at(
          tok,
          format!("expected type expression, found {}", tok.kind.describe()),
        );
        None
      }
    }
  }

  fn parse_array(&mut self) -> Option<TypeExpr<'a>> {
    let open = self.bump();
    let len = match self.peek().kind {
      TokenKind::RBracket => ArrayLen::Variable,
      TokenKind::Integer => {
        let tok = self.bump();
        match self.text(tok.span).parse::<u64>() {
          Ok(n) => ArrayLen::Fixed(n),
          Err(_) => {
            self.error_at(tok, "array length does not fit in 64 bits".to_string());
            return None;
          }
        }
      }
      TokenKind::Dot => {
        self.bump();
        let tok = self.peek();
        match tok.kind {
          TokenKind::Ident | TokenKind::Integer => {
            self.bump();
            ArrayLen::External(self.text(tok.span))
          }
          _ => {
            self.error_at(
              tok,
              format!("expected length field name, found {}", tok.kind.describe()),
            );
            return None;
          }
        }
      }
      _ => {
        let tok = self.peek();
        self.error_at(
          tok,
          format!(
            "malformed array specifier: expected `]`, integer, or `.`, found {}",
            tok.kind.describe()
          ),
        );
        return None;
      }
    };
    self.expect(TokenKind::RBracket)?;
    let elem = self.parse_type_expr()?;
    let span = open.span.merge(elem.span);
    // `[]u8` is the byte-string form
    if matches!(len, ArrayLen::Variable) && matches!(elem.kind, TypeKind::Int(IntKind::U8)) {
      return Some(TypeExpr {
        span,
        kind: TypeKind::Bytes,
      });
    }
    Some(TypeExpr {
      span,
      kind: TypeKind::Array(len, self.alloc.alloc(elem)),
    })
  }

  // --- bodies ---

  fn parse_struct(&mut self) -> Option<TypeExpr<'a>> {
    let kw = self.bump();
    self.expect(TokenKind::LBrace)?;
    let mut fields = BumpVec::new_in(self.alloc);
    let close;
    loop {
      self.skip_separators();
      let doc = self.take_docs();
      self.skip_separators();
      let tok = self.peek();
      match tok.kind {
        TokenKind::RBrace => {
          close = self.bump();
          break;
        }
        TokenKind::Eof => {
          self.error_at(tok, "expected `}`, found end of file".to_string());
          close = tok;
          break;
        }
        _ => {}
      }
      match self.parse_field(doc) {
        Some(field) => fields.push(field),
        None => {
          self.recover_body();
          continue;
        }
      }
      self.require_separator("field");
    }
    Some(TypeExpr {
      span: kw.span.merge(close.span),
      kind: TypeKind::Struct(fields),
    })
  }

  fn parse_enum(&mut self) -> Option<TypeExpr<'a>> {
    let kw = self.bump();
    self.expect(TokenKind::LBrace)?;
    let mut variants = BumpVec::new_in(self.alloc);
    let close;
    loop {
      self.skip_separators();
      let doc = self.take_docs();
      self.skip_separators();
      let tok = self.peek();
      match tok.kind {
        TokenKind::RBrace => {
          close = self.bump();
          break;
        }
        TokenKind::Eof => {
          self.error_at(tok, "expected `}`, found end of file".to_string());
          close = tok;
          break;
        }
        _ => {}
      }
      match self.parse_enum_variant(doc) {
        Some(variant) => variants.push(variant),
        None => {
          self.recover_body();
          continue;
        }
      }
      self.require_separator("variant");
    }
    Some(TypeExpr {
      span: kw.span.merge(close.span),
      kind: TypeKind::Enum(variants),
    })
  }

  fn parse_union(&mut self) -> Option<TypeExpr<'a>> {
    let kw = self.bump();
    self.expect(TokenKind::LBrace)?;
    let mut variants = BumpVec::new_in(self.alloc);
    let close;
    loop {
      self.skip_separators();
      let doc = self.take_docs();
      self.skip_separators();
      let tok = self.peek();
      match tok.kind {
        TokenKind::RBrace => {
          close = self.bump();
          break;
        }
        TokenKind::Eof => {
          self.error_at(tok, "expected `}`, found end of file".to_string());
          close = tok;
          break;
        }
        _ => {}
      }
      match self.parse_union_variant(doc) {
        Some(variant) => variants.push(variant),
        None => {
          self.recover_body();
          continue;
        }
      }
      self.require_separator("variant");
    }
    Some(TypeExpr {
      span: kw.span.merge(close.span),
      kind: TypeKind::Union(variants),
    })
  }

  fn require_separator(&mut self, what: &str) {
    let tok = self.peek();
    match tok.kind {
      TokenKind::Comma | TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof => {}
      _ => {
        self.error_at(
          tok,
          format!(
            "expected `,` or newline after {}, found {}",
            what,
            tok.kind.describe()
          ),
        );
        self.recover_body();
      }
    }
  }

  // --- fields and variants ---

  fn parse_field(&mut self, doc: Option<&'a str>) -> Option<Field<'a>> {
    let rank_tok = self.peek();
    if rank_tok.kind != TokenKind::Integer {
      self.error_at(
        rank_tok,
        format!("expected field rank, found {}", rank_tok.kind.describe()),
      );
      return None;
    }
    self.bump();
    let rank = match self.text(rank_tok.span).parse::<u64>() {
      Ok(n) => n,
      Err(_) => {
        self.error_at(rank_tok, "field rank does not fit in 64 bits".to_string());
        return None;
      }
    };
    let name_tok = self.peek();
    match name_tok.kind {
      TokenKind::Ident | TokenKind::TypeIdent | TokenKind::Integer => {
        self.bump();
      }
      _ => {
        self.error_at(
          name_tok,
          format!("expected field name, found {}", name_tok.kind.describe()),
        );
        return None;
      }
    }
    self.expect(TokenKind::Colon)?;
    let ty = self.parse_type_expr()?;
    let span = rank_tok.span.merge(ty.span);
    Some(Field {
      doc,
      rank,
      name: self.text(name_tok.span),
      ty,
      span,
      name_span: name_tok.span,
    })
  }

  fn parse_enum_variant(&mut self, doc: Option<&'a str>) -> Option<EnumVariant<'a>> {
    let (tag, tag_tok) = self.parse_variant_tag()?;
    let name_tok = self.parse_variant_name()?;
    Some(EnumVariant {
      doc,
      tag,
      name: self.text(name_tok.span),
      span: tag_tok.span.merge(name_tok.span),
    })
  }

  fn parse_union_variant(&mut self, doc: Option<&'a str>) -> Option<UnionVariant<'a>> {
    let (tag, tag_tok) = self.parse_variant_tag()?;
    let name_tok = self.parse_variant_name()?;
    let payload = if self.eat(TokenKind::Colon).is_some() {
      Some(self.parse_type_expr()?)
    } else {
      None
    };
    let end = payload
      .as_ref()
      .map(|p| p.span)
      .unwrap_or(name_tok.span);
    Some(UnionVariant {
      doc,
      tag,
      name: self.text(name_tok.span),
      payload,
      span: tag_tok.span.merge(end),
    })
  }

  fn parse_variant_tag(&mut self) -> Option<(u64, Token)> {
    let tok = self.peek();
    if tok.kind != TokenKind::Integer {
      self.error_at(
        tok,
        format!("expected variant tag, found {}", tok.kind.describe()),
      );
      return None;
    }
    self.bump();
    match self.text(tok.span).parse::<u64>() {
      Ok(n) => Some((n, tok)),
      Err(_) => {
        self.error_at(tok, "variant tag does not fit in 64 bits".to_string());
        None
      }
    }
  }

  fn parse_variant_name(&mut self) -> Option<Token> {
    let tok = self.peek();
    match tok.kind {
      TokenKind::Ident | TokenKind::TypeIdent => Some(self.bump()),
      _ => {
        self.error_at(
          tok,
          format!("expected variant name, found {}", tok.kind.describe()),
        );
        None
      }
    }
  }
}

fn primitive_kind(kind: TokenKind) -> Option<TypeKind<'static>> {
  match kind {
    TokenKind::KwBool => Some(TypeKind::Bool),
    TokenKind::KwString => Some(TypeKind::String),
    TokenKind::KwU8 => Some(TypeKind::Int(IntKind::U8)),
    TokenKind::KwU16 => Some(TypeKind::Int(IntKind::U16)),
    TokenKind::KwU32 => Some(TypeKind::Int(IntKind::U32)),
    TokenKind::KwU64 => Some(TypeKind::Int(IntKind::U64)),
    TokenKind::KwI8 => Some(TypeKind::Int(IntKind::I8)),
    TokenKind::KwI16 => Some(TypeKind::Int(IntKind::I16)),
    TokenKind::KwI32 => Some(TypeKind::Int(IntKind::I32)),
    TokenKind::KwI64 => Some(TypeKind::Int(IntKind::I64)),
    TokenKind::KwUvarint => Some(TypeKind::Int(IntKind::Uvarint)),
    TokenKind::KwIvarint => Some(TypeKind::Int(IntKind::Ivarint)),
    TokenKind::KwF16 => Some(TypeKind::Float(FloatKind::F16)),
    TokenKind::KwF32 => Some(TypeKind::Float(FloatKind::F32)),
    TokenKind::KwF64 => Some(TypeKind::Float(FloatKind::F64)),
    _ => None,
  }
}
