use crate::schema::diagnostics::{Diagnostics, Severity};
use crate::schema::span::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
  Integer,
  Str,
  Ident,
  TypeIdent,
  KwBool,
  KwString,
  KwU8,
  KwU16,
  KwU32,
  KwU64,
  KwI8,
  KwI16,
  KwI32,
  KwI64,
  KwUvarint,
  KwIvarint,
  KwF16,
  KwF32,
  KwF64,
  KwStruct,
  KwEnum,
  KwUnion,
  Eq,
  Colon,
  At,
  Dot,
  Question,
  LBracket,
  RBracket,
  LBrace,
  RBrace,
  LParen,
  RParen,
  Comma,
  Newline,
  DocComment,
  Eof,
  Invalid,
}

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
  "bool" => TokenKind::KwBool,
  "string" => TokenKind::KwString,
  "u8" => TokenKind::KwU8,
  "u16" => TokenKind::KwU16,
  "u32" => TokenKind::KwU32,
  "u64" => TokenKind::KwU64,
  "i8" => TokenKind::KwI8,
  "i16" => TokenKind::KwI16,
  "i32" => TokenKind::KwI32,
  "i64" => TokenKind::KwI64,
  "uvarint" => TokenKind::KwUvarint,
  "ivarint" => TokenKind::KwIvarint,
  "f16" => TokenKind::KwF16,
  "f32" => TokenKind::KwF32,
  "f64" => TokenKind::KwF64,
  "struct" => TokenKind::KwStruct,
  "enum" => TokenKind::KwEnum,
  "union" => TokenKind::KwUnion,
};

impl TokenKind {
  /// Short tag used by the token-dump output.
  pub fn name(self) -> &'static str {
    match self {
      TokenKind::Integer => "integer",
      TokenKind::Str => "string",
      TokenKind::Ident => "ident",
      TokenKind::TypeIdent => "type_ident",
      TokenKind::KwBool => "bool",
      TokenKind::KwString => "string_kw",
      TokenKind::KwU8 => "u8",
      TokenKind::KwU16 => "u16",
      TokenKind::KwU32 => "u32",
      TokenKind::KwU64 => "u64",
      TokenKind::KwI8 => "i8",
      TokenKind::KwI16 => "i16",
      TokenKind::KwI32 => "i32",
      TokenKind::KwI64 => "i64",
      TokenKind::KwUvarint => "uvarint",
      TokenKind::KwIvarint => "ivarint",
      TokenKind::KwF16 => "f16",
      TokenKind::KwF32 => "f32",
      TokenKind::KwF64 => "f64",
      TokenKind::KwStruct => "struct",
      TokenKind::KwEnum => "enum",
      TokenKind::KwUnion => "union",
      TokenKind::Eq => "eq",
      TokenKind::Colon => "colon",
      TokenKind::At => "at",
      TokenKind::Dot => "dot",
      TokenKind::Question => "question",
      TokenKind::LBracket => "lbracket",
      TokenKind::RBracket => "rbracket",
      TokenKind::LBrace => "lbrace",
      TokenKind::RBrace => "rbrace",
      TokenKind::LParen => "lparen",
      TokenKind::RParen => "rparen",
      TokenKind::Comma => "comma",
      TokenKind::Newline => "newline",
      TokenKind::DocComment => "doc_comment",
      TokenKind::Eof => "eof",
      TokenKind::Invalid => "invalid",
    }
  }

  /// Human description for diagnostics.
  pub fn describe(self) -> &'static str {
    match self {
      TokenKind::Integer => "integer literal",
      TokenKind::Str => "string literal",
      TokenKind::Ident => "identifier",
      TokenKind::TypeIdent => "type identifier",
      TokenKind::KwBool => "`bool`",
      TokenKind::KwString => "`string`",
      TokenKind::KwU8 => "`u8`",
      TokenKind::KwU16 => "`u16`",
      TokenKind::KwU32 => "`u32`",
      TokenKind::KwU64 => "`u64`",
      TokenKind::KwI8 => "`i8`",
      TokenKind::KwI16 => "`i16`",
      TokenKind::KwI32 => "`i32`",
      TokenKind::KwI64 => "`i64`",
      TokenKind::KwUvarint => "`uvarint`",
      TokenKind::KwIvarint => "`ivarint`",
      TokenKind::KwF16 => "`f16`",
      TokenKind::KwF32 => "`f32`",
      TokenKind::KwF64 => "`f64`",
      TokenKind::KwStruct => "`struct`",
      TokenKind::KwEnum => "`enum`",
      TokenKind::KwUnion => "`union`",
      TokenKind::Eq => "`=`",
      TokenKind::Colon => "`:`",
      TokenKind::At => "`@`",
      TokenKind::Dot => "`.`",
      TokenKind::Question => "`?`",
      TokenKind::LBracket => "`[`",
      TokenKind::RBracket => "`]`",
      TokenKind::LBrace => "`{`",
      TokenKind::RBrace => "`}`",
      TokenKind::LParen => "`(`",
      TokenKind::RParen => "`)`",
      TokenKind::Comma => "`,`",
      TokenKind::Newline => "newline",
      TokenKind::DocComment => "doc comment",
      TokenKind::Eof => "end of file",
      TokenKind::Invalid => "invalid token",
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub span: Span,
}

/// Demand-driven tokenizer over a source buffer.
///
/// The lexer itself never allocates; token spans index the source and
/// error messages go through the shared diagnostics accumulator.
pub struct Lexer<'a> {
  source: &'a str,
  pos: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(source: &'a str) -> Self {
    Lexer { source, pos: 0 }
  }

  pub fn source(&self) -> &'a str {
    self.source
  }

  pub fn next(&mut self, diagnostics: &mut Diagnostics) -> Token {
    let bytes = self.source.as_bytes();
    loop {
      match bytes.get(self.pos) {
        None => {
          return self.token(TokenKind::Eof, self.pos);
        }
        Some(b' ') | Some(b'\t') => {
          self.pos += 1;
        }
        Some(b'\n') | Some(b'\r') => {
          return self.lex_newline();
        }
        Some(b'/') => {
          if self.source[self.pos..].starts_with("///") {
            return self.lex_doc_comment();
          }
          if self.source[self.pos..].starts_with("//") {
            while let Some(&b) = bytes.get(self.pos) {
              if b == b'\n' || b == b'\r' {
                break;
              }
              self.pos += 1;
            }
          } else {
            let start = self.pos;
            self.pos += 1;
            diagnostics.emit(
              Severity::Error,
              Span::new(start, self.pos),
              "unexpected character `/`",
            );
            return self.token(TokenKind::Invalid, start);
          }
        }
        Some(&b) if b == b'_' || b.is_ascii_alphabetic() => {
          return self.lex_word();
        }
        Some(&b) if b.is_ascii_digit() => {
          return self.lex_integer();
        }
        Some(b'"') => {
          return self.lex_string(diagnostics);
        }
        Some(&b) => {
          if let Some(kind) = symbol_kind(b) {
            let start = self.pos;
            self.pos += 1;
            return self.token(kind, start);
          }
          let start = self.pos;
          let ch = self.source[start..].chars().next().unwrap();
          self.pos += ch.len_utf8();
          diagnostics.emit(
            Severity::Error,
            Span::new(start, self.pos),
            format!("unexpected character `{}`", ch),
          );
          return self.token(TokenKind::Invalid, start);
        }
      }
    }
  }

  // One token per run of newlines, horizontal whitespace included.
  fn lex_newline(&mut self) -> Token {
    let bytes = self.source.as_bytes();
    let start = self.pos;
    if bytes[self.pos] == b'\r' && bytes.get(self.pos + 1) == Some(&b'\n') {
      self.pos += 2;
    } else {
      self.pos += 1;
    }
    let mut end = self.pos;
    while let Some(&b) = bytes.get(self.pos) {
      match b {
        b' ' | b'\t' => {
          self.pos += 1;
        }
        b'\n' | b'\r' => {
          self.pos += 1;
          end = self.pos;
        }
        _ => break,
      }
    }
    Token {
      kind: TokenKind::Newline,
      span: Span::new(start, end),
    }
  }

  fn lex_doc_comment(&mut self) -> Token {
    let bytes = self.source.as_bytes();
    let start = self.pos;
    while let Some(&b) = bytes.get(self.pos) {
      if b == b'\n' || b == b'\r' {
        break;
      }
      self.pos += 1;
    }
    self.token(TokenKind::DocComment, start)
  }

  fn lex_word(&mut self) -> Token {
    let bytes = self.source.as_bytes();
    let start = self.pos;
    while let Some(&b) = bytes.get(self.pos) {
      if b == b'_' || b.is_ascii_alphanumeric() {
        self.pos += 1;
      } else {
        break;
      }
    }
    let text = &self.source[start..self.pos];
    let kind = match KEYWORDS.get(text) {
      Some(&kw) => kw,
      None => {
        if bytes[start].is_ascii_uppercase() {
          TokenKind::TypeIdent
        } else {
          TokenKind::Ident
        }
      }
    };
    self.token(kind, start)
  }

  fn lex_integer(&mut self) -> Token {
    let bytes = self.source.as_bytes();
    let start = self.pos;
    while let Some(&b) = bytes.get(self.pos) {
      if b.is_ascii_digit() {
        self.pos += 1;
      } else {
        break;
      }
    }
    self.token(TokenKind::Integer, start)
  }

  fn lex_string(&mut self, diagnostics: &mut Diagnostics) -> Token {
    let bytes = self.source.as_bytes();
    let start = self.pos;
    self.pos += 1;
    loop {
      match bytes.get(self.pos) {
        None => {
          diagnostics.emit(
            Severity::Error,
            Span::new(start, self.pos),
            "unterminated string literal",
          );
          return self.token(TokenKind::Str, start);
        }
        Some(b'\\') => {
          self.pos += 1;
          if bytes.get(self.pos).is_some() {
            self.pos += 1;
          }
        }
        Some(b'"') => {
          self.pos += 1;
          return self.token(TokenKind::Str, start);
        }
        Some(b'\n') | Some(b'\r') => {
          diagnostics.emit(
            Severity::Error,
            Span::new(start, self.pos),
            "newline in string literal",
          );
          return self.token(TokenKind::Str, start);
        }
        Some(_) => {
          self.pos += 1;
        }
      }
    }
  }

  fn token(&self, kind: TokenKind, start: usize) -> Token {
    Token {
      kind,
      span: Span::new(start, self.pos),
    }
  }
}

fn symbol_kind(b: u8) -> Option<TokenKind> {
  match b {
    b'=' => Some(TokenKind::Eq),
    b':' => Some(TokenKind::Colon),
    b'@' => Some(TokenKind::At),
    b'.' => Some(TokenKind::Dot),
    b'?' => Some(TokenKind::Question),
    b'[' => Some(TokenKind::LBracket),
    b']' => Some(TokenKind::RBracket),
    b'{' => Some(TokenKind::LBrace),
    b'}' => Some(TokenKind::RBrace),
    b'(' => Some(TokenKind::LParen),
    b')' => Some(TokenKind::RParen),
    b',' => Some(TokenKind::Comma),
    _ => None,
  }
}

/// Content of a doc-comment token: the `///` prefix and one optional
/// leading space stripped.
pub fn doc_comment_text<'a>(span: Span, source: &'a str) -> &'a str {
  let text = span.slice(source);
  let text = text.strip_prefix("///").unwrap_or(text);
  text.strip_prefix(' ').unwrap_or(text)
}

/// Content of a string-literal token: the surrounding quotes stripped,
/// escapes left as written (import paths are byte-literal).
pub fn string_text<'a>(span: Span, source: &'a str) -> &'a str {
  let text = span.slice(source);
  let text = text.strip_prefix('"').unwrap_or(text);
  text.strip_suffix('"').unwrap_or(text)
}
