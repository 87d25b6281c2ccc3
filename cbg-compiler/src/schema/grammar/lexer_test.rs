use super::lexer::{doc_comment_text, string_text, Lexer, Token, TokenKind};
use crate::schema::diagnostics::Diagnostics;

fn lex(source: &str) -> (Vec<Token>, Diagnostics) {
  let mut diagnostics = Diagnostics::new();
  let mut lexer = Lexer::new(source);
  let mut tokens = Vec::new();
  loop {
    let tok = lexer.next(&mut diagnostics);
    let done = tok.kind == TokenKind::Eof;
    tokens.push(tok);
    if done {
      break;
    }
  }
  (tokens, diagnostics)
}

fn kinds(source: &str) -> Vec<TokenKind> {
  lex(source).0.iter().map(|t| t.kind).collect()
}

#[test]
fn test_simple_def() {
  assert_eq!(
    kinds("Point = u32"),
    vec![
      TokenKind::TypeIdent,
      TokenKind::Eq,
      TokenKind::KwU32,
      TokenKind::Eof
    ]
  );
}

#[test]
fn test_keywords_and_identifiers() {
  assert_eq!(
    kinds("bool string u8 uvarint f64 struct enum union"),
    vec![
      TokenKind::KwBool,
      TokenKind::KwString,
      TokenKind::KwU8,
      TokenKind::KwUvarint,
      TokenKind::KwF64,
      TokenKind::KwStruct,
      TokenKind::KwEnum,
      TokenKind::KwUnion,
      TokenKind::Eof
    ]
  );
  assert_eq!(
    kinds("boolean _x U32 u128"),
    vec![
      TokenKind::Ident,
      TokenKind::Ident,
      TokenKind::TypeIdent,
      TokenKind::Ident,
      TokenKind::Eof
    ]
  );
}

#[test]
fn test_symbols() {
  assert_eq!(
    kinds("= : @ . ? [ ] { } ( ) ,"),
    vec![
      TokenKind::Eq,
      TokenKind::Colon,
      TokenKind::At,
      TokenKind::Dot,
      TokenKind::Question,
      TokenKind::LBracket,
      TokenKind::RBracket,
      TokenKind::LBrace,
      TokenKind::RBrace,
      TokenKind::LParen,
      TokenKind::RParen,
      TokenKind::Comma,
      TokenKind::Eof
    ]
  );
}

#[test]
fn test_newline_collapsing() {
  assert_eq!(
    kinds("a\nb"),
    vec![
      TokenKind::Ident,
      TokenKind::Newline,
      TokenKind::Ident,
      TokenKind::Eof
    ]
  );
  // runs of newlines with interleaved horizontal whitespace are one token
  assert_eq!(
    kinds("a\n \t\r\n\n  b"),
    vec![
      TokenKind::Ident,
      TokenKind::Newline,
      TokenKind::Ident,
      TokenKind::Eof
    ]
  );
  assert_eq!(
    kinds("a\r\nb"),
    vec![
      TokenKind::Ident,
      TokenKind::Newline,
      TokenKind::Ident,
      TokenKind::Eof
    ]
  );
}

#[test]
fn test_line_comment() {
  assert_eq!(
    kinds("a // ignored\nb"),
    vec![
      TokenKind::Ident,
      TokenKind::Newline,
      TokenKind::Ident,
      TokenKind::Eof
    ]
  );
  let (_, diagnostics) = lex("a // to the end");
  assert!(!diagnostics.has_errors());
}

#[test]
fn test_doc_comment() {
  let source = "/// hello doc\nX = u32";
  let (tokens, diagnostics) = lex(source);
  assert!(!diagnostics.has_errors());
  assert_eq!(tokens[0].kind, TokenKind::DocComment);
  assert_eq!(tokens[0].span.slice(source), "/// hello doc");
  assert_eq!(doc_comment_text(tokens[0].span, source), "hello doc");
  assert_eq!(tokens[1].kind, TokenKind::Newline);
}

#[test]
fn test_doc_comment_prefix_stripping() {
  let source = "///no space\n///  two spaces";
  let (tokens, _) = lex(source);
  assert_eq!(doc_comment_text(tokens[0].span, source), "no space");
  // only a single leading space is stripped
  assert_eq!(doc_comment_text(tokens[2].span, source), " two spaces");
}

#[test]
fn test_integer_literal() {
  let source = "0 18446744073709551615 99999999999999999999";
  let (tokens, _) = lex(source);
  assert_eq!(tokens[0].kind, TokenKind::Integer);
  assert_eq!(tokens[1].kind, TokenKind::Integer);
  // overflow is the parser's problem, not the lexer's
  assert_eq!(tokens[2].kind, TokenKind::Integer);
  assert_eq!(tokens[1].span.slice(source), "18446744073709551615");
}

#[test]
fn test_string_literal() {
  let source = r#"n = @import("pkg/common.cbs")"#;
  let (tokens, diagnostics) = lex(source);
  assert!(!diagnostics.has_errors());
  let tok = tokens.iter().find(|t| t.kind == TokenKind::Str).unwrap();
  assert_eq!(string_text(tok.span, source), "pkg/common.cbs");
}

#[test]
fn test_string_with_escapes() {
  let source = r#""a\"b""#;
  let (tokens, diagnostics) = lex(source);
  assert!(!diagnostics.has_errors());
  assert_eq!(tokens[0].kind, TokenKind::Str);
  assert_eq!(tokens[0].span.slice(source), source);
}

#[test]
fn test_unterminated_string() {
  let (tokens, diagnostics) = lex("\"abc");
  assert_eq!(tokens[0].kind, TokenKind::Str);
  assert_eq!(diagnostics.error_count(), 1);
  assert_eq!(diagnostics.items()[0].message, "unterminated string literal");
}

#[test]
fn test_newline_in_string() {
  let (tokens, diagnostics) = lex("\"abc\ndef");
  assert_eq!(tokens[0].kind, TokenKind::Str);
  assert_eq!(tokens[1].kind, TokenKind::Newline);
  assert_eq!(tokens[2].kind, TokenKind::Ident);
  assert_eq!(diagnostics.error_count(), 1);
  assert_eq!(diagnostics.items()[0].message, "newline in string literal");
}

#[test]
fn test_invalid_characters() {
  let (tokens, diagnostics) = lex("a $ b");
  assert_eq!(tokens[1].kind, TokenKind::Invalid);
  assert_eq!(diagnostics.error_count(), 1);

  // an isolated slash is not a comment
  let (tokens, diagnostics) = lex("a / b");
  assert_eq!(tokens[1].kind, TokenKind::Invalid);
  assert_eq!(diagnostics.error_count(), 1);
}

#[test]
fn test_deterministic() {
  let source = "A = struct { 0 x: u32, 1 y: ?string }\nb = @import(\"b.cbs\")";
  let first = lex(source).0;
  let second = lex(source).0;
  assert_eq!(first, second);
}
