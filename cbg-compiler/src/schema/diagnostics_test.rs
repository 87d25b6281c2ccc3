use super::diagnostics::{render_diagnostics, Diagnostics, Severity};
use super::span::Span;

#[test]
fn test_accumulation() {
  let mut diagnostics = Diagnostics::new();
  assert!(!diagnostics.has_errors());
  diagnostics.emit(Severity::Warning, Span::new(0, 1), "w");
  assert!(!diagnostics.has_errors());
  diagnostics.emit(Severity::Error, Span::new(1, 2), "e1");
  diagnostics.emit(Severity::Error, Span::new(2, 3), "e2");
  assert!(diagnostics.has_errors());
  assert_eq!(diagnostics.error_count(), 2);
  assert_eq!(diagnostics.len(), 3);
  assert_eq!(diagnostics.items()[1].message, "e1");
}

#[test]
fn test_render_layout() {
  let source = "A = u32\nB ? bool\n";
  let mut diagnostics = Diagnostics::new();
  diagnostics.emit(Severity::Error, Span::new(10, 11), "unexpected character `?`");

  let mut out = Vec::new();
  render_diagnostics(&mut out, source, "test.cbs", &diagnostics, false).unwrap();
  let text = String::from_utf8(out).unwrap();
  assert_eq!(
    text,
    "error: unexpected character `?`\n\
     \x20 --> test.cbs:2:3\n\
     \x20  |\n\
     \x202 | B ? bool\n\
     \x20  |   ^\n\
     \n"
  );
}

#[test]
fn test_render_with_note() {
  let source = "A = u32";
  let mut diagnostics = Diagnostics::new();
  diagnostics.emit_with_note(
    Severity::Warning,
    Span::new(0, 1),
    "shadowed definition",
    None,
    "rename one of them",
  );

  let mut out = Vec::new();
  render_diagnostics(&mut out, source, "s.cbs", &diagnostics, false).unwrap();
  let text = String::from_utf8(out).unwrap();
  assert_eq!(
    text,
    "warning: shadowed definition\n\
     \x20 --> s.cbs:1:1\n\
     \x20  |\n\
     \x201 | A = u32\n\
     \x20  | ^\n\
     \x20  = help: rename one of them\n\
     \n"
  );
}

#[test]
fn test_underline_covers_span_within_line() {
  let source = "Thing = nonsense";
  let mut diagnostics = Diagnostics::new();
  diagnostics.emit(Severity::Error, Span::new(8, 16), "unknown type");

  let mut out = Vec::new();
  render_diagnostics(&mut out, source, "s.cbs", &diagnostics, false).unwrap();
  let text = String::from_utf8(out).unwrap();
  assert!(text.contains(" 1 | Thing = nonsense\n"));
  assert!(text.contains("   |         ^^^^^^^^\n"));
}

#[test]
fn test_color_only_adds_escapes() {
  let source = "A = u32\nB ? bool\n";
  let mut diagnostics = Diagnostics::new();
  diagnostics.emit_with_note(
    Severity::Error,
    Span::new(10, 11),
    "unexpected character `?`",
    None,
    "remove it",
  );

  let mut plain = Vec::new();
  render_diagnostics(&mut plain, source, "test.cbs", &diagnostics, false).unwrap();
  let mut colored = Vec::new();
  render_diagnostics(&mut colored, source, "test.cbs", &diagnostics, true).unwrap();

  let plain = String::from_utf8(plain).unwrap();
  let colored = String::from_utf8(colored).unwrap();
  assert_ne!(plain, colored);
  assert_eq!(console::strip_ansi_codes(&colored), plain.as_str());
}
