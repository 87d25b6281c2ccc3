use std::io::{self, Write};

use console::Style;

use crate::schema::span::{LineIndex, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
  Error,
  Warning,
  Note,
}

impl Severity {
  pub fn label(self) -> &'static str {
    match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
      Severity::Note => "note",
    }
  }
}

#[derive(Debug)]
pub struct Note {
  pub span: Option<Span>,
  pub message: String,
}

#[derive(Debug)]
pub struct Diagnostic {
  pub severity: Severity,
  pub span: Span,
  pub message: String,
  pub notes: Vec<Note>,
}

/// Ordered accumulator of diagnostics.
///
/// Messages are owned strings on the global allocator, so a `Diagnostics`
/// may outlive the arena of the parse that produced it.
#[derive(Debug, Default)]
pub struct Diagnostics {
  items: Vec<Diagnostic>,
  errors: usize,
}

impl Diagnostics {
  pub fn new() -> Self {
    Default::default()
  }

  pub fn emit(&mut self, severity: Severity, span: Span, message: impl Into<String>) {
    if severity == Severity::Error {
      self.errors += 1;
    }
    self.items.push(Diagnostic {
      severity,
      span,
      message: message.into(),
      notes: Vec::new(),
    });
  }

  pub fn emit_with_note(
    &mut self,
    severity: Severity,
    span: Span,
    message: impl Into<String>,
    note_span: Option<Span>,
    note_message: impl Into<String>,
  ) {
    self.emit(severity, span, message);
    self.items.last_mut().unwrap().notes.push(Note {
      span: note_span,
      message: note_message.into(),
    });
  }

  pub fn has_errors(&self) -> bool {
    self.errors > 0
  }

  pub fn error_count(&self) -> usize {
    self.errors
  }

  pub fn items(&self) -> &[Diagnostic] {
    &self.items
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }
}

struct Palette {
  error: Style,
  warning: Style,
  note: Style,
  gutter: Style,
  help: Style,
  enabled: bool,
}

impl Palette {
  fn new(enabled: bool) -> Self {
    Palette {
      error: Style::new().red().bold().force_styling(true),
      warning: Style::new().yellow().bold().force_styling(true),
      note: Style::new().bold().force_styling(true),
      gutter: Style::new().blue().force_styling(true),
      help: Style::new().cyan().force_styling(true),
      enabled,
    }
  }

  fn paint(&self, style: &Style, text: &str) -> String {
    if self.enabled {
      style.apply_to(text).to_string()
    } else {
      text.to_string()
    }
  }

  fn severity(&self, severity: Severity) -> &Style {
    match severity {
      Severity::Error => &self.error,
      Severity::Warning => &self.warning,
      Severity::Note => &self.note,
    }
  }
}

/// Renders accumulated diagnostics with source snippets and caret
/// underlines. With `use_color` off the byte layout is identical minus the
/// escape sequences.
pub fn render_diagnostics(
  w: &mut dyn Write,
  source: &str,
  filename: &str,
  diagnostics: &Diagnostics,
  use_color: bool,
) -> io::Result<()> {
  let index = LineIndex::new(source);
  let palette = Palette::new(use_color);
  for diagnostic in diagnostics.items() {
    render_one(w, source, filename, &index, &palette, diagnostic)?;
  }
  Ok(())
}

fn render_one(
  w: &mut dyn Write,
  source: &str,
  filename: &str,
  index: &LineIndex,
  palette: &Palette,
  diagnostic: &Diagnostic,
) -> io::Result<()> {
  let (line, col) = index.resolve(diagnostic.span.start);
  let (text, _) = index.line_text(diagnostic.span.start, source);
  let line_start = index.line_start(diagnostic.span.start);

  let head = format!("{}:", diagnostic.severity.label());
  writeln!(
    w,
    "{} {}",
    palette.paint(palette.severity(diagnostic.severity), &head),
    diagnostic.message
  )?;

  let digits = line.to_string().len();
  let arrow_pad = " ".repeat(digits + 1);
  let gutter_pad = " ".repeat(digits + 2);

  writeln!(
    w,
    "{}{} {}:{}:{}",
    arrow_pad,
    palette.paint(&palette.gutter, "-->"),
    filename,
    line,
    col
  )?;
  writeln!(w, "{}{}", gutter_pad, palette.paint(&palette.gutter, "|"))?;
  writeln!(
    w,
    " {} {} {}",
    palette.paint(&palette.gutter, &line.to_string()),
    palette.paint(&palette.gutter, "|"),
    text
  )?;

  let line_end = line_start + text.len();
  let underline_len = diagnostic
    .span
    .end
    .min(line_end)
    .saturating_sub(diagnostic.span.start)
    .max(1);
  writeln!(
    w,
    "{}{} {}{}",
    gutter_pad,
    palette.paint(&palette.gutter, "|"),
    " ".repeat(col - 1),
    palette.paint(palette.severity(diagnostic.severity), &"^".repeat(underline_len))
  )?;

  for note in &diagnostic.notes {
    writeln!(
      w,
      "{}{} {} {}",
      gutter_pad,
      palette.paint(&palette.gutter, "="),
      palette.paint(&palette.help, "help:"),
      note.message
    )?;
  }
  writeln!(w)?;
  Ok(())
}
