//! Diagnostic collection for lexer and parser errors.
//!
//! Unlike a full diagnostic engine with error codes and source snippets,
//! this crate's diagnostics stay close to what the rest of the pipeline
//! actually needs: a severity, a message, and the [`Span`] it came from.
//! The compiler driver flattens these into the plain string lists its
//! error-reporting contract expects.

use std::fmt;

use crate::Span;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A single diagnostic message.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.line > 0 {
            write!(
                f,
                "{}: {} (line {}, column {})",
                self.level, self.message, self.span.line, self.span.column
            )
        } else {
            write!(f, "{}: {}", self.level, self.message)
        }
    }
}

/// Builder for a single diagnostic, emitted into a [`Handler`] once complete.
pub struct DiagnosticBuilder {
    level: Level,
    message: String,
    span: Span,
}

impl DiagnosticBuilder {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            span: Span::DUMMY,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            message: self.message,
            span: self.span,
        }
    }

    pub fn emit(self, handler: &mut Handler) {
        handler.push(self.build());
    }
}

/// Accumulates diagnostics for a single compilation pass.
///
/// The lexer and parser each own a `Handler` and never abort on their
/// own; they keep producing tokens or AST nodes and simply record what
/// went wrong, leaving the decision to stop to the caller.
#[derive(Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.push(Diagnostic {
            level: Level::Error,
            message: message.into(),
            span,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == Level::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Flattens collected diagnostics into plain messages, the shape the
    /// driver reports to callers and prints on a failed compile.
    pub fn into_messages(self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn has_errors_tracks_pushed_error_levels(is_errors: Vec<bool>) -> bool {
        let mut handler = Handler::new();
        for is_error in &is_errors {
            if *is_error {
                DiagnosticBuilder::error("boom").emit(&mut handler);
            } else {
                DiagnosticBuilder::warning("careful").emit(&mut handler);
            }
        }
        handler.has_errors() == is_errors.iter().any(|e| *e)
    }

    #[quickcheck]
    fn into_messages_preserves_diagnostic_count(count: u8) -> bool {
        let mut handler = Handler::new();
        for _ in 0..count {
            DiagnosticBuilder::error("boom").emit(&mut handler);
        }
        handler.into_messages().len() == count as usize
    }
}
