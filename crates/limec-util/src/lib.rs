//! Core types shared across the compiler pipeline: source spans and the
//! diagnostic collection used by the lexer and parser.

mod diagnostic;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Level};
pub use span::Span;
