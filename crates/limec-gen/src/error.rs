//! Internal error type for code generation.
//!
//! Most of the generator's own failure modes (unknown identifier, bad
//! compound operator, missing import) are not propagated as `Result`s at
//! all — they are pushed onto the generator's `errors: Vec<String>`
//! list, formatted inline, and lowering continues. `CodeGenError` exists
//! for the handful of invariant violations that read better as a named,
//! reusable variant than a one-off format string.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("unknown type name '{0}'")]
    UnknownType(String),

    #[error("'break' used outside of a loop")]
    BreakOutsideLoop,

    #[error("'continue' used outside of a loop")]
    ContinueOutsideLoop,
}

pub type Result<T> = std::result::Result<T, CodeGenError>;
