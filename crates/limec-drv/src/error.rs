//! The driver's own error kind: infrastructure failures that are not
//! properties of the source program (a missing file, a broken LLVM
//! module, a JIT that can't find `main`). Parse and compile errors are
//! reported separately, as the string lists the parser/generator build
//! up themselves — by the time one of those is non-empty, the driver
//! just prints the messages and maps to `ParseFailed`/`CompileFailed`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to read '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing failed with {0} error(s)")]
    ParseFailed(usize),

    #[error("code generation failed with {0} error(s)")]
    CompileFailed(usize),

    #[error("module verification failed: {message}")]
    VerificationFailed { message: String },

    #[error("execution failed: {message}")]
    ExecutionFailed { message: String },
}
