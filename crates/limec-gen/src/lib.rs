//! Tree-walking code generator: lowers the parser's AST directly to LLVM
//! IR via `inkwell`, with no intermediate representation in between.

mod codegen;
mod environment;
mod error;
mod types;

pub use codegen::CodeGenerator;
pub use environment::{Binding, Environment, Storage};
pub use error::{CodeGenError, Result};
pub use types::TypeMapper;
