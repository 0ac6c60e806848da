//! Mapping from source type names to LLVM IR types.

use inkwell::context::Context;
use inkwell::types::BasicTypeEnum;
use inkwell::AddressSpace;

use crate::error::{CodeGenError, Result};

pub struct TypeMapper<'ctx> {
    context: &'ctx Context,
}

impl<'ctx> TypeMapper<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context }
    }

    /// `int` -> i32, `float` -> f32, `bool` -> i1, `str` -> i8*.
    /// `void` has no `BasicTypeEnum` representation; callers that need to
    /// allow `void` (function return types) should check for it before
    /// calling this.
    pub fn basic_type(&self, name: &str) -> Result<BasicTypeEnum<'ctx>> {
        match name {
            "int" => Ok(self.context.i32_type().into()),
            "float" => Ok(self.context.f32_type().into()),
            "bool" => Ok(self.context.bool_type().into()),
            "str" => Ok(self.context.ptr_type(AddressSpace::default()).into()),
            other => Err(CodeGenError::UnknownType(other.to_string())),
        }
    }

    pub fn is_void(name: &str) -> bool {
        name == "void"
    }
}
