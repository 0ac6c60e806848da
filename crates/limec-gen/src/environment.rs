//! The symbol environment: a parent-linked chain of scopes.
//!
//! Each scope owns a `name -> (storage, type)` map. Lookup checks the
//! local map first, then walks outward through `parent`. There is no
//! arena and no reference cycle: a child scope's lifetime nests strictly
//! inside its parent's, so an owned `Box<Environment<'ctx>>` parent
//! pointer is enough.

use std::collections::HashMap;

use inkwell::values::{FunctionValue, PointerValue};

/// What a name resolves to: a stack slot holding a value, or a function
/// (bound so a function can call itself, and so callers can find it).
#[derive(Clone)]
pub enum Storage<'ctx> {
    Slot(PointerValue<'ctx>),
    Function(FunctionValue<'ctx>),
}

#[derive(Clone)]
pub struct Binding<'ctx> {
    pub storage: Storage<'ctx>,
    pub ty: String,
}

pub struct Environment<'ctx> {
    records: HashMap<String, Binding<'ctx>>,
    parent: Option<Box<Environment<'ctx>>>,
    name: String,
}

impl<'ctx> Environment<'ctx> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            records: HashMap::new(),
            parent: None,
            name: name.into(),
        }
    }

    pub fn child(parent: Environment<'ctx>, name: impl Into<String>) -> Self {
        Self {
            records: HashMap::new(),
            parent: Some(Box::new(parent)),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overwrites any existing local binding for `name`.
    pub fn define(&mut self, name: impl Into<String>, storage: Storage<'ctx>, ty: impl Into<String>) {
        self.records.insert(
            name.into(),
            Binding {
                storage,
                ty: ty.into(),
            },
        );
    }

    pub fn define_slot(&mut self, name: impl Into<String>, slot: PointerValue<'ctx>, ty: impl Into<String>) {
        self.define(name, Storage::Slot(slot), ty);
    }

    pub fn define_function(&mut self, name: impl Into<String>, function: FunctionValue<'ctx>, return_type: impl Into<String>) {
        self.define(name, Storage::Function(function), return_type);
    }

    pub fn lookup(&self, name: &str) -> Option<Binding<'ctx>> {
        if let Some(binding) = self.records.get(name) {
            return Some(binding.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }

    /// Consumes this scope and returns its parent, discarding the local
    /// bindings. Used when lowering finishes a block and the builder
    /// should fall back to the enclosing scope.
    pub fn into_parent(self) -> Option<Environment<'ctx>> {
        self.parent.map(|boxed| *boxed)
    }
}
