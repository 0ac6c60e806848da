//! Tree-walking lowering from the AST straight to LLVM IR.
//!
//! There is no intermediate representation between the parser's tree and
//! LLVM IR: each statement and expression is visited once, in program
//! order, and turned directly into builder calls. Errors encountered
//! while lowering (an unknown identifier, a `break` outside a loop, a
//! missing import) are pushed onto `errors` and lowering continues —
//! only a handful of truly internal operations return a `Result`.

use std::collections::HashSet;

use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::types::{BasicMetadataTypeEnum, BasicType};
use inkwell::values::{BasicValueEnum, FloatValue, FunctionValue, IntValue};
use inkwell::{AddressSpace, FloatPredicate, IntPredicate};

use limec_par::{AssignOp, Block as AstBlock, Expr, FunctionParameter, InfixOp, PostfixOp, PrefixOp, Program, Stmt};

use crate::environment::{Environment, Storage};
use crate::types::TypeMapper;

pub struct CodeGenerator<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
    types: TypeMapper<'ctx>,
    errors: Vec<String>,
    string_counter: usize,
    imported: HashSet<String>,
    break_targets: Vec<BasicBlock<'ctx>>,
    continue_targets: Vec<BasicBlock<'ctx>>,
}

impl<'ctx> CodeGenerator<'ctx> {
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        let module = context.create_module(module_name);
        let builder = context.create_builder();
        Self {
            context,
            module,
            builder,
            types: TypeMapper::new(context),
            errors: Vec::new(),
            string_counter: 0,
            imported: HashSet::new(),
            break_targets: Vec::new(),
            continue_targets: Vec::new(),
        }
    }

    pub fn generate(mut self, program: &Program) -> (Module<'ctx>, Vec<String>) {
        let mut root = self.declare_builtins();
        for stmt in program {
            self.lower_statement(stmt, &mut root);
        }
        (self.module, self.errors)
    }

    fn declare_builtins(&mut self) -> Environment<'ctx> {
        let i8_ptr = self.context.ptr_type(AddressSpace::default());
        let printf_type = self.context.i32_type().fn_type(&[i8_ptr.into()], true);
        self.module.add_function("printf", printf_type, Some(Linkage::External));

        let bool_ty = self.context.bool_type();
        let true_global = self.module.add_global(bool_ty, None, "true");
        true_global.set_linkage(Linkage::Internal);
        true_global.set_constant(true);
        true_global.set_initializer(&bool_ty.const_int(1, false));

        let false_global = self.module.add_global(bool_ty, None, "false");
        false_global.set_linkage(Linkage::Internal);
        false_global.set_constant(true);
        false_global.set_initializer(&bool_ty.const_int(0, false));

        Environment::new("global")
    }

    fn current_function(&mut self) -> Option<FunctionValue<'ctx>> {
        match self.builder.get_insert_block().and_then(|b| b.get_parent()) {
            Some(f) => Some(f),
            None => {
                self.errors.push("control flow construct outside any function".to_string());
                None
            }
        }
    }

    fn block_is_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|b| b.get_terminator())
            .is_some()
    }

    fn with_child_scope<F>(&mut self, env: &mut Environment<'ctx>, name: &str, f: F)
    where
        F: FnOnce(&mut Self, &mut Environment<'ctx>),
    {
        let taken = std::mem::replace(env, Environment::new("unused"));
        let mut child = Environment::child(taken, name);
        f(self, &mut child);
        *env = child.into_parent().expect("with_child_scope always creates a parent");
    }

    // --- statements ---------------------------------------------------

    fn lower_block(&mut self, block: &AstBlock, env: &mut Environment<'ctx>) {
        for stmt in block {
            self.lower_statement(stmt, env);
        }
    }

    fn lower_statement(&mut self, stmt: &Stmt, env: &mut Environment<'ctx>) {
        match stmt {
            Stmt::Expression(expr) => {
                self.lower_expression(expr, env);
            }
            Stmt::Let {
                name,
                declared_type,
                value,
            } => self.lower_let(name, declared_type, value, env),
            Stmt::Assign { name, op, value } => self.lower_assign(name, *op, value, env),
            Stmt::Function {
                name,
                params,
                return_type,
                body,
            } => self.lower_function(name, params, return_type, body, env),
            Stmt::Block(block) => self.lower_block(block, env),
            Stmt::Return(expr) => self.lower_return(expr, env),
            Stmt::While { condition, body } => self.lower_while(condition, body, env),
            Stmt::For {
                init,
                condition,
                step,
                body,
            } => self.lower_for(init, condition, step, body, env),
            Stmt::Break => self.lower_break(),
            Stmt::Continue => self.lower_continue(),
            Stmt::Import(name) => self.lower_import(name, env),
        }
    }

    /// The declared type is parsed but deliberately ignored here; the IR
    /// type comes from the initializer.
    fn lower_let(&mut self, name: &str, _declared_type: &str, value: &Expr, env: &mut Environment<'ctx>) {
        let Some((val, ty)) = self.lower_expression(value, env) else {
            return;
        };

        if let Some(existing) = env.lookup(name) {
            if existing.ty == ty {
                if let Storage::Slot(slot) = existing.storage {
                    if let Err(e) = self.builder.build_store(slot, val) {
                        self.errors.push(format!("failed to store into '{name}': {e}"));
                    }
                    return;
                }
            }
        }

        let basic_ty = match self.types.basic_type(&ty) {
            Ok(t) => t,
            Err(e) => {
                self.errors.push(e.to_string());
                return;
            }
        };
        let slot = match self.builder.build_alloca(basic_ty, name) {
            Ok(s) => s,
            Err(e) => {
                self.errors.push(format!("failed to allocate '{name}': {e}"));
                return;
            }
        };
        if let Err(e) = self.builder.build_store(slot, val) {
            self.errors.push(format!("failed to store into '{name}': {e}"));
        }
        env.define_slot(name, slot, ty);
    }

    fn lower_assign(&mut self, name: &str, op: AssignOp, value: &Expr, env: &mut Environment<'ctx>) {
        let Some(binding) = env.lookup(name) else {
            self.errors.push(format!("unknown identifier '{name}'"));
            return;
        };
        let Storage::Slot(slot) = binding.storage else {
            self.errors.push(format!("'{name}' is not assignable"));
            return;
        };
        let Some((rhs_val, rhs_ty)) = self.lower_expression(value, env) else {
            return;
        };

        if matches!(op, AssignOp::Eq) {
            if let Err(e) = self.builder.build_store(slot, rhs_val) {
                self.errors.push(format!("failed to store into '{name}': {e}"));
            }
            return;
        }

        let basic_ty = match self.types.basic_type(&binding.ty) {
            Ok(t) => t,
            Err(e) => {
                self.errors.push(e.to_string());
                return;
            }
        };
        let current = match self.builder.build_load(basic_ty, slot, name) {
            Ok(v) => v,
            Err(e) => {
                self.errors.push(format!("failed to load '{name}': {e}"));
                return;
            }
        };

        let infix_op = match op {
            AssignOp::PlusEq => InfixOp::Add,
            AssignOp::MinusEq => InfixOp::Sub,
            AssignOp::MulEq => InfixOp::Mul,
            AssignOp::DivEq => InfixOp::Div,
            AssignOp::Eq => unreachable!("handled above"),
        };

        let Some((result, _)) = self.apply_infix(current, &binding.ty, rhs_val, &rhs_ty, infix_op) else {
            return;
        };
        if let Err(e) = self.builder.build_store(slot, result) {
            self.errors.push(format!("failed to store into '{name}': {e}"));
        }
    }

    fn lower_function(
        &mut self,
        name: &str,
        params: &[FunctionParameter],
        return_type: &str,
        body: &AstBlock,
        env: &mut Environment<'ctx>,
    ) {
        let mut param_types: Vec<BasicMetadataTypeEnum> = Vec::with_capacity(params.len());
        for param in params {
            match self.types.basic_type(&param.declared_type) {
                Ok(t) => param_types.push(t.into()),
                Err(e) => self.errors.push(e.to_string()),
            }
        }

        let fn_type = if TypeMapper::is_void(return_type) {
            self.context.void_type().fn_type(&param_types, false)
        } else {
            match self.types.basic_type(return_type) {
                Ok(t) => t.fn_type(&param_types, false),
                Err(e) => {
                    self.errors.push(e.to_string());
                    self.context.i32_type().fn_type(&param_types, false)
                }
            }
        };

        let function = self.module.add_function(name, fn_type, None);

        let saved_block = self.builder.get_insert_block();
        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        self.with_child_scope(env, name, |this, scope| {
            scope.define_function(name, function, return_type);

            for (i, param) in params.iter().enumerate() {
                let Ok(pty) = this.types.basic_type(&param.declared_type) else {
                    continue;
                };
                let Some(arg_val) = function.get_nth_param(i as u32) else {
                    this.errors.push(format!("missing argument {i} for '{name}'"));
                    continue;
                };
                let slot = match this.builder.build_alloca(pty, &param.name) {
                    Ok(s) => s,
                    Err(e) => {
                        this.errors.push(format!("failed to allocate parameter '{}': {e}", param.name));
                        continue;
                    }
                };
                if let Err(e) = this.builder.build_store(slot, arg_val) {
                    this.errors
                        .push(format!("failed to store parameter '{}': {e}", param.name));
                }
                scope.define_slot(&param.name, slot, &param.declared_type);
            }

            this.lower_block(body, scope);
        });

        env.define_function(name, function, return_type);

        if let Some(block) = saved_block {
            self.builder.position_at_end(block);
        }
    }

    fn lower_return(&mut self, expr: &Expr, env: &mut Environment<'ctx>) {
        let Some((val, _)) = self.lower_expression(expr, env) else {
            return;
        };
        if let Err(e) = self.builder.build_return(Some(&val)) {
            self.errors.push(format!("return failed: {e}"));
        }
    }

    fn lower_while(&mut self, condition: &Expr, body: &AstBlock, env: &mut Environment<'ctx>) {
        let Some(function) = self.current_function() else {
            return;
        };
        let cond_bb = self.context.append_basic_block(function, "while.cond");
        let body_bb = self.context.append_basic_block(function, "while.body");
        let end_bb = self.context.append_basic_block(function, "while.end");

        if let Err(e) = self.builder.build_unconditional_branch(cond_bb) {
            self.errors.push(format!("branch failed: {e}"));
            return;
        }

        self.builder.position_at_end(cond_bb);
        if let Some((cond_val, _)) = self.lower_expression(condition, env) {
            if let Err(e) = self.builder.build_conditional_branch(cond_val.into_int_value(), body_bb, end_bb) {
                self.errors.push(format!("conditional branch failed: {e}"));
            }
        }

        self.break_targets.push(end_bb);
        self.continue_targets.push(cond_bb);

        self.builder.position_at_end(body_bb);
        self.lower_block(body, env);
        if !self.block_is_terminated() {
            let _ = self.builder.build_unconditional_branch(cond_bb);
        }

        self.break_targets.pop();
        self.continue_targets.pop();

        self.builder.position_at_end(end_bb);
    }

    fn lower_for(&mut self, init: &Stmt, condition: &Expr, step: &Expr, body: &AstBlock, env: &mut Environment<'ctx>) {
        let Some(function) = self.current_function() else {
            return;
        };

        self.with_child_scope(env, "for", |this, scope| {
            this.lower_statement(init, scope);

            let cond_bb = this.context.append_basic_block(function, "for.cond");
            let body_bb = this.context.append_basic_block(function, "for.body");
            let step_bb = this.context.append_basic_block(function, "for.step");
            let end_bb = this.context.append_basic_block(function, "for.end");

            if let Err(e) = this.builder.build_unconditional_branch(cond_bb) {
                this.errors.push(format!("branch failed: {e}"));
                return;
            }

            this.builder.position_at_end(cond_bb);
            if let Some((cond_val, _)) = this.lower_expression(condition, scope) {
                if let Err(e) = this.builder.build_conditional_branch(cond_val.into_int_value(), body_bb, end_bb) {
                    this.errors.push(format!("conditional branch failed: {e}"));
                }
            }

            this.break_targets.push(end_bb);
            this.continue_targets.push(step_bb);

            this.builder.position_at_end(body_bb);
            this.lower_block(body, scope);
            if !this.block_is_terminated() {
                let _ = this.builder.build_unconditional_branch(step_bb);
            }

            this.builder.position_at_end(step_bb);
            this.lower_expression(step, scope);
            if !this.block_is_terminated() {
                let _ = this.builder.build_unconditional_branch(cond_bb);
            }

            this.break_targets.pop();
            this.continue_targets.pop();

            this.builder.position_at_end(end_bb);
        });
    }

    fn lower_break(&mut self) {
        match self.break_targets.last().copied() {
            Some(target) => {
                if let Err(e) = self.builder.build_unconditional_branch(target) {
                    self.errors.push(format!("break failed: {e}"));
                }
            }
            None => self.errors.push(crate::error::CodeGenError::BreakOutsideLoop.to_string()),
        }
    }

    fn lower_continue(&mut self) {
        match self.continue_targets.last().copied() {
            Some(target) => {
                if let Err(e) = self.builder.build_unconditional_branch(target) {
                    self.errors.push(format!("continue failed: {e}"));
                }
            }
            None => self.errors.push(crate::error::CodeGenError::ContinueOutsideLoop.to_string()),
        }
    }

    fn lower_import(&mut self, raw_name: &str, env: &mut Environment<'ctx>) {
        let normalized = raw_name.trim_matches('"').trim_end_matches(".lime").to_string();
        if self.imported.contains(&normalized) {
            return;
        }

        let candidates = [
            format!("tests/{normalized}.lime"),
            format!("./{normalized}.lime"),
            format!("{normalized}.lime"),
        ];

        let source = candidates.iter().find_map(|path| std::fs::read_to_string(path).ok());
        let Some(source) = source else {
            self.errors.push(format!(
                "could not import '{normalized}': tried {}",
                candidates.join(", ")
            ));
            return;
        };

        let mut handler = limec_util::Handler::new();
        let mut parser = limec_par::Parser::new(&source, &mut handler);
        let program = parser.parse_program();
        let parse_errors = parser.into_errors();
        if !parse_errors.is_empty() {
            self.errors.push(format!(
                "errors in imported module '{normalized}': {}",
                parse_errors.join("; ")
            ));
            return;
        }

        self.imported.insert(normalized);
        self.lower_block(&program, env);
    }

    // --- expressions ----------------------------------------------------

    fn lower_expression(&mut self, expr: &Expr, env: &mut Environment<'ctx>) -> Option<(BasicValueEnum<'ctx>, String)> {
        match expr {
            Expr::IntegerLiteral(n) => Some((self.context.i32_type().const_int(*n as u64, true).into(), "int".into())),
            Expr::FloatLiteral(f) => Some((self.context.f32_type().const_float(*f).into(), "float".into())),
            Expr::BooleanLiteral(b) => Some((self.context.bool_type().const_int(*b as u64, false).into(), "bool".into())),
            Expr::StringLiteral(text) => Some(self.lower_string_literal(text)),
            Expr::Identifier(name) => self.lower_identifier(name, env),
            Expr::Infix { left, op, right } => self.lower_infix(left, *op, right, env),
            Expr::Prefix { op, operand } => self.lower_prefix(*op, operand, env),
            Expr::Postfix { operand, op } => self.lower_postfix(operand, *op, env),
            Expr::Call { callee, args } => self.lower_call(callee, args, env),
            Expr::If {
                condition,
                then_block,
                else_block,
            } => self.lower_if(condition, then_block, else_block.as_deref(), env),
        }
    }

    fn lower_string_literal(&mut self, text: &str) -> (BasicValueEnum<'ctx>, String) {
        let substituted = text.replace("\\n", "\n\0");
        let mut bytes: Vec<u8> = substituted.into_bytes();
        bytes.push(0);

        let name = format!("__str_{}", self.string_counter);
        self.string_counter += 1;

        let i8_type = self.context.i8_type();
        let const_bytes: Vec<_> = bytes.iter().map(|b| i8_type.const_int(*b as u64, false)).collect();
        let array_value = i8_type.const_array(&const_bytes);

        let global = self.module.add_global(array_value.get_type(), None, &name);
        global.set_linkage(Linkage::Internal);
        global.set_constant(true);
        global.set_initializer(&array_value);

        (global.as_pointer_value().into(), "str".into())
    }

    fn lower_identifier(&mut self, name: &str, env: &Environment<'ctx>) -> Option<(BasicValueEnum<'ctx>, String)> {
        let Some(binding) = env.lookup(name) else {
            self.errors.push(format!("unknown identifier '{name}'"));
            return None;
        };
        match binding.storage {
            Storage::Slot(slot) => {
                let ty = match self.types.basic_type(&binding.ty) {
                    Ok(t) => t,
                    Err(e) => {
                        self.errors.push(e.to_string());
                        return None;
                    }
                };
                match self.builder.build_load(ty, slot, name) {
                    Ok(v) => Some((v, binding.ty)),
                    Err(e) => {
                        self.errors.push(format!("failed to load '{name}': {e}"));
                        None
                    }
                }
            }
            Storage::Function(_) => {
                self.errors.push(format!("'{name}' is a function, not a value"));
                None
            }
        }
    }

    fn lower_infix(
        &mut self,
        left: &Expr,
        op: InfixOp,
        right: &Expr,
        env: &mut Environment<'ctx>,
    ) -> Option<(BasicValueEnum<'ctx>, String)> {
        let (lval, lty) = self.lower_expression(left, env)?;
        let (rval, rty) = self.lower_expression(right, env)?;
        self.apply_infix(lval, &lty, rval, &rty, op)
    }

    /// Mixed int/float dispatch follows the promotion policy recorded in
    /// DESIGN.md: the integer operand is promoted to float and the op
    /// dispatches as floating-point.
    fn apply_infix(
        &mut self,
        lval: BasicValueEnum<'ctx>,
        lty: &str,
        rval: BasicValueEnum<'ctx>,
        rty: &str,
        op: InfixOp,
    ) -> Option<(BasicValueEnum<'ctx>, String)> {
        match (lty, rty) {
            ("int", "int") => self.apply_int_infix(lval.into_int_value(), rval.into_int_value(), op),
            ("float", "float") => self.apply_float_infix(lval.into_float_value(), rval.into_float_value(), op),
            ("int", "float") => {
                let promoted = self.promote_int_to_float(lval.into_int_value());
                self.apply_float_infix(promoted, rval.into_float_value(), op)
            }
            ("float", "int") => {
                let promoted = self.promote_int_to_float(rval.into_int_value());
                self.apply_float_infix(lval.into_float_value(), promoted, op)
            }
            (other_l, other_r) => {
                self.errors
                    .push(format!("unsupported infix operand types '{other_l}' and '{other_r}'"));
                None
            }
        }
    }

    fn promote_int_to_float(&mut self, v: IntValue<'ctx>) -> FloatValue<'ctx> {
        match self.builder.build_signed_int_to_float(v, self.context.f32_type(), "promote") {
            Ok(f) => f,
            Err(e) => {
                self.errors.push(format!("failed to promote int operand to float: {e}"));
                self.context.f32_type().const_zero()
            }
        }
    }

    fn apply_int_infix(&mut self, l: IntValue<'ctx>, r: IntValue<'ctx>, op: InfixOp) -> Option<(BasicValueEnum<'ctx>, String)> {
        let result = match op {
            InfixOp::Add => self.builder.build_int_add(l, r, "iadd").map(|v| (v.into(), "int".to_string())),
            InfixOp::Sub => self.builder.build_int_sub(l, r, "isub").map(|v| (v.into(), "int".to_string())),
            InfixOp::Mul => self.builder.build_int_mul(l, r, "imul").map(|v| (v.into(), "int".to_string())),
            InfixOp::Div => self
                .builder
                .build_int_signed_div(l, r, "idiv")
                .map(|v| (v.into(), "int".to_string())),
            InfixOp::Mod => self
                .builder
                .build_int_signed_rem(l, r, "irem")
                .map(|v| (v.into(), "int".to_string())),
            InfixOp::Eq => self
                .builder
                .build_int_compare(IntPredicate::EQ, l, r, "ieq")
                .map(|v| (v.into(), "bool".to_string())),
            InfixOp::NotEq => self
                .builder
                .build_int_compare(IntPredicate::NE, l, r, "ine")
                .map(|v| (v.into(), "bool".to_string())),
            InfixOp::Lt => self
                .builder
                .build_int_compare(IntPredicate::SLT, l, r, "ilt")
                .map(|v| (v.into(), "bool".to_string())),
            InfixOp::Gt => self
                .builder
                .build_int_compare(IntPredicate::SGT, l, r, "igt")
                .map(|v| (v.into(), "bool".to_string())),
            InfixOp::LtEq => self
                .builder
                .build_int_compare(IntPredicate::SLE, l, r, "ile")
                .map(|v| (v.into(), "bool".to_string())),
            InfixOp::GtEq => self
                .builder
                .build_int_compare(IntPredicate::SGE, l, r, "ige")
                .map(|v| (v.into(), "bool".to_string())),
        };
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.errors.push(format!("integer operation failed: {e}"));
                None
            }
        }
    }

    fn apply_float_infix(
        &mut self,
        l: FloatValue<'ctx>,
        r: FloatValue<'ctx>,
        op: InfixOp,
    ) -> Option<(BasicValueEnum<'ctx>, String)> {
        let result = match op {
            InfixOp::Add => self.builder.build_float_add(l, r, "fadd").map(|v| (v.into(), "float".to_string())),
            InfixOp::Sub => self.builder.build_float_sub(l, r, "fsub").map(|v| (v.into(), "float".to_string())),
            InfixOp::Mul => self.builder.build_float_mul(l, r, "fmul").map(|v| (v.into(), "float".to_string())),
            InfixOp::Div => self.builder.build_float_div(l, r, "fdiv").map(|v| (v.into(), "float".to_string())),
            InfixOp::Mod => self.builder.build_float_rem(l, r, "frem").map(|v| (v.into(), "float".to_string())),
            InfixOp::Eq => self
                .builder
                .build_float_compare(FloatPredicate::OEQ, l, r, "feq")
                .map(|v| (v.into(), "bool".to_string())),
            InfixOp::NotEq => self
                .builder
                .build_float_compare(FloatPredicate::ONE, l, r, "fne")
                .map(|v| (v.into(), "bool".to_string())),
            InfixOp::Lt => self
                .builder
                .build_float_compare(FloatPredicate::OLT, l, r, "flt")
                .map(|v| (v.into(), "bool".to_string())),
            InfixOp::Gt => self
                .builder
                .build_float_compare(FloatPredicate::OGT, l, r, "fgt")
                .map(|v| (v.into(), "bool".to_string())),
            InfixOp::LtEq => self
                .builder
                .build_float_compare(FloatPredicate::OLE, l, r, "fle")
                .map(|v| (v.into(), "bool".to_string())),
            InfixOp::GtEq => self
                .builder
                .build_float_compare(FloatPredicate::OGE, l, r, "fge")
                .map(|v| (v.into(), "bool".to_string())),
        };
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.errors.push(format!("float operation failed: {e}"));
                None
            }
        }
    }

    fn lower_prefix(&mut self, op: PrefixOp, operand: &Expr, env: &mut Environment<'ctx>) -> Option<(BasicValueEnum<'ctx>, String)> {
        let (val, ty) = self.lower_expression(operand, env)?;
        match (op, ty.as_str()) {
            (PrefixOp::Neg, "int") => match self.builder.build_int_neg(val.into_int_value(), "ineg") {
                Ok(r) => Some((r.into(), "int".to_string())),
                Err(e) => {
                    self.errors.push(format!("negation failed: {e}"));
                    None
                }
            },
            (PrefixOp::Neg, "float") => match self.builder.build_float_neg(val.into_float_value(), "fneg") {
                Ok(r) => Some((r.into(), "float".to_string())),
                Err(e) => {
                    self.errors.push(format!("negation failed: {e}"));
                    None
                }
            },
            // Preserved defect: `!x` on a float operand always yields
            // `false`, regardless of `x`.
            (PrefixOp::Not, "float") => Some((self.context.bool_type().const_zero().into(), "bool".to_string())),
            (PrefixOp::Not, _) => match self.builder.build_not(val.into_int_value(), "inot") {
                Ok(r) => Some((r.into(), ty)),
                Err(e) => {
                    self.errors.push(format!("logical not failed: {e}"));
                    None
                }
            },
        }
    }

    /// Returns the *original* value, per post-increment/decrement
    /// semantics.
    fn lower_postfix(&mut self, operand_name: &str, op: PostfixOp, env: &mut Environment<'ctx>) -> Option<(BasicValueEnum<'ctx>, String)> {
        let Some(binding) = env.lookup(operand_name) else {
            self.errors.push(format!("unknown identifier '{operand_name}'"));
            return None;
        };
        let Storage::Slot(slot) = binding.storage else {
            self.errors.push(format!("'{operand_name}' is not assignable"));
            return None;
        };
        let basic_ty = match self.types.basic_type(&binding.ty) {
            Ok(t) => t,
            Err(e) => {
                self.errors.push(e.to_string());
                return None;
            }
        };
        let current = match self.builder.build_load(basic_ty, slot, operand_name) {
            Ok(v) => v,
            Err(e) => {
                self.errors.push(format!("failed to load '{operand_name}': {e}"));
                return None;
            }
        };

        let updated = match binding.ty.as_str() {
            "int" => {
                let one = self.context.i32_type().const_int(1, false);
                let result = match op {
                    PostfixOp::Inc => self.builder.build_int_add(current.into_int_value(), one, "postinc"),
                    PostfixOp::Dec => self.builder.build_int_sub(current.into_int_value(), one, "postdec"),
                };
                match result {
                    Ok(v) => v.into(),
                    Err(e) => {
                        self.errors.push(format!("postfix operation failed: {e}"));
                        return None;
                    }
                }
            }
            "float" => {
                let one = self.context.f32_type().const_float(1.0);
                let result = match op {
                    PostfixOp::Inc => self.builder.build_float_add(current.into_float_value(), one, "postinc"),
                    PostfixOp::Dec => self.builder.build_float_sub(current.into_float_value(), one, "postdec"),
                };
                match result {
                    Ok(v) => v.into(),
                    Err(e) => {
                        self.errors.push(format!("postfix operation failed: {e}"));
                        return None;
                    }
                }
            }
            other => {
                self.errors.push(format!("postfix ++/-- not supported for type '{other}'"));
                return None;
            }
        };

        if let Err(e) = self.builder.build_store(slot, updated) {
            self.errors.push(format!("failed to store '{operand_name}': {e}"));
            return None;
        }
        Some((current, binding.ty))
    }

    fn lower_call(&mut self, callee: &str, args: &[Expr], env: &mut Environment<'ctx>) -> Option<(BasicValueEnum<'ctx>, String)> {
        if callee == "printf" {
            return self.lower_printf_call(args, env);
        }

        let Some(binding) = env.lookup(callee) else {
            self.errors.push(format!("unknown identifier '{callee}'"));
            return None;
        };
        let Storage::Function(function) = binding.storage else {
            self.errors.push(format!("'{callee}' is not callable"));
            return None;
        };

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            let (val, _) = self.lower_expression(arg, env)?;
            arg_values.push(val.into());
        }

        match self.builder.build_call(function, &arg_values, "call") {
            Ok(site) => {
                if TypeMapper::is_void(&binding.ty) {
                    None
                } else {
                    site.try_as_basic_value().left().map(|v| (v, binding.ty.clone()))
                }
            }
            Err(e) => {
                self.errors.push(format!("call to '{callee}' failed: {e}"));
                None
            }
        }
    }

    fn lower_printf_call(&mut self, args: &[Expr], env: &mut Environment<'ctx>) -> Option<(BasicValueEnum<'ctx>, String)> {
        let Some(printf) = self.module.get_function("printf") else {
            self.errors.push("'printf' is not declared".to_string());
            return None;
        };

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            let (val, _) = self.lower_expression(arg, env)?;
            arg_values.push(val.into());
        }

        match self.builder.build_call(printf, &arg_values, "printf_call") {
            Ok(site) => Some((
                site.try_as_basic_value()
                    .left()
                    .unwrap_or_else(|| self.context.i32_type().const_int(0, false).into()),
                "int".to_string(),
            )),
            Err(e) => {
                self.errors.push(format!("call to printf failed: {e}"));
                None
            }
        }
    }

    /// `if` is lowered identically whether it sits at statement position
    /// (`Stmt::Expression(Expr::If{..})`) or nested inside another
    /// expression: full branch/merge control flow either way. The
    /// "value" handed back is always a meaningless zero — `if` never
    /// produces a usable value — preserved as-is.
    fn lower_if(
        &mut self,
        condition: &Expr,
        then_block: &AstBlock,
        else_block: Option<&AstBlock>,
        env: &mut Environment<'ctx>,
    ) -> Option<(BasicValueEnum<'ctx>, String)> {
        let (cond_val, _) = self.lower_expression(condition, env)?;
        let function = self.current_function()?;

        let then_bb = self.context.append_basic_block(function, "if.then");
        let merge_bb = self.context.append_basic_block(function, "if.merge");
        let else_bb = if else_block.is_some() {
            self.context.append_basic_block(function, "if.else")
        } else {
            merge_bb
        };

        if let Err(e) = self
            .builder
            .build_conditional_branch(cond_val.into_int_value(), then_bb, else_bb)
        {
            self.errors.push(format!("conditional branch failed: {e}"));
            return None;
        }

        self.builder.position_at_end(then_bb);
        self.lower_block(then_block, env);
        if !self.block_is_terminated() {
            let _ = self.builder.build_unconditional_branch(merge_bb);
        }

        if let Some(else_stmts) = else_block {
            self.builder.position_at_end(else_bb);
            self.lower_block(else_stmts, env);
            if !self.block_is_terminated() {
                let _ = self.builder.build_unconditional_branch(merge_bb);
            }
        }

        self.builder.position_at_end(merge_bb);
        Some((self.context.i32_type().const_int(0, false).into(), "int".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell::context::Context;

    fn generate_ir(source: &str) -> (String, Vec<String>) {
        let mut handler = limec_util::Handler::new();
        let mut parser = limec_par::Parser::new(source, &mut handler);
        let program = parser.parse_program();
        assert!(parser.errors().is_empty(), "parse errors: {:?}", parser.errors());

        let context = Context::create();
        let gen = CodeGenerator::new(&context, "test");
        let (module, errors) = gen.generate(&program);
        (module.print_to_string().to_string(), errors)
    }

    #[test]
    fn declares_printf_and_boolean_globals() {
        let (ir, errors) = generate_ir("fn main() -> int { return 0; }");
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("declare i32 @printf"));
        assert!(ir.contains("@true = internal constant i1 true"));
        assert!(ir.contains("@false = internal constant i1 false"));
    }

    #[test]
    fn lowers_function_signature_and_return() {
        let (ir, errors) = generate_ir("fn main() -> int { let x: int = 40 + 2; return x; }");
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("define i32 @main()"));
        assert!(ir.contains("ret i32"));
    }

    #[test]
    fn let_rebind_with_same_type_does_not_allocate_twice() {
        let (ir, errors) = generate_ir("fn main() -> int { let x: int = 1; let x: int = 2; return x; }");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(ir.matches("alloca i32").count(), 1);
    }

    #[test]
    fn function_call_emits_call_instruction() {
        let (ir, errors) = generate_ir(
            "fn add(a: int, b: int) -> int { return a + b; } fn main() -> int { return add(20, 22); }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("call i32 @add"));
    }

    #[test]
    fn while_loop_with_break_emits_three_blocks() {
        let (ir, errors) = generate_ir(
            "fn main() -> int { let i: int = 0; while i < 5 { if i == 3 { break; } i = i + 1; } return i; }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("while.cond"));
        assert!(ir.contains("while.body"));
        assert!(ir.contains("while.end"));
    }

    #[test]
    fn for_loop_emits_four_blocks() {
        let (ir, errors) = generate_ir(
            "fn main() -> int { let s: int = 0; for (let i: int = 0; i < 10; i = i + 1) { s = s + i; } return s; }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        for label in ["for.cond", "for.body", "for.step", "for.end"] {
            assert!(ir.contains(label), "missing {label}\n{ir}");
        }
    }

    #[test]
    fn mixed_int_float_infix_promotes_the_integer_operand() {
        let (ir, errors) = generate_ir("fn main() -> int { let x: float = 1 + 2.5; return 0; }");
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("sitofp"));
        assert!(ir.contains("fadd"));
    }

    #[test]
    fn bang_on_float_always_yields_false() {
        let (ir, errors) = generate_ir("fn main() -> int { let x: float = 1.0; let y: bool = !x; return 0; }");
        assert!(errors.is_empty(), "{errors:?}");
        assert!(!ir.contains("xor"));
    }

    #[test]
    fn assigning_to_an_undeclared_identifier_records_an_error() {
        let (_ir, errors) = generate_ir("fn main() -> int { y = 1; return 0; }");
        assert!(errors.iter().any(|e| e.contains("y")));
    }

    #[test]
    fn break_outside_a_loop_is_a_compile_error() {
        let (_ir, errors) = generate_ir("fn main() -> int { break; return 0; }");
        assert!(errors.iter().any(|e| e.contains("break")));
    }

    #[test]
    fn importing_a_missing_module_names_the_attempted_paths() {
        let (_ir, errors) = generate_ir(r#"import "does_not_exist"; fn main() -> int { return 0; }"#);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("does_not_exist"));
        assert!(errors[0].contains("tests/"));
    }

    #[test]
    fn string_literals_get_distinct_names() {
        let (ir, errors) = generate_ir(r#"fn main() -> int { printf("a"); printf("b"); return 0; }"#);
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("__str_0"));
        assert!(ir.contains("__str_1"));
    }

    #[test]
    fn if_expression_nested_in_another_expression_yields_a_dummy_value() {
        let (ir, errors) = generate_ir("fn main() -> int { let x: int = 1 + (if true { 1 } else { 2 }); return x; }");
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("if.then"));
        assert!(ir.contains("if.else"));
    }
}
