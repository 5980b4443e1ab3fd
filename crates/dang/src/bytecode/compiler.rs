//! AST to bytecode compiler.
//!
//! A single pass over the tree: expressions emit stack operations in
//! evaluation order, statements resolve names through [`Vars`], and control
//! flow uses forward jumps patched once their targets are known. Nested
//! function definitions compile into fresh chunks stored as constants of
//! the enclosing chunk.

use std::rc::Rc;

use super::{
    builder::{ChunkBuilder, JumpLabel},
    chunk::Chunk,
    op::Opcode,
    scope::{CompilerKind, VarRef, Vars},
};
use crate::{
    error::DangResult,
    expressions::{BinOp, Expr, FunctionDef, IfRest, IfStmt, Program, Stmt, Term},
    value::{Function, Value},
};

/// Compiles an AST to bytecode.
pub struct Compiler {
    builder: ChunkBuilder,
    vars: Vars,
}

impl Compiler {
    fn new(kind: CompilerKind) -> Self {
        Self {
            builder: ChunkBuilder::new(),
            vars: Vars::new(kind),
        }
    }

    /// Compiles a whole program to its top-level chunk.
    ///
    /// The chunk is terminated with an implicit `return null` unless the
    /// final top-level statement is already a `return`, so execution always
    /// yields exactly one value.
    pub fn compile_program(program: &Program) -> DangResult<Chunk> {
        let mut compiler = Self::new(CompilerKind::Script);

        for stmt in &program.body {
            compiler.compile_stmt(stmt)?;
        }

        if !matches!(program.body.last(), Some(Stmt::Return(_))) {
            compiler.emit_null_return();
        }

        Ok(compiler.builder.build())
    }

    /// Compiles a function definition to a `Function` value.
    ///
    /// Parameters take local slots `0..arity` (the VM's frame pointer is
    /// positioned at the first argument); the body block opens a nested
    /// scope, so body locals continue at slot `arity` and may shadow
    /// parameters. Falling off the end of the body returns `null`.
    fn compile_function(def: &FunctionDef) -> DangResult<Function> {
        let mut compiler = Self::new(CompilerKind::Function);

        for arg_name in &def.arg_names {
            compiler.vars.define(arg_name)?;
        }

        compiler.compile_scope(&def.body)?;
        compiler.emit_null_return();

        Ok(Function {
            name: def.name.as_str().into(),
            arity: def.arg_names.len(),
            chunk: Rc::new(compiler.builder.build()),
        })
    }

    fn compile_stmt(&mut self, stmt: &Stmt) -> DangResult<()> {
        match stmt {
            Stmt::Return(expr) => {
                self.compile_expr(expr)?;
                self.builder.emit(Opcode::Return);
            }

            Stmt::Let { name, expr } => {
                self.compile_expr(expr)?;
                match self.vars.define(name)? {
                    // The value stays on the stack and becomes the new slot.
                    VarRef::Local(_) => {}
                    VarRef::Global(name) => {
                        let index = self.builder.add_const(Value::Str(name.into()));
                        self.builder.emit_with(Opcode::DefineGlobal, index);
                    }
                }
            }

            Stmt::Assign { name, expr } => match self.vars.lookup(name) {
                VarRef::Local(slot) => {
                    self.compile_expr(expr)?;
                    self.builder.emit_with(Opcode::SetLocal, slot as i64);
                }
                VarRef::Global(name) => {
                    self.compile_expr(expr)?;
                    let index = self.builder.add_const(Value::Str(name.into()));
                    self.builder.emit_with(Opcode::SetGlobal, index);
                }
            },

            Stmt::Scope(body) => self.compile_scope(body)?,

            Stmt::If(if_stmt) => self.compile_if(if_stmt)?,

            Stmt::FunctionDef(def) => {
                let function = Self::compile_function(def)?;
                let index = self.builder.add_const(Value::Function(function));
                self.builder.emit_with(Opcode::LoadConst, index);

                match self.vars.define(&def.name)? {
                    // The function value stays on the stack as the new slot.
                    VarRef::Local(_) => {}
                    VarRef::Global(name) => {
                        let name_index = self.builder.add_const(Value::Str(name.into()));
                        self.builder.emit_with(Opcode::DefineGlobal, name_index);
                    }
                }
            }
        }
        Ok(())
    }

    /// Compiles a block: the names it defines are popped when it closes.
    fn compile_scope(&mut self, body: &[Stmt]) -> DangResult<()> {
        self.vars.start_scope();

        for stmt in body {
            self.compile_stmt(stmt)?;
        }

        let count = self.vars.end_scope();
        for _ in 0..count {
            self.builder.emit(Opcode::Pop);
        }
        Ok(())
    }

    /// Compiles an `if` / `else if` / `else` chain.
    ///
    /// Each arm's condition jumps past its body when falsy; each body (when
    /// another arm follows) jumps to the chain end. All end jumps are
    /// patched once the chain is fully emitted.
    fn compile_if(&mut self, if_stmt: &IfStmt) -> DangResult<()> {
        let mut end_jumps: Vec<JumpLabel> = Vec::new();

        self.compile_expr(&if_stmt.condition)?;
        let mut cond_jump = self.builder.emit_jump(Opcode::JumpIfZero);
        self.compile_scope(&if_stmt.body)?;

        let mut rest = &if_stmt.rest;
        loop {
            match rest {
                IfRest::None => {
                    // No further arm: a falsy condition falls through here.
                    self.builder.patch_jump(cond_jump);
                    break;
                }
                IfRest::ElseIf(arm) => {
                    end_jumps.push(self.builder.emit_jump(Opcode::Jump));
                    self.builder.patch_jump(cond_jump);

                    self.compile_expr(&arm.condition)?;
                    cond_jump = self.builder.emit_jump(Opcode::JumpIfZero);
                    self.compile_scope(&arm.body)?;

                    rest = &arm.rest;
                }
                IfRest::Else(body) => {
                    end_jumps.push(self.builder.emit_jump(Opcode::Jump));
                    self.builder.patch_jump(cond_jump);
                    self.compile_scope(body)?;
                    break;
                }
            }
        }

        for jump in end_jumps {
            self.builder.patch_jump(jump);
        }
        Ok(())
    }

    /// Compiles an expression, leaving its value on the stack.
    fn compile_expr(&mut self, expr: &Expr) -> DangResult<()> {
        match expr {
            Expr::Term(term) => self.compile_term(term),
            Expr::BinExpr { lhs, rhs, op } => {
                self.compile_expr(lhs)?;
                self.compile_expr(rhs)?;
                self.builder.emit(match op {
                    BinOp::Add => Opcode::Add,
                    BinOp::Subtract => Opcode::Subtract,
                    BinOp::Multiply => Opcode::Multiply,
                    BinOp::Divide => Opcode::Divide,
                });
                Ok(())
            }
        }
    }

    fn compile_term(&mut self, term: &Term) -> DangResult<()> {
        match term {
            Term::IntLit(value) => self.emit_constant(Value::Int(*value)),
            Term::DoubleLit(value) => self.emit_constant(Value::Double(*value)),
            Term::StringLit(value) => self.emit_constant(Value::Str(value.as_str().into())),
            Term::BoolLit(value) => self.emit_constant(Value::Bool(*value)),
            Term::NullLit => self.emit_constant(Value::Null),

            Term::Identifier(name) => match self.vars.lookup(name) {
                VarRef::Local(slot) => self.builder.emit_with(Opcode::GetLocal, slot as i64),
                VarRef::Global(name) => {
                    let index = self.builder.add_const(Value::Str(name.into()));
                    self.builder.emit_with(Opcode::GetGlobal, index);
                }
            },

            Term::ParenExpr(expr) => return self.compile_expr(expr),

            Term::FunctionCall { name, args } => {
                // Callee below the arguments, so the VM finds it at
                // `sp - arity - 1`.
                match self.vars.lookup(name) {
                    VarRef::Local(slot) => self.builder.emit_with(Opcode::GetLocal, slot as i64),
                    VarRef::Global(name) => {
                        let index = self.builder.add_const(Value::Str(name.into()));
                        self.builder.emit_with(Opcode::GetGlobal, index);
                    }
                }

                for arg in args {
                    self.compile_expr(arg)?;
                }

                self.builder.emit_with(Opcode::Call, args.len() as i64);
            }
        }
        Ok(())
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.builder.add_const(value);
        self.builder.emit_with(Opcode::LoadConst, index);
    }

    fn emit_null_return(&mut self) {
        self.emit_constant(Value::Null);
        self.builder.emit(Opcode::Return);
    }
}
