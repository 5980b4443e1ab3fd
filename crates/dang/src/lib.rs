#![doc = include_str!("../../../README.md")]
#![expect(clippy::cast_possible_truncation, reason = "operand narrowing is checked by construction")]
#![expect(clippy::cast_sign_loss, reason = "bytecode operands are non-negative by construction")]
#![expect(clippy::cast_possible_wrap, reason = "slots and arities fit in a machine word")]

mod bytecode;
mod disasm;
mod error;
mod expressions;
mod lex;
mod parse;
mod repl;
mod run;
mod value;

pub use crate::{
    bytecode::{Chunk, ChunkBuilder, Compiler, CompilerKind, JumpLabel, Opcode, VM, VarRef, Vars},
    disasm::disassemble,
    error::{DangResult, Error, ErrorKind},
    expressions::{BinOp, Expr, FunctionDef, IfRest, IfStmt, Program, Stmt, Term},
    lex::{Lexer, Token, TokenType},
    parse::Parser,
    repl::ReplSession,
    run::{Runner, compile, evaluate, parse_program},
    value::{Function, Value},
};
