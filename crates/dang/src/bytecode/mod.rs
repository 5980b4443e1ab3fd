//! Bytecode compilation and execution.
//!
//! This module contains the bytecode representation, the single-pass
//! compiler, and the virtual machine.
//!
//! # Module Structure
//!
//! - `op` - Opcode enum definitions
//! - `chunk` - Compiled unit: instruction stream + constant pool
//! - `builder` - ChunkBuilder for emitting bytecode during compilation
//! - `scope` - Compile-time name resolution
//! - `compiler` - AST to bytecode compiler
//! - `vm` - Virtual machine for bytecode execution

pub use builder::{ChunkBuilder, JumpLabel};
pub use chunk::Chunk;
pub use compiler::Compiler;
pub use op::Opcode;
pub use scope::{CompilerKind, VarRef, Vars};
pub use vm::VM;

mod builder;
mod chunk;
mod compiler;
mod op;
mod scope;
mod vm;
