//! Builder for emitting bytecode during compilation.
//!
//! `ChunkBuilder` appends opcode and operand words, manages forward jumps
//! that need patching once their target is known, and collects the constant
//! pool.

use super::{chunk::Chunk, op::Opcode};
use crate::value::Value;

/// Builder for emitting bytecode during compilation.
///
/// # Usage
///
/// ```ignore
/// let mut builder = ChunkBuilder::new();
/// builder.emit_with(Opcode::LoadConst, 0);
/// let jump = builder.emit_jump(Opcode::JumpIfZero);
/// // ... emit more code ...
/// builder.patch_jump(jump);
/// let chunk = builder.build();
/// ```
#[derive(Debug, Default)]
pub struct ChunkBuilder {
    /// The instruction stream being built.
    code: Vec<i64>,

    /// Constants collected during compilation.
    ///
    /// Append-only and deliberately not deduplicated: every reference to a
    /// global name appends its own copy, so constant indices line up with
    /// emission order.
    constants: Vec<Value>,
}

impl ChunkBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a no-operand instruction.
    pub fn emit(&mut self, op: Opcode) {
        self.code.push(op.word());
    }

    /// Emits an instruction with its operand word.
    pub fn emit_with(&mut self, op: Opcode, operand: i64) {
        self.code.push(op.word());
        self.code.push(operand);
    }

    /// Emits a forward jump instruction, returning a label to patch later.
    ///
    /// The jump offset is initially 0 and must be patched with
    /// [`Self::patch_jump`] once the target location is known.
    #[must_use]
    pub fn emit_jump(&mut self, op: Opcode) -> JumpLabel {
        self.code.push(op.word());
        let label = JumpLabel(self.code.len());
        self.code.push(0);
        label
    }

    /// Patches a forward jump to land at the current end of the stream.
    ///
    /// Jump offsets are relative to the slot after the operand: the VM adds
    /// the operand to `ip` after reading it, so the patched value is
    /// `code.len() - label - 1`.
    pub fn patch_jump(&mut self, label: JumpLabel) {
        let offset = self.code.len() - label.0 - 1;
        self.code[label.0] = i64::try_from(offset).expect("jump offset exceeds i64");
    }

    /// Adds a constant to the pool, returning its index as an operand word.
    #[must_use]
    pub fn add_const(&mut self, value: Value) -> i64 {
        let index = self.constants.len();
        self.constants.push(value);
        i64::try_from(index).expect("constant pool exceeds i64 range")
    }

    /// Returns the current instruction-stream length.
    #[must_use]
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Builds the final chunk, consuming the builder.
    #[must_use]
    pub fn build(self) -> Chunk {
        Chunk::new(self.code, self.constants)
    }
}

/// Label for a forward jump that needs patching.
///
/// Stores the operand slot of the jump instruction. Pass it to
/// [`ChunkBuilder::patch_jump`] once the target location is known.
#[derive(Debug, Clone, Copy)]
pub struct JumpLabel(usize);
