//! Compiled unit: instruction stream plus constant pool.

use crate::value::Value;

/// Output of the compiler and input to the VM.
///
/// `code` is a flat stream of machine-word integers: each instruction is an
/// opcode word followed by zero or one operand word. `constants` is
/// append-only during compilation; compile-time literals, global names
/// (as strings) and nested functions all live here. A chunk is immutable
/// after compilation and may be shared between `Function` values via `Rc`.
#[derive(Debug, Default)]
pub struct Chunk {
    code: Vec<i64>,
    constants: Vec<Value>,
}

impl Chunk {
    /// Creates a chunk from its parts. Called by `ChunkBuilder::build`.
    #[must_use]
    pub(crate) fn new(code: Vec<i64>, constants: Vec<Value>) -> Self {
        Self { code, constants }
    }

    /// Returns the instruction stream.
    #[must_use]
    pub fn code(&self) -> &[i64] {
        &self.code
    }

    /// Returns the constant pool.
    #[must_use]
    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    /// Returns the constant at the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds; indices come from the compiler
    /// and are valid by construction.
    #[must_use]
    pub fn constant(&self, index: usize) -> &Value {
        &self.constants[index]
    }
}
