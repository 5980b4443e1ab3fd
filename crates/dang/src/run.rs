//! Public interface for running Dang code.

use std::rc::Rc;

use crate::{
    bytecode::{Chunk, Compiler, VM},
    error::DangResult,
    expressions::Program,
    lex::Lexer,
    parse::Parser,
    value::Value,
};

/// Parses a source string into its AST.
pub fn parse_program(source: &str) -> DangResult<Program> {
    let tokens = Lexer::new(source).lex()?;
    Parser::new(tokens).parse()
}

/// Compiles a source string to its top-level chunk.
pub fn compile(source: &str) -> DangResult<Chunk> {
    let program = parse_program(source)?;
    Compiler::compile_program(&program)
}

/// Primary interface for running Dang code.
///
/// `new()` front-loads lexing, parsing and compilation so a compiled program
/// can be executed repeatedly; `run()` executes the chunk on a fresh VM.
///
/// # Example
/// ```
/// use dang::{Runner, Value};
///
/// let runner = Runner::new("return 9 + (16 - 6) / 2 * 9;").unwrap();
/// assert_eq!(runner.run().unwrap(), Value::Int(54));
/// ```
pub struct Runner {
    chunk: Rc<Chunk>,
}

impl Runner {
    /// Compiles the given source, reporting the first lex, parse or resolve
    /// error.
    pub fn new(source: &str) -> DangResult<Self> {
        Ok(Self {
            chunk: Rc::new(compile(source)?),
        })
    }

    /// Returns the compiled top-level chunk.
    #[must_use]
    pub fn chunk(&self) -> &Rc<Chunk> {
        &self.chunk
    }

    /// Executes the program on a fresh VM, returning its value.
    pub fn run(&self) -> DangResult<Value> {
        VM::new().run(Rc::clone(&self.chunk))
    }
}

/// Compiles and executes a source string in one step.
pub fn evaluate(source: &str) -> DangResult<Value> {
    Runner::new(source)?.run()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn evaluate_compiles_and_runs() {
        assert_eq!(evaluate("return 123;").unwrap(), Value::Int(123));
    }

    #[test]
    fn a_runner_can_execute_the_same_chunk_repeatedly() {
        let runner = Runner::new("let x = 1; return x + 1;").unwrap();
        // Each run gets a fresh VM, so the global can be redefined.
        assert_eq!(runner.run().unwrap(), Value::Int(2));
        assert_eq!(runner.run().unwrap(), Value::Int(2));
    }

    #[test]
    fn compile_errors_surface_from_new() {
        assert!(Runner::new("return 1").is_err());
    }
}
