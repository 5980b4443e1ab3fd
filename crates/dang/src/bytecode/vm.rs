//! Stack-based virtual machine.
//!
//! Execution state is a fixed-capacity value stack, a stack of call frames,
//! and a global environment mapping names to values. The globals outlive
//! individual runs, which is what gives a REPL its persistent state; the
//! value and frame stacks are reset on every run.

use std::rc::Rc;

use ahash::AHashMap;
use smallvec::{SmallVec, smallvec};

use super::{chunk::Chunk, op::Opcode};
use crate::{
    error::{DangResult, Error, ErrorKind},
    expressions::BinOp,
    value::Value,
};

/// Capacity of the value stack. Exceeding it is a fatal error.
const STACK_CAPACITY: usize = 1024;

/// A single activation record.
///
/// Each frame owns its instruction pointer; `fp` is the stack index where
/// the frame's local slots begin (for a function frame, its first argument).
#[derive(Debug)]
struct Frame {
    /// Chunk being executed; shared with the `Function` value that owns it.
    chunk: Rc<Chunk>,

    /// Instruction pointer into `chunk.code()`.
    ip: usize,

    /// Base index into the value stack for this frame's locals.
    fp: usize,
}

/// The virtual machine.
///
/// One instance owns one global environment; run the REPL by reusing a
/// single `VM` across inputs.
#[derive(Debug, Default)]
pub struct VM {
    /// Operand stack, bounded by [`STACK_CAPACITY`].
    stack: Vec<Value>,

    /// Global environment: name to value.
    globals: AHashMap<Rc<str>, Value>,
}

impl VM {
    /// Creates a VM with an empty global environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(STACK_CAPACITY),
            globals: AHashMap::new(),
        }
    }

    /// Executes a top-level chunk to completion, returning its value.
    ///
    /// Globals defined by earlier runs remain visible; the operand stack is
    /// reset before execution starts.
    pub fn run(&mut self, chunk: Rc<Chunk>) -> DangResult<Value> {
        self.stack.clear();
        let mut frames: SmallVec<[Frame; 8]> = smallvec![Frame { chunk, ip: 0, fp: 0 }];

        loop {
            let (opcode, operand) = {
                let frame = frames.last_mut().expect("frame stack empty");
                let word = frame.chunk.code()[frame.ip];
                frame.ip += 1;
                let opcode = Opcode::from_repr(word).expect("invalid opcode in bytecode");

                let operand = if opcode.operand_count() == 1 {
                    let value = frame.chunk.code()[frame.ip];
                    frame.ip += 1;
                    value
                } else {
                    0
                };
                (opcode, operand)
            };

            match opcode {
                Opcode::LoadConst => {
                    let frame = frames.last().expect("frame stack empty");
                    let value = frame.chunk.constant(operand as usize).clone();
                    self.push(value)?;
                }

                // Globals
                Opcode::DefineGlobal => {
                    let name = Self::name_constant(&frames, operand);
                    if self.globals.contains_key(&name) {
                        return Err(Error::new(
                            ErrorKind::Name,
                            format!("variable already defined, cannot redefine: {name}"),
                        ));
                    }
                    let value = self.pop();
                    self.globals.insert(name, value);
                }
                Opcode::GetGlobal => {
                    let name = Self::name_constant(&frames, operand);
                    match self.globals.get(&name) {
                        Some(value) => {
                            let value = value.clone();
                            self.push(value)?;
                        }
                        None => {
                            return Err(Error::new(ErrorKind::Name, format!("undefined variable: {name}")));
                        }
                    }
                }
                Opcode::SetGlobal => {
                    let name = Self::name_constant(&frames, operand);
                    if !self.globals.contains_key(&name) {
                        return Err(Error::new(ErrorKind::Name, format!("undefined variable: {name}")));
                    }
                    let value = self.pop();
                    self.globals.insert(name, value);
                }

                // Locals
                Opcode::GetLocal => {
                    let fp = frames.last().expect("frame stack empty").fp;
                    let value = self.stack[fp + operand as usize].clone();
                    self.push(value)?;
                }
                Opcode::SetLocal => {
                    let fp = frames.last().expect("frame stack empty").fp;
                    let value = self.pop();
                    self.stack[fp + operand as usize] = value;
                }

                // Arithmetic: `a` is the right operand, `b` the left.
                Opcode::Add => self.binary_op(BinOp::Add)?,
                Opcode::Subtract => self.binary_op(BinOp::Subtract)?,
                Opcode::Multiply => self.binary_op(BinOp::Multiply)?,
                Opcode::Divide => self.binary_op(BinOp::Divide)?,

                Opcode::Pop => {
                    self.pop();
                }

                // Control flow: offsets are relative to the slot after the
                // operand, so `ip += operand` when taken.
                Opcode::Jump => {
                    let frame = frames.last_mut().expect("frame stack empty");
                    frame.ip = offset_ip(frame.ip, operand);
                }
                Opcode::JumpIfZero => {
                    let condition = self.pop();
                    if !condition.is_truthy() {
                        let frame = frames.last_mut().expect("frame stack empty");
                        frame.ip = offset_ip(frame.ip, operand);
                    }
                }

                Opcode::Call => {
                    let arity = operand as usize;
                    let callee_index = self.stack.len() - arity - 1;

                    let Value::Function(function) = &self.stack[callee_index] else {
                        return Err(Error::new(
                            ErrorKind::Type,
                            format!("value of type {} is not callable", self.stack[callee_index].type_name()),
                        ));
                    };
                    if function.arity != arity {
                        return Err(Error::new(
                            ErrorKind::Type,
                            format!(
                                "function {} takes {} arguments but {} were given",
                                function.name, function.arity, arity
                            ),
                        ));
                    }

                    let chunk = Rc::clone(&function.chunk);
                    let fp = self.stack.len() - arity;
                    frames.push(Frame { chunk, ip: 0, fp });
                }

                Opcode::Return => {
                    let result = self.pop();
                    let frame = frames.pop().expect("frame stack empty");

                    if frames.is_empty() {
                        return Ok(result);
                    }

                    // Drop the returning frame's locals, then the callee
                    // slot beneath them, and leave the result in its place.
                    self.stack.truncate(frame.fp);
                    self.pop();
                    self.push(result)?;
                }
            }
        }
    }

    /// Pops the two operands and pushes `b OP a`.
    fn binary_op(&mut self, op: BinOp) -> DangResult<()> {
        let a = self.pop();
        let b = self.pop();
        let result = b.binary_op(op, &a)?;
        self.push(result)
    }

    fn push(&mut self, value: Value) -> DangResult<()> {
        if self.stack.len() >= STACK_CAPACITY {
            return Err(Error::new(ErrorKind::StackOverflow, "value stack overflow"));
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Value {
        self.stack.pop().expect("value stack underflow")
    }

    /// Reads a global-name constant from the current frame's pool.
    fn name_constant(frames: &[Frame], operand: i64) -> Rc<str> {
        let frame = frames.last().expect("frame stack empty");
        match frame.chunk.constant(operand as usize) {
            Value::Str(name) => Rc::clone(name),
            other => unreachable!("global name constant must be a string, got {other:?}"),
        }
    }
}

/// Applies a relative jump offset to the instruction pointer.
fn offset_ip(ip: usize, operand: i64) -> usize {
    usize::try_from(ip as i64 + operand).expect("jump target out of range")
}
