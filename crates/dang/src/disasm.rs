//! Bytecode disassembler, used only for diagnostics.

use std::fmt::Write as _;

use crate::{
    bytecode::{Chunk, Opcode},
    value::Value,
};

/// Column width of the mnemonic field.
const OPCODE_COLUMN_WIDTH: usize = 10;

/// Renders a chunk's instruction stream, one line per instruction.
///
/// Each line is the mnemonic padded to a fixed-width column, followed by the
/// operand if the instruction has one. After the listing, every constant
/// that holds a function is disassembled recursively under its own header.
#[must_use]
pub fn disassemble(chunk: &Chunk) -> String {
    let mut out = String::new();
    write_chunk(&mut out, chunk);

    for constant in chunk.constants() {
        if let Value::Function(function) = constant {
            let _ = writeln!(out, "\n== fn {} ==", function.name);
            out.push_str(&disassemble(&function.chunk));
        }
    }

    out
}

/// Writes the flat instruction listing for one chunk.
fn write_chunk(out: &mut String, chunk: &Chunk) {
    let code = chunk.code();
    let mut offset = 0;

    while offset < code.len() {
        let Some(opcode) = Opcode::from_repr(code[offset]) else {
            let _ = writeln!(out, "[ERROR: Invalid opcode {}]", code[offset]);
            return;
        };
        offset += 1;

        let mnemonic = opcode.to_string();
        out.push_str(&mnemonic);

        for _ in 0..opcode.operand_count() {
            if offset >= code.len() {
                out.push_str("[ERROR: End of code, expected arguments]");
                return;
            }
            for _ in mnemonic.len()..OPCODE_COLUMN_WIDTH {
                out.push(' ');
            }
            let _ = write!(out, " {}", code[offset]);
            offset += 1;
        }

        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{bytecode::Compiler, lex::Lexer, parse::Parser};

    fn compile(source: &str) -> Chunk {
        let tokens = Lexer::new(source).lex().unwrap();
        let program = Parser::new(tokens).parse().unwrap();
        Compiler::compile_program(&program).unwrap()
    }

    #[test]
    fn one_line_per_opcode() {
        let chunk = compile("let x = 5; { let y = x; x = y * 2; } return x;");
        let listing = disassemble(&chunk);

        let mut instructions = 0;
        let mut offset = 0;
        while offset < chunk.code().len() {
            let opcode = Opcode::from_repr(chunk.code()[offset]).unwrap();
            offset += 1 + opcode.operand_count();
            instructions += 1;
        }

        assert_eq!(listing.lines().count(), instructions);
    }

    #[test]
    fn listing_format() {
        let chunk = compile("return 1;");
        assert_eq!(disassemble(&chunk), "load_const 0\nreturn\n");
    }

    #[test]
    fn function_constants_are_listed_recursively() {
        let chunk = compile("fn f() { return 1; }");
        let listing = disassemble(&chunk);
        assert!(listing.contains("== fn f =="));
        // Outer chunk plus the nested body both appear.
        assert!(listing.matches("return").count() >= 2);
    }
}
