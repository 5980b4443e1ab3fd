//! Command-line driver: REPL, file and stdin modes.

use std::{
    env, fs,
    io::{self, BufRead as _, Read as _, Write as _},
    process::ExitCode,
};

use dang::ReplSession;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => repl(),
        2 if args[1] == "--ast" => usage(&args[0]),
        2 => run_file(&args[1], false),
        3 if args[1] == "--ast" => run_file(&args[2], true),
        _ => usage(&args[0]),
    }
}

fn usage(program: &str) -> ExitCode {
    eprintln!("error: invalid arguments");
    eprintln!("usage: {program} [--ast] [path/to/program.dang | -]");
    ExitCode::FAILURE
}

/// Evaluates one program read from a file (or stdin for `-`) and prints the
/// resulting value, or the parse tree when `print_ast` is set.
fn run_file(path: &str, print_ast: bool) -> ExitCode {
    let source = match read_program(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if print_ast {
        match dang::parse_program(&source) {
            Ok(program) => {
                println!("{program:#?}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        }
    } else {
        match dang::evaluate(&source) {
            Ok(value) => {
                println!("{value}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        }
    }
}

fn read_program(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|err| format!("error reading stdin: {err}"))?;
        return Ok(source);
    }

    fs::read_to_string(path).map_err(|err| format!("error reading {path}: {err}"))
}

/// Reads a line per prompt, evaluates it against one persistent session, and
/// prints the result. The first fatal error ends the session.
fn repl() -> ExitCode {
    let mut session = ReplSession::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        let Some(line) = lines.next() else {
            return ExitCode::SUCCESS;
        };
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        };

        match session.execute(&line) {
            Ok(value) => println!("{value}"),
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    }
}
