//! Persistent REPL session support.
//!
//! `ReplSession` keeps interpreter state across `execute()` calls so
//! interactive snippets can share global variables and functions. Each
//! input is compiled as a full program and run against the session's VM;
//! only the global environment survives between inputs.

use std::rc::Rc;

use crate::{bytecode::VM, error::DangResult, run::compile, value::Value};

/// A REPL session: one VM reused across inputs.
#[derive(Debug, Default)]
pub struct ReplSession {
    vm: VM,
}

impl ReplSession {
    /// Creates a session with an empty global environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles and executes one input against the session VM.
    ///
    /// An input without a `return` statement evaluates to `null`. Errors
    /// are fatal to the input but leave already-defined globals intact.
    pub fn execute(&mut self, source: &str) -> DangResult<Value> {
        let chunk = Rc::new(compile(source)?);
        self.vm.run(chunk)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn globals_persist_between_inputs() {
        let mut session = ReplSession::new();
        assert_eq!(session.execute("let x = 5;").unwrap(), Value::Null);
        assert_eq!(session.execute("return x * x;").unwrap(), Value::Int(25));
    }

    #[test]
    fn functions_persist_between_inputs() {
        let mut session = ReplSession::new();
        session.execute("fn add(a, b) { return a + b; }").unwrap();
        assert_eq!(session.execute("return add(20, 22);").unwrap(), Value::Int(42));
    }

    #[test]
    fn assignments_update_session_state() {
        let mut session = ReplSession::new();
        session.execute("let counter = 0;").unwrap();
        session.execute("counter = counter + 1;").unwrap();
        assert_eq!(session.execute("return counter;").unwrap(), Value::Int(1));
    }

    #[test]
    fn redefining_a_global_is_an_error() {
        let mut session = ReplSession::new();
        session.execute("let x = 1;").unwrap();
        let err = session.execute("let x = 2;").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Name);
    }

    #[test]
    fn state_survives_a_failed_input() {
        let mut session = ReplSession::new();
        session.execute("let x = 1;").unwrap();
        assert!(session.execute("return missing;").is_err());
        assert_eq!(session.execute("return x;").unwrap(), Value::Int(1));
    }
}
