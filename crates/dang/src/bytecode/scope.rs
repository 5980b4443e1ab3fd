//! Lexical scope resolution.
//!
//! `Vars` maps names to their residency: a stack slot for locals, or a
//! by-name entry in the global table. Scope boundaries are indices into the
//! name stack; closing a scope reports how many names fell out of it so the
//! compiler can emit the matching `pop` instructions.

use crate::error::{DangResult, Error, ErrorKind};

/// Which kind of chunk is being compiled.
///
/// In script mode the outermost scope is the global scope: definitions
/// there bind by name in the VM's global table. In function mode every
/// scope is local (globals may still be *looked up* by name).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerKind {
    Script,
    Function,
}

/// Residency of a resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarRef {
    /// Stack slot relative to the frame pointer.
    Local(usize),
    /// Named entry in the global table.
    Global(String),
}

/// Scope resolver state: the name stack and its scope boundaries.
#[derive(Debug)]
pub struct Vars {
    kind: CompilerKind,

    /// Names of live locals, in definition order. Slot index is position.
    vars: Vec<String>,

    /// Indices into `vars` where each open scope began. The outermost scope
    /// is open from construction and never closed.
    scopes: Vec<usize>,
}

impl Vars {
    /// Creates a resolver with the outermost scope open.
    #[must_use]
    pub fn new(kind: CompilerKind) -> Self {
        Self {
            kind,
            vars: Vec::new(),
            scopes: vec![0],
        }
    }

    /// Resolves a name, walking live locals from most recent to oldest.
    ///
    /// A name with no live local resolves to a global reference; whether
    /// the global exists is only known at run time.
    #[must_use]
    pub fn lookup(&self, name: &str) -> VarRef {
        match self.vars.iter().rposition(|var| var == name) {
            Some(index) => VarRef::Local(index),
            None => VarRef::Global(name.to_owned()),
        }
    }

    /// Defines a name in the innermost scope.
    ///
    /// At global depth in script mode the definition is by name. Otherwise
    /// the name takes the next stack slot; defining a name twice in the
    /// same scope is an error (shadowing an outer scope's name is not).
    pub fn define(&mut self, name: &str) -> DangResult<VarRef> {
        if self.kind == CompilerKind::Script && self.scopes.len() <= 1 {
            return Ok(VarRef::Global(name.to_owned()));
        }

        let scope_start = *self.scopes.last().expect("scope stack is never empty");
        if self.vars[scope_start..].iter().any(|var| var == name) {
            return Err(Error::new(
                ErrorKind::Resolve,
                format!("variable already defined, cannot redefine: {name}"),
            ));
        }

        let index = self.vars.len();
        self.vars.push(name.to_owned());
        Ok(VarRef::Local(index))
    }

    /// Opens a new scope.
    pub fn start_scope(&mut self) {
        self.scopes.push(self.vars.len());
    }

    /// Closes the innermost scope, returning how many names it defined.
    ///
    /// The caller emits one `pop` per returned name.
    pub fn end_scope(&mut self) -> usize {
        let boundary = self.scopes.pop().expect("end_scope without matching start_scope");
        let count = self.vars.len() - boundary;
        self.vars.truncate(boundary);
        count
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn end_scope_returns_number_of_variables_to_pop() {
        let mut vars = Vars::new(CompilerKind::Function);
        vars.define("a").unwrap();

        vars.start_scope();
        vars.define("b1").unwrap();

        vars.start_scope();
        vars.define("c").unwrap();

        vars.start_scope();
        assert_eq!(vars.end_scope(), 0);

        assert_eq!(vars.end_scope(), 1);

        vars.define("b2").unwrap();
        vars.define("b3").unwrap();

        assert_eq!(vars.end_scope(), 3);
    }

    #[test]
    fn shadowing_variables_works() {
        let mut vars = Vars::new(CompilerKind::Function);
        vars.define("a").unwrap();

        vars.start_scope();
        vars.define("a").unwrap();

        assert_eq!(vars.lookup("a"), VarRef::Local(1));

        vars.end_scope();
        assert_eq!(vars.lookup("a"), VarRef::Local(0));
    }

    #[test]
    fn duplicate_definition_in_same_scope_is_an_error() {
        let mut vars = Vars::new(CompilerKind::Function);
        vars.define("x").unwrap();
        let err = vars.define("x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolve);
    }

    #[test]
    fn script_kind_defines_globals_at_the_outermost_scope() {
        let mut vars = Vars::new(CompilerKind::Script);
        assert_eq!(vars.define("x").unwrap(), VarRef::Global("x".to_owned()));

        // Globals are not locals: lookup still resolves by name.
        assert_eq!(vars.lookup("x"), VarRef::Global("x".to_owned()));

        // Nested scopes allocate slots starting at 0.
        vars.start_scope();
        assert_eq!(vars.define("y").unwrap(), VarRef::Local(0));
        assert_eq!(vars.lookup("y"), VarRef::Local(0));
        assert_eq!(vars.end_scope(), 1);
    }

    #[test]
    fn script_globals_can_repeat_at_compile_time() {
        // Redefinition of a global is detected by the VM at run time, not
        // by the resolver.
        let mut vars = Vars::new(CompilerKind::Script);
        vars.define("x").unwrap();
        assert_eq!(vars.define("x").unwrap(), VarRef::Global("x".to_owned()));
    }

    #[test]
    fn function_kind_treats_every_scope_as_local() {
        let mut vars = Vars::new(CompilerKind::Function);
        assert_eq!(vars.define("arg0").unwrap(), VarRef::Local(0));
        assert_eq!(vars.define("arg1").unwrap(), VarRef::Local(1));

        vars.start_scope();
        assert_eq!(vars.define("local").unwrap(), VarRef::Local(2));
    }
}
