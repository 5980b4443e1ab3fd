//! Diagnostics for every phase of the pipeline.
//!
//! All errors are fatal to the evaluation that raised them: each phase stops
//! at the first failure and returns `Err`. The embedding driver (CLI or test)
//! is the diagnostic sink; it decides whether to print and exit or to
//! inspect the error value.

use std::fmt;

use strum::{Display, IntoStaticStr};

/// Result type alias used by every phase of the pipeline.
pub type DangResult<T> = Result<T, Error>;

/// Category of a diagnostic, following the phase that produced it.
///
/// Uses strum derives for the `Display` implementation; the serialized form
/// is the human-readable prefix of the diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum ErrorKind {
    /// Tokenization failure: unexpected character, unterminated string.
    #[strum(serialize = "lex error")]
    Lex,
    /// Grammar violation: unexpected token, missing `;`, `)` or `}`.
    #[strum(serialize = "parse error")]
    Parse,
    /// Compile-time name resolution failure: duplicate definition in the
    /// same scope.
    #[strum(serialize = "resolve error")]
    Resolve,
    /// Runtime name failure: undefined global on access or assignment,
    /// redefinition of an existing global.
    #[strum(serialize = "name error")]
    Name,
    /// Invalid operand types for an operation, calling a non-function, or
    /// an arity mismatch.
    #[strum(serialize = "type error")]
    Type,
    /// Integer division with a zero divisor.
    #[strum(serialize = "zero division error")]
    ZeroDivision,
    /// The value stack exceeded its fixed capacity.
    #[strum(serialize = "stack overflow")]
    StackOverflow,
}

/// A single fatal diagnostic.
///
/// Displays as `{kind}: {message}`, e.g.
/// `type error: invalid operands to +: int and string`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    /// Creates a new error with the given category and message.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the diagnostic category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message, without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}
