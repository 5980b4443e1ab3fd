//! AST node types produced by the parser.
//!
//! The tree is a set of tagged enums with exhaustive dispatch in the
//! compiler; recursive variants hold boxed subtrees to break the size cycle,
//! and no node is ever shared between parents. The `Debug` representation
//! (via `{:#?}`) is the human-readable tree view used by the CLI's `--ast`
//! flag.

use strum::Display;

use crate::lex::TokenType;

/// Binary operator of a [`Expr::BinExpr`] node.
///
/// The `Display` serialization is the lowercase operator name used in
/// diagnostics and the AST view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BinOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinOp {
    /// Binding strength: additive operators bind weaker than multiplicative.
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Subtract => 0,
            Self::Multiply | Self::Divide => 1,
        }
    }

    /// Maps an operator token to its `BinOp`, or `None` for any other token.
    #[must_use]
    pub fn for_token(token_type: TokenType) -> Option<Self> {
        match token_type {
            TokenType::Plus => Some(Self::Add),
            TokenType::Minus => Some(Self::Subtract),
            TokenType::Star => Some(Self::Multiply),
            TokenType::Slash => Some(Self::Divide),
            _ => None,
        }
    }

    /// The source symbol, for diagnostics ("invalid operands to +: ...").
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

/// A primary expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    IntLit(i64),
    DoubleLit(f64),
    StringLit(String),
    BoolLit(bool),
    NullLit,
    Identifier(String),
    ParenExpr(Box<Expr>),
    FunctionCall { name: String, args: Vec<Expr> },
}

/// An expression: a term, or a left-associating binary expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Term(Term),
    BinExpr {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        op: BinOp,
    },
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Return(Expr),
    Let { name: String, expr: Expr },
    Assign { name: String, expr: Expr },
    Scope(Vec<Stmt>),
    If(IfStmt),
    FunctionDef(FunctionDef),
}

/// An `if` arm with its chained rest.
///
/// `else if` arms reuse this shape recursively through [`IfRest::ElseIf`].
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub rest: IfRest,
}

/// What follows an `if` arm: nothing, another conditional arm, or the final
/// `else` block.
#[derive(Debug, Clone, PartialEq)]
pub enum IfRest {
    None,
    ElseIf(Box<IfStmt>),
    Else(Vec<Stmt>),
}

/// A named function definition with positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub arg_names: Vec<String>,
    pub body: Vec<Stmt>,
}

/// A whole program: the top-level statement list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}
