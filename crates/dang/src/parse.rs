//! Recursive-descent parser with precedence climbing for expressions.
//!
//! Statements are chosen by one-token lookahead (two tokens for the
//! `identifier =` assignment form). The parser stops at the first grammar
//! violation; there is no recovery or resynchronization.

use crate::{
    error::{DangResult, Error, ErrorKind},
    expressions::{BinOp, Expr, FunctionDef, IfRest, IfStmt, Program, Stmt, Term},
    lex::{Token, TokenType},
};

/// Parser over a token vector.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Creates a parser over the given tokens.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, position: 0 }
    }

    /// Parses statements until EOF, returning the program.
    pub fn parse(mut self) -> DangResult<Program> {
        let mut body = Vec::new();

        while self.peek(0).is_some() {
            body.push(self.parse_stmt()?);
        }

        Ok(Program { body })
    }

    /// Parses a single statement.
    fn parse_stmt(&mut self) -> DangResult<Stmt> {
        let Some(token) = self.peek(0) else {
            return Err(Self::error("expected statement"));
        };

        match token.token_type {
            TokenType::KwReturn => {
                self.consume();

                let expr = self.parse_expr(0)?;
                self.must_consume(TokenType::Semicolon, "expected `;`")?;

                Ok(Stmt::Return(expr))
            }
            TokenType::KwLet => {
                self.consume();

                let identifier = self.must_consume(TokenType::Identifier, "expected identifier")?;
                self.must_consume(TokenType::Equals, "expected `=`")?;
                let expr = self.parse_expr(0)?;
                self.must_consume(TokenType::Semicolon, "expected `;`")?;

                Ok(Stmt::Let {
                    name: identifier.value,
                    expr,
                })
            }
            TokenType::Identifier if self.peek_type(1) == Some(TokenType::Equals) => {
                let identifier = self.consume();
                self.consume();

                let expr = self.parse_expr(0)?;
                self.must_consume(TokenType::Semicolon, "expected `;`")?;

                Ok(Stmt::Assign {
                    name: identifier.value,
                    expr,
                })
            }
            TokenType::OpenCurly => Ok(Stmt::Scope(self.parse_scope("expected scope")?)),
            TokenType::KwIf => {
                self.consume();

                let condition = self.parse_expr(0)?;
                let body = self.parse_scope("expected scope for if statement body")?;
                let rest = self.parse_if_rest()?;

                Ok(Stmt::If(IfStmt { condition, body, rest }))
            }
            TokenType::KwFn => {
                self.consume();

                let name = self.must_consume(TokenType::Identifier, "expected function name")?;
                self.must_consume(TokenType::OpenParen, "expected `(`")?;

                let mut arg_names = Vec::new();
                if let Some(first_arg) = self.maybe_consume(TokenType::Identifier) {
                    arg_names.push(first_arg.value);

                    while self.maybe_consume(TokenType::Comma).is_some() {
                        let arg = self.must_consume(TokenType::Identifier, "expected argument name")?;
                        arg_names.push(arg.value);
                    }
                }

                self.must_consume(TokenType::CloseParen, "expected argument name or `)`")?;

                let body = self.parse_scope("expected scope for function body")?;

                Ok(Stmt::FunctionDef(FunctionDef {
                    name: name.value,
                    arg_names,
                    body,
                }))
            }
            _ => Err(Self::error("expected statement")),
        }
    }

    /// Parses a `{ stmt* }` block, returning its statements.
    fn parse_scope(&mut self, missing_message: &str) -> DangResult<Vec<Stmt>> {
        if self.peek_type(0) != Some(TokenType::OpenCurly) {
            return Err(Self::error(missing_message));
        }
        self.consume();

        let mut body = Vec::new();
        while self.peek(0).is_some_and(|t| t.token_type != TokenType::CloseCurly) {
            body.push(self.parse_stmt()?);
        }

        self.must_consume(TokenType::CloseCurly, "expected `}`")?;

        Ok(body)
    }

    /// Parses the `else if` / `else` chain following an `if` arm.
    fn parse_if_rest(&mut self) -> DangResult<IfRest> {
        if self.peek_type(0) != Some(TokenType::KwElse) {
            return Ok(IfRest::None);
        }
        self.consume();

        if self.peek_type(0) == Some(TokenType::KwIf) {
            self.consume();

            let condition = self.parse_expr(0)?;
            let body = self.parse_scope("expected scope for `else if` body")?;
            let rest = self.parse_if_rest()?;

            Ok(IfRest::ElseIf(Box::new(IfStmt { condition, body, rest })))
        } else {
            let body = self.parse_scope("expected scope for `else` body")?;
            Ok(IfRest::Else(body))
        }
    }

    /// Parses an expression via precedence climbing.
    ///
    /// Parses a term as the left-hand side, then while the next token is a
    /// binary operator of precedence >= `min_prec`, consumes it and recurses
    /// with `min_prec = prec + 1` for the right-hand side, producing a
    /// left-associating tree.
    fn parse_expr(&mut self, min_prec: u8) -> DangResult<Expr> {
        let mut expr_lhs = Expr::Term(self.parse_term()?);

        loop {
            let Some(current_token) = self.peek(0) else {
                break;
            };
            let Some(bin_op) = BinOp::for_token(current_token.token_type) else {
                break;
            };

            let prec = bin_op.precedence();
            if prec < min_prec {
                break;
            }

            self.consume();

            let expr_rhs = self.parse_expr(prec + 1)?;

            expr_lhs = Expr::BinExpr {
                lhs: Box::new(expr_lhs),
                rhs: Box::new(expr_rhs),
                op: bin_op,
            };
        }

        Ok(expr_lhs)
    }

    /// Parses a term: a literal, identifier, call, or parenthesized expression.
    fn parse_term(&mut self) -> DangResult<Term> {
        let Some(token) = self.peek(0) else {
            return Err(Self::error("expected expression"));
        };

        match token.token_type {
            TokenType::IntegerLiteral => {
                let token = self.consume();
                let value = token
                    .value
                    .parse()
                    .map_err(|_| Self::error("integer literal out of range"))?;
                Ok(Term::IntLit(value))
            }
            TokenType::DoubleLiteral => {
                let token = self.consume();
                let value = token
                    .value
                    .parse()
                    .map_err(|_| Self::error("invalid double literal"))?;
                Ok(Term::DoubleLit(value))
            }
            TokenType::StringLiteral => Ok(Term::StringLit(self.consume().value)),
            TokenType::KwTrue => {
                self.consume();
                Ok(Term::BoolLit(true))
            }
            TokenType::KwFalse => {
                self.consume();
                Ok(Term::BoolLit(false))
            }
            TokenType::KwNull => {
                self.consume();
                Ok(Term::NullLit)
            }
            TokenType::Identifier if self.peek_type(1) == Some(TokenType::OpenParen) => {
                let name = self.consume();
                self.consume();

                let mut args = Vec::new();
                if self.peek(0).is_some_and(|t| t.token_type != TokenType::CloseParen) {
                    args.push(self.parse_expr(0)?);

                    while self.maybe_consume(TokenType::Comma).is_some() {
                        args.push(self.parse_expr(0)?);
                    }
                }

                self.must_consume(TokenType::CloseParen, "expected `)`")?;

                Ok(Term::FunctionCall { name: name.value, args })
            }
            TokenType::Identifier => Ok(Term::Identifier(self.consume().value)),
            TokenType::OpenParen => {
                self.consume();
                let expr = self.parse_expr(0)?;
                self.must_consume(TokenType::CloseParen, "expected `)`")?;
                Ok(Term::ParenExpr(Box::new(expr)))
            }
            _ => Err(Self::error("expected expression")),
        }
    }

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.position + offset)
    }

    fn peek_type(&self, offset: usize) -> Option<TokenType> {
        self.peek(offset).map(|t| t.token_type)
    }

    fn consume(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        self.position += 1;
        token
    }

    fn must_consume(&mut self, token_type: TokenType, error_message: &str) -> DangResult<Token> {
        if self.peek_type(0) == Some(token_type) {
            Ok(self.consume())
        } else {
            Err(Self::error(error_message))
        }
    }

    fn maybe_consume(&mut self, token_type: TokenType) -> Option<Token> {
        if self.peek_type(0) == Some(token_type) {
            Some(self.consume())
        } else {
            None
        }
    }

    fn error(message: &str) -> Error {
        Error::new(ErrorKind::Parse, message)
    }
}
