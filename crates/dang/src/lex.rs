//! Tokenization of Dang source text.
//!
//! The lexer consumes characters with a one-character lookahead (plus a peek
//! at offset 1 to recognize comment openers) and produces a finite token
//! vector in a single pass. It never suspends; the first invalid character
//! or unterminated string ends lexing with an error.

use std::fmt;

use crate::error::{DangResult, Error, ErrorKind};

/// The closed set of token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    IntegerLiteral,
    DoubleLiteral,
    StringLiteral,
    Identifier,
    KwReturn,
    KwLet,
    KwIf,
    KwElse,
    KwFn,
    KwTrue,
    KwFalse,
    KwNull,
    Equals,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    Comma,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,
}

/// A single token.
///
/// `value` is meaningful only for the literal and identifier token types;
/// it is empty for keywords and punctuation. Two tokens are equal iff both
/// fields match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
}

impl Token {
    /// Creates a token that carries no value (keywords and punctuation).
    #[must_use]
    pub fn new(token_type: TokenType) -> Self {
        Self {
            token_type,
            value: String::new(),
        }
    }

    /// Creates a token that carries source text (literals and identifiers).
    #[must_use]
    pub fn with_value(token_type: TokenType, value: impl Into<String>) -> Self {
        Self {
            token_type,
            value: value.into(),
        }
    }
}

/// Renders the token back to its source form.
///
/// Lexing the rendered form of any token yields an equal token, which is
/// what the round-trip tests rely on.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token_type {
            TokenType::IntegerLiteral | TokenType::DoubleLiteral | TokenType::Identifier => f.write_str(&self.value),
            TokenType::StringLiteral => write!(f, "\"{}\"", self.value),
            TokenType::KwReturn => f.write_str("return"),
            TokenType::KwLet => f.write_str("let"),
            TokenType::KwIf => f.write_str("if"),
            TokenType::KwElse => f.write_str("else"),
            TokenType::KwFn => f.write_str("fn"),
            TokenType::KwTrue => f.write_str("true"),
            TokenType::KwFalse => f.write_str("false"),
            TokenType::KwNull => f.write_str("null"),
            TokenType::Equals => f.write_str("="),
            TokenType::OpenParen => f.write_str("("),
            TokenType::CloseParen => f.write_str(")"),
            TokenType::OpenCurly => f.write_str("{"),
            TokenType::CloseCurly => f.write_str("}"),
            TokenType::Comma => f.write_str(","),
            TokenType::Minus => f.write_str("-"),
            TokenType::Plus => f.write_str("+"),
            TokenType::Semicolon => f.write_str(";"),
            TokenType::Slash => f.write_str("/"),
            TokenType::Star => f.write_str("*"),
        }
    }
}

/// Lexer for Dang source text.
pub struct Lexer {
    /// Source characters; indexed rather than iterated so lookahead is cheap.
    src: Vec<char>,

    /// Current position into `src`.
    position: usize,
}

impl Lexer {
    /// Creates a lexer over the given source text.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            src: source.chars().collect(),
            position: 0,
        }
    }

    /// Tokenizes the whole source, returning the token vector.
    pub fn lex(mut self) -> DangResult<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek(0) {
            if ch.is_whitespace() {
                self.consume();
            } else if ch == '/' && self.peek(1) == Some('/') {
                self.skip_line_comment();
            } else if ch == '/' && self.peek(1) == Some('*') {
                self.skip_block_comment();
            } else if ch.is_ascii_digit() {
                tokens.push(self.lex_number());
            } else if ch.is_alphabetic() {
                tokens.push(self.lex_word());
            } else if ch == '"' {
                tokens.push(self.lex_string()?);
            } else {
                tokens.push(self.lex_punctuation()?);
            }
        }

        Ok(tokens)
    }

    /// Skips `// ...` through the next newline (or EOF).
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek(0) {
            self.consume();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skips `/* ... */`. An unterminated block comment silently ends at EOF.
    fn skip_block_comment(&mut self) {
        self.consume();
        self.consume();
        while let Some(ch) = self.peek(0) {
            if ch == '*' && self.peek(1) == Some('/') {
                self.consume();
                self.consume();
                return;
            }
            self.consume();
        }
    }

    /// Lexes an integer or double literal.
    ///
    /// Digits form an integer; a following `.` (and any further digits)
    /// turns the literal into a double.
    fn lex_number(&mut self) -> Token {
        let mut value = self.consume_while(|c| c.is_ascii_digit());

        if self.peek(0) == Some('.') {
            value.push(self.consume());
            value.push_str(&self.consume_while(|c| c.is_ascii_digit()));
            Token::with_value(TokenType::DoubleLiteral, value)
        } else {
            Token::with_value(TokenType::IntegerLiteral, value)
        }
    }

    /// Lexes an identifier or keyword.
    fn lex_word(&mut self) -> Token {
        let value = self.consume_while(char::is_alphanumeric);

        match value.as_str() {
            "return" => Token::new(TokenType::KwReturn),
            "let" => Token::new(TokenType::KwLet),
            "if" => Token::new(TokenType::KwIf),
            "else" => Token::new(TokenType::KwElse),
            "fn" => Token::new(TokenType::KwFn),
            "true" => Token::new(TokenType::KwTrue),
            "false" => Token::new(TokenType::KwFalse),
            "null" => Token::new(TokenType::KwNull),
            _ => Token::with_value(TokenType::Identifier, value),
        }
    }

    /// Lexes a string literal. No escape processing: the value is every
    /// character up to (not including) the next `"`.
    fn lex_string(&mut self) -> DangResult<Token> {
        self.consume();
        let value = self.consume_while(|c| c != '"');

        if self.peek(0) != Some('"') {
            return Err(Error::new(ErrorKind::Lex, "unterminated string literal"));
        }
        self.consume();

        Ok(Token::with_value(TokenType::StringLiteral, value))
    }

    /// Lexes a single-character punctuation token.
    fn lex_punctuation(&mut self) -> DangResult<Token> {
        let ch = self.consume();
        let token_type = match ch {
            '=' => TokenType::Equals,
            '(' => TokenType::OpenParen,
            ')' => TokenType::CloseParen,
            '{' => TokenType::OpenCurly,
            '}' => TokenType::CloseCurly,
            ',' => TokenType::Comma,
            '-' => TokenType::Minus,
            '+' => TokenType::Plus,
            ';' => TokenType::Semicolon,
            '/' => TokenType::Slash,
            '*' => TokenType::Star,
            _ => return Err(Error::new(ErrorKind::Lex, format!("unexpected character: {ch}"))),
        };
        Ok(Token::new(token_type))
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.src.get(self.position + offset).copied()
    }

    fn consume(&mut self) -> char {
        let ch = self.src[self.position];
        self.position += 1;
        ch
    }

    fn consume_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(ch) = self.peek(0) {
            if !predicate(ch) {
                break;
            }
            result.push(self.consume());
        }
        result
    }
}
