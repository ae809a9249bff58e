//! Minimal C/C++ lexer.
//!
//! Produces the token stream of a single primary file (file index 0). No
//! macro expansion happens here: directives become single `#name` tokens and
//! the rest of the directive line is lexed like ordinary code, except for the
//! free-text directives in [`OPAQUE_DIRECTIVES`].
//!
//! Conditional blocks are not evaluated, so `#if 0` bodies are lexed too. A
//! quote left open at the end of a line therefore becomes one `Op` token
//! instead of failing the whole file.
//!
//! `<` and `>` are always emitted as single tokens so that template argument
//! lists stay balanced for [`TokenList::find_closing_bracket`].

use std::path::Path;

use tracing::debug;

use super::token::{Token, TokenKind, TokenList};
use crate::error::{DeadincludeError, DeadincludeResult};

/// Two-character operators fused into one token.
const FUSED_OPS: &[&str] = &[
    "::", "->", "&&", "||", "==", "!=", "<=", ">=", "++", "--", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "##",
];

/// Directives whose remaining line is free text, skipped unlexed.
const OPAQUE_DIRECTIVES: &[&str] = &["error", "warning", "pragma"];

/// Identifier prefixes that turn a following `"` into a raw string literal.
const RAW_PREFIXES: &[&str] = &["R", "LR", "uR", "UR", "u8R"];

struct Lexer<'a> {
    path: &'a Path,
    chars: Vec<char>,
    pos: usize,
    line: u32,
    at_line_start: bool,
    tokens: TokenList,
}

impl<'a> Lexer<'a> {
    fn new(path: &'a Path, source: &str) -> Self {
        Self {
            path,
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            at_line_start: true,
            tokens: TokenList::default(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn emit(&mut self, text: String, kind: TokenKind, line: u32) {
        self.tokens.push(Token::new(text, kind, line));
        self.at_line_start = false;
    }

    fn run(mut self) -> DeadincludeResult<TokenList> {
        while let Some(c) = self.peek(0) {
            match c {
                '\\' if self.peek(1) == Some('\n') => {
                    self.pos += 2;
                    self.line += 1;
                }
                '\\' if self.peek(1) == Some('\r') && self.peek(2) == Some('\n') => {
                    self.pos += 3;
                    self.line += 1;
                }
                '\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.at_line_start = true;
                }
                c if c.is_whitespace() => self.pos += 1,
                '/' if self.peek(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek(1) == Some('*') => self.skip_block_comment()?,
                '#' if self.at_line_start => self.lex_directive(),
                '"' => self.lex_quoted('"', TokenKind::Str),
                '\'' => self.lex_quoted('\'', TokenKind::Char),
                c if c.is_ascii_digit() => self.lex_number(),
                '.' if self.peek(1).is_some_and(|n| n.is_ascii_digit()) => self.lex_number(),
                c if c == '_' || c.is_alphabetic() => self.lex_name()?,
                _ => self.lex_op(),
            }
        }
        Ok(self.tokens)
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> DeadincludeResult<()> {
        let start_line = self.line;
        self.pos += 2;
        loop {
            match self.peek(0) {
                None => {
                    return Err(DeadincludeError::lex_at(
                        self.path,
                        "unterminated block comment",
                        start_line,
                    ))
                }
                Some('*') if self.peek(1) == Some('/') => {
                    self.pos += 2;
                    return Ok(());
                }
                Some('\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek(0).is_some_and(&pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn skip_blanks(&mut self) {
        while self.peek(0).is_some_and(|c| c == ' ' || c == '\t') {
            self.pos += 1;
        }
    }

    fn lex_directive(&mut self) {
        let line = self.line;
        self.pos += 1;
        self.skip_blanks();
        let name = self.take_while(|c| c == '_' || c.is_alphanumeric());
        self.emit(format!("#{}", name), TokenKind::Directive, line);

        if name == "include" {
            self.skip_blanks();
            if self.peek(0) == Some('<') {
                self.lex_header_name();
            }
        } else if OPAQUE_DIRECTIVES.contains(&name.as_str()) {
            self.skip_directive_text();
        }
    }

    /// Skips to the end of the logical line, following continuations.
    fn skip_directive_text(&mut self) {
        while let Some(c) = self.peek(0) {
            match c {
                '\\' if self.peek(1) == Some('\n') => {
                    self.pos += 2;
                    self.line += 1;
                }
                '\n' => break,
                _ => self.pos += 1,
            }
        }
    }

    /// Lexes `<path>` after `#include` as one token. A target without `>` on
    /// the same line is left to the ordinary lexer.
    fn lex_header_name(&mut self) {
        let mut end = self.pos + 1;
        while let Some(&c) = self.chars.get(end) {
            match c {
                '>' => {
                    let text: String = self.chars[self.pos..=end].iter().collect();
                    self.pos = end + 1;
                    let line = self.line;
                    self.emit(text, TokenKind::HeaderName, line);
                    return;
                }
                '\n' => return,
                _ => end += 1,
            }
        }
    }

    /// Lexes a string or character literal. An unterminated one runs to the
    /// end of the line and is emitted as a single `Op` token.
    fn lex_quoted(&mut self, quote: char, kind: TokenKind) {
        let line = self.line;
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek(0) {
                None | Some('\n') => {
                    debug!(file = %self.path.display(), line, "unterminated literal");
                    let text: String = self.chars[start..self.pos].iter().collect();
                    self.emit(text, TokenKind::Op, line);
                    return;
                }
                Some('\\') => {
                    if self.peek(1) == Some('\n') {
                        self.line += 1;
                    }
                    self.pos += 2;
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.emit(text, kind, line);
    }

    /// `R"delim( ... )delim"`; the prefix was already consumed.
    fn lex_raw_string(&mut self, prefix: String) -> DeadincludeResult<()> {
        let line = self.line;
        let start = self.pos;
        self.pos += 1;
        let delim = self.take_while(|c| c != '(' && c != '\n' && c != '"');
        if self.peek(0) != Some('(') {
            return Err(DeadincludeError::lex_at(self.path, "malformed raw string literal", line));
        }
        let closing: Vec<char> = format!("){}\"", delim).chars().collect();
        while self.pos < self.chars.len() {
            if self.chars[self.pos..].starts_with(&closing) {
                self.pos += closing.len();
                let body: String = self.chars[start..self.pos].iter().collect();
                self.emit(format!("{}{}", prefix, body), TokenKind::Str, line);
                return Ok(());
            }
            if self.chars[self.pos] == '\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        Err(DeadincludeError::lex_at(self.path, "unterminated raw string literal", line))
    }

    fn lex_number(&mut self) {
        let line = self.line;
        let start = self.pos;
        while let Some(c) = self.peek(0) {
            let exponent_sign = (c == '+' || c == '-')
                && self.pos > start
                && matches!(self.chars[self.pos - 1], 'e' | 'E' | 'p' | 'P');
            let separator = c == '\'' && self.peek(1).is_some_and(|n| n.is_ascii_alphanumeric());
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign || separator {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.emit(text, TokenKind::Number, line);
    }

    fn lex_name(&mut self) -> DeadincludeResult<()> {
        let line = self.line;
        let name = self.take_while(|c| c == '_' || c.is_alphanumeric());
        if self.peek(0) == Some('"') && RAW_PREFIXES.contains(&name.as_str()) {
            return self.lex_raw_string(name);
        }
        self.emit(name, TokenKind::Name, line);
        Ok(())
    }

    fn lex_op(&mut self) {
        let line = self.line;
        if let (Some(a), Some(b)) = (self.peek(0), self.peek(1)) {
            let pair: String = [a, b].iter().collect();
            if FUSED_OPS.contains(&pair.as_str()) {
                self.pos += 2;
                self.emit(pair, TokenKind::Op, line);
                return;
            }
        }
        let c = self.chars[self.pos];
        self.pos += 1;
        self.emit(c.to_string(), TokenKind::Op, line);
    }
}

/// Tokenizes `source` as the primary file of a token stream.
pub fn tokenize(path: &Path, source: &str) -> DeadincludeResult<TokenList> {
    Lexer::new(path, source).run()
}
