//! Token model shared by the lexer, the symbol collector and the extractors.
//!
//! Patterns are expressed as slices of [`Pat`] values matched at an index,
//! so every pattern the analysis uses is checked by the compiler instead of
//! being interpreted from a string template at runtime.

use serde::Serialize;

/// Built-in types that never require a user header.
pub const STANDARD_TYPES: &[&str] = &[
    "bool", "char", "char16_t", "char32_t", "double", "float", "int", "long", "short", "size_t",
    "void", "wchar_t",
];

/// Reserved words that can never name a user type or variable.
const KEYWORDS: &[&str] = &[
    "alignas", "alignof", "asm", "auto", "break", "case", "catch", "class", "const",
    "const_cast", "constexpr", "continue", "decltype", "default", "delete", "do",
    "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false", "for", "friend",
    "goto", "if", "inline", "mutable", "namespace", "new", "noexcept", "nullptr", "operator",
    "private", "protected", "public", "register", "reinterpret_cast", "return", "signed",
    "sizeof", "static", "static_assert", "static_cast", "struct", "switch", "template", "this",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "volatile", "while",
];

/// Returns true for built-in type names.
pub fn is_standard_type(name: &str) -> bool {
    STANDARD_TYPES.contains(&name)
}

/// Returns true for reserved words.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Identifier or keyword
    Name,
    /// String literal, quotes included
    Str,
    /// Character literal, quotes included
    Char,
    /// Numeric literal
    Number,
    /// Operator or punctuation
    Op,
    /// Preprocessor directive such as `#include`
    Directive,
    /// Angle-bracket include target such as `<stdio.h>`
    HeaderName,
}

/// A single token of a (possibly multi-file) token stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    /// 0 for the primary file, >0 for tokens that came from an included file
    pub file_index: u32,
    /// 1-indexed source line
    pub line: u32,
    pub standard_type: bool,
}

impl Token {
    /// Creates a primary-file token. Standard-type status is derived from the text.
    pub fn new(text: impl Into<String>, kind: TokenKind, line: u32) -> Self {
        let text = text.into();
        let standard_type = kind == TokenKind::Name && is_standard_type(&text);
        Self {
            text,
            kind,
            file_index: 0,
            line,
            standard_type,
        }
    }

    /// Moves the token to another file of the stream.
    pub fn with_file_index(mut self, file_index: u32) -> Self {
        self.file_index = file_index;
        self
    }

    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    pub fn is_name(&self) -> bool {
        self.kind == TokenKind::Name
    }

    /// A name that is neither a keyword nor a built-in type.
    pub fn is_identifier(&self) -> bool {
        self.is_name() && !self.standard_type && !is_keyword(&self.text)
    }

    /// `*`, `&` or `&&`.
    pub fn is_pointer_or_reference(&self) -> bool {
        self.kind == TokenKind::Op && matches!(self.text.as_str(), "*" | "&" | "&&")
    }
}

/// One element of a token pattern.
#[derive(Debug, Clone, Copy)]
pub enum Pat {
    /// Exact token text
    Lit(&'static str),
    /// Any of the listed texts
    OneOf(&'static [&'static str]),
    /// Any name, keywords included
    Name,
    /// A name that is not a keyword or built-in type
    Ident,
    /// A string literal
    Str,
    /// Any token
    Any,
}

impl Pat {
    pub fn matches(&self, tok: &Token) -> bool {
        match self {
            Pat::Lit(text) => tok.text == *text,
            Pat::OneOf(texts) => texts.contains(&tok.text.as_str()),
            Pat::Name => tok.is_name(),
            Pat::Ident => tok.is_identifier(),
            Pat::Str => tok.kind == TokenKind::Str,
            Pat::Any => true,
        }
    }
}

/// An indexable token stream.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Text of the token at `index`, if any.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|t| t.text.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Checks whether `pattern` matches the tokens starting at `index`.
    pub fn matches(&self, index: usize, pattern: &[Pat]) -> bool {
        pattern.iter().enumerate().all(|(offset, pat)| {
            self.tokens
                .get(index + offset)
                .is_some_and(|tok| pat.matches(tok))
        })
    }

    /// Finds the `>` closing the `<` at `open`.
    ///
    /// Parentheses and brackets inside the argument list are skipped. Returns
    /// `None` when a statement or block boundary is hit first.
    pub fn find_closing_bracket(&self, open: usize) -> Option<usize> {
        if self.text(open) != Some("<") {
            return None;
        }
        let mut angle = 0usize;
        let mut nested = 0usize;
        for (index, tok) in self.tokens.iter().enumerate().skip(open) {
            if tok.kind != TokenKind::Op {
                continue;
            }
            match tok.text.as_str() {
                "(" | "[" => nested += 1,
                ")" | "]" => {
                    if nested == 0 {
                        return None;
                    }
                    nested -= 1;
                }
                "<" if nested == 0 => angle += 1,
                ">" if nested == 0 => {
                    angle -= 1;
                    if angle == 0 {
                        return Some(index);
                    }
                }
                ";" | "{" | "}" => return None,
                _ => {}
            }
        }
        None
    }

    /// Finds the `<` opening the template argument list closed at `close`.
    pub fn find_opening_bracket(&self, close: usize) -> Option<usize> {
        if self.text(close) != Some(">") {
            return None;
        }
        let mut depth = 0usize;
        for index in (0..=close).rev() {
            match self.text(index) {
                Some(">") => depth += 1,
                Some("<") => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index);
                    }
                }
                Some(";") | Some("{") | Some("}") => return None,
                _ => {}
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl FromIterator<Token> for TokenList {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
