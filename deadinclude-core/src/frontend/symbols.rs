//! Heuristic scope and variable tables.
//!
//! A light stand-in for a real symbol database: it recognizes class/struct
//! definitions and forward declarations, and variable declarations that sit
//! at a statement or parameter boundary. Good enough to feed the include
//! extractors; not a C++ parser.

use serde::Serialize;

use super::token::{Pat, TokenKind, TokenList};

/// Kind of a named scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScopeKind {
    Class,
    Struct,
    Union,
    Namespace,
}

/// A named scope found in the token stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scope {
    pub kind: ScopeKind,
    pub name: String,
    /// `class Foo;` rather than `class Foo { ... }`
    pub forward_declaration: bool,
    pub line: u32,
}

impl Scope {
    pub fn new(kind: ScopeKind, name: impl Into<String>, forward_declaration: bool) -> Self {
        Self {
            kind,
            name: name.into(),
            forward_declaration,
            line: 0,
        }
    }

    pub fn is_class_or_struct(&self) -> bool {
        matches!(self.kind, ScopeKind::Class | ScopeKind::Struct)
    }
}

/// Ordered collection of scopes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
}

impl ScopeTable {
    pub fn new(scopes: Vec<Scope>) -> Self {
        Self { scopes }
    }

    pub fn push(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scope> {
        self.scopes.iter()
    }
}

/// A variable declaration. Type endpoints are indices into the unit's token list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub type_start: Option<usize>,
    pub type_end: Option<usize>,
    pub line: u32,
}

/// Variables indexed by a stable id (their insertion position).
#[derive(Debug, Clone, Default, Serialize)]
pub struct VariableTable {
    variables: Vec<Variable>,
}

impl VariableTable {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    /// Adds a variable and returns its id.
    pub fn push(&mut self, variable: Variable) -> usize {
        self.variables.push(variable);
        self.variables.len() - 1
    }

    pub fn get(&self, id: usize) -> Option<&Variable> {
        self.variables.get(id)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }
}

const SCOPE_KEYWORDS: &[&str] = &["class", "struct", "union", "namespace"];

/// Tokens that may precede the first token of a declaration.
const DECL_BOUNDARY: &[&str] = &[";", "{", "}", "(", ",", ":"];

/// Specifiers skipped before the type of a declaration.
const DECL_QUALIFIERS: &[&str] = &[
    "const", "static", "mutable", "volatile", "extern", "register", "inline", "constexpr",
    "thread_local", "struct", "class", "union", "enum", "typename", "signed", "unsigned",
];

/// Tokens that may follow a declared variable name.
const DECL_TERMINATORS: &[&str] = &[";", "=", "[", ",", ")", "{"];

/// Collects class/struct/union/namespace scopes of the primary file.
pub fn collect_scopes(tokens: &TokenList) -> ScopeTable {
    let mut table = ScopeTable::default();

    for (index, tok) in tokens.iter().enumerate() {
        if tok.file_index != 0 || !SCOPE_KEYWORDS.contains(&tok.text.as_str()) {
            continue;
        }
        // enum class / enum struct declares an enum, not a class
        if index > 0 && tokens.text(index - 1) == Some("enum") {
            continue;
        }

        // `class EXPORT_MACRO Name {` puts the name one token later
        let name_index = if tokens.matches(index + 1, &[Pat::Ident, Pat::Ident])
            && tokens.text(index + 2) != Some("final")
        {
            index + 2
        } else {
            index + 1
        };
        if !tokens.matches(name_index, &[Pat::Ident]) {
            continue;
        }
        let mut after = name_index + 1;
        if tokens.text(after) == Some("final") {
            after += 1;
        }

        let forward_declaration = match tokens.text(after) {
            Some("{") => false,
            Some(":") if tok.text != "namespace" => false,
            Some(";") if tok.text != "namespace" => true,
            _ => continue,
        };

        let kind = match tok.text.as_str() {
            "class" => ScopeKind::Class,
            "struct" => ScopeKind::Struct,
            "union" => ScopeKind::Union,
            _ => ScopeKind::Namespace,
        };
        if let Some(name) = tokens.get(name_index) {
            table.push(Scope {
                kind,
                name: name.text.clone(),
                forward_declaration,
                line: name.line,
            });
        }
    }

    table
}

/// Collects variable declarations of the primary file.
pub fn collect_variables(tokens: &TokenList) -> VariableTable {
    let mut table = VariableTable::default();

    let mut directive_line = None;
    for index in 0..tokens.len() {
        let Some(tok) = tokens.get(index) else {
            continue;
        };
        let prev = index.checked_sub(1).and_then(|i| tokens.get(i));
        if tok.kind == TokenKind::Directive {
            directive_line = Some(tok.line);
        }
        // first token after a preprocessor line
        let after_directive =
            prev.is_some_and(|p| Some(p.line) == directive_line && tok.line > p.line);
        let at_boundary = after_directive
            || prev.map_or(true, |p| DECL_BOUNDARY.contains(&p.text.as_str()));
        if !at_boundary || tok.file_index != 0 {
            continue;
        }
        if let Some(variable) = parse_declaration(tokens, index) {
            table.push(variable);
        }
    }

    table
}

/// Tries to read `qualifiers type [::seg|<args>]* [const|*|&]* name terminator` at `start`.
fn parse_declaration(tokens: &TokenList, start: usize) -> Option<Variable> {
    let mut pos = start;
    while tokens.matches(pos, &[Pat::OneOf(DECL_QUALIFIERS)]) {
        pos += 1;
    }

    let first = tokens.get(pos)?;
    if !(first.is_identifier() || first.standard_type) {
        return None;
    }
    let type_start = pos;
    let mut type_end = pos;
    pos += 1;

    loop {
        if tokens.matches(pos, &[Pat::Lit("::"), Pat::Name]) {
            type_end = pos + 1;
            pos += 2;
        } else if tokens.text(pos) == Some("<") {
            type_end = tokens.find_closing_bracket(pos)?;
            pos = type_end + 1;
        } else if tokens.get(type_end).is_some_and(|t| t.standard_type)
            && tokens.get(pos).is_some_and(|t| t.standard_type)
        {
            // long long, long double
            type_end = pos;
            pos += 1;
        } else {
            break;
        }
    }

    while let Some(tok) = tokens.get(pos) {
        if tok.is_pointer_or_reference() {
            type_end = pos;
        } else if !matches!(tok.text.as_str(), "const" | "volatile") {
            break;
        }
        pos += 1;
    }

    let name = tokens.get(pos)?;
    if !name.is_identifier() || !tokens.matches(pos + 1, &[Pat::OneOf(DECL_TERMINATORS)]) {
        return None;
    }

    Some(Variable {
        name: name.text.clone(),
        type_start: Some(type_start),
        type_end: Some(type_end),
        line: name.line,
    })
}
