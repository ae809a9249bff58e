//! Declared-symbol extraction.
//!
//! A file declares:
//! - every class/struct it defines (forward declarations excluded)
//! - every named `enum` (`enum class Name` included, anonymous enums skipped)
//! - every `typedef` alias
//!
//! Symbols are attributed to the file's own normalized name, never to an
//! include.
//!
//! Typedef resolution walks the aliased type (qualifiers, built-in type
//! words, `::` segments, pointer/reference markers, one template argument
//! list with trailing `::` segments and cv-qualifiers) and takes the token
//! right after it as the alias. Anything that does not fit is abandoned and
//! scanning resumes at the next token.

use tracing::debug;

use super::ledger::IncludeLedger;
use super::path::{normalize, HeaderKey};
use crate::frontend::{Pat, SourceUnit, TokenList};

const TYPEDEF_HEAD: &[Pat] = &[Pat::Lit("typedef"), Pat::Name];
const TYPE_PREFIX: &[Pat] = &[
    Pat::OneOf(&["const", "signed", "unsigned", "struct", "enum"]),
    Pat::Name,
];
const NAME_TERMINATORS: &[&str] = &["[", ";", ",", "("];
const POINTER_OR_REFERENCE: &[&str] = &["*", "&", "&&"];
const CV_QUALIFIERS: &[&str] = &["const", "volatile"];
const FUNCTION_POINTER_ALIAS: &[Pat] = &[
    Pat::Lit("("),
    Pat::OneOf(POINTER_OR_REFERENCE),
    Pat::Ident,
    Pat::Lit(")"),
];

/// Records the classes, structs, enums and typedef aliases declared by `unit`.
pub fn extract_declared_symbols(unit: &SourceUnit, ledger: &mut IncludeLedger) {
    let key = normalize(&unit.path);

    for scope in unit.scopes.iter() {
        if scope.forward_declaration {
            continue;
        }
        if scope.is_class_or_struct() {
            ledger.record_declared(&key, &scope.name, scope.line);
        }
    }

    let tokens = &unit.tokens;
    for (index, tok) in tokens.iter().enumerate() {
        if tok.file_index != 0 || !tok.is("enum") {
            continue;
        }
        let name_index = if tokens.matches(index + 1, &[Pat::OneOf(&["class", "struct"])]) {
            index + 2
        } else {
            index + 1
        };
        if let Some(name) = tokens.get(name_index).filter(|t| t.is_identifier()) {
            ledger.record_declared(&key, &name.text, name.line);
        }
    }

    extract_typedef_aliases(unit, &key, ledger);
}

/// Records every typedef alias of the primary file under `key`.
pub fn extract_typedef_aliases(unit: &SourceUnit, key: &HeaderKey, ledger: &mut IncludeLedger) {
    let tokens = &unit.tokens;
    let mut index = 0;

    while index < tokens.len() {
        let in_primary = tokens.get(index).is_some_and(|t| t.file_index == 0);
        if in_primary && tokens.matches(index, TYPEDEF_HEAD) {
            match resolve_typedef_alias(tokens, index) {
                Some(alias) => {
                    if let Some(tok) = tokens.get(alias) {
                        ledger.record_declared(key, &tok.text, tok.line);
                    }
                    index = alias + 1;
                    continue;
                }
                None => {
                    let line = tokens.get(index).map_or(0, |t| t.line);
                    debug!(file = %unit.path, line, "abandoning unrecognized typedef");
                }
            }
        }
        index += 1;
    }
}

/// Returns the index of the alias name declared by the `typedef` at `index`.
pub fn resolve_typedef_alias(tokens: &TokenList, index: usize) -> Option<usize> {
    if !tokens.matches(index, TYPEDEF_HEAD) {
        return None;
    }

    let mut offset = index + 1;
    while tokens.matches(offset, TYPE_PREFIX)
        || tokens.get(offset + 1).is_some_and(|t| t.standard_type)
    {
        offset += 1;
    }

    let mut cursor = offset + 1;
    loop {
        if tokens.text(cursor) == Some("::") {
            cursor += 1;
        }

        if tokens.matches(cursor, &[Pat::Name, Pat::Any])
            && !tokens.matches(cursor + 1, &[Pat::OneOf(NAME_TERMINATORS)])
        {
            cursor += 1;
        } else if tokens.matches(cursor, &[Pat::Lit("const"), Pat::Lit("(")]) {
            cursor += 1;
            break;
        } else if tokens.matches(cursor, &[Pat::OneOf(POINTER_OR_REFERENCE), Pat::Any]) {
            cursor += 1;
        } else {
            break;
        }
    }

    match tokens.text(cursor)? {
        "<" => {
            let mut end = tokens.find_closing_bracket(cursor)?;
            while tokens.matches(end + 1, &[Pat::Lit("::"), Pat::Name]) {
                end += 2;
            }
            while tokens.matches(end + 1, &[Pat::OneOf(CV_QUALIFIERS)]) {
                end += 1;
            }
            cursor = end + 1;
            while tokens.matches(cursor, &[Pat::OneOf(POINTER_OR_REFERENCE)]) {
                cursor += 1;
            }
        }
        // typedef struct { ... } Name;
        "{" => {
            cursor = find_closing_brace(tokens, cursor)? + 1;
            while tokens.matches(cursor, &[Pat::OneOf(POINTER_OR_REFERENCE)]) {
                cursor += 1;
            }
        }
        // typedef void (*Name)(int);
        "(" if tokens.matches(cursor, FUNCTION_POINTER_ALIAS) => cursor += 2,
        _ => {}
    }

    tokens.get(cursor).filter(|t| t.is_identifier()).map(|_| cursor)
}

fn find_closing_brace(tokens: &TokenList, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for index in open..tokens.len() {
        match tokens.text(index) {
            Some("{") => depth += 1,
            Some("}") => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{tokenize, Scope, ScopeKind, ScopeTable, TokenList};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn declared(path: &str, source: &str) -> BTreeSet<String> {
        let unit = SourceUnit::from_source(&PathBuf::from(path), source).unwrap();
        let mut ledger = IncludeLedger::new();
        extract_declared_symbols(&unit, &mut ledger);
        ledger
            .get(normalize(path).as_str())
            .map(|r| r.declared_symbols.clone())
            .unwrap_or_default()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_templated_typedef() {
        assert_eq!(declared("a.h", "typedef std::set<std::string> X;"), set(&["X"]));
    }

    #[test]
    fn test_struct_pointer_typedef_single_entry() {
        assert_eq!(
            declared("a.h", "typedef struct yy_buffer_state *Y; void f(){ Y v; }"),
            set(&["Y"])
        );
    }

    #[test]
    fn test_scoped_usage_is_not_a_typedef() {
        assert_eq!(declared("a.h", "typedef int abc; Scope::abc f;"), set(&["abc"]));
    }

    #[test]
    fn test_builtin_multiword_typedefs() {
        assert_eq!(
            declared("a.h", "typedef unsigned int uint; typedef long long i64; typedef const char* cstr;"),
            set(&["uint", "i64", "cstr"])
        );
    }

    #[test]
    fn test_nested_template_with_trailing_scope() {
        assert_eq!(
            declared("a.h", "typedef std::map<int, std::vector<int> >::const_iterator Iter;"),
            set(&["Iter"])
        );
    }

    #[test]
    fn test_anonymous_struct_typedef() {
        assert_eq!(declared("a.h", "typedef struct { int x; } Point;"), set(&["Point"]));
    }

    #[test]
    fn test_function_pointer_typedef() {
        assert_eq!(declared("a.h", "typedef void (*Handler)(int);"), set(&["Handler"]));
    }

    #[test]
    fn test_malformed_typedef_abandoned() {
        // unmatched template bracket, then a valid typedef
        assert_eq!(
            declared("a.h", "typedef std::vector<int Broken; typedef int Fine;"),
            set(&["Fine"])
        );
        assert!(declared("a.h", "typedef;").is_empty());
    }

    #[test]
    fn test_classes_and_enums() {
        let source = "class Fwd; class Widget { }; struct Point { int x; }; \
                      enum Color { Red }; enum class Mode { On }; enum { Anon };";
        assert_eq!(
            declared("src/Shapes.H", source),
            set(&["Widget", "Point", "Color", "Mode"])
        );
    }

    #[test]
    fn test_attributed_to_own_file() {
        let unit = SourceUnit::from_source(&PathBuf::from("lib/Widget.h"), "class Widget {};").unwrap();
        let mut ledger = IncludeLedger::new();
        extract_declared_symbols(&unit, &mut ledger);
        let record = ledger.get("widget.h").unwrap();
        assert!(record.declared_symbols.contains("Widget"));
        assert!(record.filename.is_empty(), "declaring does not make a file an include");
        assert_eq!(record.line_number, 1);
    }

    #[test]
    fn test_scope_table_from_host() {
        let scopes = ScopeTable::new(vec![
            Scope::new(ScopeKind::Class, "Parser", false),
            Scope::new(ScopeKind::Class, "Lexer", true),
            Scope::new(ScopeKind::Namespace, "detail", false),
        ]);
        let unit = SourceUnit::new("parser.h", Default::default(), Default::default(), scopes);
        let mut ledger = IncludeLedger::new();
        extract_declared_symbols(&unit, &mut ledger);
        assert_eq!(ledger.get("parser.h").unwrap().declared_symbols, set(&["Parser"]));
    }

    #[test]
    fn test_enums_and_typedefs_from_included_files_ignored() {
        let inner = tokenize(&PathBuf::from("inner.h"), "enum Inner { A }; typedef int InnerT;").unwrap();
        let outer = tokenize(&PathBuf::from("outer.h"), "enum Outer { B }; typedef int OuterT;").unwrap();
        let tokens: TokenList = inner
            .iter()
            .map(|t| t.clone().with_file_index(1))
            .chain(outer.iter().cloned())
            .collect();
        let unit = SourceUnit::new("outer.h", tokens, Default::default(), Default::default());

        let mut ledger = IncludeLedger::new();
        extract_declared_symbols(&unit, &mut ledger);
        assert_eq!(
            ledger.get("outer.h").unwrap().declared_symbols,
            set(&["Outer", "OuterT"])
        );
        assert!(ledger.get("inner.h").is_none());
    }
}
