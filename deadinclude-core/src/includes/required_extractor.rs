//! Required-symbol extraction.
//!
//! Every variable whose type is not built-in and not rooted in `std`
//! requires the type named by the last identifier of its declared type.
//! For `Foo*` / `Foo&` that is the identifier before the markers, for
//! `Box<T>` it is the template name. This is a conservative approximation,
//! not type resolution.

use super::ledger::IncludeLedger;
use super::path::normalize;
use crate::frontend::{SourceUnit, TokenList, Variable};

/// Root namespace of the standard library.
const STD_NAMESPACE: &str = "std";

/// Records the type names required by the variables of `unit`.
pub fn extract_required_symbols(unit: &SourceUnit, ledger: &mut IncludeLedger) {
    let key = normalize(&unit.path);

    for id in 0..unit.variables.len() {
        let Some(variable) = unit.variables.get(id) else {
            continue;
        };
        if let Some(symbol) = required_symbol(&unit.tokens, variable) {
            ledger.record_required(&key, symbol);
        }
    }
}

/// The type name a variable requires, if any.
pub fn required_symbol<'t>(tokens: &'t TokenList, variable: &Variable) -> Option<&'t str> {
    let start = tokens.get(variable.type_start?)?;
    let end_index = variable.type_end?;
    let end = tokens.get(end_index)?;

    if start.standard_type || end.standard_type || start.is(STD_NAMESPACE) {
        return None;
    }

    let mut symbol_index = end_index;
    while tokens
        .get(symbol_index)
        .is_some_and(|t| t.is_pointer_or_reference() || t.is("const") || t.is("volatile"))
    {
        symbol_index = symbol_index.checked_sub(1)?;
    }
    if tokens.text(symbol_index) == Some(">") {
        symbol_index = tokens.find_opening_bracket(symbol_index)?.checked_sub(1)?;
    }

    tokens
        .get(symbol_index)
        .filter(|t| t.is_identifier())
        .map(|t| t.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{Token, TokenKind, VariableTable};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn required(source: &str) -> BTreeSet<String> {
        let unit = SourceUnit::from_source(&PathBuf::from("test.cpp"), source).unwrap();
        let mut ledger = IncludeLedger::new();
        extract_required_symbols(&unit, &mut ledger);
        ledger
            .get("test.cpp")
            .map(|r| r.required_symbols.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_class_members() {
        let symbols = required("class A { std::string a; std::string* b; Foo* c; char d[]; };");
        assert_eq!(symbols, BTreeSet::from(["Foo".to_string()]));
    }

    #[test]
    fn test_value_and_reference_types() {
        let symbols = required("void f(const Widget& w, Gadget g, Scope::Inner i, Node** head);");
        let expected: BTreeSet<String> = ["Widget", "Gadget", "Inner", "Node"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(symbols, expected);
    }

    #[test]
    fn test_template_names_the_template() {
        let symbols = required("Handle<Texture> tex; std::vector<Mesh> meshes;");
        assert_eq!(symbols, BTreeSet::from(["Handle".to_string()]));
    }

    #[test]
    fn test_builtins_only_record_nothing() {
        let unit = SourceUnit::from_source(&PathBuf::from("test.cpp"), "int a; double* b; long long c;")
            .unwrap();
        let mut ledger = IncludeLedger::new();
        extract_required_symbols(&unit, &mut ledger);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_missing_type_tokens_skipped() {
        let tokens: TokenList = vec![Token::new("Foo", TokenKind::Name, 1)].into_iter().collect();
        let variables = VariableTable::new(vec![
            Variable {
                name: "a".into(),
                type_start: None,
                type_end: Some(0),
                line: 1,
            },
            Variable {
                name: "b".into(),
                type_start: Some(0),
                type_end: None,
                line: 1,
            },
            Variable {
                name: "c".into(),
                type_start: Some(0),
                type_end: Some(42),
                line: 1,
            },
        ]);
        for variable in variables.iter() {
            assert_eq!(required_symbol(&tokens, variable), None);
        }
    }

    #[test]
    fn test_attributed_to_own_file() {
        let unit = SourceUnit::from_source(&PathBuf::from("src/App.CPP"), "Config cfg;").unwrap();
        let mut ledger = IncludeLedger::new();
        extract_required_symbols(&unit, &mut ledger);
        assert!(ledger.get("app.cpp").unwrap().required_symbols.contains("Config"));
    }
}
