//! BNF rendering of the query grammar.

use mdf_qualifier::Registry;

/// Renders the grammar with the scope and operator catalogues of the
/// given registry interpolated.
pub(crate) fn bnf(registry: &Registry) -> String {
    let scopes = registry.scopes().join(" | ");
    let operators = registry
        .operators()
        .iter()
        .map(|operator| format!("\"{operator}\""))
        .collect::<Vec<_>>()
        .join(" | ");
    format!(
        r#"<query>      ::= <expression>
<expression> ::= <term> ( <or> <term> )*
<term>       ::= <factor> ( ( <and> | <not> ) <factor> )*
<factor>     ::= [ <qualifier> ] <match>
<match>      ::= <keyword> | <phrase> | <regexp> | "(" <expression> ")"
<qualifier>  ::= <scope> <operator>
<and>        ::= " " | "AND"
<or>         ::= "|" | "OR"
<not>        ::= "-"
<phrase>     ::= '"' ... '"'
<regexp>     ::= "/" ... "/"
<keyword>    ::= bare text up to whitespace, a quote, a paren or "|"
<operator>   ::= {operators}
<scope>      ::= {scopes}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scope_appears_exactly_once() {
        let registry = Registry::with_defaults();
        let grammar = bnf(&registry);
        let words: Vec<&str> = grammar
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();
        for scope in registry.scopes() {
            let count = words.iter().filter(|word| **word == scope).count();
            assert_eq!(count, 1, "scope {scope} appears {count} times");
        }
    }

    #[test]
    fn operators_are_listed() {
        let registry = Registry::with_defaults();
        let grammar = bnf(&registry);
        for operator in registry.operators() {
            assert!(grammar.contains(&format!("\"{operator}\"")));
        }
    }
}
