//! Grammar shipped with the command line tool.
//!
//! ```text
//! S -> a A D | b B c
//! A -> c B d | b D a
//! B -> b C d | ε
//! C -> c D d
//! D -> d B   | a C b
//! ```

use crate::{Grammar, Symbol};

/// Parses a body written as a string: upper case letters are variables, `ε` is epsilon and
/// anything else is a terminal. Whitespace is ignored.
pub fn body(source: &str) -> Vec<Symbol<char, char>> {
    source
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'ε' => Symbol::Epsilon,
            c if c.is_ascii_uppercase() => Symbol::Variable(c),
            c => Symbol::Terminal(c),
        })
        .collect()
}

/// Builds the built-in grammar.
pub fn grammar() -> Grammar<char, char> {
    Grammar::builder()
        .with_start_variable('S')
        .with_rules('S', [body("aAD"), body("bBc")])
        .with_rules('A', [body("cBd"), body("bDa")])
        .with_rules('B', [body("bCd"), body("ε")])
        .with_rules('C', [body("cDd")])
        .with_rules('D', [body("dB"), body("aCb")])
        .build()
        .expect("built-in grammar should be closed")
}

#[cfg(test)]
mod tests {
    use super::{body, grammar};
    use crate::Symbol;

    #[test]
    fn body_notation() {
        assert_eq!(
            body("a B ε"),
            vec![
                Symbol::Terminal('a'),
                Symbol::Variable('B'),
                Symbol::Epsilon
            ]
        );
    }

    #[test]
    fn shape() {
        let grammar = grammar();

        assert_eq!(grammar.start_variable(), &'S');
        assert_eq!(
            grammar.variables().copied().collect::<String>(),
            "SABCD"
        );
        assert_eq!(
            grammar.terminals().into_iter().copied().collect::<String>(),
            "abcd"
        );
        assert_eq!(grammar.productions().count(), 9);
    }
}
