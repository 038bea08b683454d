use std::fmt::{self, Display};

pub use generator::{GenerateError, Generator, Overflow};
pub use grammar::{
    first::FirstSets, follow::FollowSets, Grammar, GrammarBuilder, GrammarError, Production,
    ProductionId,
};
pub use parser::{
    error::ParseError,
    ll1::Ll1,
    table::{Conflict, ParseTable},
    trace::{Action, Configuration, ParseResult, RejectReason, Verdict},
};

pub mod builtin;
mod generator;
mod grammar;
mod parser;

/// Represents single character/lexeme/variable in a body of a rule.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Symbol<V, T> {
    Terminal(T),
    Variable(V),
    // Note: the end marker is not a grammar symbol, it only shows up as a `Terminal::Eof` in
    // lookaheads, follow sets and on the parse stack.
    Epsilon,
}

/// Terminal as seen by the parser: either a grammar terminal or the end of the input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Terminal<T> {
    T(T),
    Eof,
}

/// Member of a first set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum First<T> {
    T(T),
    Epsilon,
}

/// List of [`Symbol`]s a `Variable` maps to.
pub type Body<V, T> = Vec<Symbol<V, T>>;

/// Symbol on the parse stack. The end marker sits at the bottom as `Terminal(Terminal::Eof)`.
pub type StackSymbol<V, T> = Symbol<V, Terminal<T>>;

impl<V, T> Symbol<V, T> {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Symbol::Variable(_))
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    pub fn as_ref(&self) -> Symbol<&V, &T> {
        match self {
            Symbol::Terminal(t) => Symbol::Terminal(t),
            Symbol::Variable(v) => Symbol::Variable(v),
            Symbol::Epsilon => Symbol::Epsilon,
        }
    }
}

impl<T> Terminal<T> {
    pub fn is_eof(&self) -> bool {
        matches!(self, Terminal::Eof)
    }
}

impl<T> From<T> for Terminal<T> {
    fn from(value: T) -> Self {
        Self::T(value)
    }
}

impl<T> From<T> for First<T> {
    fn from(value: T) -> Self {
        Self::T(value)
    }
}

impl<V: Display, T: Display> Display for Symbol<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "{}", t),
            Symbol::Variable(v) => write!(f, "{}", v),
            Symbol::Epsilon => write!(f, "ε"),
        }
    }
}

impl<T: Display> Display for Terminal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::T(t) => write!(f, "{}", t),
            Terminal::Eof => write!(f, "$"),
        }
    }
}

impl<T: Display> Display for First<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            First::T(t) => write!(f, "{}", t),
            First::Epsilon => write!(f, "ε"),
        }
    }
}
