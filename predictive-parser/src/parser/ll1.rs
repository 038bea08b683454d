use std::{collections::VecDeque, hash::Hash};

use log::{debug, trace};
use rand::Rng;

use super::{
    error::ParseError,
    table::ParseTable,
    trace::{Action, Configuration, ParseResult, RejectReason, Verdict},
};
use crate::{
    generator::{GenerateError, Generator},
    grammar::{first::FirstSets, follow::FollowSets, Grammar},
    StackSymbol, Symbol, Terminal,
};

/// Table-driven predictive parser.
///
/// Creating the parser computes the first and follow sets of the grammar. The parse table is
/// built separately by [`build_table`](Self::build_table); until then parsing fails with
/// [`ParseError::TableNotReady`].
#[derive(Debug, Clone)]
pub struct Ll1<V, T> {
    grammar: Grammar<V, T>,
    first: FirstSets<V, T>,
    follow: FollowSets<V, T>,
    table: Option<ParseTable<V, T>>,
}

impl<V, T> Ll1<V, T>
where
    V: Clone + Eq + Hash,
    T: Clone + Eq + Hash,
{
    /// Computes the first and follow sets of `grammar`, without building the parse table.
    pub fn new(grammar: Grammar<V, T>) -> Self {
        let first = FirstSets::compute(&grammar);
        let follow = FollowSets::compute(&grammar, &first);

        Self {
            grammar,
            first,
            follow,
            table: None,
        }
    }

    /// Creates the parser and builds its parse table.
    pub fn from_grammar(grammar: Grammar<V, T>) -> Self {
        let mut parser = Self::new(grammar);
        parser.build_table();
        parser
    }

    /// Builds the parse table, after which the parser is ready.
    pub fn build_table(&mut self) -> &ParseTable<V, T> {
        let table = ParseTable::build(&self.grammar, &self.first, &self.follow);
        debug!(
            "parse table built with {} cells and {} conflicts",
            table.iter().count(),
            table.conflicts().len()
        );

        self.table.insert(table)
    }

    /// Parses `input` and records every step the automaton takes.
    ///
    /// # Fails
    ///
    /// When the parse table has not been built. A rejected input is not an error, see
    /// [`ParseResult::verdict`].
    pub fn parse_terminals<I>(&self, input: I) -> Result<ParseResult<V, T>, ParseError>
    where
        I: IntoIterator<Item = T>,
    {
        let table = self.table.as_ref().ok_or(ParseError::TableNotReady)?;

        let mut stack: Vec<StackSymbol<V, T>> = Vec::from([
            Symbol::Terminal(Terminal::Eof),
            Symbol::Variable(self.grammar.start_variable().clone()),
        ]);
        let mut input: VecDeque<Terminal<T>> = input
            .into_iter()
            .map(Terminal::T)
            .chain(std::iter::once(Terminal::Eof))
            .collect();
        let mut steps = Vec::new();

        while let Some(top) = stack.pop() {
            let current = input
                .front()
                .cloned()
                .expect("the end marker is only consumed together with the bottom of the stack");

            let action = match &top {
                Symbol::Terminal(t) if *t == current => Action::Match,
                Symbol::Terminal(_) => Action::Reject(RejectReason::Mismatch),
                Symbol::Variable(v) => match table.get(v, &current) {
                    Some(id) => Action::Expand(id),
                    None => Action::Reject(RejectReason::NoEntry),
                },
                Symbol::Epsilon => unreachable!("epsilon is never pushed onto the stack"),
            };

            trace!("step {}: {:?}", steps.len() + 1, action);
            steps.push(Configuration {
                stack: stack.clone(),
                input: input.iter().cloned().collect(),
                top,
                current,
                action,
            });

            match action {
                Action::Match => {
                    input.pop_front();
                }
                Action::Expand(id) => {
                    let body = &self.grammar.production(id).body;
                    stack.extend(body.iter().rev().filter_map(|s| match s {
                        Symbol::Terminal(t) => Some(Symbol::Terminal(Terminal::T(t.clone()))),
                        Symbol::Variable(v) => Some(Symbol::Variable(v.clone())),
                        Symbol::Epsilon => None,
                    }));
                }
                Action::Reject(reason) => {
                    debug!("input rejected at step {} ({:?})", steps.len(), reason);
                    return Ok(ParseResult {
                        verdict: Verdict::Rejected,
                        steps: steps.len(),
                        trace: steps,
                    });
                }
            }
        }

        debug!("input accepted after {} steps", steps.len());
        Ok(ParseResult {
            verdict: Verdict::Accepted,
            steps: steps.len(),
            trace: steps,
        })
    }

    /// Generates a random sentence of at most `max_length` terminals, using the default
    /// [`Generator`] settings otherwise.
    pub fn generate<R>(&self, rng: &mut R, max_length: usize) -> Result<Vec<T>, GenerateError>
    where
        R: Rng + ?Sized,
    {
        Generator::new(&self.grammar)
            .with_max_length(max_length)
            .generate(rng)
    }
}

impl<V> Ll1<V, char>
where
    V: Clone + Eq + Hash,
{
    /// Parses a string, every character is a terminal.
    pub fn parse(&self, input: &str) -> Result<ParseResult<V, char>, ParseError> {
        self.parse_terminals(input.chars())
    }

    /// Generates a random sentence of at most `max_length` characters.
    ///
    /// Longer derivations are truncated, so the result may only be a prefix of a sentence and
    /// be rejected by [`Ll1::parse`]. Use a [`Generator`] with [`Overflow::Retry`] to only get
    /// sentences of the grammar.
    ///
    /// [`Overflow::Retry`]: crate::Overflow::Retry
    pub fn generate_sentence<R>(
        &self,
        rng: &mut R,
        max_length: usize,
    ) -> Result<String, GenerateError>
    where
        R: Rng + ?Sized,
    {
        self.generate(rng, max_length)
            .map(|terminals| terminals.into_iter().collect())
    }
}

impl<V, T> Ll1<V, T> {
    pub fn grammar(&self) -> &Grammar<V, T> {
        &self.grammar
    }

    pub fn first_sets(&self) -> &FirstSets<V, T> {
        &self.first
    }

    pub fn follow_sets(&self) -> &FollowSets<V, T> {
        &self.follow
    }

    /// The parse table, if it has been built.
    pub fn table(&self) -> Option<&ParseTable<V, T>> {
        self.table.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.table.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::Ll1;
    use crate::{
        builtin::{self, body},
        Action, Grammar, ParseError, ProductionId, RejectReason, Symbol, Terminal, Verdict,
    };

    fn parser() -> Ll1<char, char> {
        Ll1::from_grammar(builtin::grammar())
    }

    fn actions(input: &str) -> Vec<Action> {
        parser()
            .parse(input)
            .unwrap()
            .trace
            .into_iter()
            .map(|c| c.action)
            .collect()
    }

    #[test]
    fn table_not_ready() {
        let mut parser = Ll1::new(builtin::grammar());

        assert!(!parser.is_ready());
        assert!(parser.table().is_none());
        assert_eq!(parser.parse("bc"), Err(ParseError::TableNotReady));

        parser.build_table();

        assert!(parser.is_ready());
        assert!(parser.parse("bc").unwrap().is_accepted());
    }

    #[test]
    fn reject_bbdc() {
        let result = parser().parse("bbdc").unwrap();

        assert_eq!(result.verdict, Verdict::Rejected);
        assert_eq!(result.steps, 5);
        assert_eq!(result.trace.len(), result.steps);

        let first = &result.trace[0];
        assert_eq!(
            first.stack_before_pop(),
            vec![Symbol::Terminal(Terminal::Eof), Symbol::Variable('S')]
        );
        assert_eq!(
            first.input,
            vec![
                Terminal::T('b'),
                Terminal::T('b'),
                Terminal::T('d'),
                Terminal::T('c'),
                Terminal::Eof
            ]
        );

        // `C` has no production starting with `d`
        let last = result.trace.last().unwrap();
        assert_eq!(last.top, Symbol::Variable('C'));
        assert_eq!(last.current, Terminal::T('d'));
        assert_eq!(last.action, Action::Reject(RejectReason::NoEntry));
    }

    #[test]
    fn accept_bc() {
        assert_eq!(
            actions("bc"),
            vec![
                Action::Expand(ProductionId(1)),
                Action::Match,
                Action::Expand(ProductionId(5)),
                Action::Match,
                Action::Match,
            ]
        );

        let result = parser().parse("bc").unwrap();
        let last = result.trace.last().unwrap();
        assert_eq!(last.top, Symbol::Terminal(Terminal::Eof));
        assert!(last.stack.is_empty());
        assert_eq!(last.input, vec![Terminal::Eof]);
    }

    #[test]
    fn accept_acdd() {
        let result = parser().parse("acdd").unwrap();

        assert_eq!(result.verdict, Verdict::Accepted);
        assert_eq!(result.steps, 10);
        // epsilon never ends up on the stack
        assert!(result
            .trace
            .iter()
            .all(|c| c.stack.iter().all(|s| !s.is_epsilon())));
    }

    #[test]
    fn empty_input() {
        let result = parser().parse("").unwrap();

        assert_eq!(result.verdict, Verdict::Rejected);
        assert_eq!(result.steps, 1);
        assert_eq!(
            result.trace[0].action,
            Action::Reject(RejectReason::NoEntry)
        );
    }

    #[test]
    fn empty_input_nullable_start() {
        let grammar = Grammar::builder()
            .with_start_variable('S')
            .with_rules('S', [body("aS"), body("ε")])
            .build()
            .unwrap();
        let parser = Ll1::from_grammar(grammar);

        let result = parser.parse("").unwrap();
        assert_eq!(result.verdict, Verdict::Accepted);
        assert_eq!(result.steps, 2);

        assert!(parser.parse("aaa").unwrap().is_accepted());
        assert!(!parser.parse("ab").unwrap().is_accepted());
    }

    #[test]
    fn mismatch() {
        let grammar = Grammar::builder()
            .with_start_variable('S')
            .with_rules('S', [body("ab")])
            .build()
            .unwrap();
        let parser = Ll1::from_grammar(grammar);

        let result = parser.parse("ac").unwrap();
        assert_eq!(result.steps, 3);
        assert_eq!(
            result.trace[2].action,
            Action::Reject(RejectReason::Mismatch)
        );

        // trailing input is a mismatch against the end marker
        let result = parser.parse("abb").unwrap();
        let last = result.trace.last().unwrap();
        assert_eq!(result.verdict, Verdict::Rejected);
        assert_eq!(last.top, Symbol::Terminal(Terminal::Eof));
        assert_eq!(last.current, Terminal::T('b'));
    }

    #[test]
    fn end_marker_in_input_is_a_terminal() {
        let result = parser().parse("bc$").unwrap();

        assert_eq!(result.verdict, Verdict::Rejected);
        assert_eq!(result.steps, 5);
        let last = result.trace.last().unwrap();
        assert_eq!(last.action, Action::Reject(RejectReason::Mismatch));
        assert_eq!(last.top, Symbol::Terminal(Terminal::Eof));
        assert_eq!(last.current, Terminal::T('$'));
    }

    #[test]
    fn stops_at_first_rejection() {
        for input in ["bbdc", "x", "ab", "bcc", "acddd"] {
            let result = parser().parse(input).unwrap();
            assert_eq!(result.verdict, Verdict::Rejected, "{}", input);

            let (last, rest) = result.trace.split_last().unwrap();
            assert!(matches!(last.action, Action::Reject(_)));
            assert!(rest.iter().all(|c| !matches!(c.action, Action::Reject(_))));
        }
    }

    #[test]
    fn generated_sentence_uses_requested_length() {
        use rand::{rngs::StdRng, SeedableRng};

        let parser = parser();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let sentence = parser.generate_sentence(&mut rng, 6).unwrap();
            assert!(!sentence.is_empty() && sentence.len() <= 6);
            assert!(sentence.chars().all(|c| "abcd".contains(c)));
        }
    }
}
