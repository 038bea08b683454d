use crate::{grammar::ProductionId, StackSymbol, Terminal};

/// Outcome of a parse.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

/// Why the automaton stopped with [`Verdict::Rejected`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The popped terminal (or end marker) differs from the lookahead.
    Mismatch,
    /// The parse table has no production for the popped variable and the lookahead.
    NoEntry,
}

/// What the automaton did during a single step.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    /// The popped terminal matched the lookahead, which was consumed.
    Match,
    /// The popped variable was replaced by the body of this production.
    Expand(ProductionId),
    Reject(RejectReason),
}

/// Snapshot of the automaton taken at the start of a step, right after popping `top`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration<V, T> {
    /// Stack contents from bottom to top, without `top`.
    pub stack: Vec<StackSymbol<V, T>>,
    /// Remaining input including the trailing [`Terminal::Eof`].
    pub input: Vec<Terminal<T>>,
    /// Symbol popped in this step.
    pub top: StackSymbol<V, T>,
    /// Lookahead of this step.
    pub current: Terminal<T>,
    pub action: Action,
}

impl<V: Clone, T: Clone> Configuration<V, T> {
    /// The stack as it was before `top` was popped.
    pub fn stack_before_pop(&self) -> Vec<StackSymbol<V, T>> {
        let mut stack = self.stack.clone();
        stack.push(self.top.clone());
        stack
    }
}

/// Verdict of a parse together with every configuration the automaton went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult<V, T> {
    pub verdict: Verdict,
    pub trace: Vec<Configuration<V, T>>,
    /// Number of steps executed, the terminating one included.
    pub steps: usize,
}

impl<V, T> ParseResult<V, T> {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}
