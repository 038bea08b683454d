/// Errors returned by the [`Ll1`](super::ll1::Ll1) parser.
///
/// Note: rejecting the input is not an error, it is reported through the
/// [`Verdict`](super::trace::Verdict) of the parse result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The parse table has not been built yet.
    TableNotReady,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::TableNotReady => write!(f, "parse table not ready"),
        }
    }
}

impl std::error::Error for ParseError {}
