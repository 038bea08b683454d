use std::{fmt, hash::Hash};

use log::{debug, trace};
use rand::Rng;

use crate::{Grammar, Symbol};

/// What to do with a derivation that is longer than the maximum length.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Cut the sentence. The result is a prefix of a sentence of the grammar.
    #[default]
    Truncate,
    /// Throw the derivation away and start over. The result is always a sentence of the grammar.
    Retry,
}

/// Random sentence generator doing a top-down derivation with uniformly chosen productions.
#[derive(Debug, Clone)]
pub struct Generator<'g, V, T> {
    grammar: &'g Grammar<V, T>,
    min_length: usize,
    max_length: usize,
    /// Deepest nesting of variable expansions before a derivation is abandoned.
    max_depth: usize,
    /// Number of derivations tried before giving up.
    max_attempts: usize,
    overflow: Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateError {
    /// The length bounds cannot be satisfied.
    InvalidLength { min: usize, max: usize },
    /// No derivation finished within the depth and length limits.
    NotTerminating { attempts: usize },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::InvalidLength { min, max } => {
                write!(f, "invalid sentence length bounds (min {}, max {})", min, max)
            }
            GenerateError::NotTerminating { attempts } => write!(
                f,
                "no derivation terminated within the limits after {} attempts",
                attempts
            ),
        }
    }
}

impl std::error::Error for GenerateError {}

impl<'g, V, T> Generator<'g, V, T> {
    pub fn new(grammar: &'g Grammar<V, T>) -> Self {
        Self {
            grammar,
            min_length: 5,
            max_length: 15,
            max_depth: 64,
            max_attempts: 1000,
            overflow: Overflow::default(),
        }
    }

    /// Derivations producing fewer terminals are retried.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }
}

impl<V, T> Generator<'_, V, T>
where
    V: Eq + Hash,
    T: Clone,
{
    /// Generates a random sentence.
    ///
    /// # Fails
    ///
    /// When the length bounds are unsatisfiable, or when `max_attempts` derivations in a row
    /// were too deep, too short or (with [`Overflow::Retry`]) too long.
    pub fn generate<R>(&self, rng: &mut R) -> Result<Vec<T>, GenerateError>
    where
        R: Rng + ?Sized,
    {
        if self.max_length == 0
            || (self.overflow == Overflow::Retry && self.min_length > self.max_length)
        {
            return Err(GenerateError::InvalidLength {
                min: self.min_length,
                max: self.max_length,
            });
        }

        let start = Symbol::Variable(self.grammar.start_variable());

        for attempt in 1..=self.max_attempts {
            let mut sentence = Vec::new();

            if !self.expand(rng, start, 0, &mut sentence) {
                trace!("derivation {} exceeded depth {}", attempt, self.max_depth);
                continue;
            }
            if sentence.len() < self.min_length {
                continue;
            }
            if sentence.len() > self.max_length {
                match self.overflow {
                    Overflow::Truncate => sentence.truncate(self.max_length),
                    Overflow::Retry => continue,
                }
            }

            debug!(
                "generated {} terminals after {} derivations",
                sentence.len(),
                attempt
            );
            return Ok(sentence);
        }

        Err(GenerateError::NotTerminating {
            attempts: self.max_attempts,
        })
    }

    /// Expands `symbol` into `sentence`. Returns `false` when the depth limit was hit.
    fn expand<R>(
        &self,
        rng: &mut R,
        symbol: Symbol<&V, &T>,
        depth: usize,
        sentence: &mut Vec<T>,
    ) -> bool
    where
        R: Rng + ?Sized,
    {
        match symbol {
            Symbol::Terminal(t) => {
                sentence.push(t.clone());
                true
            }
            Symbol::Epsilon => true,
            Symbol::Variable(v) => {
                if depth >= self.max_depth {
                    return false;
                }

                let productions = self.grammar.productions_for(v).collect::<Vec<_>>();
                let (_, production) = productions[rng.gen_range(0..productions.len())];

                production
                    .body
                    .iter()
                    .all(|s| self.expand(rng, s.as_ref(), depth + 1, sentence))
            }
        }
    }
}

impl<V> Generator<'_, V, char>
where
    V: Eq + Hash,
{
    /// Generates a random sentence as a string.
    pub fn generate_string<R>(&self, rng: &mut R) -> Result<String, GenerateError>
    where
        R: Rng + ?Sized,
    {
        self.generate(rng)
            .map(|terminals| terminals.into_iter().collect())
    }
}
