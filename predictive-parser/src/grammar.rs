use crate::{Body, Symbol};

use std::{collections::HashMap, fmt, hash::Hash};

pub mod first;
pub mod follow;

/// Represents a context-free grammar.
///
/// Productions keep the order they were added in. For a single variable this order decides
/// which production wins a conflicting parse table cell and is the order the sentence
/// generator picks from.
#[derive(Debug, Clone)]
pub struct Grammar<V, T> {
    /// Start variable of the [`Grammar`].
    start_variable: V,
    /// Variables in the order their first rule was added.
    variables: Vec<V>,
    /// All productions in insertion order.
    productions: Vec<Production<V, T>>,
    /// Mapping of `Variables` to the ids of their productions.
    rules: Rules<V>,
}

/// Map of `Variables` to their [`ProductionId`]s.
type Rules<V> = HashMap<V, Vec<ProductionId>>;

/// Index of a [`Production`] inside its [`Grammar`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductionId(pub(crate) usize);

/// A single rule `head -> body`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production<V, T> {
    pub head: V,
    pub body: Body<V, T>,
}

impl ProductionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl<V, T> Grammar<V, T> {
    /// Creates a new `GrammarBuilder`.
    pub fn builder() -> GrammarBuilder<V, T> {
        GrammarBuilder::new()
    }

    pub fn start_variable(&self) -> &V {
        &self.start_variable
    }

    /// Variables in the order they were first given a rule.
    pub fn variables(&self) -> impl Iterator<Item = &V> {
        self.variables.iter()
    }

    pub fn productions(&self) -> impl Iterator<Item = (ProductionId, &Production<V, T>)> {
        self.productions
            .iter()
            .enumerate()
            .map(|(i, p)| (ProductionId(i), p))
    }

    /// Returns the [`Production`] with the given id.
    ///
    /// # Panics
    ///
    /// When the id does not come from this grammar.
    pub fn production(&self, id: ProductionId) -> &Production<V, T> {
        &self.productions[id.0]
    }
}

impl<V, T> Grammar<V, T>
where
    T: PartialEq,
{
    /// Terminals in the order they first appear in a body.
    pub fn terminals(&self) -> Vec<&T> {
        self.productions
            .iter()
            .flat_map(|p| p.body.iter())
            .fold(Vec::new(), |mut terminals, symbol| {
                if let Symbol::Terminal(t) = symbol {
                    if !terminals.contains(&t) {
                        terminals.push(t);
                    }
                }
                terminals
            })
    }
}

impl<V, T> Grammar<V, T>
where
    V: Eq + Hash,
{
    /// Returns the productions the `Variable` maps to, in insertion order.
    pub fn productions_for<'a>(
        &'a self,
        head: &V,
    ) -> impl Iterator<Item = (ProductionId, &'a Production<V, T>)> + 'a {
        self.rules
            .get(head)
            .map(|ids| ids.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |id| (*id, &self.productions[id.0]))
    }

    pub fn is_variable(&self, variable: &V) -> bool {
        self.rules.contains_key(variable)
    }
}

/// Configuration errors found while building a [`Grammar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError<V> {
    /// No start variable was set on the builder.
    NoStartVariable,
    /// A variable is used (in a body or as start variable) without any rule associated to it.
    UndefinedVariable(V),
}

impl<V: fmt::Debug> fmt::Display for GrammarError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::NoStartVariable => write!(f, "start variable not set"),
            GrammarError::UndefinedVariable(v) => {
                write!(f, "variable {:?} has no rule associated with it", v)
            }
        }
    }
}

impl<V: fmt::Debug> std::error::Error for GrammarError<V> {}

/// Builder struct for the [`Grammar`].
pub struct GrammarBuilder<V, T> {
    /// Start variable of the [`Grammar`].
    start_variable: Option<V>,
    productions: Vec<Production<V, T>>,
}

impl<V, T> Default for GrammarBuilder<V, T> {
    fn default() -> Self {
        Self {
            start_variable: None,
            productions: Vec::new(),
        }
    }
}

impl<V, T> GrammarBuilder<V, T> {
    /// Creates a new [`GrammarBuilder`] with no `start_variable` and no rules.
    fn new() -> Self {
        Self::default()
    }

    /// Sets the `start_variable` of the [`Grammar`].
    pub fn with_start_variable(mut self, variable: V) -> Self {
        self.set_start_variable(variable);
        self
    }

    /// Adds a rule to the [`Grammar`].
    pub fn with_rule(mut self, variable: V, body: impl Into<Body<V, T>>) -> Self {
        self.add_rule(variable, body);
        self
    }

    /// Sets the `start_variable` of the [`Grammar`].
    pub fn set_start_variable(&mut self, variable: V) {
        self.start_variable = Some(variable);
    }

    /// Adds a rule to the [`Grammar`]. An empty body is stored as `[Epsilon]`.
    pub fn add_rule(&mut self, variable: V, body: impl Into<Body<V, T>>) {
        let body = body.into();
        let body = if !body.is_empty() {
            body
        } else {
            Body::from([Symbol::Epsilon])
        };

        self.productions.push(Production {
            head: variable,
            body,
        });
    }
}

impl<V, T> GrammarBuilder<V, T>
where
    V: Clone,
{
    /// Adds a list of bodies associated with a `Variable` to the grammar.
    pub fn with_rules<B>(mut self, variable: V, bodies: impl IntoIterator<Item = B>) -> Self
    where
        B: Into<Body<V, T>>,
    {
        self.add_rules(variable, bodies);
        self
    }

    /// Adds a list of bodies associated with a `Variable` to the grammar.
    pub fn add_rules<B>(&mut self, variable: V, bodies: impl IntoIterator<Item = B>)
    where
        B: Into<Body<V, T>>,
    {
        bodies
            .into_iter()
            .for_each(|b| self.add_rule(variable.clone(), b));
    }
}

impl<V, T> GrammarBuilder<V, T>
where
    V: Clone + Eq + Hash,
{
    /// Builds the [`Grammar`], checking that a start variable is set and that every used
    /// variable has at least one rule.
    pub fn build(self) -> Result<Grammar<V, T>, GrammarError<V>> {
        let start_variable = self.start_variable.ok_or(GrammarError::NoStartVariable)?;

        let mut variables = Vec::new();
        let mut rules = Rules::new();

        for (i, production) in self.productions.iter().enumerate() {
            rules
                .entry(production.head.clone())
                .or_insert_with(|| {
                    variables.push(production.head.clone());
                    Vec::new()
                })
                .push(ProductionId(i));
        }

        let used = std::iter::once(&start_variable).chain(
            self.productions
                .iter()
                .flat_map(|p| p.body.iter())
                .filter_map(|symbol| match symbol {
                    Symbol::Variable(v) => Some(v),
                    Symbol::Terminal(_) | Symbol::Epsilon => None,
                }),
        );

        for variable in used {
            if !rules.contains_key(variable) {
                return Err(GrammarError::UndefinedVariable(variable.clone()));
            }
        }

        Ok(Grammar {
            start_variable,
            variables,
            productions: self.productions,
            rules,
        })
    }
}

impl<V: fmt::Display, T: fmt::Display> fmt::Display for Production<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.head)?;
        for symbol in self.body.iter() {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}
