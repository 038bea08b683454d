use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

use log::debug;

use super::Grammar;
use crate::{First, Symbol};

type Sets<V, T> = HashMap<V, HashSet<First<T>>>;

/// First sets of every variable of a [`Grammar`].
#[derive(Debug, Clone)]
pub struct FirstSets<V, T> {
    sets: Sets<V, T>,
}

impl<V, T> FirstSets<V, T>
where
    V: Clone + Eq + Hash,
    T: Clone + Eq + Hash,
{
    /// Computes the first sets by iterating over all productions until no set changes anymore.
    pub fn compute(grammar: &Grammar<V, T>) -> Self {
        let mut sets = Self::empty(grammar);

        let mut passes = 1;
        while Self::pass(grammar, &mut sets) {
            passes += 1;
        }

        debug!("first sets converged after {} passes", passes);
        Self { sets }
    }

    pub(crate) fn empty(grammar: &Grammar<V, T>) -> Sets<V, T> {
        grammar
            .variables()
            .map(|v| (v.clone(), HashSet::new()))
            .collect()
    }

    /// Runs a single pass over all productions. Returns whether any set grew.
    pub(crate) fn pass(grammar: &Grammar<V, T>, sets: &mut Sets<V, T>) -> bool {
        let mut changed = false;

        for (_, production) in grammar.productions() {
            let first = Self::scan(sets, production.body.iter());
            let entry = sets.entry(production.head.clone()).or_default();

            let len = entry.len();
            entry.extend(first);
            changed |= len != entry.len();
        }

        changed
    }

    /// Scans `symbols` left to right and collects what can begin them, given the current `sets`.
    fn scan<'a>(
        sets: &Sets<V, T>,
        symbols: impl IntoIterator<Item = &'a Symbol<V, T>>,
    ) -> HashSet<First<T>>
    where
        V: 'a,
        T: 'a,
    {
        let mut result = HashSet::new();

        for symbol in symbols {
            match symbol {
                Symbol::Terminal(t) => {
                    result.insert(First::T(t.clone()));
                    return result;
                }
                Symbol::Epsilon => {
                    result.insert(First::Epsilon);
                    return result;
                }
                Symbol::Variable(v) => {
                    let Some(first_v) = sets.get(v) else {
                        // nothing is known about `v` yet
                        return result;
                    };

                    result.extend(
                        first_v
                            .iter()
                            .filter(|s| !matches!(s, First::Epsilon))
                            .cloned(),
                    );

                    if !first_v.contains(&First::Epsilon) {
                        return result;
                    }
                }
            }
        }

        // every symbol can vanish
        result.insert(First::Epsilon);
        result
    }

    /// First set of an arbitrary sequence of symbols. Contains [`First::Epsilon`] iff the whole
    /// sequence is nullable, which includes the empty sequence.
    pub fn of_body<'a>(
        &self,
        symbols: impl IntoIterator<Item = &'a Symbol<V, T>>,
    ) -> HashSet<First<T>>
    where
        V: 'a,
        T: 'a,
    {
        Self::scan(&self.sets, symbols)
    }

    pub fn get(&self, variable: &V) -> Option<&HashSet<First<T>>> {
        self.sets.get(variable)
    }

    pub fn is_nullable(&self, variable: &V) -> bool {
        self.get(variable)
            .map_or(false, |first| first.contains(&First::Epsilon))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&V, &HashSet<First<T>>)> {
        self.sets.iter()
    }
}
