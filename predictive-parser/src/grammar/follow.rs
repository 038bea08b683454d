use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

use log::debug;

use super::{first::FirstSets, Grammar};
use crate::{First, Symbol, Terminal};

type Sets<V, T> = HashMap<V, HashSet<Terminal<T>>>;

/// Follow sets of every variable of a [`Grammar`].
#[derive(Debug, Clone)]
pub struct FollowSets<V, T> {
    sets: Sets<V, T>,
}

impl<V, T> FollowSets<V, T>
where
    V: Clone + Eq + Hash,
    T: Clone + Eq + Hash,
{
    /// Computes the follow sets from the completed `first` sets of the same grammar.
    pub fn compute(grammar: &Grammar<V, T>, first: &FirstSets<V, T>) -> Self {
        let mut sets = Self::initial(grammar);

        let mut passes = 1;
        while Self::pass(grammar, first, &mut sets) {
            passes += 1;
        }

        debug!("follow sets converged after {} passes", passes);
        Self { sets }
    }

    /// Every set empty, except for the start variable which is followed by the end of input.
    pub(crate) fn initial(grammar: &Grammar<V, T>) -> Sets<V, T> {
        let mut sets: Sets<V, T> = grammar
            .variables()
            .map(|v| (v.clone(), HashSet::new()))
            .collect();

        sets.entry(grammar.start_variable().clone())
            .or_default()
            .insert(Terminal::Eof);

        sets
    }

    /// Runs a single pass over all productions. Returns whether any set grew.
    pub(crate) fn pass(
        grammar: &Grammar<V, T>,
        first: &FirstSets<V, T>,
        sets: &mut Sets<V, T>,
    ) -> bool {
        let mut changed = false;

        for (_, production) in grammar.productions() {
            for (i, symbol) in production.body.iter().enumerate() {
                let Symbol::Variable(variable) = symbol else {
                    continue;
                };

                // first of the remaining body slice
                let first_beta = first.of_body(&production.body[i + 1..]);

                let mut follow: HashSet<Terminal<T>> = first_beta
                    .iter()
                    .filter_map(|s| match s {
                        First::T(t) => Some(Terminal::T(t.clone())),
                        First::Epsilon => None,
                    })
                    .collect();

                if first_beta.contains(&First::Epsilon) {
                    // follow[variable] ⊇ follow[head]
                    if let Some(head_follow) = sets.get(&production.head) {
                        follow.extend(head_follow.iter().cloned());
                    }
                }

                let entry = sets.entry(variable.clone()).or_default();
                let len = entry.len();
                entry.extend(follow);
                changed |= len != entry.len();
            }
        }

        changed
    }

    pub fn get(&self, variable: &V) -> Option<&HashSet<Terminal<T>>> {
        self.sets.get(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&V, &HashSet<Terminal<T>>)> {
        self.sets.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::FollowSets;
    use crate::{builtin, FirstSets, Grammar, Symbol, Terminal};

    #[test]
    fn builtin_grammar() {
        let grammar = builtin::grammar();
        let first = FirstSets::compute(&grammar);
        let follow = FollowSets::compute(&grammar, &first);

        use Terminal::{Eof, T};
        let expected = HashMap::from([
            ('S', HashSet::from([Eof])),
            ('A', HashSet::from([T('d'), T('a')])),
            ('B', HashSet::from([T('c'), T('d'), T('a'), Eof])),
            ('C', HashSet::from([T('d'), T('b')])),
            ('D', HashSet::from([T('a'), T('d'), Eof])),
        ]);

        assert_eq!(follow.sets, expected);
    }

    #[test]
    fn follow() {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        enum V {
            S,
            B,
            C,
            D,
            E,
            F,
        }
        #[allow(non_camel_case_types)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        enum T {
            a,
            b,
            c,
            f,
            g,
            h,
        }

        impl<T> From<V> for Symbol<V, T> {
            fn from(value: V) -> Self {
                Self::Variable(value)
            }
        }
        impl<V> From<T> for Symbol<V, T> {
            fn from(value: T) -> Self {
                Self::Terminal(value)
            }
        }

        use {T::*, V::*};

        let grammar = Grammar::builder()
            .with_start_variable(S)
            .with_rule(S, [a.into(), B.into(), D.into(), h.into()])
            .with_rule(B, [c.into(), C.into()])
            .with_rules(C, [vec![b.into(), C.into()], vec![]])
            .with_rule(D, [E.into(), F.into()])
            .with_rules(E, [vec![g.into()], vec![]])
            .with_rules(F, [vec![f.into()], vec![]])
            .build()
            .unwrap();

        let follow = FollowSets::compute(&grammar, &FirstSets::compute(&grammar));

        let t = Terminal::T;
        assert_eq!(
            follow.sets,
            HashMap::from([
                (S, HashSet::from([Terminal::Eof])),
                (B, HashSet::from([t(g), t(f), t(h)])),
                (C, HashSet::from([t(g), t(f), t(h)])),
                (D, HashSet::from([t(h)])),
                (E, HashSet::from([t(f), t(h)])),
                (F, HashSet::from([t(h)])),
            ])
        )
    }

    #[test]
    fn start_variable_is_followed_by_eof() {
        // the start variable also shows up inside a body
        let grammar = Grammar::builder()
            .with_start_variable('S')
            .with_rules(
                'S',
                [
                    vec![Symbol::Terminal('('), Symbol::Variable('S'), Symbol::Terminal(')')],
                    vec![],
                ],
            )
            .build()
            .unwrap();

        let follow = FollowSets::compute(&grammar, &FirstSets::compute(&grammar));

        assert_eq!(
            follow.get(&'S'),
            Some(&HashSet::from([Terminal::Eof, Terminal::T(')')]))
        );
    }

    #[test]
    fn passes_grow_monotonically_and_converge() {
        let grammar = builtin::grammar();
        let first = FirstSets::compute(&grammar);
        let mut sets = FollowSets::initial(&grammar);

        loop {
            let before = sets.clone();
            let changed = FollowSets::pass(&grammar, &first, &mut sets);

            for (variable, follow) in before.iter() {
                assert!(follow.is_subset(&sets[variable]));
            }
            if !changed {
                break;
            }
        }

        assert!(!FollowSets::pass(&grammar, &first, &mut sets));
        assert_eq!(FollowSets::compute(&grammar, &first).sets, sets);
    }
}
