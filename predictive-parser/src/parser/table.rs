use std::{collections::HashMap, hash::Hash};

use log::warn;

use crate::{
    grammar::{first::FirstSets, follow::FollowSets, Grammar, ProductionId},
    First, Terminal,
};

/// Predictive parse table, mapping a variable and a lookahead to the production to expand.
#[derive(Debug, Clone)]
pub struct ParseTable<V, T> {
    cells: Cells<V, T>,
    conflicts: Vec<Conflict<V, T>>,
}

type Cells<V, T> = HashMap<V, HashMap<Terminal<T>, ProductionId>>;

/// A cell that was written by two different productions. The grammar is not LL(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict<V, T> {
    pub variable: V,
    pub lookahead: Terminal<T>,
    /// Production that held the cell before.
    pub overwritten: ProductionId,
    /// Production the cell holds now.
    pub chosen: ProductionId,
}

impl<V, T> ParseTable<V, T>
where
    V: Clone + Eq + Hash,
    T: Clone + Eq + Hash,
{
    /// Builds the table from the first and follow sets of `grammar`.
    ///
    /// Productions are processed in grammar order. When a cell is claimed by two productions
    /// the later one wins and a [`Conflict`] is recorded.
    pub fn build(
        grammar: &Grammar<V, T>,
        first: &FirstSets<V, T>,
        follow: &FollowSets<V, T>,
    ) -> Self {
        let mut table = Self {
            cells: Cells::new(),
            conflicts: Vec::new(),
        };

        for (id, production) in grammar.productions() {
            let first_body = first.of_body(production.body.iter());

            for s in first_body.iter() {
                if let First::T(t) = s {
                    table.insert(production.head.clone(), Terminal::T(t.clone()), id);
                }
            }

            if first_body.contains(&First::Epsilon) {
                // body can vanish, the production applies on anything that follows the head
                for t in follow.get(&production.head).into_iter().flatten() {
                    table.insert(production.head.clone(), t.clone(), id);
                }
            }
        }

        table
    }

    fn insert(&mut self, variable: V, lookahead: Terminal<T>, production: ProductionId) {
        let old = self
            .cells
            .entry(variable.clone())
            .or_default()
            .insert(lookahead.clone(), production);

        match old {
            Some(overwritten) if overwritten != production => {
                warn!(
                    "parse table conflict: production {} replaces production {}",
                    production.index(),
                    overwritten.index()
                );
                self.conflicts.push(Conflict {
                    variable,
                    lookahead,
                    overwritten,
                    chosen: production,
                });
            }
            _ => (),
        }
    }

    /// Production to expand for `variable` on `lookahead`, if any.
    pub fn get(&self, variable: &V, lookahead: &Terminal<T>) -> Option<ProductionId> {
        self.cells.get(variable)?.get(lookahead).copied()
    }
}

impl<V, T> ParseTable<V, T> {
    /// All filled cells.
    pub fn iter(&self) -> impl Iterator<Item = (&V, &Terminal<T>, ProductionId)> {
        self.cells
            .iter()
            .flat_map(|(v, row)| row.iter().map(move |(t, id)| (v, t, *id)))
    }

    /// Cells that were claimed by more than one production, in the order they were overwritten.
    pub fn conflicts(&self) -> &[Conflict<V, T>] {
        &self.conflicts
    }

    /// Whether building the table met no conflicts.
    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }
}
