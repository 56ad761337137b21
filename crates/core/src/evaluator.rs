//! Band-by-band evaluation of the function registry.
//!
//! The evaluator keeps the accumulator state of every function after every
//! band. That table serves two purposes: it is what rendered nodes read their
//! values from, and it is the checkpoint a replay restarts from when page
//! boundaries move.

use std::collections::HashMap;

use log::trace;
use tally_types::{FunctionName, GroupInstanceId, Value};

use crate::definition::Mode;
use crate::layout::{ContentTree, Pagination, Placement, PlacementRole};
use crate::registry::{FunctionRegistry, PreparedFunction, ResolvedInput};
use crate::scope::{Accumulator, ScopeKey};
use crate::source::{DataSource, SourceError};

pub struct Evaluator<'a> {
    registry: &'a FunctionRegistry,
    tree: &'a ContentTree,
    /// Field contributions per row, per function. `Null` for functions that
    /// do not read a field.
    contributions: Vec<Vec<Value>>,
    /// Accumulator state per band, per function, after the band.
    states: Vec<Vec<Accumulator>>,
    page_of: Vec<usize>,
    /// Final accumulator value per (function, scope instance) for functions
    /// in total mode.
    totals: HashMap<(usize, ScopeKey), Value>,
}

/// The state a rendered node reads from.
struct Observation<'s> {
    states: Option<&'s [Accumulator]>,
    groups: &'s [Option<GroupInstanceId>],
    page: usize,
    /// Re-enter the scope before reading, as a repeated header does when it
    /// opens a new page.
    reenter: bool,
}

impl<'a> Evaluator<'a> {
    /// Reads every field contribution up front so that evaluation itself does
    /// no I/O.
    pub fn new<S: DataSource + ?Sized>(
        registry: &'a FunctionRegistry,
        tree: &'a ContentTree,
        source: &S,
    ) -> Result<Self, SourceError> {
        let contributions = source
            .rows()
            .map(|row| {
                registry
                    .functions()
                    .iter()
                    .map(|f| match &f.input {
                        ResolvedInput::Field(field) => source.value_at(row, field),
                        _ => Ok(Value::Null),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            registry,
            tree,
            contributions,
            states: Vec::new(),
            page_of: Vec::new(),
            totals: HashMap::new(),
        })
    }

    /// Evaluates every function over every band from a clean table.
    pub fn run(&mut self, pagination: &Pagination) {
        self.page_of = pagination.page_map(self.tree.len());
        self.states = vec![Vec::new(); self.tree.len()];
        self.walk(0, None);
        self.resolve_totals();
    }

    /// Re-evaluates only the page-dependent functions from band `from` on,
    /// against a revised pagination. Returns the number of bands replayed.
    pub fn replay(&mut self, from: usize, pagination: &Pagination) -> usize {
        self.page_of = pagination.page_map(self.tree.len());
        if self.states.len() != self.tree.len() {
            self.run(pagination);
            return self.tree.len();
        }
        if !self.registry.has_page_dependent() {
            trace!("[REPLAY] No page-dependent functions; nothing to replay.");
            return 0;
        }

        let from = from.min(self.tree.len());
        let mask = self.registry.page_dependent_mask();
        trace!(
            "[REPLAY] {} of {} functions from band {}.",
            mask.iter().filter(|m| **m).count(),
            mask.len(),
            from
        );
        self.walk(from, Some(&mask));
        self.resolve_totals();
        self.tree.len() - from
    }

    fn walk(&mut self, from: usize, only: Option<&[bool]>) {
        let registry = self.registry;
        let tree = self.tree;
        let functions = registry.functions();
        let undefined = vec![Accumulator::Undefined; functions.len()];

        for (index, band) in tree.bands().iter().enumerate().skip(from) {
            let page = self.page_of[index];
            let previous = match index {
                0 => &undefined,
                _ => &self.states[index - 1],
            };
            let mut current = match only {
                Some(_) => self.states[index].clone(),
                None => previous.clone(),
            };

            for (i, function) in functions.iter().enumerate() {
                if only.is_some_and(|mask| !mask[i]) {
                    continue;
                }
                let mut acc = previous[i].enter(function.scope.key_at(band, page), function.kind);
                if band.kind.is_item() {
                    let contribution = match &function.input {
                        ResolvedInput::Rows => Value::Bool(true),
                        ResolvedInput::Field(_) => self.contributions[band.row][i].clone(),
                        ResolvedInput::Function(j) => current[*j].value(),
                    };
                    acc = acc.combine(function.kind, &contribution);
                }
                current[i] = acc;
            }

            self.states[index] = current;
        }
    }

    fn resolve_totals(&mut self) {
        self.totals.clear();
        let totals = self
            .registry
            .functions()
            .iter()
            .enumerate()
            .filter(|(_, f)| f.mode == Mode::Total)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        if totals.is_empty() {
            return;
        }
        for states in &self.states {
            for &i in &totals {
                if let Accumulator::Accumulating { scope, value } = &states[i] {
                    self.totals.insert((i, *scope), value.clone());
                }
            }
        }
    }

    /// The value of every function as seen by one placement on `page`.
    pub fn snapshot(
        &self,
        placement: Placement,
        page: usize,
        pagination: &Pagination,
    ) -> Vec<(FunctionName, Value)> {
        let Some(observation) = self.observe(placement, page, pagination) else {
            return Vec::new();
        };
        self.registry
            .functions()
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), self.value_of(i, f, &observation)))
            .collect()
    }

    fn observe(
        &self,
        placement: Placement,
        page: usize,
        pagination: &Pagination,
    ) -> Option<Observation<'_>> {
        let slice = pagination.page(page)?;
        let anchor = match placement.role {
            PlacementRole::Body => Some(placement.band.index()),
            PlacementRole::RepeatedHeader => slice.start.checked_sub(1),
            PlacementRole::RepeatedFooter => slice.end.checked_sub(1),
        };
        let observation = match anchor {
            Some(band) => Observation {
                states: self.states.get(band).map(Vec::as_slice),
                groups: &self.tree.bands().get(band)?.groups,
                page,
                reenter: placement.role == PlacementRole::RepeatedHeader,
            },
            None => Observation {
                states: None,
                groups: &self.tree.band(placement.band).groups,
                page,
                reenter: true,
            },
        };
        Some(observation)
    }

    fn value_of(&self, i: usize, function: &PreparedFunction, at: &Observation<'_>) -> Value {
        let key = function.scope.key(at.groups, at.page);
        match function.mode {
            Mode::Total => match key {
                Some(key) => self
                    .totals
                    .get(&(i, key))
                    .cloned()
                    .unwrap_or_else(|| function.kind.identity()),
                None => Value::Null,
            },
            Mode::Running => {
                let state = at
                    .states
                    .and_then(|s| s.get(i))
                    .cloned()
                    .unwrap_or_default();
                if at.reenter {
                    state.enter(key, function.kind).value()
                } else {
                    state.value()
                }
            }
        }
    }

    /// Accumulator states after `band`, in evaluation order.
    pub fn state_after(&self, band: usize) -> Option<&[Accumulator]> {
        self.states.get(band).map(Vec::as_slice)
    }
}
