//! The per-function scope-reset state machine.
//!
//! Before a band is combined, the function's scope key is computed for that
//! band and page. A changed key resets the accumulator to the kind's identity;
//! a missing key (a group level that has not been entered yet) leaves the
//! function undefined.

use tally_types::{GroupInstanceId, Value};

use crate::definition::AggregationKind;
use crate::layout::Band;

/// A scope with its group reference resolved to a level index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedScope {
    Report,
    Group(usize),
    Page,
    PageGroup(usize),
}

impl ResolvedScope {
    /// Whether the scope resets on page boundaries.
    pub fn is_page_bound(self) -> bool {
        matches!(self, ResolvedScope::Page | ResolvedScope::PageGroup(_))
    }

    /// The scope instance for the current group instances on `page`, if any.
    pub fn key(self, groups: &[Option<GroupInstanceId>], page: usize) -> Option<ScopeKey> {
        let group_at = |level: usize| groups.get(level).copied().flatten();
        match self {
            ResolvedScope::Report => Some(ScopeKey::Report),
            ResolvedScope::Group(level) => group_at(level).map(ScopeKey::Group),
            ResolvedScope::Page => Some(ScopeKey::Page(page)),
            ResolvedScope::PageGroup(level) => {
                group_at(level).map(|group| ScopeKey::PageGroup(group, page))
            }
        }
    }

    pub fn key_at(self, band: &Band, page: usize) -> Option<ScopeKey> {
        self.key(&band.groups, page)
    }
}

/// Identifies one instance of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeKey {
    Report,
    Group(GroupInstanceId),
    Page(usize),
    PageGroup(GroupInstanceId, usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Accumulator {
    #[default]
    Undefined,
    Accumulating { scope: ScopeKey, value: Value },
}

impl Accumulator {
    /// Moves the accumulator into the scope instance `key`, resetting it to
    /// the identity of `kind` when the instance changes.
    pub fn enter(&self, key: Option<ScopeKey>, kind: AggregationKind) -> Accumulator {
        match (self, key) {
            (_, None) => Accumulator::Undefined,
            (Accumulator::Accumulating { scope, .. }, Some(key)) if *scope == key => self.clone(),
            (_, Some(key)) => Accumulator::Accumulating {
                scope: key,
                value: kind.identity(),
            },
        }
    }

    pub fn combine(self, kind: AggregationKind, contribution: &Value) -> Accumulator {
        match self {
            Accumulator::Undefined => Accumulator::Undefined,
            Accumulator::Accumulating { scope, value } => Accumulator::Accumulating {
                scope,
                value: kind.combine(&value, contribution),
            },
        }
    }

    /// The running value; `Null` while undefined.
    pub fn value(&self) -> Value {
        match self {
            Accumulator::Undefined => Value::Null,
            Accumulator::Accumulating { value, .. } => value.clone(),
        }
    }

    pub fn scope(&self) -> Option<ScopeKey> {
        match self {
            Accumulator::Undefined => None,
            Accumulator::Accumulating { scope, .. } => Some(*scope),
        }
    }
}
