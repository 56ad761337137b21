//! Per-node storage of function values.
//!
//! Values are recorded while the feedback loop is still deciding on page
//! boundaries. Once a pagination is confirmed every node is finalized and
//! its values become read-only.

use std::collections::BTreeMap;
use std::fmt;

use tally_types::{BandId, Value};

use crate::layout::{Placement, PlacementRole};

/// One placement of a band on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderNodeId {
    pub page: usize,
    pub band: BandId,
    pub role: PlacementRole,
}

impl RenderNodeId {
    pub fn new(page: usize, placement: Placement) -> Self {
        Self {
            page,
            band: placement.band,
            role: placement.role,
        }
    }
}

impl fmt::Display for RenderNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.role {
            PlacementRole::RepeatedHeader => "^",
            PlacementRole::Body => "",
            PlacementRole::RepeatedFooter => "_",
        };
        write!(f, "p{}/{}{}", self.page, self.band, suffix)
    }
}

#[derive(Debug, Clone, Default)]
struct NodeAttributes {
    /// namespace -> key -> value
    values: BTreeMap<String, BTreeMap<String, Value>>,
    finalized: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AttributeSink {
    nodes: BTreeMap<RenderNodeId, NodeAttributes>,
}

impl AttributeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `namespace`/`key`, replacing any earlier value.
    ///
    /// # Panics
    ///
    /// Panics if `node` has already been finalized.
    pub fn record(&mut self, node: RenderNodeId, namespace: &str, key: &str, value: Value) {
        let attributes = self.nodes.entry(node).or_default();
        assert!(
            !attributes.finalized,
            "attempted to record '{}' on finalized node {}",
            key, node
        );
        attributes
            .values
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    pub fn finalize(&mut self, node: RenderNodeId) {
        self.nodes.entry(node).or_default().finalized = true;
    }

    pub fn finalize_all(&mut self) {
        for attributes in self.nodes.values_mut() {
            attributes.finalized = true;
        }
    }

    pub fn is_finalized(&self, node: RenderNodeId) -> bool {
        self.nodes.get(&node).is_some_and(|a| a.finalized)
    }

    /// Drops every node that has not been finalized. Returns how many were
    /// dropped.
    pub fn discard_pending(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|_, attributes| attributes.finalized);
        before - self.nodes.len()
    }

    pub fn attribute(&self, node: RenderNodeId, namespace: &str, key: &str) -> Option<&Value> {
        self.nodes.get(&node)?.values.get(namespace)?.get(key)
    }

    /// All values of `node` in `namespace`, ordered by key.
    pub fn attributes<'s>(
        &'s self,
        node: RenderNodeId,
        namespace: &str,
    ) -> impl Iterator<Item = (&'s str, &'s Value)> + 's {
        self.nodes
            .get(&node)
            .and_then(|a| a.values.get(namespace))
            .into_iter()
            .flat_map(|values| values.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn nodes(&self) -> impl Iterator<Item = RenderNodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
