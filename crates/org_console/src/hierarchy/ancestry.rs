//! Ancestor-chain resolution over the level graph.

use std::collections::{BTreeMap, BTreeSet};

use super::type_graph::TypeGraph;
use super::types::{Level, LevelId};

/// Ordered ancestor chain for a level: root first, the level itself excluded.
///
/// The parent index is derived when the graph is built, so each hop is a map
/// lookup. The walk still guards with a visited set so it stays bounded even
/// against a graph whose validation was bypassed.
pub fn ancestor_chain(graph: &TypeGraph, level_id: &str) -> Vec<LevelId> {
    let mut chain: Vec<LevelId> = Vec::new();
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    visited.insert(level_id);

    let mut current = level_id;
    while let Some(parent) = graph.parent_of(current) {
        if !visited.insert(parent.as_str()) {
            break;
        }
        chain.push(parent.clone());
        current = parent.as_str();
    }
    chain.reverse();
    chain
}

/// Ancestor chain resolved to `Level` records, root first.
pub fn ancestor_levels<'a>(graph: &'a TypeGraph, level_id: &str) -> Vec<&'a Level> {
    ancestor_chain(graph, level_id)
        .iter()
        .filter_map(|id| graph.level(id))
        .collect()
}

/// Memoizing resolver for callers that need chains for many levels against
/// one graph. The graph is immutable once built, so cached chains never go
/// stale for the resolver's lifetime.
pub struct AncestorResolver<'a> {
    graph: &'a TypeGraph,
    cache: BTreeMap<LevelId, Vec<LevelId>>,
}

impl<'a> AncestorResolver<'a> {
    pub fn new(graph: &'a TypeGraph) -> Self {
        Self {
            graph,
            cache: BTreeMap::new(),
        }
    }

    pub fn resolve(&mut self, level_id: &str) -> Vec<LevelId> {
        if let Some(chain) = self.cache.get(level_id) {
            return chain.clone();
        }
        let chain = ancestor_chain(self.graph, level_id);
        self.cache.insert(level_id.to_string(), chain.clone());
        chain
    }
}
