//! Expand/collapse-aware flattening, pagination, and row numbering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::materialize::OrganizationNode;
use super::types::EntityId;

/// Per-node expand/collapse state for one view session. Every node defaults
/// to expanded; only explicit toggles are stored. Owned by the view that
/// renders the tree and discarded with it; never persisted. If a session is
/// shared across concurrent requests the owner must serialize writes;
/// single-writer-per-key is sufficient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpandState {
    states: BTreeMap<EntityId, bool>,
}

impl ExpandState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, entity_id: &str) -> bool {
        self.states.get(entity_id).copied().unwrap_or(true)
    }

    /// Flip one node; returns the new state.
    pub fn toggle(&mut self, entity_id: impl Into<EntityId>) -> bool {
        let entity_id = entity_id.into();
        let next = !self.is_expanded(&entity_id);
        self.states.insert(entity_id, next);
        next
    }

    pub fn expand(&mut self, entity_id: impl Into<EntityId>) {
        self.states.insert(entity_id.into(), true);
    }

    pub fn collapse(&mut self, entity_id: impl Into<EntityId>) {
        self.states.insert(entity_id.into(), false);
    }

    /// Back to the default: everything expanded.
    pub fn expand_all(&mut self) {
        self.states.clear();
    }

    /// Collapse every branch node in the forest.
    pub fn collapse_all(&mut self, roots: &[OrganizationNode]) {
        fn mark(states: &mut BTreeMap<EntityId, bool>, node: &OrganizationNode) {
            if node.has_children() {
                states.insert(node.entity.id.clone(), false);
            }
            for child in &node.children {
                mark(states, child);
            }
        }
        for root in roots {
            mark(&mut self.states, root);
        }
    }
}

/// One display row of the flattened forest. Borrows its node: rows are a
/// per-render view over a forest the caller owns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Row<'a> {
    pub node: &'a OrganizationNode,
    pub depth: u32,
    pub has_children: bool,
    pub is_expanded: bool,
}

/// Pre-order flatten of the forest under the given expand state.
///
/// A collapsed node still emits its own row; its descendants do not. With
/// `indent = false` every row reports depth 0 (the console's flat "all
/// members" table); traversal order is identical either way. Sibling order
/// is inherited from materialization and never re-sorted here, so two calls
/// with the same inputs return identical row sequences.
pub fn flatten<'a>(
    roots: &'a [OrganizationNode],
    expand: &ExpandState,
    indent: bool,
) -> Vec<Row<'a>> {
    fn push_rows<'a>(
        node: &'a OrganizationNode,
        expand: &ExpandState,
        indent: bool,
        rows: &mut Vec<Row<'a>>,
    ) {
        let is_expanded = expand.is_expanded(&node.entity.id);
        rows.push(Row {
            node,
            depth: if indent { node.depth } else { 0 },
            has_children: node.has_children(),
            is_expanded,
        });
        if is_expanded {
            for child in &node.children {
                push_rows(child, expand, indent, rows);
            }
        }
    }

    let mut rows = Vec::new();
    for root in roots {
        push_rows(root, expand, indent, &mut rows);
    }
    rows
}

/// Number of rows `flatten` would emit, without allocating them. Collapsed
/// subtrees count as one. This is the total fed to pagination.
pub fn visible_count(roots: &[OrganizationNode], expand: &ExpandState) -> usize {
    fn count(node: &OrganizationNode, expand: &ExpandState) -> usize {
        if expand.is_expanded(&node.entity.id) {
            1 + node
                .children
                .iter()
                .map(|child| count(child, expand))
                .sum::<usize>()
        } else {
            1
        }
    }
    roots.iter().map(|root| count(root, expand)).sum()
}

/// Stable sort of one sibling group; each subtree travels with its root, so
/// expand/collapse structure survives a column sort. Applied by the caller
/// to the sibling vector backing the visible table, never across tree
/// boundaries.
pub fn sort_siblings<F>(siblings: &mut [OrganizationNode], mut compare: F)
where
    F: FnMut(&OrganizationNode, &OrganizationNode) -> Ordering,
{
    siblings.sort_by(|a, b| compare(a, b));
}

/// Row ordinal style: restart at 1 on each page, or continue across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowNumbering {
    PageLocal,
    Sequential,
}

impl RowNumbering {
    pub fn key(self) -> &'static str {
        match self {
            Self::PageLocal => "page_local",
            Self::Sequential => "sequential",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "page_local" => Some(Self::PageLocal),
            "sequential" => Some(Self::Sequential),
            _ => None,
        }
    }
}

/// One page window over an already-flattened (and already-filtered) row
/// list. `index` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub index: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }

    /// Contiguous slice for this page. A page beyond the available range is
    /// empty, not an error (the lenient pagination-UI contract).
    pub fn slice<'r, 'a>(&self, rows: &'r [Row<'a>]) -> &'r [Row<'a>] {
        if self.size == 0 {
            return &[];
        }
        let start = self.index.saturating_mul(self.size);
        if start >= rows.len() {
            return &[];
        }
        let end = (start + self.size).min(rows.len());
        &rows[start..end]
    }

    pub fn page_count(&self, total_rows: usize) -> usize {
        if self.size == 0 {
            return 0;
        }
        (total_rows + self.size - 1) / self.size
    }

    /// Ordinal restarting at 1 on each page.
    pub fn page_local_ordinal(&self, position: usize) -> usize {
        position + 1
    }

    /// Ordinal continuing across pages.
    pub fn sequential_ordinal(&self, position: usize) -> usize {
        self.index * self.size + position + 1
    }

    pub fn ordinal(&self, numbering: RowNumbering, position: usize) -> usize {
        match numbering {
            RowNumbering::PageLocal => self.page_local_ordinal(position),
            RowNumbering::Sequential => self.sequential_ordinal(position),
        }
    }
}
