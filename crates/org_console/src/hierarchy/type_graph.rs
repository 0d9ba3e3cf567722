//! Organizational level graph: construction, validation, and lookups.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt;

use super::types::{Level, LevelId};

/// The structural graph of levels and their parent→child relationships.
///
/// Built once from the configuration feed and read-only afterwards. When an
/// operator edits levels the collaborator builds a fresh graph and swaps the
/// reference; in-flight readers keep a consistent view of the old instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeGraph {
    levels: BTreeMap<LevelId, Level>,
    children: BTreeMap<LevelId, Vec<LevelId>>,
    parents: BTreeMap<LevelId, LevelId>,
    roots: Vec<LevelId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    UnknownLevel { level_id: LevelId },
    DuplicateLevel { level_id: LevelId },
    ConflictingParents { level_id: LevelId },
    Cycle { level_id: LevelId },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::UnknownLevel { level_id } => {
                write!(f, "unknown level referenced: {level_id}")
            }
            GraphError::DuplicateLevel { level_id } => {
                write!(f, "duplicate level definition: {level_id}")
            }
            GraphError::ConflictingParents { level_id } => {
                write!(f, "level listed under more than one parent: {level_id}")
            }
            GraphError::Cycle { level_id } => {
                write!(f, "level hierarchy contains a cycle through: {level_id}")
            }
        }
    }
}

impl Error for GraphError {}

impl TypeGraph {
    /// Build and validate a graph from the configuration feed.
    ///
    /// Child lists keep the supplied order (first occurrence wins on
    /// repeats); roots are ordered by `(hierarchy_order, id)`. Any structural
    /// violation is fatal and no partial graph is returned: a malformed
    /// hierarchy would silently mis-route configuration cascades.
    pub fn build(
        levels: Vec<Level>,
        adjacency: BTreeMap<LevelId, Vec<LevelId>>,
    ) -> Result<Self, GraphError> {
        let mut level_map: BTreeMap<LevelId, Level> = BTreeMap::new();
        for level in levels {
            if level_map.contains_key(&level.id) {
                return Err(GraphError::DuplicateLevel { level_id: level.id });
            }
            level_map.insert(level.id.clone(), level);
        }

        let mut children: BTreeMap<LevelId, Vec<LevelId>> = BTreeMap::new();
        let mut parents: BTreeMap<LevelId, LevelId> = BTreeMap::new();
        for (parent_id, child_ids) in adjacency {
            if !level_map.contains_key(&parent_id) {
                return Err(GraphError::UnknownLevel {
                    level_id: parent_id,
                });
            }
            let mut ordered: Vec<LevelId> = Vec::with_capacity(child_ids.len());
            for child_id in child_ids {
                if !level_map.contains_key(&child_id) {
                    return Err(GraphError::UnknownLevel { level_id: child_id });
                }
                if ordered.contains(&child_id) {
                    continue;
                }
                match parents.get(&child_id) {
                    Some(existing) if *existing != parent_id => {
                        return Err(GraphError::ConflictingParents { level_id: child_id });
                    }
                    Some(_) => continue,
                    None => {}
                }
                parents.insert(child_id.clone(), parent_id.clone());
                ordered.push(child_id);
            }
            children.insert(parent_id, ordered);
        }

        detect_cycles(&level_map, &children)?;

        let mut roots: Vec<LevelId> = level_map
            .keys()
            .filter(|id| !parents.contains_key(*id))
            .cloned()
            .collect();
        roots.sort_by(|a, b| {
            let oa = level_map[a].hierarchy_order;
            let ob = level_map[b].hierarchy_order;
            oa.cmp(&ob).then_with(|| a.cmp(b))
        });

        Ok(Self {
            levels: level_map,
            children,
            parents,
            roots,
        })
    }

    pub fn contains(&self, level_id: &str) -> bool {
        self.levels.contains_key(level_id)
    }

    pub fn level(&self, level_id: &str) -> Option<&Level> {
        self.levels.get(level_id)
    }

    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.levels.values()
    }

    pub fn children(&self, level_id: &str) -> &[LevelId] {
        self.children
            .get(level_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn parent_of(&self, level_id: &str) -> Option<&LevelId> {
        self.parents.get(level_id)
    }

    pub fn is_root(&self, level_id: &str) -> bool {
        self.contains(level_id) && !self.parents.contains_key(level_id)
    }

    pub fn roots(&self) -> &[LevelId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// DFS over the child adjacency with visited/in-stack sets. Bounded by level
/// count; a back edge is reported as `Cycle` at the level it closes on.
fn detect_cycles(
    levels: &BTreeMap<LevelId, Level>,
    children: &BTreeMap<LevelId, Vec<LevelId>>,
) -> Result<(), GraphError> {
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut in_stack: BTreeSet<&str> = BTreeSet::new();

    for start in levels.keys() {
        if visited.contains(start.as_str()) {
            continue;
        }
        // Iterative DFS: (level, next child index) frames.
        let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
        in_stack.insert(start.as_str());
        while let Some((current, child_index)) = stack.pop() {
            let child_ids = children.get(current).map(Vec::as_slice).unwrap_or(&[]);
            if child_index < child_ids.len() {
                stack.push((current, child_index + 1));
                let child = child_ids[child_index].as_str();
                if in_stack.contains(child) {
                    return Err(GraphError::Cycle {
                        level_id: child.to_string(),
                    });
                }
                if !visited.contains(child) {
                    in_stack.insert(child);
                    stack.push((child, 0));
                }
            } else {
                in_stack.remove(current);
                visited.insert(current);
            }
        }
    }
    Ok(())
}
