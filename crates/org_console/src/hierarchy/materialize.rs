//! Entity-tree materialization: turns a flat entity snapshot into the
//! concrete organization forest.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::ancestry::AncestorResolver;
use super::type_graph::TypeGraph;
use super::types::{Entity, EntityId, LevelId};

/// A materialized tree node wrapping one entity. Built fresh on every
/// `materialize` call; never shared mutably between callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationNode {
    pub entity: Entity,
    /// 0 at each forest root.
    pub depth: u32,
    /// Level ancestor chain of `entity.level_id`, root first. Powers the
    /// superior-agent breadcrumb without re-walking the graph at render time.
    pub lineage: Vec<LevelId>,
    pub children: Vec<OrganizationNode>,
}

impl OrganizationNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, the node itself excluded.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// Non-fatal data-quality findings from materialization. Affected entities
/// are dropped or re-rooted; the rest of the forest still materializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MaterializeDiagnostic {
    /// Entity references a level absent from the graph; entity excluded.
    UnknownLevel {
        entity_id: EntityId,
        level_id: LevelId,
    },
    /// Entity id seen before; first occurrence wins.
    DuplicateEntity { entity_id: EntityId },
    /// Parent reference does not resolve to a materialized entity; the
    /// entity becomes a forest root.
    DanglingParent {
        entity_id: EntityId,
        parent_entity_id: EntityId,
    },
    /// Entity sits on a `parent_entity_id` cycle, so no root reaches it;
    /// entity excluded.
    UnreachableCycle { entity_id: EntityId },
}

/// Output of `materialize`: the forest, the entity parent-link index (the
/// same edge set the override resolver walks), and the diagnostics list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializedForest {
    pub roots: Vec<OrganizationNode>,
    pub parent_links: BTreeMap<EntityId, EntityId>,
    pub diagnostics: Vec<MaterializeDiagnostic>,
}

impl MaterializedForest {
    /// Find a node anywhere in the forest.
    pub fn node(&self, entity_id: &str) -> Option<&OrganizationNode> {
        fn find<'a>(node: &'a OrganizationNode, entity_id: &str) -> Option<&'a OrganizationNode> {
            if node.entity.id == entity_id {
                return Some(node);
            }
            node.children
                .iter()
                .find_map(|child| find(child, entity_id))
        }
        self.roots.iter().find_map(|root| find(root, entity_id))
    }

    /// Materialized entities per level, for the console's summary chips.
    pub fn level_counts(&self) -> BTreeMap<LevelId, usize> {
        fn count(node: &OrganizationNode, counts: &mut BTreeMap<LevelId, usize>) {
            *counts.entry(node.entity.level_id.clone()).or_insert(0) += 1;
            for child in &node.children {
                count(child, counts);
            }
        }
        let mut counts = BTreeMap::new();
        for root in &self.roots {
            count(root, &mut counts);
        }
        counts
    }

    /// Total number of materialized entities.
    pub fn entity_count(&self) -> usize {
        self.roots
            .iter()
            .map(|root| 1 + root.descendant_count())
            .sum()
    }
}

/// Materialize the organization forest from one entity snapshot.
///
/// Parent/child edges come from `parent_entity_id` only; the level adjacency
/// never shapes the entity tree. Sibling and root order is derived from the
/// data, `(level hierarchy_order, entity id)` ascending, so the same
/// snapshot materializes identically regardless of input-list order.
pub fn materialize(graph: &TypeGraph, entities: &[Entity]) -> MaterializedForest {
    let mut diagnostics: Vec<MaterializeDiagnostic> = Vec::new();

    // Admission: drop duplicates and entities whose level the graph lacks.
    let mut admitted: BTreeMap<EntityId, Entity> = BTreeMap::new();
    for entity in entities {
        if admitted.contains_key(&entity.id) {
            diagnostics.push(MaterializeDiagnostic::DuplicateEntity {
                entity_id: entity.id.clone(),
            });
            continue;
        }
        if !graph.contains(&entity.level_id) {
            diagnostics.push(MaterializeDiagnostic::UnknownLevel {
                entity_id: entity.id.clone(),
                level_id: entity.level_id.clone(),
            });
            continue;
        }
        admitted.insert(entity.id.clone(), entity.clone());
    }

    // Link pass: entity edges among admitted entities; dangling parents
    // re-root the child.
    let mut parent_links: BTreeMap<EntityId, EntityId> = BTreeMap::new();
    let mut children_of: BTreeMap<EntityId, Vec<EntityId>> = BTreeMap::new();
    let mut root_ids: Vec<EntityId> = Vec::new();
    for (id, entity) in &admitted {
        match &entity.parent_entity_id {
            Some(parent_id) if admitted.contains_key(parent_id) => {
                parent_links.insert(id.clone(), parent_id.clone());
                children_of
                    .entry(parent_id.clone())
                    .or_default()
                    .push(id.clone());
            }
            Some(parent_id) => {
                diagnostics.push(MaterializeDiagnostic::DanglingParent {
                    entity_id: id.clone(),
                    parent_entity_id: parent_id.clone(),
                });
                root_ids.push(id.clone());
            }
            None => root_ids.push(id.clone()),
        }
    }

    let sort_key = |id: &EntityId| -> (i32, EntityId) {
        let order = admitted
            .get(id)
            .and_then(|entity| graph.level(&entity.level_id))
            .map(|level| level.hierarchy_order)
            .unwrap_or(i32::MAX);
        (order, id.clone())
    };
    root_ids.sort_by_key(&sort_key);
    for siblings in children_of.values_mut() {
        siblings.sort_by_key(&sort_key);
    }

    let mut resolver = AncestorResolver::new(graph);
    let mut placed: BTreeSet<EntityId> = BTreeSet::new();
    let roots: Vec<OrganizationNode> = root_ids
        .iter()
        .map(|id| build_node(id, 0, &admitted, &children_of, &mut resolver, &mut placed))
        .collect();

    // Anything admitted but never reached sits on a parent cycle.
    for id in admitted.keys() {
        if !placed.contains(id) {
            diagnostics.push(MaterializeDiagnostic::UnreachableCycle {
                entity_id: id.clone(),
            });
        }
    }

    MaterializedForest {
        roots,
        parent_links,
        diagnostics,
    }
}

fn build_node(
    id: &EntityId,
    depth: u32,
    admitted: &BTreeMap<EntityId, Entity>,
    children_of: &BTreeMap<EntityId, Vec<EntityId>>,
    resolver: &mut AncestorResolver<'_>,
    placed: &mut BTreeSet<EntityId>,
) -> OrganizationNode {
    placed.insert(id.clone());
    let entity = admitted[id].clone();
    let lineage = resolver.resolve(&entity.level_id);
    let children = children_of
        .get(id)
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .map(|child_id| build_node(child_id, depth + 1, admitted, children_of, resolver, placed))
        .collect();
    OrganizationNode {
        entity,
        depth,
        lineage,
        children,
    }
}
