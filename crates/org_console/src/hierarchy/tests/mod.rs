//! Tests for the hierarchy module.

use super::*;

use std::collections::BTreeMap;

fn level(id: &str, hierarchy_order: i32) -> Level {
    Level::new(id, id, "default", hierarchy_order)
}

fn adjacency(edges: &[(&str, &[&str])]) -> BTreeMap<LevelId, Vec<LevelId>> {
    edges
        .iter()
        .map(|(parent, children)| {
            (
                parent.to_string(),
                children.iter().map(|child| child.to_string()).collect(),
            )
        })
        .collect()
}

/// The six-rung reseller chain the console ships with.
fn reseller_graph() -> TypeGraph {
    let levels = vec![
        level("headquarters", 0),
        level("sub_headquarters", 1),
        level("master", 2),
        level("distributor", 3),
        level("store", 4),
        level("member", 5),
    ];
    let edges = adjacency(&[
        ("headquarters", &["sub_headquarters"]),
        ("sub_headquarters", &["master"]),
        ("master", &["distributor"]),
        ("distributor", &["store"]),
        ("store", &["member"]),
    ]);
    TypeGraph::build(levels, edges).expect("reseller graph builds")
}

/// A plain chain graph lvl-0 → lvl-1 → ... for depth-driven fixtures.
fn chain_graph(depth: usize) -> TypeGraph {
    let levels: Vec<Level> = (0..depth)
        .map(|index| level(&format!("lvl-{index}"), index as i32))
        .collect();
    let edges: BTreeMap<LevelId, Vec<LevelId>> = (0..depth.saturating_sub(1))
        .map(|index| {
            (
                format!("lvl-{index}"),
                vec![format!("lvl-{}", index + 1)],
            )
        })
        .collect();
    TypeGraph::build(levels, edges).expect("chain graph builds")
}

fn entity(id: &str, level_id: &str) -> Entity {
    Entity::new(id, level_id)
}

fn child_entity(id: &str, level_id: &str, parent: &str) -> Entity {
    Entity::new_with_parent(id, level_id, parent)
}

/// Deterministic mixer for pseudo-random fixtures (fixed seeds, no rand).
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

mod config;
mod determinism;
