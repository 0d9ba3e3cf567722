use super::*;

/// Deterministic pseudo-random forest: depth capped at 6, fan-out at 5.
fn random_entities(seed: u64) -> Vec<Entity> {
    let count = 1 + (splitmix64(seed) % 40) as usize;
    let mut entities: Vec<Entity> = Vec::with_capacity(count);
    let mut depths: Vec<u32> = Vec::with_capacity(count);
    let mut child_counts: Vec<u32> = Vec::with_capacity(count);

    for index in 0..count {
        let roll = splitmix64(seed.wrapping_mul(0x517C_C1B7).wrapping_add(index as u64));
        let candidates: Vec<usize> = (0..index)
            .filter(|&prior| depths[prior] < 6 && child_counts[prior] < 5)
            .collect();

        if candidates.is_empty() || roll % 4 == 0 {
            depths.push(0);
            entities.push(entity(&format!("node-{index:03}"), "lvl-0"));
        } else {
            let pick = candidates[(roll >> 8) as usize % candidates.len()];
            child_counts[pick] += 1;
            let depth = depths[pick] + 1;
            depths.push(depth);
            entities.push(child_entity(
                &format!("node-{index:03}"),
                &format!("lvl-{depth}"),
                &format!("node-{pick:03}"),
            ));
        }
        child_counts.push(0);
    }
    entities
}

fn random_expand_state(seed: u64, entities: &[Entity]) -> ExpandState {
    let mut expand = ExpandState::new();
    for (index, entity) in entities.iter().enumerate() {
        let roll = splitmix64(seed.wrapping_mul(0x2545_F491).wrapping_add(index as u64));
        if roll % 3 == 0 {
            expand.collapse(entity.id.clone());
        }
    }
    expand
}

#[test]
fn visible_count_matches_flatten_for_random_forests() {
    let graph = chain_graph(7);

    for seed in 0..200u64 {
        let entities = random_entities(seed);
        let forest = materialize(&graph, &entities);
        assert!(forest.diagnostics.is_empty(), "seed {seed} produced diagnostics");

        let expand = random_expand_state(seed, &entities);
        let rows = flatten(&forest.roots, &expand, true);
        assert_eq!(
            visible_count(&forest.roots, &expand),
            rows.len(),
            "seed {seed}: visible count diverged from flatten length"
        );
    }
}

#[test]
fn flatten_is_deterministic_across_shuffled_inputs() {
    let graph = reseller_graph();
    let entities = vec![
        entity("hq-east", "headquarters"),
        entity("hq-west", "headquarters"),
        child_entity("sub-e1", "sub_headquarters", "hq-east"),
        child_entity("sub-w1", "sub_headquarters", "hq-west"),
        child_entity("master-e1", "master", "sub-e1"),
        child_entity("dist-e1", "distributor", "master-e1"),
        child_entity("store-e1", "store", "dist-e1"),
        child_entity("store-e2", "store", "dist-e1"),
        child_entity("member-e1", "member", "store-e1"),
        child_entity("member-e2", "member", "store-e1"),
        child_entity("member-e3", "member", "store-e2"),
        child_entity("store-w1", "store", "sub-w1"),
    ];

    let mut expand = ExpandState::new();
    expand.collapse("store-e1");
    expand.collapse("hq-west");

    let baseline = materialize(&graph, &entities);
    let baseline_rows = flatten(&baseline.roots, &expand, true);

    for round in 0..50u64 {
        let mut shuffled = entities.clone();
        for index in (1..shuffled.len()).rev() {
            let roll = splitmix64(round.wrapping_mul(0x9E37_79B9).wrapping_add(index as u64));
            let swap_with = (roll % (index as u64 + 1)) as usize;
            shuffled.swap(index, swap_with);
        }

        let forest = materialize(&graph, &shuffled);
        assert_eq!(forest, baseline, "round {round}: forest differs");

        // Same inputs, consecutive calls: structurally identical rows.
        let first = flatten(&forest.roots, &expand, true);
        let second = flatten(&forest.roots, &expand, true);
        assert_eq!(first, second, "round {round}: repeated flatten diverged");
        assert_eq!(first, baseline_rows, "round {round}: rows differ from baseline");
    }
}

#[test]
fn materialize_is_a_pure_function_of_its_inputs() {
    let graph = reseller_graph();
    let entities = vec![
        entity("hq-1", "headquarters"),
        child_entity("sub-1", "sub_headquarters", "hq-1"),
    ];

    let first = materialize(&graph, &entities);
    let second = materialize(&graph, &entities);
    assert_eq!(first, second);
}
