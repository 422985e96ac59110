mod common;

use common::*;

use canalgraph::compiler::{CompiledGraph, Compiler, DEFAULT_TOLERANCE};

/// Checks run-wide junction symmetry: for every junction edge recorded on a
/// node, the counterpart node records the reverse edge.
fn assert_symmetric(compiled: &CompiledGraph) {
    for node in compiled.graph.values() {
        for (feature_id, neighbor_id) in &node.neighbors {
            // Junction edges cross feature boundaries; sequential edges stay
            // within the node's own feature and are checked elsewhere.
            if node.id.as_str().starts_with(feature_id.as_str()) {
                continue;
            }
            let neighbor = compiled
                .graph
                .get(neighbor_id)
                .unwrap_or_else(|| panic!("dangling neighbor {neighbor_id}"));
            assert!(
                neighbor
                    .neighbors
                    .iter()
                    .any(|(_, back)| back == &node.id),
                "missing reverse edge {neighbor_id} -> {}",
                node.id
            );
        }
    }
}

#[test]
fn junction_edges_are_symmetric_across_the_dataset() {
    let nudge = DEFAULT_TOLERANCE / 10.0;
    let compiled = Compiler::new().compile(&collection(vec![
        line_feature("west", &[(0.0, 0.0), (1.0, 0.0)]),
        line_feature("east", &[(1.0 + nudge, 0.0), (2.0, 0.0)]),
        point_feature("marker", 1.0, nudge),
    ]));

    assert_symmetric(&compiled);

    // The three coordinates near (1.0, 0.0) form a full junction clique.
    let junction_nodes: Vec<_> = compiled
        .graph
        .values()
        .filter(|node| {
            node.neighbors
                .iter()
                .any(|(fid, _)| !node.id.as_str().starts_with(fid.as_str()))
        })
        .collect();
    assert_eq!(junction_nodes.len(), 3);
    for node in junction_nodes {
        let junction_edges = node
            .neighbors
            .iter()
            .filter(|(fid, _)| !node.id.as_str().starts_with(fid.as_str()))
            .count();
        assert_eq!(junction_edges, 2);
    }
}

#[test]
fn coordinates_at_or_past_the_tolerance_are_not_junctions() {
    let compiled = Compiler::new().compile(&collection(vec![
        point_feature("A", 0.0, 0.0),
        // Exactly at the bound: excluded (the bound is strict).
        point_feature("B", DEFAULT_TOLERANCE, 0.0),
        // Past the bound: excluded.
        point_feature("C", DEFAULT_TOLERANCE * 2.0, 0.0),
    ]));

    for node in compiled.graph.values() {
        assert!(
            node.neighbors.is_empty(),
            "unexpected junction on {}",
            node.id
        );
    }
}

#[test]
fn shared_coordinate_links_every_feature_touching_it() {
    let compiled = Compiler::new().compile(&collection(vec![
        line_feature("north", &[(0.0, 1.0), (0.0, 0.0)]),
        line_feature("south", &[(0.0, 0.0), (0.0, -1.0)]),
        line_feature("east", &[(0.0, 0.0), (1.0, 0.0)]),
    ]));

    assert_symmetric(&compiled);

    // Each of the three nodes at the shared coordinate sees the other two.
    let shared: Vec<_> = compiled
        .graph
        .values()
        .filter(|node| node.pos == canalgraph::geometry::Coordinate::new(0.0, 0.0))
        .collect();
    assert_eq!(shared.len(), 3);
    for node in shared {
        let cross_feature = node
            .neighbors
            .iter()
            .filter(|(fid, _)| !node.id.as_str().starts_with(fid.as_str()))
            .count();
        assert_eq!(cross_feature, 2);
    }
}

#[test]
fn junctions_can_connect_two_parts_of_the_same_feature() {
    // A feature that loops back on itself within tolerance, without reusing
    // the exact coordinate value.
    let nudge = DEFAULT_TOLERANCE / 10.0;
    let feature = line_feature("loop", &[(0.0, 0.0), (1.0, 0.0), (nudge, 0.0)]);
    let compiled = Compiler::new().compile(&collection(vec![feature]));

    // The head and the returning tail are within tolerance of each other,
    // so each carries a junction edge on top of its sequential ones.
    let nodes: Vec<_> = compiled.graph.values().collect();
    assert_eq!(nodes[0].neighbors.len(), 2); // forward + junction to the tail
    assert_eq!(nodes[1].neighbors.len(), 2); // forward + backward only
    assert_eq!(nodes[2].neighbors.len(), 2); // backward + junction to the head

    assert!(neighbor_node_ids(nodes[0]).contains(&nodes[2].id.as_str().to_string()));
    assert!(neighbor_node_ids(nodes[2]).contains(&nodes[0].id.as_str().to_string()));
}
