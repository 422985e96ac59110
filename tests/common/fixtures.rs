use canalgraph::compiler::GraphNode;
use canalgraph::feature::{Feature, FeatureCollection};
use serde_json::{Value, json};

pub fn feature_from(value: Value) -> Feature {
    serde_json::from_value(value).unwrap()
}

pub fn point_feature(name: &str, x: f64, y: f64) -> Feature {
    feature_from(json!({
        "geometry": {"type": "Point", "coordinates": [x, y]},
        "properties": {"name": name}
    }))
}

pub fn line_feature(name: &str, coords: &[(f64, f64)]) -> Feature {
    feature_from(json!({
        "geometry": {
            "type": "LineString",
            "coordinates": coords.iter().map(|(x, y)| json!([x, y])).collect::<Vec<_>>()
        },
        "properties": {"name": name}
    }))
}

pub fn oneway_line_feature(name: &str, coords: &[(f64, f64)]) -> Feature {
    feature_from(json!({
        "geometry": {
            "type": "LineString",
            "coordinates": coords.iter().map(|(x, y)| json!([x, y])).collect::<Vec<_>>()
        },
        "properties": {"name": name, "oneway": true}
    }))
}

pub fn polygon_feature(name: &str, rings: &[&[(f64, f64)]]) -> Feature {
    feature_from(json!({
        "geometry": {
            "type": "Polygon",
            "coordinates": rings
                .iter()
                .map(|ring| ring.iter().map(|(x, y)| json!([x, y])).collect::<Vec<_>>())
                .collect::<Vec<_>>()
        },
        "properties": {"name": name}
    }))
}

pub fn unnamed_point(x: f64, y: f64) -> Feature {
    feature_from(json!({
        "geometry": {"type": "Point", "coordinates": [x, y]},
        "properties": {}
    }))
}

pub fn collection(features: Vec<Feature>) -> FeatureCollection {
    let features = features
        .iter()
        .map(|feature| serde_json::to_value(feature).unwrap())
        .collect::<Vec<_>>();
    serde_json::from_value(json!({"features": features})).unwrap()
}

/// The node-id halves of a node's neighbor pairs, as plain strings.
pub fn neighbor_node_ids(node: &GraphNode) -> Vec<String> {
    node.neighbors
        .iter()
        .map(|(_, node_id)| node_id.as_str().to_string())
        .collect()
}
