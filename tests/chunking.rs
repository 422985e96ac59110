use canalgraph::chunk::{ChunkError, ChunkPlan, plan};
use serde_json::{Value, json};

fn sizes(chunks: &[Value]) -> Vec<usize> {
    chunks
        .iter()
        .map(|chunk| match chunk {
            Value::Array(rows) => rows.len(),
            Value::Object(entries) => entries.len(),
            _ => 0,
        })
        .collect()
}

#[test]
fn twenty_five_rows_with_limit_ten_split_ten_ten_five() {
    let rows: Vec<Value> = (0..25).map(|i| json!(i)).collect();
    let doc = json!({"rows": rows});

    let ChunkPlan::Split {
        index,
        chunks,
        names,
    } = plan("rows.json", doc, "rows", 10).unwrap()
    else {
        panic!("25 rows with limit 10 must split");
    };

    assert_eq!(sizes(&chunks), vec![10, 10, 5]);
    assert_eq!(names, vec!["rows.0.json", "rows.1.json", "rows.2.json"]);

    let index = index.unwrap();
    assert_eq!(index["chunkTarget"], "rows");
    assert_eq!(index["chunks"], json!(["rows.0.json", "rows.1.json", "rows.2.json"]));
    assert!(index.get("rows").is_none());
}

#[test]
fn concatenating_chunks_reconstructs_the_array_target() {
    let rows: Vec<Value> = (0..107).map(|i| json!({"row": i})).collect();
    let doc = json!({"meta": "x", "rows": rows.clone()});

    let ChunkPlan::Split { chunks, .. } = plan("r.json", doc, "rows", 25).unwrap() else {
        panic!("must split");
    };

    let rebuilt: Vec<Value> = chunks
        .iter()
        .flat_map(|chunk| chunk.as_array().unwrap().clone())
        .collect();
    assert_eq!(rebuilt, rows);
}

#[test]
fn concatenating_chunks_reconstructs_the_object_target() {
    let mut tree = serde_json::Map::new();
    for i in 0..23 {
        tree.insert(format!("node-{i:02}"), json!({"value": i}));
    }
    let doc = json!({"schemaVersion": 1.0, "tree": tree.clone()});

    let ChunkPlan::Split { chunks, .. } = plan("t.json", doc, "tree", 10).unwrap() else {
        panic!("must split");
    };
    assert_eq!(sizes(&chunks), vec![10, 10, 3]);

    let mut rebuilt = serde_json::Map::new();
    for chunk in &chunks {
        for (key, value) in chunk.as_object().unwrap() {
            rebuilt.insert(key.clone(), value.clone());
        }
    }
    assert_eq!(rebuilt, tree);

    // Insertion order survives the split, chunk by chunk.
    let first_keys: Vec<_> = chunks[0].as_object().unwrap().keys().cloned().collect();
    assert_eq!(first_keys[0], "node-00");
    assert_eq!(first_keys[9], "node-09");
}

#[test]
fn bare_arrays_split_without_an_index() {
    let doc = json!([1, 2, 3, 4, 5]);
    let ChunkPlan::Split { index, chunks, .. } = plan("a.json", doc, "", 2).unwrap() else {
        panic!("must split");
    };
    assert!(index.is_none());
    assert_eq!(sizes(&chunks), vec![2, 2, 1]);
}

#[test]
fn within_limit_documents_pass_through_unchanged() {
    let doc = json!({"rows": [1, 2, 3], "meta": true});
    assert_eq!(
        plan("r.json", doc.clone(), "rows", 3).unwrap(),
        ChunkPlan::Unchanged(doc)
    );

    let bare = json!([1, 2, 3]);
    assert_eq!(
        plan("r.json", bare.clone(), "", 10).unwrap(),
        ChunkPlan::Unchanged(bare)
    );
}

#[test]
fn unchanged_documents_keep_their_key_order() {
    let doc: Value = serde_json::from_str(r#"{"z": 1, "rows": [1], "a": 2}"#).unwrap();
    let ChunkPlan::Unchanged(unchanged) = plan("r.json", doc, "rows", 10).unwrap() else {
        panic!("must pass through");
    };
    let keys: Vec<_> = unchanged.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["z", "rows", "a"]);
}

#[test]
fn array_input_with_target_is_fatal() {
    let err = plan("a.json", json!([1, 2]), "rows", 1).unwrap_err();
    assert!(matches!(err, ChunkError::TargetOnArray));
}

#[test]
fn absent_target_is_fatal() {
    let err = plan("a.json", json!({"rows": []}), "nodes", 1).unwrap_err();
    assert!(matches!(err, ChunkError::MissingTarget { target } if target == "nodes"));
}

#[test]
fn scalar_target_is_fatal() {
    let err = plan("a.json", json!({"rows": 42}), "rows", 1).unwrap_err();
    assert!(matches!(err, ChunkError::Unchunkable { kind: "number" }));
}

#[test]
fn object_without_target_key_passes_through() {
    // No target requested: nothing to split, whatever the sizes.
    let doc = json!({"rows": (0..100).collect::<Vec<_>>()});
    assert_eq!(
        plan("r.json", doc.clone(), "", 10).unwrap(),
        ChunkPlan::Unchanged(doc)
    );
}
