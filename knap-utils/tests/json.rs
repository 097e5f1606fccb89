use knap_utils::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Record {
    zeta: u32,
    alpha: Vec<usize>,
    nested: serde_json::Value,
}

fn record() -> Record {
    Record {
        zeta: 7,
        alpha: vec![3, 1],
        nested: json!({ "b": 1, "a": [{ "y": 2, "x": 1 }] }),
    }
}

#[test]
fn test_jsonify_sorts_keys() {
    assert_eq!(
        jsonify(&record()),
        r#"{"alpha":[3,1],"nested":{"a":[{"x":1,"y":2}],"b":1},"zeta":7}"#
    );
}

#[test]
fn test_dejsonify() {
    let parsed: Record = dejsonify(&jsonify(&record())).unwrap();
    assert_eq!(parsed, record());
    assert!(dejsonify::<Record>("{\"zeta\": -1}").is_err());
}

#[test]
fn test_compress_obj() {
    let compressed = compress_obj(&record()).unwrap();
    assert_ne!(compressed, jsonify(&record()).into_bytes());
    let decompressed: Record = decompress_obj(&compressed).unwrap();
    assert_eq!(decompressed, record());
}

#[test]
fn test_decompress_garbage() {
    assert!(decompress_obj::<Record>(b"not zlib").is_err());
}
