//! Dotted-path navigation over JSON documents

use serde_json::{Map, Value};

/// Get the value at a dot-separated path. Returns `None` when any segment
/// is absent or an intermediate value is not an object.
pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for key in path.split('.') {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

/// Set the value at a dot-separated path, creating intermediate object
/// nodes as needed. An existing non-object value along the path is
/// overwritten with an object; a scalar sitting where a section belongs
/// does not survive the write.
pub fn set_path(doc: &mut Value, path: &str, value: Value) {
    if !doc.is_object() {
        *doc = Value::Object(Map::new());
    }
    if let Value::Object(map) = doc {
        match path.split_once('.') {
            None => {
                map.insert(path.to_string(), value);
            }
            Some((head, rest)) => {
                let child =
                    map.entry(head.to_string()).or_insert_with(|| Value::Object(Map::new()));
                set_path(child, rest, value);
            }
        }
    }
}
