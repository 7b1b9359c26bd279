//! Jackson object identity in server responses.
//!
//! The server writes each DTO in full once, tagged with a numeric `@id`. Later
//! occurrences of the same object are written as that bare number. Resolution
//! swaps the numbers back for the objects before typed decoding.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Keys whose values are DTOs, or lists of DTOs, and may therefore arrive as
/// a back-reference. Other integers (counts, sizes, dates) are left alone.
const REFERENCE_KEYS: &[&str] = &[
    "objects",
    "fetchOptions",
    "permId",
    "identifier",
    "id",
    "type",
    "space",
    "project",
    "experiment",
    "sample",
    "container",
    "registrator",
    "modifier",
    "leader",
    "owner",
    "author",
    "vocabulary",
    "externalData",
    "storageFormat",
    "fileFormatType",
    "locatorType",
    "previousVersion",
    "summary",
    "content",
    "progress",
    "error",
    "parents",
    "children",
    "contained",
    "containers",
    "dataSets",
    "samples",
    "experiments",
    "projects",
    "history",
    "tags",
    "attachments",
    "deletedObjects",
    "operations",
    "results",
    "properties",
    "sort",
    "sortings",
    "order",
];

/// Replaces every back-reference in `value` with the object it points at.
///
/// A reference to an object that is still being expanded (an object reachable
/// from itself) becomes a shallow copy holding only that object's plain
/// attributes, so the result stays a finite tree.
pub fn resolve_references(value: Value) -> Value {
    let mut objects = HashMap::new();
    collect(&value, &mut objects);
    if objects.is_empty() {
        return value;
    }
    let mut expanding = Vec::new();
    resolve(value, false, &objects, &mut expanding)
}

fn object_id(map: &Map<String, Value>) -> Option<u64> {
    map.get("@id").and_then(Value::as_u64)
}

fn collect(value: &Value, objects: &mut HashMap<u64, Value>) {
    match value {
        Value::Object(map) => {
            if let Some(id) = object_id(map) {
                objects.entry(id).or_insert_with(|| value.clone());
            }
            map.values().for_each(|child| collect(child, objects));
        }
        Value::Array(items) => items.iter().for_each(|item| collect(item, objects)),
        _ => {}
    }
}

fn resolve(value: Value, reference_slot: bool, objects: &HashMap<u64, Value>, expanding: &mut Vec<u64>) -> Value {
    match value {
        Value::Number(number) if reference_slot => match number
            .as_u64()
            .and_then(|id| objects.get(&id).map(|object| (id, object)))
        {
            Some((id, object)) if expanding.contains(&id) => shallow(object),
            Some((_, object)) => resolve(object.clone(), false, objects, expanding),
            None => Value::Number(number),
        },
        Value::Object(map) => {
            let id = object_id(&map);
            if let Some(id) = id {
                expanding.push(id);
            }
            let resolved = map
                .into_iter()
                .map(|(key, child)| {
                    let slot = REFERENCE_KEYS.contains(&key.as_str());
                    let child = resolve(child, slot, objects, expanding);
                    (key, child)
                })
                .collect();
            if id.is_some() {
                expanding.pop();
            }
            Value::Object(resolved)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| resolve(item, reference_slot, objects, expanding))
                .collect(),
        ),
        other => other,
    }
}

/// The object without any of its relations.
fn shallow(object: &Value) -> Value {
    match object {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !REFERENCE_KEYS.contains(&key.as_str()))
                .map(|(key, child)| (key.clone(), child.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}
