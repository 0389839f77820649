use serde_json::{Map, Value};
use trama_path::PathSegment;

/// Assign `value` at `segments` under `target`, creating intermediate
/// containers on demand.
///
/// A member segment ensures an object at that slot; an index segment ensures
/// an array, sparse-filling missing elements with `null` up to the index.
/// When an existing slot holds the wrong shape (a primitive where a container
/// is needed), the slot is overwritten: stored keys are allowed to disagree
/// about a field's shape, and the deepest write wins. The terminal segment
/// assigns the value directly, which makes the operation idempotent.
///
/// `assign` allocates up to any index it is given; callers gate indices
/// against `MAX_ARRAY_INDEX` first (reconstruction skips offending rows, the
/// edit boundary rejects them).
pub fn assign(target: &mut Value, segments: &[PathSegment], value: Value) {
    match segments {
        [] => *target = value,
        [PathSegment::Member(name), rest @ ..] => {
            let object = ensure_object(target);
            let slot = object.entry(name.clone()).or_insert(Value::Null);
            assign(slot, rest, value);
        }
        [PathSegment::Index(index), rest @ ..] => {
            let array = ensure_array(target);
            if array.len() <= *index {
                array.resize(index + 1, Value::Null);
            }
            assign(&mut array[*index], rest, value);
        }
    }
}

fn ensure_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut().expect("slot was just made an object")
}

fn ensure_array(slot: &mut Value) -> &mut Vec<Value> {
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    slot.as_array_mut().expect("slot was just made an array")
}
