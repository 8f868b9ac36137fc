//! Generic field resolution over drifted response shapes.
//!
//! One resolver walks a fixed source order for every canonical field: the
//! nested `projectMetadata` container first, then the root object, trying the
//! field's key candidates inside each. The first candidate that is present
//! and not `null` wins. An empty array counts as present, so a genuinely
//! empty detection list is not masked by a stale value further down the
//! chain.

use serde_json::{Map, Value};

/// Container key holding the newest response shape.
const METADATA_KEY: &str = "projectMetadata";

/// Resolve one canonical field. Returns the winning raw value, if any.
pub(crate) fn resolve<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    containers(raw)
        .into_iter()
        .flatten()
        .find_map(|container| lookup(container, keys))
}

/// Source order: nested container, then root. Either may be missing, and the
/// nested entry only counts when it actually is an object.
fn containers(raw: &Value) -> [Option<&Map<String, Value>>; 2] {
    let root = raw.as_object();
    let nested = root
        .and_then(|obj| obj.get(METADATA_KEY))
        .and_then(Value::as_object);
    [nested, root]
}

/// First present, non-null value among `keys` within one object.
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    })
}

/// Resolve a scalar string, falling back to `default` when the field is
/// absent or the winning value is not a string.
pub(crate) fn string_or(raw: &Value, keys: &[&str], default: &str) -> String {
    resolve(raw, keys)
        .and_then(Value::as_str)
        .map_or_else(|| default.to_string(), str::to_string)
}

/// Resolve an optional scalar string.
pub(crate) fn opt_string(raw: &Value, keys: &[&str]) -> Option<String> {
    resolve(raw, keys).and_then(Value::as_str).map(str::to_string)
}

/// Resolve a boolean flag.
pub(crate) fn bool_or(raw: &Value, keys: &[&str], default: bool) -> bool {
    resolve(raw, keys).and_then(Value::as_bool).unwrap_or(default)
}

/// Resolve a list field. The winning array is used verbatim; collections are
/// never merged across sources.
pub(crate) fn list<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    resolve(raw, keys).and_then(Value::as_array)
}

/// Resolve a list of strings. Non-string elements are dropped; the winning
/// list still wins even when that leaves it empty.
pub(crate) fn string_list(raw: &Value, keys: &[&str]) -> Vec<String> {
    list(raw, keys)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Resolve a whole-object field. Scanning continues until a source yields an
/// actual object, so a malformed scalar under the right key does not shadow a
/// usable object further down the chain. The winner is taken entirely;
/// sub-fields are never pulled from the other candidate.
pub(crate) fn object<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    containers(raw).into_iter().flatten().find_map(|container| {
        keys.iter()
            .find_map(|key| container.get(*key).filter(|v| v.is_object()))
    })
}

/// Look up a string inside one element or whole-object value, with a default.
pub(crate) fn elem_string_or(elem: &Value, keys: &[&str], default: &str) -> String {
    elem_opt_string(elem, keys).unwrap_or_else(|| default.to_string())
}

/// Look up an optional string inside one element or whole-object value.
pub(crate) fn elem_opt_string(elem: &Value, keys: &[&str]) -> Option<String> {
    elem.as_object()
        .and_then(|obj| lookup(obj, keys))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Look up an optional float. Integers coerce; anything else is absent.
pub(crate) fn elem_opt_f64(elem: &Value, keys: &[&str]) -> Option<f64> {
    elem.as_object()
        .and_then(|obj| lookup(obj, keys))
        .and_then(Value::as_f64)
}

/// Look up an optional non-negative integer.
pub(crate) fn elem_opt_u64(elem: &Value, keys: &[&str]) -> Option<u64> {
    elem.as_object()
        .and_then(|obj| lookup(obj, keys))
        .and_then(Value::as_u64)
}

/// Look up a list of strings inside one element or whole-object value.
pub(crate) fn elem_string_list(elem: &Value, keys: &[&str]) -> Vec<String> {
    elem.as_object()
        .and_then(|obj| lookup(obj, keys))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
