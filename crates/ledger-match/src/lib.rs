//! Subset matching between benchmark configuration documents.
//!
//! Decides whether a requested configuration's workload is entirely
//! contained in an already-recorded one, so the requested run can be
//! skipped. The relation is reflexive but not symmetric: a recorded config
//! with extra keys, extra list elements, or extra array objects still
//! covers a smaller request.
//!
//! Matching is top-level only: list-valued fields get set-containment
//! treatment, while nested objects and arrays-of-objects inside a field are
//! compared by exact equality. Deep recursive subset descent is out of
//! scope.

use serde_json::{Map, Value};

use ledger_types::ConfigDocument;

/// Field-level subset check.
///
/// Two lists match when every element of `a` occurs in `b` (containment,
/// not ordering or multiplicity). Everything else must be identical; a
/// list/non-list type mismatch is never a subset.
pub fn is_field_subset(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(sub), Value::Array(superset)) => {
            sub.iter().all(|item| superset.contains(item))
        }
        (Value::Array(_), _) | (_, Value::Array(_)) => false,
        (a, b) => a == b,
    }
}

/// Object-level subset check.
///
/// Every key present in `a` must exist in `b` with a matching field value;
/// keys present only in `b` are irrelevant.
pub fn is_config_subset(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    a.iter().all(|(key, sub_value)| {
        b.get(key)
            .map(|super_value| is_field_subset(sub_value, super_value))
            .unwrap_or(false)
    })
}

/// Array-level subset check.
///
/// Every object in `a` must be covered by at least one object in `b`.
/// Order-independent; `b` may contain extra objects.
pub fn is_config_array_subset(a: &[Map<String, Value>], b: &[Map<String, Value>]) -> bool {
    a.iter()
        .all(|sub| b.iter().any(|superset| is_config_subset(sub, superset)))
}

/// Top-level dispatch over the two document shapes.
///
/// Mismatched shapes (object vs. array) are never a subset.
pub fn is_covered_by(requested: &ConfigDocument, recorded: &ConfigDocument) -> bool {
    match (requested, recorded) {
        (ConfigDocument::Object(a), ConfigDocument::Object(b)) => is_config_subset(a, b),
        (ConfigDocument::Array(a), ConfigDocument::Array(b)) => is_config_array_subset(a, b),
        _ => false,
    }
}
