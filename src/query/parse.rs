//! Turns flat query parameters into a [`ConditionTree`].
//!
//! Accepted shapes are `path=value`, `path:op=value`, and the legacy
//! `path_op=value` suffix form. Values arrive as strings and are coerced
//! to booleans, null, and numbers where they parse as such. Filtering
//! never fails: a parameter the grammar cannot place is dropped with a
//! debug log and the rest of the request proceeds.

use serde_json::Value;
use tracing::debug;

use crate::query::condition::ConditionTree;
use crate::query::op::Operator;

/// Parameter names with engine-level meaning, never treated as filters.
pub const RESERVED_KEYS: [&str; 9] = [
    "_sort", "_page", "_per_page", "_embed", "_where", "_start", "_end", "_limit", "_q",
];

/// Builds the condition tree for one request from its decoded `key=value`
/// pairs (order and repetition preserved by the caller).
///
/// A valid `_where` parameter replaces everything built from the other
/// pairs; an invalid one is ignored and the built tree stands.
pub fn parse_conditions(pairs: &[(String, String)]) -> ConditionTree {
    let mut tree = ConditionTree::new();
    for (key, raw) in pairs {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let (path, op) = match split_key(key) {
            Some(split) => split,
            None => {
                debug!(parameter = %key, "dropping filter with unknown operator");
                continue;
            }
        };
        let value = match op {
            Operator::In => Value::Array(raw.split(',').map(coerce).collect()),
            _ => coerce(raw),
        };
        tree.assign(path, op, value);
    }

    for (key, raw) in pairs {
        if key != "_where" {
            continue;
        }
        match serde_json::from_str::<Value>(raw).ok().as_ref().and_then(ConditionTree::from_json) {
            Some(replacement) => tree = replacement,
            None => debug!("ignoring _where that is not a JSON object"),
        }
    }

    tree
}

/// Splits a parameter key into its field path and operator.
///
/// `None` means the parameter must be dropped: it used the `:` form with
/// an operator outside the vocabulary. The legacy `_op` suffix form falls
/// back to a plain equality field when the suffix is unrecognized, since
/// underscores are legal inside field names.
fn split_key(key: &str) -> Option<(&str, Operator)> {
    if let Some((path, token)) = key.split_once(':') {
        if token.is_empty() {
            return Some((path, Operator::Eq));
        }
        return Operator::parse(token).map(|op| (path, op));
    }
    for op in Operator::ALL {
        if let Some(path) = key.strip_suffix(op.as_str()) {
            if let Some(path) = path.strip_suffix('_') {
                if !path.is_empty() {
                    return Some((path, op));
                }
            }
        }
    }
    Some((key, Operator::Eq))
}

/// Coerces one query-string value: `"true"`/`"false"` become booleans,
/// `"null"` becomes null, finite numbers become numbers (the empty string
/// stays a string), anything else is kept verbatim.
pub fn coerce(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        "" => return Value::String(String::new()),
        _ => {}
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }
    Value::String(raw.to_owned())
}
