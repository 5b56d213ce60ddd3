//! Parsed filter conditions and their evaluation against records.
//!
//! A [`ConditionTree`] maps field names to conditions. Nesting mirrors the
//! record shape: a filter on `author.name` becomes a tree whose `author`
//! entry holds a sub-tree for `name`. The reserved key `or` holds a list
//! of alternative sub-trees. Everything else is an operator set applied to
//! a single field.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::Value;

use crate::query::op::Operator;

/// Reserved field name introducing a disjunction of sub-trees.
pub const OR_KEY: &str = "or";

/// A single condition attached to a field name.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// Operator set, e.g. `{gte: 10, lt: 20}`. All entries must pass.
    Ops(BTreeMap<Operator, Value>),
    /// Conditions on a nested object field.
    Nested(ConditionTree),
    /// Alternatives under the reserved `or` key; any match suffices.
    Any(Vec<ConditionTree>),
    /// A bare scalar. Only constructible through raw `_where` JSON; it
    /// matches nothing.
    Literal(Value),
}

/// A set of conditions over one record, AND-ed across fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConditionTree {
    entries: BTreeMap<String, Condition>,
}

impl ConditionTree {
    /// Creates an empty tree, which matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no condition has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the condition registered for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.entries.get(field)
    }

    /// Iterates over `(field, condition)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Condition)> {
        self.entries.iter()
    }

    /// Registers `op = value` for the dot-delimited `path`, creating
    /// intermediate sub-trees as needed. A later assignment to the same
    /// `path:op` pair overwrites the earlier one; an assignment that
    /// conflicts in kind (a nested tree where an operator set already
    /// lives, or vice versa) replaces the previous entry wholesale.
    pub fn assign(&mut self, path: &str, op: Operator, value: Value) {
        match path.split_once('.') {
            Some((head, rest)) => {
                let entry = self
                    .entries
                    .entry(head.to_owned())
                    .or_insert_with(|| Condition::Nested(ConditionTree::new()));
                if !matches!(entry, Condition::Nested(_)) {
                    *entry = Condition::Nested(ConditionTree::new());
                }
                if let Condition::Nested(sub) = entry {
                    sub.assign(rest, op, value);
                }
            }
            None => {
                let entry = self
                    .entries
                    .entry(path.to_owned())
                    .or_insert_with(|| Condition::Ops(BTreeMap::new()));
                match entry {
                    Condition::Ops(ops) => {
                        ops.insert(op, value);
                    }
                    other => *other = Condition::Ops(BTreeMap::from([(op, value)])),
                }
            }
        }
    }

    /// Builds a tree from a raw JSON object (the `_where` escape hatch).
    /// Returns `None` when `value` is not an object.
    ///
    /// An object value containing at least one known operator key becomes
    /// an operator set (unknown keys inside it are ignored); any other
    /// object recurses as a nested tree; `or` with an array becomes a
    /// disjunction whose non-object elements are dropped; scalars become
    /// literals, which never match.
    pub fn from_json(value: &Value) -> Option<ConditionTree> {
        let object = value.as_object()?;
        let mut tree = ConditionTree::new();
        for (key, val) in object {
            let condition = if key == OR_KEY {
                match val.as_array() {
                    Some(items) => Condition::Any(
                        items.iter().filter_map(ConditionTree::from_json).collect(),
                    ),
                    None => Condition::Literal(val.clone()),
                }
            } else {
                Self::condition_from_json(val)
            };
            tree.entries.insert(key.clone(), condition);
        }
        Some(tree)
    }

    fn condition_from_json(value: &Value) -> Condition {
        if let Some(object) = value.as_object() {
            let ops: BTreeMap<Operator, Value> = object
                .iter()
                .filter_map(|(k, v)| Operator::parse(k).map(|op| (op, v.clone())))
                .collect();
            if !ops.is_empty() {
                return Condition::Ops(ops);
            }
            if let Some(nested) = ConditionTree::from_json(value) {
                return Condition::Nested(nested);
            }
        }
        Condition::Literal(value.clone())
    }

    /// Decides whether `record` satisfies every condition in the tree.
    /// Fields are AND-ed; the first failing entry short-circuits.
    pub fn matches(&self, record: &Value) -> bool {
        for (field, condition) in &self.entries {
            let passed = match condition {
                Condition::Any(alternatives) => {
                    !alternatives.is_empty()
                        && alternatives.iter().any(|tree| tree.matches(record))
                }
                Condition::Ops(ops) => match record.get(field) {
                    Some(actual) => ops.iter().all(|(op, expected)| apply(*op, actual, expected)),
                    None => false,
                },
                Condition::Nested(sub) => match record.get(field) {
                    Some(actual) if actual.is_object() => sub.matches(actual),
                    _ => false,
                },
                Condition::Literal(_) => false,
            };
            if !passed {
                return false;
            }
        }
        true
    }
}

fn apply(op: Operator, actual: &Value, expected: &Value) -> bool {
    match op {
        Operator::Eq => json_eq(actual, expected),
        Operator::Ne => !json_eq(actual, expected),
        Operator::Lt => compare(actual, expected).is_some_and(Ordering::is_lt),
        Operator::Lte => compare(actual, expected).is_some_and(Ordering::is_le),
        Operator::Gt => compare(actual, expected).is_some_and(Ordering::is_gt),
        Operator::Gte => compare(actual, expected).is_some_and(Ordering::is_ge),
        Operator::In => match expected {
            Value::Array(items) => items.iter().any(|item| json_eq(actual, item)),
            // A non-array only appears through `_where`; treat it as a
            // single-element list.
            other => json_eq(actual, other),
        },
    }
}

/// Equality with numeric normalization: `1` and `1.0` are equal, every
/// other kind falls back to structural equality.
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Scalar shape a record value is lowered to before ordering.
#[derive(Clone, Debug, PartialEq)]
enum Comparable {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

fn comparable(value: &Value) -> Option<Comparable> {
    match value {
        Value::Null => Some(Comparable::Null),
        Value::Bool(b) => Some(Comparable::Bool(*b)),
        Value::Number(n) => n.as_f64().map(Comparable::Number),
        Value::String(s) => Some(Comparable::String(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Orders two JSON values of the same scalar kind. Values of different
/// kinds (and arrays/objects) are unordered and yield `None`, which makes
/// any range operator on them fail.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (comparable(a)?, comparable(b)?) {
        (Comparable::Null, Comparable::Null) => Some(Ordering::Equal),
        (Comparable::Bool(x), Comparable::Bool(y)) => Some(x.cmp(&y)),
        (Comparable::Number(x), Comparable::Number(y)) => x.partial_cmp(&y),
        (Comparable::String(x), Comparable::String(y)) => Some(x.cmp(&y)),
        _ => None,
    }
}
