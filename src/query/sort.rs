//! Multi-key sorting for list results.

use std::cmp::Ordering;

use serde_json::Value;

use crate::query::condition::compare;

/// A single sort criterion parsed from `_sort`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortKey {
    /// Dot-delimited field path to order by.
    pub path: String,
    /// True when the token carried a leading `-`.
    pub descending: bool,
}

impl SortKey {
    /// Parses one `_sort` token; a leading `-` flips the direction.
    pub fn parse(token: &str) -> SortKey {
        match token.strip_prefix('-') {
            Some(path) => SortKey {
                path: path.to_owned(),
                descending: true,
            },
            None => SortKey {
                path: token.to_owned(),
                descending: false,
            },
        }
    }

    /// Parses the comma-separated `_sort` parameter. Empty tokens are
    /// skipped.
    pub fn parse_list(raw: &str) -> Vec<SortKey> {
        raw.split(',')
            .filter(|token| !token.is_empty())
            .map(SortKey::parse)
            .collect()
    }
}

/// Reads the value at a dot-delimited path inside a record.
pub fn value_at_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Stable sort of `records` by the given keys, earlier keys first.
///
/// Records whose sort key is missing, or which are unordered against the
/// other side (different JSON kinds), keep their relative insertion order.
pub fn sort_records(records: &mut [Value], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    records.sort_by(|a, b| {
        for key in keys {
            let ord = match (value_at_path(a, &key.path), value_at_path(b, &key.path)) {
                (Some(left), Some(right)) => compare(left, right).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            };
            let ord = if key.descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}
