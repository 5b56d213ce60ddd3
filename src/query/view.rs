//! The collection view pipeline: everything between "here is a query
//! string" and "here are the records to serialize".
//!
//! Evaluation order for a list request: resolve the collection, attach
//! requested relations, apply the full-text needle, filter by the
//! condition tree, sort, then slice or paginate. A singular (object)
//! resource short-circuits all of it and is returned as-is.

use serde::Serialize;
use serde_json::Value;

use crate::db::{Config, Store};
use crate::query::paginate::{paginate, Page};
use crate::query::parse::parse_conditions;
use crate::query::sort::{sort_records, SortKey};
use crate::relate::embed::embed_related;
use crate::relate::inflect::EnglishInflector;

/// The engine-level parameters of one list request.
///
/// Raw pairs are kept alongside the extracted reserved parameters so the
/// condition parser sees the request exactly as it arrived.
#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    pairs: Vec<(String, String)>,
    sort: Vec<SortKey>,
    page: Option<f64>,
    per_page: Option<f64>,
    start: Option<usize>,
    end: Option<usize>,
    limit: Option<usize>,
    embed: Vec<String>,
    q: Option<String>,
}

impl ListQuery {
    /// Builds a query from decoded `key=value` pairs, order preserved.
    ///
    /// Reserved parameters that fail to parse (a non-numeric `_page`,
    /// say) are ignored, consistent with the engine's policy of never
    /// failing a request over malformed filter input.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> ListQuery {
        let mut query = ListQuery::default();
        for (key, value) in &pairs {
            match key.as_str() {
                "_sort" => query.sort = SortKey::parse_list(value),
                "_page" => query.page = value.parse().ok().filter(|p: &f64| p.is_finite()),
                "_per_page" => {
                    query.per_page = value.parse().ok().filter(|p: &f64| p.is_finite())
                }
                "_start" => query.start = value.parse().ok(),
                "_end" => query.end = value.parse().ok(),
                "_limit" => query.limit = value.parse().ok(),
                "_embed" => query.embed.push(value.clone()),
                "_q" => query.q = Some(value.clone()),
                _ => {}
            }
        }
        query.pairs = pairs;
        query
    }

    /// Convenience constructor for an already-decoded query string such
    /// as `views:gt=100&_sort=-views`. Splits on `&` and the first `=`
    /// of each pair; it does NOT percent-decode (that is the transport's
    /// job).
    pub fn from_query(raw: &str) -> ListQuery {
        let pairs = raw
            .split('&')
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| match chunk.split_once('=') {
                Some((key, value)) => (key.to_owned(), value.to_owned()),
                None => (chunk.to_owned(), String::new()),
            })
            .collect();
        ListQuery::from_pairs(pairs)
    }

    /// Relations requested through `_embed`.
    pub fn embeds(&self) -> &[String] {
        &self.embed
    }
}

/// What a list request evaluates to.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListResult {
    /// Filtered records, no envelope (`_page` absent).
    Records(Vec<Value>),
    /// A page envelope (`_page` present).
    Page(Page<Value>),
    /// A singular resource returned verbatim.
    Item(Value),
}

/// Runs the list pipeline for collection `name`. `None` means the
/// collection does not exist.
pub fn list(store: &Store, config: &Config, name: &str, query: &ListQuery) -> Option<ListResult> {
    let value = store.get(name)?;
    let records = match value {
        Value::Array(records) => records,
        other => return Some(ListResult::Item(other.clone())),
    };

    let inflector = EnglishInflector;
    let mut items: Vec<Value> = records.clone();
    for token in &query.embed {
        for item in &mut items {
            embed_related(
                store,
                name,
                item,
                token,
                &config.foreign_key_suffix,
                &inflector,
            );
        }
    }

    if let Some(needle) = &query.q {
        let needle = needle.to_lowercase();
        items.retain(|item| contains_text(item, &needle));
    }

    let conditions = parse_conditions(&query.pairs);
    if !conditions.is_empty() {
        items.retain(|item| conditions.matches(item));
    }

    sort_records(&mut items, &query.sort);

    if let Some(page) = query.page {
        let per_page = query
            .per_page
            .unwrap_or(config.default_per_page as f64);
        return Some(ListResult::Page(paginate(&items, page, per_page)));
    }

    if query.start.is_some() || query.end.is_some() || query.limit.is_some() {
        let from = query.start.unwrap_or(0).min(items.len());
        let to = match (query.end, query.limit) {
            (Some(end), _) => end,
            (None, Some(limit)) => from.saturating_add(limit),
            (None, None) => items.len(),
        }
        .clamp(from, items.len());
        items = items[from..to].to_vec();
    }

    Some(ListResult::Records(items))
}

/// Looks up one record by id and attaches the requested relations.
/// Singular resources have no ids and answer `None` here.
pub fn get_by_id(
    store: &Store,
    config: &Config,
    name: &str,
    id: &str,
    embeds: &[String],
) -> Option<Value> {
    let records = store.records(name)?;
    let mut record = records
        .iter()
        .find(|record| record.get("id").and_then(Value::as_str) == Some(id))?
        .clone();
    let inflector = EnglishInflector;
    for token in embeds {
        embed_related(
            store,
            name,
            &mut record,
            token,
            &config.foreign_key_suffix,
            &inflector,
        );
    }
    Some(record)
}

/// Case-insensitive full-text membership: true when any string or number
/// anywhere in the record contains `needle` (already lowercased).
fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Array(items) => items.iter().any(|item| contains_text(item, needle)),
        Value::Object(fields) => fields.values().any(|field| contains_text(field, needle)),
        Value::Bool(_) | Value::Null => false,
    }
}
