//! Mutation and cascade engine.
//!
//! All writes to the store funnel through here so the foreign-key
//! cleanup invariant lives in exactly one place. Every function returns
//! the affected record, or `None` when the target collection or record
//! does not exist; callers persist on `Some`.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::db::config::Config;
use crate::db::identity::fresh_id;
use crate::db::store::{Record, Store};
use crate::query::condition::json_eq;
use crate::relate::inflect::{EnglishInflector, Inflector};

/// Appends a new record to the array collection `name`.
///
/// Any `id` in the body is discarded; the record's identity is always
/// generated here.
pub fn create(store: &mut Store, config: &Config, name: &str, mut body: Record) -> Option<Value> {
    let records = store.records_mut(name)?;
    body.remove("id");
    let mut record = Map::new();
    record.insert(
        "id".to_owned(),
        Value::String(fresh_id(records, config.id_bytes)),
    );
    record.extend(body);
    let record = Value::Object(record);
    records.push(record.clone());
    Some(record)
}

/// Replaces a singular (object) resource wholesale. Array collections
/// signal `None`; they are only written through their records.
pub fn replace_singular(store: &mut Store, name: &str, body: Record) -> Option<Value> {
    store.singular(name)?;
    let value = Value::Object(body);
    store.put(name, value.clone());
    Some(value)
}

/// Shallow-merges `body` into a singular resource.
pub fn patch_singular(store: &mut Store, name: &str, body: Record) -> Option<Value> {
    let resource = store.singular_mut(name)?;
    resource.extend(body);
    Some(Value::Object(resource.clone()))
}

/// Substitutes the record with id `id` by `body`, keeping the original
/// id: identity is immutable even under a full replace.
pub fn replace_by_id(store: &mut Store, name: &str, id: &str, mut body: Record) -> Option<Value> {
    let records = store.records_mut(name)?;
    let slot = records
        .iter_mut()
        .find(|record| record.get("id").and_then(Value::as_str) == Some(id))?;
    body.remove("id");
    let mut record = Map::new();
    record.insert("id".to_owned(), Value::String(id.to_owned()));
    record.extend(body);
    *slot = Value::Object(record);
    Some(slot.clone())
}

/// Shallow-merges `body` over the record with id `id`, keeping the
/// original id.
pub fn patch_by_id(store: &mut Store, name: &str, id: &str, mut body: Record) -> Option<Value> {
    let records = store.records_mut(name)?;
    let slot = records
        .iter_mut()
        .find(|record| record.get("id").and_then(Value::as_str) == Some(id))?;
    let fields = slot.as_object_mut()?;
    body.remove("id");
    fields.extend(body);
    Some(slot.clone())
}

/// Removes the record with id `id` from `name`, then cleans up foreign
/// keys pointing at it.
///
/// Every other collection has its `<singularized name><suffix>` fields
/// nullified where they equal the deleted id. Collections listed in
/// `dependents` additionally drop the records nullified by this very
/// operation; foreign keys that were already null beforehand are not
/// grounds for removal.
pub fn destroy_by_id(
    store: &mut Store,
    config: &Config,
    name: &str,
    id: &str,
    dependents: &[String],
) -> Option<Value> {
    let records = store.records_mut(name)?;
    let position = records
        .iter()
        .position(|record| record.get("id").and_then(Value::as_str) == Some(id))?;
    let removed = records.remove(position);

    let inflector = EnglishInflector;
    let fk = format!(
        "{}{}",
        inflector.singularize(name),
        config.foreign_key_suffix
    );
    let deleted_id = Value::String(id.to_owned());

    let mut nullified: HashMap<String, Vec<Value>> = HashMap::new();
    for (other, others) in store.arrays_mut() {
        if other == name {
            continue;
        }
        for record in others.iter_mut() {
            let Some(fields) = record.as_object_mut() else {
                continue;
            };
            let points_here = fields
                .get(&fk)
                .is_some_and(|value| json_eq(value, &deleted_id));
            if points_here {
                fields.insert(fk.clone(), Value::Null);
                if let Some(record_id) = fields.get("id") {
                    nullified
                        .entry(other.clone())
                        .or_default()
                        .push(record_id.clone());
                }
            }
        }
    }

    for dependent in dependents {
        let Some(ids) = nullified.get(dependent) else {
            continue;
        };
        if let Some(records) = store.records_mut(dependent) {
            let before = records.len();
            records.retain(|record| {
                record
                    .get("id")
                    .map_or(true, |record_id| !ids.contains(record_id))
            });
            debug!(
                collection = %dependent,
                removed = before - records.len(),
                "cascaded delete to dependents"
            );
        }
    }

    Some(removed)
}
