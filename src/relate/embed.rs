//! Attaches related records to a result by foreign-key convention.

use serde_json::Value;

use crate::db::Store;
use crate::query::condition::json_eq;
use crate::relate::inflect::Inflector;

/// Augments `record` (an object from collection `owning`) with the related
/// data named by `token`, under a key equal to the token.
///
/// A plural token is a one-to-many embed: the collection named exactly
/// `token` is scanned for records whose `<singularized owning><suffix>`
/// field equals the record's `id`. A singular token is a many-to-one
/// embed: the record's `<token><suffix>` field is looked up as an `id` in
/// the pluralized collection. When the referenced collection does not
/// exist the record is left unmodified.
pub fn embed_related(
    store: &Store,
    owning: &str,
    record: &mut Value,
    token: &str,
    suffix: &str,
    inflector: &dyn Inflector,
) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };

    if inflector.is_plural(token) {
        let Some(related) = store.records(token) else {
            return;
        };
        let fk = format!("{}{}", inflector.singularize(owning), suffix);
        let id = fields.get("id").cloned().unwrap_or(Value::Null);
        let children: Vec<Value> = related
            .iter()
            .filter(|child| child.get(&fk).is_some_and(|value| json_eq(value, &id)))
            .cloned()
            .collect();
        fields.insert(token.to_owned(), Value::Array(children));
    } else {
        let Some(related) = store.records(&inflector.pluralize(token)) else {
            return;
        };
        let fk = format!("{token}{suffix}");
        let Some(fk_value) = fields.get(&fk) else {
            return;
        };
        let parent = related
            .iter()
            .find(|candidate| candidate.get("id").is_some_and(|id| json_eq(id, fk_value)));
        if let Some(parent) = parent {
            fields.insert(token.to_owned(), parent.clone());
        }
    }
}
