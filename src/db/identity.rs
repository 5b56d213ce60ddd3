//! Record identity: assignment at load time, generation on create.
//!
//! Ids are short random hex strings. They are assigned where records
//! enter the store and never renumbered afterwards, so external
//! references stay valid across writes. Deleted ids are not reused: a
//! new record always draws fresh randomness.

use std::collections::HashSet;

use rand::RngCore;
use serde_json::Value;
use tracing::trace;

use crate::db::store::Store;

/// Draws a random hex id of `id_bytes` bytes that does not collide with
/// any id currently in `records`.
pub fn fresh_id(records: &[Value], id_bytes: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut buf = vec![0u8; id_bytes.max(1)];
    loop {
        rng.fill_bytes(&mut buf);
        let id = hex::encode(&buf);
        let taken = records
            .iter()
            .any(|record| record.get("id").and_then(Value::as_str) == Some(id.as_str()));
        if !taken {
            return id;
        }
    }
}

/// Establishes the identity invariant over a freshly loaded store: every
/// record of every array collection ends up with a string `id`.
///
/// Records without an id receive a generated one; numeric ids are coerced
/// to their string form so lookups and foreign keys compare uniformly.
/// Existing string ids are left untouched.
pub fn normalize_identity(store: &mut Store, id_bytes: usize) {
    let mut rng = rand::thread_rng();
    let mut buf = vec![0u8; id_bytes.max(1)];
    for (name, records) in store.arrays_mut() {
        let mut seen: HashSet<String> = records
            .iter()
            .filter_map(|record| match record.get("id") {
                Some(Value::String(id)) => Some(id.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
            .collect();
        for record in records.iter_mut() {
            let Some(fields) = record.as_object_mut() else {
                continue;
            };
            match fields.get("id") {
                Some(Value::Number(n)) => {
                    let id = n.to_string();
                    seen.insert(id.clone());
                    fields.insert("id".to_owned(), Value::String(id));
                }
                Some(_) => {}
                None => {
                    let id = loop {
                        rng.fill_bytes(&mut buf);
                        let candidate = hex::encode(&buf);
                        if seen.insert(candidate.clone()) {
                            break candidate;
                        }
                    };
                    trace!(collection = %name, id = %id, "assigned id to record");
                    fields.insert("id".to_owned(), Value::String(id));
                }
            }
        }
    }
}
