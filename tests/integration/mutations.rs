#![allow(missing_docs)]

//! Create / replace / patch / destroy through the facade, including the
//! cascade rules and on-disk persistence.

use std::sync::{Arc, Once};

use alacena::{Config, Database, JsonFileSink, ListQuery, MemorySink, Record};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("alacena=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init();
    });
}

fn body(value: Value) -> Record {
    value.as_object().expect("object literal").clone()
}

fn open_blog() -> (Database, Arc<MemorySink>) {
    init_tracing();
    let sink = Arc::new(MemorySink::new());
    let db = Database::open(
        json!({
            "posts": [
                {"id": "1", "title": "first"},
                {"id": "2", "title": "second"}
            ],
            "comments": [
                {"id": "a", "postId": "1"},
                {"id": "b", "postId": "2"},
                {"id": "c", "postId": null}
            ],
            "profile": {"name": "blog"}
        }),
        sink.clone(),
    )
    .expect("open db");
    (db, sink)
}

#[test]
fn created_records_get_fresh_ids_and_land_last() {
    let (db, _) = open_blog();
    let created = db
        .create("posts", body(json!({"id": "mine", "title": "third"})))
        .expect("create")
        .expect("created");
    let id = created["id"].as_str().expect("string id");
    assert_ne!(id, "mine");
    assert_eq!(id.len(), 8);

    let snapshot = db.snapshot();
    let posts = snapshot["posts"].as_array().expect("array");
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[2], created);
}

#[test]
fn two_creates_never_share_an_id() {
    let (db, _) = open_blog();
    let first = db
        .create("posts", body(json!({"title": "x"})))
        .expect("create")
        .expect("created");
    let second = db
        .create("posts", body(json!({"title": "y"})))
        .expect("create")
        .expect("created");
    assert_ne!(first["id"], second["id"]);
}

#[test]
fn replace_is_wholesale_but_identity_survives() {
    let (db, _) = open_blog();
    let replaced = db
        .replace_by_id("posts", "1", body(json!({"id": "99", "summary": "rewritten"})))
        .expect("replace")
        .expect("replaced");
    assert_eq!(replaced, json!({"id": "1", "summary": "rewritten"}));
}

#[test]
fn empty_patch_round_trips_the_record() {
    let (db, _) = open_blog();
    let before = db.get_by_id("posts", "1", &[]).expect("post 1");
    let after = db
        .patch_by_id("posts", "1", Record::new())
        .expect("patch")
        .expect("patched");
    assert_eq!(before, after);

    // A patch body smuggling an id is ignored too.
    let after = db
        .patch_by_id("posts", "1", body(json!({"id": "hijack"})))
        .expect("patch")
        .expect("patched");
    assert_eq!(after["id"], "1");
}

#[test]
fn singular_resource_replace_and_patch() {
    let (db, _) = open_blog();
    db.replace("profile", body(json!({"name": "journal"})))
        .expect("replace")
        .expect("replaced");
    let patched = db
        .patch("profile", body(json!({"tagline": "notes"})))
        .expect("patch")
        .expect("patched");
    assert_eq!(patched, json!({"name": "journal", "tagline": "notes"}));

    // The whole-document forms refuse array collections.
    assert!(db.replace("posts", Record::new()).expect("replace").is_none());
    assert!(db.patch("posts", Record::new()).expect("patch").is_none());
}

#[test]
fn destroy_nullifies_then_optionally_cascades() {
    let (db, _) = open_blog();
    db.destroy_by_id("posts", "1", &[])
        .expect("destroy")
        .expect("removed");
    let snapshot = db.snapshot();
    assert_eq!(snapshot["comments"][0]["postId"], Value::Null);
    assert_eq!(snapshot["comments"].as_array().map(Vec::len), Some(3));

    // Opting into the cascade removes the newly orphaned comment but
    // spares the one that was null all along.
    db.destroy_by_id("posts", "2", &["comments".to_owned()])
        .expect("destroy")
        .expect("removed");
    let snapshot = db.snapshot();
    let remaining: Vec<&str> = snapshot["comments"]
        .as_array()
        .expect("array")
        .iter()
        .map(|comment| comment["id"].as_str().expect("string id"))
        .collect();
    assert_eq!(remaining, ["a", "c"]);
}

#[test]
fn destroy_is_not_idempotent_by_design() {
    let (db, sink) = open_blog();
    assert!(db
        .destroy_by_id("posts", "1", &[])
        .expect("destroy")
        .is_some());
    let writes_after_first = sink.writes();
    // The second identical call finds nothing and reports so.
    assert!(db
        .destroy_by_id("posts", "1", &[])
        .expect("destroy")
        .is_none());
    assert_eq!(sink.writes(), writes_after_first);
}

#[test]
fn deleted_ids_are_not_handed_out_again() {
    let (db, _) = open_blog();
    let created = db
        .create("posts", body(json!({"title": "temp"})))
        .expect("create")
        .expect("created");
    let old_id = created["id"].as_str().expect("string id").to_owned();
    db.destroy_by_id("posts", &old_id, &[])
        .expect("destroy")
        .expect("removed");
    // Random draws make reuse astronomically unlikely; spot-check a few.
    for _ in 0..8 {
        let next = db
            .create("posts", body(json!({"title": "again"})))
            .expect("create")
            .expect("created");
        assert_ne!(next["id"].as_str(), Some(old_id.as_str()));
    }
}

#[test]
fn underscored_foreign_keys_follow_config() {
    let sink = MemorySink::new();
    let db = Database::open_with_config(
        json!({
            "posts": [{"id": "1"}],
            "comments": [{"id": "a", "post_id": "1"}]
        }),
        sink,
        Config::underscored(),
    )
    .expect("open db");

    db.destroy_by_id("posts", "1", &[])
        .expect("destroy")
        .expect("removed");
    assert_eq!(db.snapshot()["comments"][0]["post_id"], Value::Null);
}

#[test]
fn file_sink_persists_every_mutation_to_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("db.json");
    let db = Database::open(
        json!({"posts": [{"id": "1", "title": "first"}]}),
        JsonFileSink::new(&path),
    )
    .expect("open db");

    db.patch_by_id("posts", "1", body(json!({"title": "renamed"})))
        .expect("patch")
        .expect("patched");

    // Reload from the file as a fresh database and observe the write.
    let bytes = std::fs::read(&path).expect("read db.json");
    let value: Value = serde_json::from_slice(&bytes).expect("parse db.json");
    let reopened = Database::open(value, MemorySink::new()).expect("reopen");
    let post = reopened.get_by_id("posts", "1", &[]).expect("post 1");
    assert_eq!(post["title"], "renamed");
}

#[test]
fn mutations_are_visible_to_subsequent_queries() {
    let (db, _) = open_blog();
    db.create("posts", body(json!({"title": "third", "views": 10})))
        .expect("create")
        .expect("created");
    let listed = db
        .list("posts", &ListQuery::from_query("views=10"))
        .expect("posts");
    let wire = serde_json::to_value(&listed).expect("serialize");
    assert_eq!(wire.as_array().map(Vec::len), Some(1));
}
