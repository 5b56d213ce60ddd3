//! Engine configuration.

/// Tunables for naming conventions and defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Suffix appended to a singularized collection name to form a
    /// foreign-key field (`post` + `Id` = `postId`).
    pub foreign_key_suffix: String,
    /// Page size used when `_page` is given without `_per_page`.
    pub default_per_page: u64,
    /// Number of random bytes behind a generated record id (rendered as
    /// hex, so the id is twice this many characters).
    pub id_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            foreign_key_suffix: "Id".to_owned(),
            default_per_page: 10,
            id_bytes: 4,
        }
    }
}

impl Config {
    /// Convention for snake_case datasets: foreign keys end in `_id`.
    pub fn underscored() -> Self {
        Self {
            foreign_key_suffix: "_id".to_owned(),
            ..Self::default()
        }
    }
}
