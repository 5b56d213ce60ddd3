//! Rule-based English pluralization.

/// Strategy for moving collection names between singular and plural.
pub trait Inflector {
    /// Plural form of a singular noun.
    fn pluralize(&self, word: &str) -> String;
    /// Singular form of a plural noun; unchanged when already singular.
    fn singularize(&self, word: &str) -> String;

    /// A token is plural exactly when singularizing changes it.
    fn is_plural(&self, word: &str) -> bool {
        self.singularize(word) != word
    }
}

/// Default rule-based English inflector. Covers the regular sibilant,
/// consonant-`y`, and plain `s` families, which is what collection names
/// in the wild overwhelmingly use.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishInflector;

const SIBILANTS: [&str; 5] = ["s", "x", "z", "ch", "sh"];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

impl Inflector for EnglishInflector {
    fn pluralize(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        if SIBILANTS.iter().any(|suffix| word.ends_with(suffix)) {
            return format!("{word}es");
        }
        if let Some(stem) = word.strip_suffix('y') {
            match stem.chars().last() {
                Some(c) if !is_vowel(c) => return format!("{stem}ies"),
                _ => {}
            }
        }
        format!("{word}s")
    }

    fn singularize(&self, word: &str) -> String {
        if let Some(stem) = word.strip_suffix("ies") {
            if !stem.is_empty() {
                return format!("{stem}y");
            }
        }
        if let Some(stem) = word.strip_suffix("es") {
            if SIBILANTS.iter().any(|suffix| stem.ends_with(suffix)) {
                return stem.to_owned();
            }
        }
        if word.ends_with('s') && !word.ends_with("ss") {
            return word[..word.len() - 1].to_owned();
        }
        word.to_owned()
    }
}
