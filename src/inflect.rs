//! Name derivation between model names, table names, and key columns.
//!
//! Case conversion goes through `heck`; plural/singular forms use explicit
//! suffix rules for regular English nouns. Irregular nouns (person/people,
//! mouse/mice) are not handled.

use heck::{ToSnakeCase, ToUpperCamelCase};

/// Derives the default table name for a model name: snake_case, pluralized.
///
/// `"Human"` becomes `"humans"`, `"CatToy"` becomes `"cat_toys"`.
pub fn tableize(model_name: &str) -> String {
    pluralize(&model_name.to_snake_case())
}

/// Derives a model name from a word: `"house"` becomes `"House"`.
pub fn classify(name: &str) -> String {
    name.to_upper_camel_case()
}

/// Derives the conventional foreign key column for a name: `"{snake}_id"`.
pub fn foreign_key(name: &str) -> String {
    format!("{}_id", name.to_snake_case())
}

/// Pluralizes a regular English noun.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().next_back().is_some_and(is_consonant) {
            return format!("{stem}ies");
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Singularizes a regular English plural; unrecognized forms pass through.
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        // A bare trailing "s" stays out of this rule: "houses" singularizes
        // by dropping "s", not "es".
        if ["ss", "x", "z", "ch", "sh"].iter().any(|s| stem.ends_with(s)) {
            return stem.to_string();
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        if !stem.ends_with('s') && !stem.is_empty() {
            return stem.to_string();
        }
    }
    word.to_string()
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tableize_pluralizes_snake_case() {
        assert_eq!(tableize("Human"), "humans");
        assert_eq!(tableize("House"), "houses");
        assert_eq!(tableize("CatToy"), "cat_toys");
        assert_eq!(tableize("Category"), "categories");
        assert_eq!(tableize("Box"), "boxes");
    }

    #[test]
    fn pluralize_suffix_rules() {
        assert_eq!(pluralize("cat"), "cats");
        assert_eq!(pluralize("bus"), "buses");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("quiz"), "quizes");
        assert_eq!(pluralize("church"), "churches");
        assert_eq!(pluralize("dish"), "dishes");
        assert_eq!(pluralize("city"), "cities");
        assert_eq!(pluralize("day"), "days");
    }

    #[test]
    fn singularize_suffix_rules() {
        assert_eq!(singularize("cats"), "cat");
        assert_eq!(singularize("glasses"), "glass");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("churches"), "church");
        assert_eq!(singularize("dishes"), "dish");
        assert_eq!(singularize("cities"), "city");
        assert_eq!(singularize("days"), "day");
        assert_eq!(singularize("houses"), "house");
        assert_eq!(singularize("glass"), "glass");
        assert_eq!(singularize("house"), "house");
    }

    #[test]
    fn singularize_inverts_pluralize() {
        for word in ["cat", "glass", "box", "church", "dish", "city", "house"] {
            assert_eq!(singularize(&pluralize(word)), word);
        }
    }

    #[test]
    fn classify_and_foreign_key() {
        assert_eq!(classify("house"), "House");
        assert_eq!(classify("cat_toy"), "CatToy");
        assert_eq!(foreign_key("House"), "house_id");
        assert_eq!(foreign_key("owner"), "owner_id");
    }
}
