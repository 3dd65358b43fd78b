//! English singularization
//!
//! Index terms and query terms are reduced to singular form so that
//! "projects" and "project" land on the same inverted-index key. Input is
//! expected to be lowercase.

/// Plural forms that do not follow any suffix rule
const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("movies", "movie"),
    ("buses", "bus"),
];

/// Words whose singular and plural forms coincide
const UNINFLECTED: &[&str] = &[
    "news", "series", "species", "sheep", "fish", "deer", "equipment",
    "information", "rice", "money", "aircraft",
];

/// Reduces an English word to its singular form
///
/// # Examples
///
/// ```
/// use lieu::ingest::singularize;
///
/// assert_eq!(singularize("projects"), "project");
/// assert_eq!(singularize("cities"), "city");
/// assert_eq!(singularize("boxes"), "box");
/// assert_eq!(singularize("class"), "class");
/// ```
pub fn singularize(word: &str) -> String {
    for (plural, singular) in IRREGULAR {
        if word == *plural {
            return singular.to_string();
        }
    }
    if UNINFLECTED.contains(&word) {
        return word.to_string();
    }

    // Words ending in -ss, -us or -is are (almost always) already singular:
    // class, status, analysis.
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }

    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }

    for suffix in ["xes", "ches", "shes", "sses", "oes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }

    if word.len() > 1 && word.ends_with('s') {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}
