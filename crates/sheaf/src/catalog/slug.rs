//! URL slug generation for categories, tags, and worksheets.

use std::collections::BTreeSet;

/// Lowercases and collapses a name into an ASCII slug. May return an empty
/// string when the input carries no ASCII alphanumerics; callers decide
/// whether that is an error or needs an explicit slug.
pub fn slugify(name: &str) -> String {
    let mut slug = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>();
    while slug.contains("--") {
        slug = slug.replace("--", "-");
    }
    slug.trim_matches('-').to_string()
}

/// Suffixes a generated slug (`-2`, `-3`, ...) until it no longer collides
/// with an already-taken one.
pub fn dedupe(base: &str, taken: &BTreeSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut counter = 2u64;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation_and_case() {
        assert_eq!(slugify("Addition up to 10"), "addition-up-to-10");
        assert_eq!(slugify("  Letters & Sounds!  "), "letters-sounds");
        assert_eq!(slugify("Grade 1 -- Review"), "grade-1-review");
    }

    #[test]
    fn slugify_of_non_ascii_input_is_empty() {
        assert_eq!(slugify("математика"), "");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn dedupe_appends_numeric_suffixes() {
        let mut taken = BTreeSet::new();
        assert_eq!(dedupe("addition", &taken), "addition");

        taken.insert("addition".to_string());
        assert_eq!(dedupe("addition", &taken), "addition-2");

        taken.insert("addition-2".to_string());
        assert_eq!(dedupe("addition", &taken), "addition-3");
    }
}
