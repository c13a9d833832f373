//! Brand name to web domain heuristics.

/// Lower-case and drop everything except ASCII letters, digits and whitespace.
fn clean(brand_name: &str) -> String {
    brand_name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect()
}

/// Primary domain guess: cleaned name with whitespace removed, plus `.com`.
///
/// Returns an empty string when nothing usable is left.
pub fn guess_domain(brand_name: &str) -> String {
    let joined: String = clean(brand_name).split_whitespace().collect();
    if joined.is_empty() {
        return String::new();
    }
    format!("{}.com", joined)
}

/// Fallback domains, tried in order after the primary guess:
/// joined, hyphen-joined, first word only.
pub fn domain_variants(brand_name: &str) -> Vec<String> {
    let cleaned = clean(brand_name);
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return Vec::new();
    };

    vec![
        format!("{}.com", tokens.concat()),
        format!("{}.com", tokens.join("-")),
        format!("{}.com", first),
    ]
}
