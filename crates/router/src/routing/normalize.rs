//! Prefix token normalization

/// Canonicalize a raw prefix token
///
/// Upper-cases the token and drops every character outside `[0-9A-Z]`.
pub fn normalize_prefix(raw: &str) -> String {
    raw.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        .collect()
}

/// Normalize a list of prefix tokens, preserving order
pub fn normalize_prefixes<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter().map(|p| normalize_prefix(p.as_ref())).collect()
}
