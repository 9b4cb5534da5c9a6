#[cfg(test)]
#[path = "./utils.tests.rs"]
mod utils_tests;

/// Truncates a string slice to the new length.
pub fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncates a string to `max_chars` characters, replacing its tail with `ending` when it is too long.\
/// **Note** that the returned text, `ending` included, never exceeds `max_chars` characters.
pub fn truncate_with_ending(s: &str, max_chars: usize, ending: &str) -> String {
    if s.chars().count() <= max_chars {
        return s.to_owned();
    }

    let keep = max_chars.saturating_sub(ending.chars().count());
    let mut text = String::with_capacity(max_chars);
    text.push_str(truncate(s, keep));
    text.push_str(truncate(ending, max_chars));

    text
}
