use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@[a-zA-Z0-9]+").expect("BUG: invalid PLACEHOLDER_RE regex literal")
});

/// Returns the distinct `@name` placeholders of a query, without the `@`,
/// in order of first appearance.
pub fn scan_placeholders(command_text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for m in PLACEHOLDER_RE.find_iter(command_text) {
        let name = &m.as_str()[1..];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
