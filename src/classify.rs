use crate::types::RepairOptions;

/// Classification of one physical input line. Computed without context;
/// `KeyLine` is a candidate only, the recoverer decides key-vs-continuation
/// against the record's reference indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    EntryStart { has_item_marker: bool },
    ContentMarker,
    KeyLine { indent: usize },
    Continuation { indent: usize },
    Blank,
}

pub fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn strip_item_marker(trimmed: &str) -> (&str, bool) {
    match trimmed.strip_prefix('-') {
        Some(rest) => (rest.strip_prefix(' ').unwrap_or(rest), true),
        None => (trimmed, false),
    }
}

/// An entry-start line carries the entry key, with or without a leading
/// sequence-item marker. The colon is not required here: a type line that
/// lost its colon still starts an entry and is reported by the recoverer.
fn is_entry_start(trimmed: &str, entry_key: &str) -> Option<bool> {
    let (rest, has_item_marker) = strip_item_marker(trimmed);
    let tail = rest.strip_prefix(entry_key)?;
    if tail.is_empty() || tail.starts_with(':') || tail.starts_with(char::is_whitespace) {
        Some(has_item_marker)
    } else {
        None
    }
}

pub fn classify_line(line: &str, opt: &RepairOptions) -> LineClass {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineClass::Blank;
    }
    if let Some(has_item_marker) = is_entry_start(trimmed, &opt.entry_key) {
        return LineClass::EntryStart { has_item_marker };
    }
    if trimmed
        .strip_prefix(opt.content_key.as_str())
        .is_some_and(|tail| tail == ":")
    {
        return LineClass::ContentMarker;
    }
    let indent = indent_width(line);
    if trimmed.contains(':') {
        LineClass::KeyLine { indent }
    } else {
        LineClass::Continuation { indent }
    }
}
