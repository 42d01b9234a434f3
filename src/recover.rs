use std::ops::Range;

use crate::classify::{classify_line, indent_width, LineClass};
use crate::types::{ParseError, Record, RepairAction, RepairOptions};

#[derive(Debug, Clone)]
pub struct Recovered {
    pub record: Record,
    pub repairs: Vec<RepairAction>,
    pub errors: Vec<ParseError>,
    pub dropped_noise_lines: usize,
}

/// The field currently being assembled. `quoted` means the opening quote has
/// been seen but its unescaped closing quote has not.
#[derive(Debug)]
struct OpenField {
    key: String,
    fragments: Vec<String>,
    quoted: bool,
    start_line: usize,
}

/// A true closing quote: the trimmed line ends with a single quote that is
/// not the second half of a doubled (escaped) quote.
fn ends_with_closing_quote(trimmed: &str) -> bool {
    let mut rev = trimmed.chars().rev();
    rev.next() == Some('\'') && rev.next() != Some('\'')
}

fn unescape_single_quotes(s: &str) -> String {
    s.replace("''", "'")
}

fn quote_count(s: &str) -> usize {
    s.chars().filter(|c| *c == '\'').count()
}

/// A quoted value that closes mid-line: the last unescaped quote is the
/// closing delimiter. It is dropped; text after it stays in the value as data.
fn strip_inline_close(inner: &str) -> String {
    let bytes = inner.as_bytes();
    let mut close = None;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if i + 1 < bytes.len() && bytes[i + 1] == b'\'' {
                i += 2;
                continue;
            }
            close = Some(i);
        }
        i += 1;
    }
    match close {
        Some(i) => unescape_single_quotes(&format!("{}{}", &inner[..i], &inner[i + 1..])),
        None => unescape_single_quotes(inner),
    }
}

fn strip_one_quote_layer(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn extract_type(line: &str, opt: &RepairOptions) -> Option<String> {
    let trimmed = line.trim();
    let rest = match trimmed.strip_prefix('-') {
        Some(r) => r.trim_start(),
        None => trimmed,
    };
    let tail = rest.strip_prefix(opt.entry_key.as_str())?;
    let (_, after) = tail.split_once(':')?;
    Some(strip_one_quote_layer(after.trim()).to_string())
}

fn push_field(content: &mut Vec<(String, String)>, key: String, value: String) {
    match content.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => content.push((key, value)),
    }
}

fn finish_field(field: OpenField, content: &mut Vec<(String, String)>) {
    let joined = field.fragments.join("\n");
    let value = if field.quoted {
        unescape_single_quotes(&joined)
    } else {
        joined
    };
    push_field(content, field.key, value);
}

/// Continuation text, with indentation beyond the reference width preserved
/// as literal leading spaces.
fn continuation_fragment(line: &str, ref_indent: Option<usize>) -> String {
    let trimmed = line.trim();
    let indent = indent_width(line);
    match ref_indent {
        Some(w) if indent > w => format!("{}{}", " ".repeat(indent - w), trimmed),
        _ => trimmed.to_string(),
    }
}

fn start_field(
    line: &str,
    idx: usize,
    opt: &RepairOptions,
    content: &mut Vec<(String, String)>,
    repairs: &mut Vec<RepairAction>,
) -> Option<OpenField> {
    let trimmed = line.trim();
    let (raw_key, raw_value) = trimmed.split_once(':')?;
    let key = match raw_key.trim().strip_prefix('-') {
        Some(r) => r.trim_start(),
        None => raw_key.trim(),
    }
    .to_string();

    if key != opt.content_key && !opt.known_fields.iter().any(|k| *k == key) {
        let mut a = RepairAction::new("keep_unknown_field");
        a.line = Some(idx);
        a.note = Some(key.clone());
        repairs.push(a);
    }

    let value = raw_value.trim();
    if value.is_empty() {
        return Some(OpenField {
            key,
            fragments: Vec::new(),
            quoted: false,
            start_line: idx,
        });
    }
    if let Some(inner) = value.strip_prefix('\'') {
        if ends_with_closing_quote(inner) {
            // Opens and closes on the same line. Interior raw apostrophes
            // (the `'Katy's message'` shape) stay in the value as data.
            let body = &inner[..inner.len() - 1];
            push_field(content, key, unescape_single_quotes(body));
            return None;
        }
        // Odd quote count on the line means the closing quote is still ahead.
        // An even count means the scalar closed mid-line with trailing text;
        // leaving it open would swallow the following key lines.
        if quote_count(value) % 2 == 0 {
            push_field(content, key, strip_inline_close(inner));
            return None;
        }
        return Some(OpenField {
            key,
            fragments: vec![inner.to_string()],
            quoted: true,
            start_line: idx,
        });
    }
    Some(OpenField {
        key,
        fragments: vec![value.to_string()],
        quoted: false,
        start_line: idx,
    })
}

/// Recover one record from its line range. Record-local malformations are
/// absorbed into `errors`; the record is always produced.
pub fn recover_record(lines: &[&str], range: Range<usize>, opt: &RepairOptions) -> Recovered {
    let mut repairs: Vec<RepairAction> = Vec::new();
    let mut errors: Vec<ParseError> = Vec::new();
    let mut dropped_noise_lines = 0usize;

    let start = range.start;
    let type_name = match lines.get(start).and_then(|l| extract_type(l, opt)) {
        Some(t) => t,
        None => {
            errors.push(ParseError {
                kind: "malformed_type_line".to_string(),
                line: Some(start),
                message: Some(format!("no colon after the {} key", opt.entry_key)),
            });
            String::new()
        }
    };

    let mut content: Vec<(String, String)> = Vec::new();
    let mut open: Option<OpenField> = None;
    let mut ref_indent: Option<usize> = None;

    // The cursor advances on every iteration; the only early exit is the
    // segmentation-drift guard below, which leaves the line unconsumed.
    let mut idx = start + 1;
    while idx < range.end {
        let line = lines[idx];
        let class = classify_line(line, opt);

        if matches!(class, LineClass::EntryStart { .. }) {
            break;
        }

        let quoted_open = open.as_ref().is_some_and(|f| f.quoted);
        match class {
            LineClass::Blank => {
                // Blank lines are noise except inside an open quoted scalar,
                // where they are empty value lines.
                if let Some(field) = open.as_mut() {
                    if field.quoted {
                        field.fragments.push(String::new());
                    }
                }
            }
            LineClass::ContentMarker if !quoted_open => {}
            LineClass::KeyLine { indent }
                if !quoted_open && ref_indent.map_or(true, |w| indent <= w) =>
            {
                if ref_indent.is_none() {
                    ref_indent = Some(indent);
                }
                if let Some(field) = open.take() {
                    finish_field(field, &mut content);
                }
                open = start_field(line, idx, opt, &mut content, &mut repairs);
            }
            // Key lines below the reference width, content markers inside an
            // open quoted scalar, and plain text all continue the open field.
            _ => match open.take() {
                Some(mut field) => {
                    let mut fragment = continuation_fragment(line, ref_indent);
                    if field.quoted && ends_with_closing_quote(line.trim()) {
                        fragment.pop();
                        field.fragments.push(fragment);
                        finish_field(field, &mut content);
                    } else {
                        field.fragments.push(fragment);
                        open = Some(field);
                    }
                }
                None => {
                    let mut a = RepairAction::new("drop_orphan_line");
                    a.line = Some(idx);
                    repairs.push(a);
                    dropped_noise_lines += 1;
                }
            },
        }
        idx += 1;
    }

    if let Some(field) = open.take() {
        if field.quoted {
            errors.push(ParseError {
                kind: "unterminated_quoted_scalar".to_string(),
                line: Some(field.start_line),
                message: Some(format!("quoted value of {} never closed", field.key)),
            });
            let mut a = RepairAction::new("close_open_scalar");
            a.line = Some(field.start_line);
            repairs.push(a);
        }
        finish_field(field, &mut content);
    }

    Recovered {
        record: Record { type_name, content },
        repairs,
        errors,
        dropped_noise_lines,
    }
}
