use std::ops::Range;

use crate::classify::{classify_line, LineClass};
use crate::types::{RepairAction, RepairOptions};

#[derive(Debug, Clone)]
pub struct Segmentation {
    pub ranges: Vec<Range<usize>>,
    pub repairs: Vec<RepairAction>,
    pub dropped_prefix_lines: usize,
}

/// Split the input lines into half-open ranges, one per entry. A range runs
/// from an entry-start line up to (excluding) the next entry-start line or
/// end of input. Non-blank lines before the first entry are dropped noise.
pub fn segment_entries(lines: &[&str], opt: &RepairOptions) -> Segmentation {
    let mut starts: Vec<usize> = Vec::new();
    let mut repairs: Vec<RepairAction> = Vec::new();
    let mut dropped_prefix_lines = 0usize;

    for (i, line) in lines.iter().enumerate() {
        match classify_line(line, opt) {
            LineClass::EntryStart { has_item_marker } => {
                if !has_item_marker {
                    let mut a = RepairAction::new("insert_item_marker");
                    a.line = Some(i);
                    repairs.push(a);
                }
                starts.push(i);
            }
            LineClass::Blank => {}
            _ => {
                if starts.is_empty() {
                    dropped_prefix_lines += 1;
                }
            }
        }
    }

    if dropped_prefix_lines > 0 {
        let first = starts.first().copied().unwrap_or(lines.len());
        let mut a = RepairAction::new("strip_prefix_lines");
        a.span = Some((0, first));
        a.note = Some(format!(
            "{dropped_prefix_lines} non-blank lines before the first entry"
        ));
        repairs.push(a);
    }

    let mut ranges = Vec::with_capacity(starts.len());
    for (k, &start) in starts.iter().enumerate() {
        let end = starts.get(k + 1).copied().unwrap_or(lines.len());
        ranges.push(start..end);
    }

    Segmentation {
        ranges,
        repairs,
        dropped_prefix_lines,
    }
}
