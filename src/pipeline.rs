use tracing::{debug, warn};

use crate::emit::{emit_yaml, EmitOptions};
use crate::recover::recover_record;
use crate::segment::segment_entries;
use crate::strict::strict_decode;
use crate::types::{
    ParseError, RepairAction, Record, RepairError, RepairOptions, RepairResult, SegmentStats,
};

pub fn repair_default(input: &str) -> Result<RepairResult, RepairError> {
    repair(input, &RepairOptions::default())
}

/// Repair near-YAML message-list text into valid YAML. A pure function of
/// its input: record-local malformations are absorbed into the result, and
/// only codec encode failure or round-trip divergence surface as `Err`.
pub fn repair(input: &str, options: &RepairOptions) -> Result<RepairResult, RepairError> {
    if options.strict_fast_path {
        if let Some((value, records)) = strict_decode(input, options) {
            let output = serde_yaml::to_string(&value)?;
            debug!(records = records.len(), "input already decodes to the target shape");
            let entries = records.len();
            return Ok(RepairResult {
                status: "strict_ok".to_string(),
                output,
                records,
                repairs: Vec::new(),
                errors: Vec::new(),
                stats: SegmentStats {
                    input_lines: input.lines().count(),
                    entries,
                    ..SegmentStats::default()
                },
            });
        }
    }

    let lines: Vec<&str> = input.lines().collect();
    let seg = segment_entries(&lines, options);
    debug!(
        entries = seg.ranges.len(),
        dropped_prefix = seg.dropped_prefix_lines,
        "segmented input"
    );

    let mut repairs: Vec<RepairAction> = seg.repairs;
    let mut errors: Vec<ParseError> = Vec::new();
    let mut records: Vec<Record> = Vec::new();
    let mut dropped_noise_lines = 0usize;
    for range in &seg.ranges {
        let rec = recover_record(&lines, range.clone(), options);
        dropped_noise_lines += rec.dropped_noise_lines;
        repairs.extend(rec.repairs);
        errors.extend(rec.errors);
        records.push(rec.record);
    }
    for e in &errors {
        if e.kind == "unterminated_quoted_scalar" {
            warn!(line = ?e.line, "quoted scalar never closed, flushed best-effort");
        }
    }

    let emit_opt = EmitOptions::from_repair(options);
    let (output, value) = emit_yaml(&records, &emit_opt)?;

    // Acceptance gate: the emitted text must decode back to the exact value
    // it was rendered from.
    let reread: serde_yaml::Value =
        serde_yaml::from_str(&output).map_err(|_| RepairError::Roundtrip)?;
    if reread != value {
        return Err(RepairError::Roundtrip);
    }

    let status = if records.is_empty() { "empty" } else { "repaired" };
    debug!(status, records = records.len(), repairs = repairs.len(), "repair finished");
    Ok(RepairResult {
        status: status.to_string(),
        output,
        records,
        repairs,
        errors,
        stats: SegmentStats {
            input_lines: lines.len(),
            entries: seg.ranges.len(),
            dropped_prefix_lines: seg.dropped_prefix_lines,
            dropped_noise_lines,
        },
    })
}
