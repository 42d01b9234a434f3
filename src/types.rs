use thiserror::Error;

/// One recovered message: a type tag plus an ordered field mapping.
/// Field order is the order of first appearance in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub type_name: String,
    pub content: Vec<(String, String)>,
}

impl Record {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.content
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A normalization the repairer performed, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairAction {
    pub op: String,
    pub line: Option<usize>,
    pub span: Option<(usize, usize)>,
    pub note: Option<String>,
}

impl RepairAction {
    pub fn new(op: &str) -> Self {
        Self {
            op: op.to_string(),
            line: None,
            span: None,
            note: None,
        }
    }
}

/// A record-local problem that was absorbed rather than propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: String,
    pub line: Option<usize>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOptions {
    pub entry_key: String,
    pub content_key: String,
    pub known_fields: Vec<String>,
    pub strict_fast_path: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            entry_key: "messageBodyType".to_string(),
            content_key: "messageBodyContent".to_string(),
            known_fields: vec![
                "message".to_string(),
                "datasetName".to_string(),
                "reasoning".to_string(),
            ],
            strict_fast_path: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SegmentStats {
    pub input_lines: usize,
    pub entries: usize,
    pub dropped_prefix_lines: usize,
    pub dropped_noise_lines: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepairResult {
    pub status: String, // strict_ok|repaired|empty
    pub output: String,
    pub records: Vec<Record>,
    pub repairs: Vec<RepairAction>,
    pub errors: Vec<ParseError>,
    pub stats: SegmentStats,
}

impl RepairResult {
    pub fn has_error(&self, kind: &str) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }
}

#[derive(Debug, Error)]
pub enum RepairError {
    #[error("encoding repaired records failed: {0}")]
    Encode(#[from] serde_yaml::Error),

    #[error("repair did not converge: re-decoded output does not match recovered records")]
    Roundtrip,
}
