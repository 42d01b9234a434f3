use serde_yaml::{Mapping, Value};

use crate::types::{Record, RepairOptions};

/// Serialization configuration, passed explicitly to the encode call rather
/// than installed as process-wide codec state.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub entry_key: String,
    pub content_key: String,
}

impl EmitOptions {
    pub fn from_repair(opt: &RepairOptions) -> Self {
        Self {
            entry_key: opt.entry_key.clone(),
            content_key: opt.content_key.clone(),
        }
    }
}

/// Build the output document: a sequence of two-key mappings. The codec's
/// `Mapping` preserves insertion order, which carries the field-order
/// invariant through to the emitted text.
pub fn records_to_value(records: &[Record], opt: &EmitOptions) -> Value {
    let mut seq = Vec::with_capacity(records.len());
    for rec in records {
        let mut content = Mapping::new();
        for (k, v) in &rec.content {
            content.insert(Value::String(k.clone()), Value::String(v.clone()));
        }
        let mut entry = Mapping::new();
        entry.insert(
            Value::String(opt.entry_key.clone()),
            Value::String(rec.type_name.clone()),
        );
        entry.insert(Value::String(opt.content_key.clone()), Value::Mapping(content));
        seq.push(Value::Mapping(entry));
    }
    Value::Sequence(seq)
}

/// The single encode call of a repair. Returns the text together with the
/// value it was rendered from so the caller can run the round-trip gate.
pub fn emit_yaml(records: &[Record], opt: &EmitOptions) -> Result<(String, Value), serde_yaml::Error> {
    let value = records_to_value(records, opt);
    let text = serde_yaml::to_string(&value)?;
    Ok((text, value))
}
