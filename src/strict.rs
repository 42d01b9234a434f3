use serde_yaml::Value;

use crate::types::{Record, RepairOptions};

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn mapping_field<'a>(map: &'a serde_yaml::Mapping, key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.as_str() == Some(key))
        .map(|(_, v)| v)
}

/// Fast path for input that is already valid YAML of the target shape: a
/// sequence of mappings carrying the entry key. Returns the decoded value
/// (so the caller can re-encode it unchanged) plus the extracted records.
/// Anything else declines and the repair path runs instead.
pub fn strict_decode(text: &str, opt: &RepairOptions) -> Option<(Value, Vec<Record>)> {
    let value: Value = serde_yaml::from_str(text).ok()?;
    let seq = value.as_sequence()?;

    let mut records = Vec::with_capacity(seq.len());
    for item in seq {
        let map = item.as_mapping()?;
        let type_name = scalar_to_string(mapping_field(map, &opt.entry_key)?)?;

        let mut content = Vec::new();
        match mapping_field(map, &opt.content_key) {
            None | Some(Value::Null) => {}
            Some(Value::Mapping(fields)) => {
                for (k, v) in fields {
                    let key = k.as_str()?.to_string();
                    content.push((key, scalar_to_string(v)?));
                }
            }
            Some(_) => return None,
        }
        records.push(Record { type_name, content });
    }
    Some((value, records))
}
