use serde_yaml::Value;
use yaml_mend::types::RepairOptions;

fn decode(text: &str) -> Value {
    serde_yaml::from_str(text).expect("output must be valid YAML")
}

fn get<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    v.as_mapping()?
        .iter()
        .find(|(k, _)| k.as_str() == Some(key))
        .map(|(_, vv)| vv)
}

fn content_field<'a>(entry: &'a Value, name: &str) -> &'a str {
    get(get(entry, "messageBodyContent").expect("content mapping"), name)
        .and_then(Value::as_str)
        .expect("string field")
}

#[test]
fn strict_ok_on_already_valid_input() {
    let input = "- messageBodyType: Basic_Message\n  messageBodyContent:\n    message: hello world\n";
    let r = yaml_mend::repair_default(input).unwrap();
    assert_eq!(r.status, "strict_ok");
    assert!(r.repairs.is_empty());
    assert_eq!(decode(&r.output), decode(input));
    assert_eq!(r.records.len(), 1);
    assert_eq!(r.records[0].field("message"), Some("hello world"));
}

#[test]
fn end_to_end_katy_message() {
    let input = "- messageBodyType: 'Basic_Message'\nmessageBodyContent:\n    message: 'Katy's message'";
    let r = yaml_mend::repair_default(input).unwrap();
    assert_eq!(r.status, "repaired");
    assert_eq!(r.records.len(), 1);
    assert_eq!(r.records[0].type_name, "Basic_Message");
    assert_eq!(r.records[0].field("message"), Some("Katy's message"));

    let out = decode(&r.output);
    let seq = out.as_sequence().unwrap();
    assert_eq!(seq.len(), 1);
    assert_eq!(
        get(&seq[0], "messageBodyType").and_then(Value::as_str),
        Some("Basic_Message")
    );
    assert_eq!(content_field(&seq[0], "message"), "Katy's message");
}

#[test]
fn surrounding_prose_is_stripped() {
    let input = "Some extra text\n\
- messageBodyType: 'Basic_Message'\n\
messageBodyContent:\n\
\x20   message: 'Katy's message'\n\
- messageBodyType: 'Dataset_Message'\n\
messageBodyContent:\n\
\x20   datasetName: 'test's dataset'\n\
\x20   reasoning: 'test's reasoning'\n\
Extra text at the end";
    let r = yaml_mend::repair_default(input).unwrap();
    assert_eq!(r.status, "repaired");
    assert_eq!(r.stats.dropped_prefix_lines, 1);
    assert_eq!(r.stats.dropped_noise_lines, 1);

    let out = decode(&r.output);
    let seq = out.as_sequence().unwrap();
    assert_eq!(seq.len(), 2);
    assert_eq!(content_field(&seq[0], "message"), "Katy's message");
    assert_eq!(content_field(&seq[1], "datasetName"), "test's dataset");
    assert_eq!(content_field(&seq[1], "reasoning"), "test's reasoning");
    assert!(!r.output.contains("Extra text"));
    assert!(!r.output.contains("Some extra text"));
}

#[test]
fn flattened_indentation_is_tolerated() {
    let input = "- messageBodyType: 'Basic_Message'\n\
messageBodyContent:\n\
message: 'test message'\n\
- messageBodyType: 'Dataset_Message'\n\
messageBodyContent:\n\
datasetName: 'test dataset'\n\
reasoning: 'test reasoning'";
    let r = yaml_mend::repair_default(input).unwrap();
    assert_eq!(r.status, "repaired");
    let out = decode(&r.output);
    let seq = out.as_sequence().unwrap();
    assert_eq!(seq.len(), 2);
    assert_eq!(content_field(&seq[0], "message"), "test message");
    assert_eq!(content_field(&seq[1], "datasetName"), "test dataset");
    assert_eq!(content_field(&seq[1], "reasoning"), "test reasoning");
}

#[test]
fn missing_item_markers_are_normalized() {
    let without = "messageBodyType: 'Basic_Message'\n\
messageBodyContent:\n\
\x20   message: 'test message'\n\
messageBodyType: 'Dataset_Message'\n\
messageBodyContent:\n\
\x20   datasetName: 'test dataset'\n\
\x20   reasoning: 'test reasoning'";
    let with = without
        .lines()
        .map(|l| {
            if l.trim_start().starts_with("messageBodyType") {
                format!("- {l}")
            } else {
                l.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let r1 = yaml_mend::repair_default(without).unwrap();
    let r2 = yaml_mend::repair_default(&with).unwrap();
    assert_eq!(decode(&r1.output), decode(&r2.output));
    assert_eq!(
        r1.repairs.iter().filter(|a| a.op == "insert_item_marker").count(),
        2
    );
}

#[test]
fn quoted_values_keep_embedded_newlines() {
    let input = "- messageBodyType: 'Basic_Message'\n\
messageBodyContent:\n\
\x20   message: 'This is a multi-line\n\
message with newlines'\n\
- messageBodyType: 'Dataset_Message'\n\
messageBodyContent:\n\
\x20   datasetName: 'test dataset'\n\
\x20   reasoning: 'This is a multi-line\n\
reasoning with newlines'";
    let r = yaml_mend::repair_default(input).unwrap();
    let out = decode(&r.output);
    let seq = out.as_sequence().unwrap();
    assert_eq!(
        content_field(&seq[0], "message"),
        "This is a multi-line\nmessage with newlines"
    );
    assert_eq!(
        content_field(&seq[1], "reasoning"),
        "This is a multi-line\nreasoning with newlines"
    );
}

#[test]
fn unquoted_continuations_fold_with_relative_indent() {
    let input = "- messageBodyType: 'Basic_Message'\n\
messageBodyContent:\n\
\x20   message: This is a multi-line\n\
\x20     message without quotes\n\
- messageBodyType: 'Dataset_Message'\n\
messageBodyContent:\n\
\x20   datasetName: test dataset\n\
\x20   reasoning: This is a multi-line\n\
\x20     reasoning without quotes";
    let r = yaml_mend::repair_default(input).unwrap();
    let out = decode(&r.output);
    let seq = out.as_sequence().unwrap();
    // indentation beyond the reference width survives as literal spaces
    assert_eq!(
        content_field(&seq[0], "message"),
        "This is a multi-line\n  message without quotes"
    );
    assert_eq!(content_field(&seq[1], "datasetName"), "test dataset");
    assert_eq!(
        content_field(&seq[1], "reasoning"),
        "This is a multi-line\n  reasoning without quotes"
    );
}

#[test]
fn possessive_apostrophes_stay_in_the_value() {
    let input = "- messageBodyType: 'Basic_Message'\n\
messageBodyContent:\n\
\x20   message: 'cashier's check'";
    let r = yaml_mend::repair_default(input).unwrap();
    let out = decode(&r.output);
    assert_eq!(
        content_field(&out.as_sequence().unwrap()[0], "message"),
        "cashier's check"
    );
}

#[test]
fn doubled_quotes_decode_to_literal_apostrophes() {
    let input = "- messageBodyType: 'Basic_Message'\n\
messageBodyContent:\n\
\x20   message: 'He said ''Hello'' and left'\n\
- messageBodyType: 'Dataset_Message'\n\
messageBodyContent:\n\
\x20   reasoning: 'Quote ''test'' here'";
    let r = yaml_mend::repair_default(input).unwrap();
    let out = decode(&r.output);
    let seq = out.as_sequence().unwrap();
    assert_eq!(content_field(&seq[0], "message"), "He said 'Hello' and left");
    assert_eq!(content_field(&seq[1], "reasoning"), "Quote 'test' here");
}

#[test]
fn empty_input_yields_empty_sequence() {
    for input in ["", "\n\n", "no entries here\njust: prose"] {
        let r = yaml_mend::repair_default(input).unwrap();
        assert_eq!(r.status, "empty", "input {input:?}");
        assert_eq!(decode(&r.output), Value::Sequence(Vec::new()));
    }
}

#[test]
fn content_marker_line_is_non_semantic() {
    let with = "- messageBodyType: 'T'\nmessageBodyContent:\n    message: hi";
    let without = "- messageBodyType: 'T'\n    message: hi";
    let r1 = yaml_mend::repair_default(with).unwrap();
    let r2 = yaml_mend::repair_default(without).unwrap();
    assert_eq!(decode(&r1.output), decode(&r2.output));
    assert_eq!(r1.records, r2.records);
}

#[test]
fn malformed_type_line_still_emits_the_record() {
    let input = "- messageBodyType\nmessageBodyContent:\n    message: hi";
    let r = yaml_mend::repair_default(input).unwrap();
    assert_eq!(r.status, "repaired");
    assert!(r.has_error("malformed_type_line"));
    assert_eq!(r.records.len(), 1);
    assert_eq!(r.records[0].type_name, "");
    assert_eq!(r.records[0].field("message"), Some("hi"));
}

#[test]
fn unterminated_quoted_scalar_is_flushed_and_flagged() {
    let input = "- messageBodyType: 'X'\nmessageBodyContent:\n    message: 'never closed\nmore text";
    let r = yaml_mend::repair_default(input).unwrap();
    assert_eq!(r.status, "repaired");
    assert!(r.has_error("unterminated_quoted_scalar"));
    assert!(r.repairs.iter().any(|a| a.op == "close_open_scalar"));
    assert_eq!(
        r.records[0].field("message"),
        Some("never closed\nmore text")
    );
    // the output still round-trips
    decode(&r.output);
}

#[test]
fn unknown_fields_are_preserved_verbatim() {
    let input = "- messageBodyType: 'T'\nmessageBodyContent:\n    message: hi\n    customField: 'custom value'";
    let r = yaml_mend::repair_default(input).unwrap();
    assert_eq!(r.records[0].field("customField"), Some("custom value"));
    assert!(r
        .repairs
        .iter()
        .any(|a| a.op == "keep_unknown_field" && a.note.as_deref() == Some("customField")));
}

#[test]
fn repair_is_idempotent() {
    let input = "Some extra text\n\
- messageBodyType: 'Basic_Message'\n\
messageBodyContent:\n\
\x20   message: 'Katy's message'";
    let r1 = yaml_mend::repair_default(input).unwrap();
    let r2 = yaml_mend::repair_default(&r1.output).unwrap();
    assert_eq!(r2.status, "strict_ok");
    assert_eq!(decode(&r1.output), decode(&r2.output));
}

#[test]
fn custom_keys_are_honored() {
    let mut opt = RepairOptions::default();
    opt.entry_key = "kind".to_string();
    opt.content_key = "body".to_string();
    let input = "kind: 'Note'\nbody:\n    message: 'it's fine'";
    let r = yaml_mend::repair(input, &opt).unwrap();
    assert_eq!(r.records[0].type_name, "Note");
    assert_eq!(r.records[0].field("message"), Some("it's fine"));
    let out = decode(&r.output);
    let seq = out.as_sequence().unwrap();
    assert_eq!(get(&seq[0], "kind").and_then(Value::as_str), Some("Note"));
}

#[test]
fn repair_terminates_on_arbitrary_junk() {
    let nasties = [
        "-",
        "- ",
        ":",
        "':'",
        "messageBodyType",
        "- messageBodyType",
        "messageBodyType:",
        "messageBodyType:'",
        "- messageBodyType: '\n'''",
        "messageBodyContent:\nmessageBodyContent:\n",
        "a: 'b\nc: d'\n",
        "\t\tmessageBodyType: x\n  - - ::'",
        "- messageBodyType: 'A'\n\n\n   '\n''\n'''\n",
        "- messageBodyType: 'A'\nmessageBodyContent:\n    message: 'x\n- messageBodyType: 'B'",
    ];
    for input in nasties {
        let r = yaml_mend::repair_default(input).expect("repair must not fail hard");
        // whatever came out must decode
        decode(&r.output);
    }
}
