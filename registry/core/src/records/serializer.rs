use super::{MAX_RECORD_LENGTH, META_KEY, MetaKind, REVOKED_KEY, RecordsError, validate_record};
use serde_json::{Map, Value};

fn validate_key(parent: &str, key: &str) -> Result<(), RecordsError> {
    let invalid = key.is_empty()
        || key.contains(['.', '='])
        || key.bytes().all(|byte| byte.is_ascii_digit())
        || key == META_KEY
        || (parent.is_empty() && key == REVOKED_KEY);
    if invalid { Err(RecordsError::InvalidKey(join_path(parent, key))) } else { Ok(()) }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() { key.to_string() } else { format!("{parent}.{key}") }
}

fn meta_record(path: &str, kind: MetaKind) -> String {
    format!("{path}.{META_KEY}={}{}", super::META_TYPE_PREFIX, kind.as_str())
}

/// Splits `text` on single spaces and packs the words greedily into indexed
/// records. Empty words are kept so joining the chunks with a space restores
/// the text exactly.
fn serialize_text(path: &str, text: &str, records: &mut Vec<String>) -> Result<(), RecordsError> {
    records.push(meta_record(path, MetaKind::Text));
    let mut chunk: Option<(String, String)> = None;
    let mut index = 0usize;
    for word in text.split(' ') {
        if let Some((prefix, body)) = chunk.as_mut() {
            if prefix.len() + body.len() + 1 + word.len() <= MAX_RECORD_LENGTH {
                body.push(' ');
                body.push_str(word);
                continue;
            }
            records.push(format!("{prefix}{body}"));
            index += 1;
        }
        let prefix = format!("{path}.{index}=");
        if prefix.len() + word.len() > MAX_RECORD_LENGTH {
            return Err(RecordsError::WordTooLong { path: path.to_string(), len: word.len() });
        }
        chunk = Some((prefix, word.to_string()));
    }
    if let Some((prefix, body)) = chunk {
        records.push(format!("{prefix}{body}"));
    }
    Ok(())
}

fn serialize_value(path: &str, value: &Value, records: &mut Vec<String>) -> Result<(), RecordsError> {
    match value {
        Value::String(text) => {
            let record = format!("{path}={text}");
            if record.len() <= MAX_RECORD_LENGTH {
                records.push(record);
                Ok(())
            } else {
                serialize_text(path, text, records)
            }
        }
        Value::Array(elements) => {
            records.push(meta_record(path, MetaKind::Array));
            for (index, element) in elements.iter().enumerate() {
                let Value::String(element) = element else {
                    return Err(RecordsError::UnsupportedValue(format!("{path}.{index}")));
                };
                let record = format!("{path}.{index}={element}");
                validate_record(&record)?;
                records.push(record);
            }
            Ok(())
        }
        Value::Object(map) if map.is_empty() => Err(RecordsError::EmptyObject(path.to_string())),
        Value::Object(map) => serialize_object(path, map, records),
        _ => Err(RecordsError::UnsupportedValue(path.to_string())),
    }
}

fn serialize_object(parent: &str, map: &Map<String, Value>, records: &mut Vec<String>) -> Result<(), RecordsError> {
    for (key, value) in map {
        validate_key(parent, key)?;
        serialize_value(&join_path(parent, key), value, records)?;
    }
    Ok(())
}

/// Flattens a JSON object of strings, string arrays and nested objects into
/// record strings, each at most [`MAX_RECORD_LENGTH`] bytes long.
pub fn serialize_records(value: &Value) -> Result<Vec<String>, RecordsError> {
    let Value::Object(map) = value else {
        return Err(RecordsError::NotAnObject);
    };
    let mut records = Vec::new();
    serialize_object("", map, &mut records)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_layout() {
        let records = serialize_records(&json!({ "social": { "twitter": "@alice" }, "links": ["a", "b"] })).unwrap();
        assert_eq!(records, vec!["links.meta=type:array", "links.0=a", "links.1=b", "social.twitter=@alice"]);
    }

    #[test]
    fn test_serialize_text_chunks() {
        let text = vec!["abcdefghi"; 50].join(" ");
        let records = serialize_records(&json!({ "bio": text })).unwrap();
        assert_eq!(records[0], "bio.meta=type:text");
        assert_eq!(records.len(), 4);
        assert!(records[1].starts_with("bio.0=abcdefghi "));
        assert!(records[1..].iter().all(|record| record.len() <= MAX_RECORD_LENGTH));
    }

    #[test]
    fn test_serialize_errors() {
        assert_eq!(serialize_records(&json!(["a"])), Err(RecordsError::NotAnObject));
        assert_eq!(serialize_records(&json!({ "a.b": "x" })), Err(RecordsError::InvalidKey("a.b".into())));
        assert_eq!(serialize_records(&json!({ "a": { "meta": "x" } })), Err(RecordsError::InvalidKey("a.meta".into())));
        assert_eq!(serialize_records(&json!({ "revoked": "x" })), Err(RecordsError::InvalidKey("revoked".into())));
        assert_eq!(serialize_records(&json!({ "7": "x" })), Err(RecordsError::InvalidKey("7".into())));
        assert_eq!(serialize_records(&json!({ "a": 1 })), Err(RecordsError::UnsupportedValue("a".into())));
        assert_eq!(serialize_records(&json!({ "a": ["x", 2] })), Err(RecordsError::UnsupportedValue("a.1".into())));
        assert_eq!(
            serialize_records(&json!({ "a": "w".repeat(300) })),
            Err(RecordsError::WordTooLong { path: "a".into(), len: 300 })
        );
        assert_eq!(serialize_records(&json!({ "a": ["w".repeat(230)] })), Err(RecordsError::RecordTooLong(234)));
    }
}
