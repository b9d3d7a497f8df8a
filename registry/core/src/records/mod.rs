//!
//! Records: namespaced key-value strings published in `OP_RETURN` outputs of
//! record transactions.
//!
//! ```text
//! social.twitter=@alice              scalar
//! bio.text.meta=type:text            declares bio.text as text split over indexed records
//! bio.text.0=first words             joined with spaces
//! links.meta=type:array              declares links as an array
//! links.0=https://example.com
//! revoked=<sha256 hex of a record>   hides a previously published record
//! ```
//!

mod parser;
mod serializer;

pub use parser::{MetaDeclaration, RecordEntry, RecordPath, RecordSet, fold_records, parse_records, parse_records_ir};
pub use serializer::serialize_records;

use bitcann_hashes::sha256;
use thiserror::Error;

/// Longest record string. An `OP_RETURN` carrying one record of this size is
/// exactly the relay limit.
pub const MAX_RECORD_LENGTH: usize = 220;

pub const REVOKED_KEY: &str = "revoked";
pub const META_KEY: &str = "meta";
pub const META_TYPE_PREFIX: &str = "type:";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordsError {
    #[error("record of {0} bytes exceeds the maximum record length")]
    RecordTooLong(usize),

    #[error("records must be a JSON object")]
    NotAnObject,

    #[error("invalid record key '{0}'")]
    InvalidKey(String),

    #[error("unsupported value at '{0}', only strings, arrays of strings and objects are allowed")]
    UnsupportedValue(String),

    /// A nested object without members leaves no record behind.
    #[error("empty object at '{0}' cannot be published")]
    EmptyObject(String),

    #[error("word of {len} bytes at '{path}' does not fit in a single record")]
    WordTooLong { path: String, len: usize },
}

/// Aggregation declared by a `.meta=type:<kind>` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKind {
    Text,
    Array,
}

impl MetaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaKind::Text => "text",
            MetaKind::Array => "array",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.strip_prefix(META_TYPE_PREFIX)? {
            "text" => Some(MetaKind::Text),
            "array" => Some(MetaKind::Array),
            _ => None,
        }
    }
}

/// Hex sha256 of a record string, the value of a `revoked=` record.
pub fn record_hash(record: &str) -> String {
    faster_hex::hex_string(&sha256(record.as_bytes()))
}

/// The record that revokes `record`.
pub fn revoke_record(record: &str) -> String {
    format!("{REVOKED_KEY}={}", record_hash(record))
}

pub fn validate_record(record: &str) -> Result<(), RecordsError> {
    if record.len() > MAX_RECORD_LENGTH {
        return Err(RecordsError::RecordTooLong(record.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_hash() {
        assert_eq!(record_hash("abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(revoke_record("abc"), "revoked=ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn test_validate_record() {
        assert!(validate_record(&"a".repeat(MAX_RECORD_LENGTH)).is_ok());
        assert_eq!(validate_record(&"a".repeat(MAX_RECORD_LENGTH + 1)), Err(RecordsError::RecordTooLong(221)));
    }

    #[test]
    fn test_roundtrip() {
        let long_text = (0..120).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let values = [
            json!({}),
            json!({ "social": { "twitter": "@alice" } }),
            json!({ "social": { "twitter": "@alice", "nostr": { "npub": "npub1xyz" } }, "address": { "bch": "bitcoincash:qr6m" } }),
            json!({ "links": { "web": ["https://a.example", "https://b.example", "https://c.example"] } }),
            json!({ "links": { "empty": [] } }),
            json!({ "bio": { "text": long_text } }),
            json!({ "bio": { "spaced": format!("  {}  ", "x".repeat(150)) + &"y ".repeat(60) } }),
            json!({ "note": "a=b=c", "unicode": "ünïcødé ✓" }),
        ];
        for value in values {
            let records = serialize_records(&value).unwrap();
            for record in &records {
                assert!(record.len() <= MAX_RECORD_LENGTH, "{record}");
            }
            assert_eq!(parse_records(&records), value, "{records:?}");
        }
        // values that could not survive the trip are refused
        assert_eq!(serialize_records(&json!({ "social": {} })), Err(RecordsError::EmptyObject("social".into())));
        assert_eq!(serialize_records(&json!({ "a": { "b": {} } })), Err(RecordsError::EmptyObject("a.b".into())));
    }

    #[test]
    fn test_revocation() {
        let value = json!({ "social": { "twitter": "@alice", "github": "alice" }, "links": ["a", "b"] });
        let mut records = serialize_records(&value).unwrap();
        records.push(revoke_record("social.twitter=@alice"));
        assert_eq!(parse_records(&records), json!({ "social": { "github": "alice" }, "links": ["a", "b"] }));

        // revoking an aggregate's meta declaration hides the whole aggregate
        records.push(revoke_record("links.meta=type:array"));
        assert_eq!(parse_records(&records), json!({ "social": { "github": "alice" } }));
    }
}
