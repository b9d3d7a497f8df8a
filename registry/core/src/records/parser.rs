use super::{META_KEY, MetaKind, REVOKED_KEY, record_hash};
use log::warn;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

pub type RecordPath = Vec<String>;

/// One value-carrying record. `index` is set for the elements of a text or
/// array aggregate, `sequence` is the record's position in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub path: RecordPath,
    pub index: Option<usize>,
    pub value: String,
    pub revoked: bool,
    pub sequence: usize,
}

/// The latest `.meta=` declaration of an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaDeclaration {
    pub kind: MetaKind,
    pub sequence: usize,
}

/// Intermediate form of a record list: value records in publication order
/// plus the aggregate declarations, with revocations already resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    pub entries: Vec<RecordEntry>,
    pub meta: BTreeMap<RecordPath, MetaDeclaration>,
    pub revoked_meta: HashSet<RecordPath>,
}

enum Record<'a> {
    Revoked(&'a str),
    Meta(RecordPath, MetaKind),
    Value(RecordPath, Option<usize>, &'a str),
}

fn classify(record: &str) -> Option<Record<'_>> {
    let (key, value) = record.split_once('=')?;
    if key == REVOKED_KEY {
        return Some(Record::Revoked(value));
    }
    let mut path: RecordPath = key.split('.').map(str::to_string).collect();
    if path.iter().any(String::is_empty) {
        return None;
    }
    let last = path.pop()?;
    if last == META_KEY {
        if path.is_empty() {
            return None;
        }
        return Some(Record::Meta(path, MetaKind::parse(value)?));
    }
    if !last.is_empty() && last.bytes().all(|byte| byte.is_ascii_digit()) {
        if path.is_empty() {
            return None;
        }
        return Some(Record::Value(path, Some(last.parse().ok()?), value));
    }
    path.push(last);
    Some(Record::Value(path, None, value))
}

/// First pass collects revocations and aggregate declarations, the second
/// flags every value record that is revoked either directly or through the
/// declaration of the aggregate it belongs to.
pub fn parse_records_ir<S: AsRef<str>>(records: &[S]) -> RecordSet {
    let mut revoked = HashSet::new();
    let mut declarations = Vec::new();
    for (sequence, record) in records.iter().map(AsRef::as_ref).enumerate() {
        match classify(record) {
            Some(Record::Revoked(hash)) => {
                revoked.insert(hash.to_ascii_lowercase());
            }
            Some(Record::Meta(path, kind)) => declarations.push((path, MetaDeclaration { kind, sequence }, record)),
            Some(Record::Value(..)) => {}
            None => warn!("ignoring malformed record '{record}'"),
        }
    }

    let mut set = RecordSet::default();
    for (path, declaration, record) in declarations {
        if revoked.contains(&record_hash(record)) {
            set.revoked_meta.insert(path);
        } else {
            set.meta.insert(path, declaration);
        }
    }

    for (sequence, record) in records.iter().map(AsRef::as_ref).enumerate() {
        if let Some(Record::Value(path, index, value)) = classify(record) {
            let revoked = revoked.contains(&record_hash(record)) || (index.is_some() && set.revoked_meta.contains(&path));
            set.entries.push(RecordEntry { path, index, value: value.to_string(), revoked, sequence });
        }
    }
    set
}

fn insert(root: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((leaf, parents)) = path.split_last() else {
        return;
    };
    let mut node = root;
    for segment in parents {
        let child = node.entry(segment.clone()).or_insert_with(|| Value::Object(Map::new()));
        if !child.is_object() {
            *child = Value::Object(Map::new());
        }
        node = match child {
            Value::Object(map) => map,
            _ => return,
        };
    }
    node.insert(leaf.clone(), value);
}

/// What a path was last written with: a scalar record or an aggregate
/// (its declaration or any of its elements).
#[derive(Default)]
struct PathState<'a> {
    scalar: Option<(usize, &'a str)>,
    elements: BTreeMap<usize, &'a str>,
    aggregate: Option<usize>,
}

impl PathState<'_> {
    /// The value the path ends up with and the position of the write that set it.
    fn resolve(self, kind: MetaKind) -> Option<(usize, Value)> {
        match (self.scalar, self.aggregate) {
            (Some((scalar, value)), aggregate) if aggregate.is_none_or(|aggregate| scalar > aggregate) => {
                Some((scalar, Value::String(value.to_string())))
            }
            (_, Some(aggregate)) => {
                let value = match kind {
                    MetaKind::Text => Value::String(self.elements.into_values().collect::<Vec<_>>().join(" ")),
                    MetaKind::Array => Value::Array(self.elements.into_values().map(|element| Value::String(element.to_string())).collect()),
                };
                Some((aggregate, value))
            }
            _ => None,
        }
    }
}

/// Folds a record set into a nested JSON object. Every path takes the value
/// of whatever was written to it last, a scalar or its aggregate, and paths
/// are then written in that order so a later parent or child replaces an
/// earlier one. Gaps in aggregate indices are closed.
pub fn fold_records(set: &RecordSet) -> Value {
    let mut paths: BTreeMap<&RecordPath, PathState<'_>> = BTreeMap::new();
    for entry in set.entries.iter().filter(|entry| !entry.revoked) {
        let state = paths.entry(&entry.path).or_default();
        match entry.index {
            None => state.scalar = Some((entry.sequence, entry.value.as_str())),
            Some(index) => {
                state.elements.insert(index, entry.value.as_str());
                state.aggregate = state.aggregate.max(Some(entry.sequence));
            }
        }
    }
    for (path, declaration) in &set.meta {
        let state = paths.entry(path).or_default();
        state.aggregate = state.aggregate.max(Some(declaration.sequence));
    }

    let mut writes: Vec<_> = paths
        .into_iter()
        .filter_map(|(path, state)| {
            let kind = set.meta.get(path).map_or(MetaKind::Array, |declaration| declaration.kind);
            state.resolve(kind).map(|(sequence, value)| (sequence, path, value))
        })
        .collect();
    writes.sort_by_key(|(sequence, ..)| *sequence);

    let mut root = Map::new();
    for (_, path, value) in writes {
        insert(&mut root, path, value);
    }
    Value::Object(root)
}

/// Parses a record list into a nested JSON object, hiding revoked records.
pub fn parse_records<S: AsRef<str>>(records: &[S]) -> Value {
    fold_records(&parse_records_ir(records))
}
