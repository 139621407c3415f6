use std::collections::BTreeMap;

use anyhow::Result;
use gild_assert::{Detail, DetailKind, DiffEntry, DiffReport, Document, InputFile, StructuralDiff};
use serde_yaml::{Mapping, Value};

use crate::report::write_human_report;

/// Tree comparison of YAML documents, ignoring formatting, comments and map key order.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeDiff;

impl StructuralDiff for TreeDiff {
    fn compare(&self, from: &InputFile, to: &InputFile) -> Result<DiffReport> {
        let mut diffs = Vec::new();
        for pair in pair_documents(&from.documents, &to.documents) {
            match pair {
                (Some(a), Some(b)) => compare_values(identity(a).as_deref(), "/", a, b, &mut diffs),
                (Some(a), None) => diffs.push(document_entry(DetailKind::DocumentRemoval, a)),
                (None, Some(b)) => diffs.push(document_entry(DetailKind::DocumentAddition, b)),
                (None, None) => {}
            }
        }
        tracing::debug!(from = %from.location.display(), to = %to.location.display(), diffs = diffs.len(), "tree diff");
        Ok(DiffReport { from: from.location.clone(), to: to.location.clone(), diffs })
    }

    fn write_report(&self, report: &DiffReport, out: &mut dyn std::io::Write) -> Result<()> {
        write_human_report(report, out)
    }
}

/// `apiVersion/kind/name` of a resource document.
pub fn identity(doc: &Document) -> Option<String> {
    let api_version = doc.get("apiVersion")?.as_str()?;
    let kind = doc.get("kind")?.as_str()?;
    let name = doc.get("metadata")?.get("name")?.as_str()?;
    Some(format!("{api_version}/{kind}/{name}"))
}

type Pair<'a> = (Option<&'a Document>, Option<&'a Document>);

/// Pair documents by identity when every document has a distinct one, otherwise by position.
fn pair_documents<'a>(from: &'a [Document], to: &'a [Document]) -> Vec<Pair<'a>> {
    match (index_by_identity(from), index_by_identity(to)) {
        (Some(_), Some(mut to_ids)) => {
            let mut pairs = Vec::with_capacity(from.len().max(to.len()));
            for doc in from {
                let matched = identity(doc).and_then(|id| to_ids.remove(&id));
                pairs.push((Some(doc), matched));
            }
            for doc in to {
                if identity(doc).is_some_and(|id| to_ids.contains_key(&id)) {
                    pairs.push((None, Some(doc)));
                }
            }
            pairs
        }
        _ => {
            let n = from.len().max(to.len());
            (0..n).map(|i| (from.get(i), to.get(i))).collect()
        }
    }
}

fn index_by_identity(docs: &[Document]) -> Option<BTreeMap<String, &Document>> {
    let mut ids = BTreeMap::new();
    for doc in docs {
        if ids.insert(identity(doc)?, doc).is_some() {
            return None;
        }
    }
    Some(ids)
}

fn document_entry(kind: DetailKind, doc: &Document) -> DiffEntry {
    let detail = match kind {
        DetailKind::DocumentRemoval => Detail { kind, from: Some(doc.clone()), to: None },
        _ => Detail { kind, from: None, to: Some(doc.clone()) },
    };
    DiffEntry { document: identity(doc), path: "/".into(), details: vec![detail] }
}

fn child_path(path: &str, segment: &str) -> String {
    if path == "/" {
        format!("/{segment}")
    } else {
        format!("{path}/{segment}")
    }
}

fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "~".into(),
        other => serde_yaml::to_string(other).map(|s| s.trim_end().to_string()).unwrap_or_default(),
    }
}

fn entry(document: Option<&str>, path: &str, details: Vec<Detail>) -> DiffEntry {
    DiffEntry { document: document.map(str::to_string), path: path.to_string(), details }
}

/// Append the differences between `a` and `b` found at `path` and below, parents first.
fn compare_values(document: Option<&str>, path: &str, a: &Value, b: &Value, out: &mut Vec<DiffEntry>) {
    if a == b {
        return;
    }
    match (a, b) {
        (Value::Mapping(a), Value::Mapping(b)) => compare_mappings(document, path, a, b, out),
        (Value::Sequence(a), Value::Sequence(b)) => compare_sequences(document, path, a, b, out),
        _ => {
            let detail = Detail { kind: DetailKind::Modification, from: Some(a.clone()), to: Some(b.clone()) };
            out.push(entry(document, path, vec![detail]));
        }
    }
}

fn compare_mappings(document: Option<&str>, path: &str, a: &Mapping, b: &Mapping, out: &mut Vec<DiffEntry>) {
    let removed: Mapping = a.iter().filter(|(k, _)| !b.contains_key(*k)).map(|(k, v)| (k.clone(), v.clone())).collect();
    let added: Mapping = b.iter().filter(|(k, _)| !a.contains_key(*k)).map(|(k, v)| (k.clone(), v.clone())).collect();

    let mut details = Vec::new();
    if !removed.is_empty() {
        details.push(Detail { kind: DetailKind::Removal, from: Some(Value::Mapping(removed)), to: None });
    }
    if !added.is_empty() {
        details.push(Detail { kind: DetailKind::Addition, from: None, to: Some(Value::Mapping(added)) });
    }
    if !details.is_empty() {
        out.push(entry(document, path, details));
    }

    for (key, av) in a {
        if let Some(bv) = b.get(key) {
            compare_values(document, &child_path(path, &key_label(key)), av, bv, out);
        }
    }
}

fn compare_sequences(document: Option<&str>, path: &str, a: &[Value], b: &[Value], out: &mut Vec<DiffEntry>) {
    if a.len() == b.len() {
        if is_permutation(a, b) {
            let detail = Detail {
                kind: DetailKind::OrderChange,
                from: Some(Value::Sequence(a.to_vec())),
                to: Some(Value::Sequence(b.to_vec())),
            };
            out.push(entry(document, path, vec![detail]));
            return;
        }
        for (i, (av, bv)) in a.iter().zip(b).enumerate() {
            compare_values(document, &child_path(path, &i.to_string()), av, bv, out);
        }
        return;
    }

    let removed: Vec<Value> = a.iter().filter(|v| !b.contains(*v)).cloned().collect();
    let added: Vec<Value> = b.iter().filter(|v| !a.contains(*v)).cloned().collect();
    let mut details = Vec::new();
    if !removed.is_empty() {
        details.push(Detail { kind: DetailKind::Removal, from: Some(Value::Sequence(removed)), to: None });
    }
    if !added.is_empty() {
        details.push(Detail { kind: DetailKind::Addition, from: None, to: Some(Value::Sequence(added)) });
    }
    if details.is_empty() {
        // same items, different multiplicity
        details.push(Detail {
            kind: DetailKind::Modification,
            from: Some(Value::Sequence(a.to_vec())),
            to: Some(Value::Sequence(b.to_vec())),
        });
    }
    out.push(entry(document, path, details));
}

fn is_permutation(a: &[Value], b: &[Value]) -> bool {
    let mut used = vec![false; b.len()];
    a.iter().all(|av| match b.iter().enumerate().position(|(i, bv)| !used[i] && bv == av) {
        Some(i) => {
            used[i] = true;
            true
        }
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn input(yaml: &str) -> InputFile {
        InputFile { location: PathBuf::from("x.yaml"), documents: gild_assert::load_documents(yaml.as_bytes()).unwrap() }
    }

    fn diff(a: &str, b: &str) -> Vec<DiffEntry> {
        TreeDiff.compare(&input(a), &input(b)).unwrap().diffs
    }

    #[test]
    fn test_identical_ignores_formatting_and_key_order() {
        let a = "a: 1\nb: {c: [1, 2]}\n";
        let b = "# comment\nb:\n  c:\n    - 1\n    - 2\na: 1\n";
        assert!(diff(a, b).is_empty());
    }

    #[test]
    fn test_scalar_modification() {
        let d = diff("spec:\n  replicas: 1\n", "spec:\n  replicas: 3\n");
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].path, "/spec/replicas");
        assert_eq!(d[0].details[0].kind, DetailKind::Modification);
        assert_eq!(d[0].details[0].from.as_ref().and_then(Value::as_i64), Some(1));
        assert_eq!(d[0].details[0].to.as_ref().and_then(Value::as_i64), Some(3));
    }

    #[test]
    fn test_map_entries_added_and_removed() {
        let d = diff("labels: {a: x, b: y}\n", "labels: {b: y, c: z}\n");
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].path, "/labels");
        let kinds: Vec<DetailKind> = d[0].details.iter().map(|x| x.kind).collect();
        assert_eq!(kinds, vec![DetailKind::Removal, DetailKind::Addition]);
    }

    #[test]
    fn test_sequence_order_change() {
        let d = diff("items: [a, b, c]\n", "items: [c, a, b]\n");
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].details[0].kind, DetailKind::OrderChange);
    }

    #[test]
    fn test_sequence_same_length_recurses_by_index() {
        let d = diff("items: [{n: 1}, {n: 2}]\n", "items: [{n: 1}, {n: 5}]\n");
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].path, "/items/1/n");
    }

    #[test]
    fn test_sequence_items_added() {
        let d = diff("items: [a]\n", "items: [a, b]\n");
        assert_eq!(d[0].details.len(), 1);
        assert_eq!(d[0].details[0].kind, DetailKind::Addition);
    }

    #[test]
    fn test_documents_paired_by_identity() {
        let a = "apiVersion: v1\nkind: Pod\nmetadata: {name: a}\n---\napiVersion: v1\nkind: Pod\nmetadata: {name: b}\n";
        let b = "apiVersion: v1\nkind: Pod\nmetadata: {name: b}\n---\napiVersion: v1\nkind: Pod\nmetadata: {name: a}\n";
        assert!(diff(a, b).is_empty());
    }

    #[test]
    fn test_document_added_and_removed() {
        let a = "apiVersion: v1\nkind: Pod\nmetadata: {name: a}\n";
        let b = "apiVersion: v1\nkind: Pod\nmetadata: {name: b}\n";
        let d = diff(a, b);
        assert_eq!(d.len(), 2);
        assert_eq!(d[0].details[0].kind, DetailKind::DocumentRemoval);
        assert_eq!(d[0].document.as_deref(), Some("v1/Pod/a"));
        assert_eq!(d[1].details[0].kind, DetailKind::DocumentAddition);
        assert_eq!(d[1].document.as_deref(), Some("v1/Pod/b"));
    }

    #[test]
    fn test_anonymous_documents_paired_by_position() {
        let d = diff("a: 1\n---\nb: 2\n", "a: 1\n---\nb: 3\n---\nc: 4\n");
        assert_eq!(d.len(), 2);
        assert_eq!(d[0].path, "/b");
        assert_eq!(d[1].details[0].kind, DetailKind::DocumentAddition);
    }
}
