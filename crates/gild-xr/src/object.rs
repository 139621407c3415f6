//! Small accessors over untyped resource objects.

use anyhow::{anyhow, Result};
use serde_yaml::{Mapping, Value};

pub fn str_field<'a>(object: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut cur = object;
    for key in path {
        cur = cur.get(*key)?;
    }
    cur.as_str()
}

/// The mapping under `key`, inserting an empty one when absent.
pub fn mapping_entry<'a>(map: &'a mut Mapping, key: &str) -> Result<&'a mut Mapping> {
    let slot = map.entry(Value::from(key)).or_insert_with(|| Value::Mapping(Mapping::new()));
    if slot.is_null() {
        *slot = Value::Mapping(Mapping::new());
    }
    slot.as_mapping_mut().ok_or_else(|| anyhow!("{key} is not a mapping"))
}

pub fn as_object_mut(object: &mut Value) -> Result<&mut Mapping> {
    object.as_mapping_mut().ok_or_else(|| anyhow!("object is not a mapping"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_string_lookup() {
        let v: Value = serde_yaml::from_str("metadata:\n  name: a\n  labels: {x: 1}\n").unwrap();
        assert_eq!(str_field(&v, &["metadata", "name"]), Some("a"));
        assert_eq!(str_field(&v, &["metadata", "labels", "x"]), None);
        assert_eq!(str_field(&v, &["spec", "name"]), None);
    }

    #[test]
    fn mapping_entry_creates_and_rejects() {
        let mut m: Mapping = serde_yaml::from_str("spec: ~\nkind: Pod\n").unwrap();
        mapping_entry(&mut m, "spec").unwrap().insert("a".into(), 1.into());
        mapping_entry(&mut m, "metadata").unwrap();
        assert!(m.get("metadata").is_some_and(Value::is_mapping));
        assert!(mapping_entry(&mut m, "kind").is_err());
    }
}
