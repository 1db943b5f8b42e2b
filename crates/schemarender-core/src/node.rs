//! Configuration tree values
//!
//! A [`Node`] is what a schema document parses into: strings, plain scalars,
//! sequences and mappings keyed by field name. Strings are kept apart from the
//! other scalars because they are the only values a template can live in.

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Field name to value, in document order
pub type Mapping = IndexMap<String, Node>;

/// A node of a configuration tree
///
/// Mapping keys are always strings. A non-string YAML key such as `1:` or
/// `true:` is read as its string form and written back as a string; tagged
/// values (`!tag x`) are rejected. Callers must not rely on key types.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    String(String),
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

/// Non-string leaf values, passed through rendering unchanged
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl Node {
    /// Parse a tree from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a tree from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a tree from a file; `.json` files are read as JSON, anything else as YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a field if this node is a mapping
    pub fn get(&self, field: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(field))
    }

    /// Look up a nested field by dotted path (`columns.0.name`)
    ///
    /// Numeric segments index into sequences.
    pub fn pointer(&self, path: &str) -> Option<&Node> {
        path.split('.').try_fold(self, |node, segment| match node {
            Node::Mapping(map) => map.get(segment),
            Node::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Short human-readable name of the node's shape
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::String(_) => "string",
            Node::Scalar(Scalar::Null) => "null",
            Node::Scalar(Scalar::Bool(_)) => "boolean",
            Node::Scalar(Scalar::Integer(_)) | Node::Scalar(Scalar::Float(_)) => "number",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Scalar(Scalar::Integer(i))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Node::Scalar(Scalar::Float(f))
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(map)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::String(s) => serializer.serialize_str(s),
            Node::Scalar(scalar) => scalar.serialize(serializer),
            Node::Sequence(items) => serializer.collect_seq(items),
            Node::Mapping(map) => serializer.collect_map(map),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(b),
            Scalar::Integer(i) => serializer.serialize_i64(i),
            Scalar::Float(f) => serializer.serialize_f64(f),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, scalar, sequence or mapping with string keys")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Node, E> {
        // Out-of-range integers degrade to floats rather than failing the document
        Ok(match i64::try_from(v) {
            Ok(i) => Node::from(i),
            Err(_) => Node::from(v as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Node, E> {
        Ok(Node::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Node, A::Error> {
        let mut map = Mapping::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, Node>()? {
            map.insert(key, value);
        }
        Ok(Node::Mapping(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_tree() {
        let node = Node::from_yaml(r#"
name: my_model
version: 2
enabled: true
ratio: 0.5
owner: ~
columns:
  - name: id
    description: "{{ doc('id') }}"
"#).unwrap();

        assert_eq!(node.get("name").unwrap().as_str(), Some("my_model"));
        assert_eq!(node.get("version"), Some(&Node::from(2_i64)));
        assert_eq!(node.get("enabled"), Some(&Node::from(true)));
        assert_eq!(node.get("ratio"), Some(&Node::from(0.5_f64)));
        assert_eq!(node.get("owner"), Some(&Node::null()));
        assert_eq!(
            node.pointer("columns.0.description").and_then(Node::as_str),
            Some("{{ doc('id') }}")
        );
    }

    #[test]
    fn test_mapping_preserves_document_order() {
        let node = Node::from_yaml("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<&str> = node.as_mapping().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_mapping_equality_ignores_order() {
        let a = Node::from_yaml("a: 1\nb: 2\n").unwrap();
        let b = Node::from_yaml("b: 2\na: 1\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_document_is_null() {
        assert_eq!(Node::from_yaml("").unwrap(), Node::null());
    }

    #[test]
    fn test_non_string_keys_become_strings() {
        let node = Node::from_yaml("1: x\n").unwrap();
        assert_eq!(node.get("1").and_then(Node::as_str), Some("x"));
        assert_eq!(node.to_yaml().unwrap(), "'1': x\n");

        assert!(Node::from_yaml("description: !tag x\n").is_err());
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let from_json = Node::from_json(r#"{"name": "orders", "tags": ["a", "b"], "n": 3}"#).unwrap();
        let from_yaml = Node::from_yaml("name: orders\ntags: [a, b]\nn: 3\n").unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_serialize_json() {
        let node = Node::from_yaml("name: orders\ncount: 3\nflag: false\nnothing: null\n").unwrap();
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "orders", "count": 3, "flag": false, "nothing": null})
        );
    }

    #[test]
    fn test_pointer_misses() {
        let node = Node::from_yaml("columns:\n  - name: id\n").unwrap();
        assert!(node.pointer("columns.1.name").is_none());
        assert!(node.pointer("columns.x").is_none());
        assert!(node.pointer("name.inner").is_none());
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("schema.json");
        std::fs::write(&json_path, r#"{"models": []}"#).unwrap();
        let yaml_path = dir.path().join("schema.yml");
        std::fs::write(&yaml_path, "models: []\n").unwrap();

        assert_eq!(Node::from_file(&json_path).unwrap(), Node::from_file(&yaml_path).unwrap());
    }
}
