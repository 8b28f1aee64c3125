//! Fact values.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Name → value mapping produced by one resolver computation.
pub type FactMap = BTreeMap<String, FactValue>;

/// A fact value: scalar, string or structured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FactValue {
    Bool(bool),
    Integer(u64),
    String(String),
    List(Vec<FactValue>),
    Map(BTreeMap<String, FactValue>),
}

impl FactValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FactValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FactValue>> {
        match self {
            FactValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Follows a dotted path into structured values.
    ///
    /// Map segments are keys, list segments are indices. An empty path
    /// returns the value itself.
    pub fn dig(&self, path: &str) -> Option<&FactValue> {
        if path.is_empty() {
            return Some(self);
        }

        path.split('.').try_fold(self, |value, segment| match value {
            FactValue::Map(map) => map.get(segment),
            FactValue::List(list) => segment.parse::<usize>().ok().and_then(|i| list.get(i)),
            _ => None,
        })
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Bool(b) => write!(f, "{}", b),
            FactValue::Integer(n) => write!(f, "{}", n),
            FactValue::String(s) => f.write_str(s),
            structured => match serde_json::to_string_pretty(structured) {
                Ok(json) => f.write_str(&json),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Bool(value)
    }
}

impl From<u64> for FactValue {
    fn from(value: u64) -> Self {
        FactValue::Integer(value)
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::String(value)
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::String(value.to_string())
    }
}

impl From<Vec<FactValue>> for FactValue {
    fn from(value: Vec<FactValue>) -> Self {
        FactValue::List(value)
    }
}

impl From<BTreeMap<String, FactValue>> for FactValue {
    fn from(value: BTreeMap<String, FactValue>) -> Self {
        FactValue::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mount() -> FactValue {
        let mut root = BTreeMap::new();
        root.insert("device".to_string(), FactValue::from("/dev/sda1"));
        root.insert(
            "options".to_string(),
            FactValue::from(vec![FactValue::from("rw"), FactValue::from("relatime")]),
        );
        let mut mounts = BTreeMap::new();
        mounts.insert("/".to_string(), FactValue::Map(root));
        FactValue::Map(mounts)
    }

    #[test]
    fn test_dig_into_map_and_list() {
        let value = mount();
        assert_eq!(value.dig("/.device"), Some(&FactValue::from("/dev/sda1")));
        assert_eq!(value.dig("/.options.1"), Some(&FactValue::from("relatime")));
        assert_eq!(value.dig(""), Some(&value));
    }

    #[test]
    fn test_dig_missing_segments() {
        let value = mount();
        assert_eq!(value.dig("/boot"), None);
        assert_eq!(value.dig("/.options.7"), None);
        assert_eq!(value.dig("/.device.extra"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FactValue::from("ext4").to_string(), "ext4");
        assert_eq!(FactValue::from(42u64).to_string(), "42");
        assert_eq!(FactValue::from(true).to_string(), "true");
        assert_eq!(
            FactValue::from(vec![FactValue::from("a")]).to_string(),
            "[\n  \"a\"\n]"
        );
    }
}
