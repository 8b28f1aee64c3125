//! Query descriptors and results.

use serde::Serialize;

use crate::facts::FactBinding;
use crate::facts::FactValue;

/// Naming scheme a fact was requested under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactKind {
    /// Current structured name.
    Core,
    /// Older flat alias.
    Legacy,
    /// Nothing matched the requested name.
    Unknown,
}

/// A parsed request for one fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchedFact {
    name: String,
    user_query: String,
    binding: Option<FactBinding>,
    kind: FactKind,
}

impl SearchedFact {
    pub fn new(
        name: impl Into<String>,
        user_query: impl Into<String>,
        binding: FactBinding,
        kind: FactKind,
    ) -> Self {
        Self {
            name: name.into(),
            user_query: user_query.into(),
            binding: Some(binding),
            kind,
        }
    }

    /// A request no fact matched.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_query: String::new(),
            binding: None,
            kind: FactKind::Unknown,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    pub fn binding(&self) -> Option<FactBinding> {
        self.binding
    }

    pub fn kind(&self) -> FactKind {
        self.kind
    }
}

/// The outcome of resolving one [`SearchedFact`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFact {
    pub name: String,
    pub value: Option<FactValue>,
    #[serde(rename = "type")]
    pub kind: FactKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_query: String,
}

impl ResolvedFact {
    pub fn new(name: impl Into<String>, value: Option<FactValue>, kind: FactKind) -> Self {
        Self {
            name: name.into(),
            value,
            kind,
            user_query: String::new(),
        }
    }

    pub fn with_user_query(mut self, user_query: impl Into<String>) -> Self {
        self.user_query = user_query.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_fact_json() {
        let fact = ResolvedFact::new("bios_vendor", Some(FactValue::from("Dell Inc.")), FactKind::Legacy);
        assert_eq!(
            serde_json::to_string(&fact).unwrap(),
            r#"{"name":"bios_vendor","value":"Dell Inc.","type":"legacy"}"#
        );
    }

    #[test]
    fn test_resolved_fact_json_with_user_query() {
        let fact = ResolvedFact::new("mountpoints./.size_bytes", Some(FactValue::Integer(4096)), FactKind::Core)
            .with_user_query("/.size_bytes");
        assert_eq!(
            serde_json::to_string(&fact).unwrap(),
            r#"{"name":"mountpoints./.size_bytes","value":4096,"type":"core","user_query":"/.size_bytes"}"#
        );
    }

    #[test]
    fn test_unknown_fact_json() {
        let fact = ResolvedFact::new("nonexistent", None, FactKind::Unknown);
        assert_eq!(
            serde_json::to_string(&fact).unwrap(),
            r#"{"name":"nonexistent","value":null,"type":"unknown"}"#
        );
    }
}
