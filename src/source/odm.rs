//! AIX Object Data Manager queries.
//!
//! Conditions are chained onto an [`OdmQuery`] and rendered into an
//! `odmget -q "..."` command line, which runs against each repository in
//! turn until one returns objects.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;

use crate::source::execution::{ExecutionError, Executor};

/// Repositories searched by [`OdmQuery::execute`], in order.
pub const REPOS: &[&str] = &[
    "CuAt", "CuDep", "CuDv", "CuDvDr", "CuPath", "CuVPD", "PdAt", "PdAtXtd", "PdCn", "PdDv",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OdmQuery {
    conditions: Vec<String>,
}

impl OdmQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `field='value'`.
    pub fn equals(mut self, field: &str, value: &str) -> Self {
        self.conditions.push(format!("{}='{}'", field, value));
        self
    }

    /// Adds `field like 'pattern'`; `*` matches any run of characters.
    pub fn like(mut self, field: &str, pattern: &str) -> Self {
        self.conditions.push(format!("{} like '{}'", field, pattern));
        self
    }

    /// The command line without the repository name.
    pub fn query(&self) -> String {
        format!("odmget -q \"{}\"", self.conditions.join(" AND "))
    }

    /// Runs the query against every repository in [`REPOS`] and returns the
    /// first non-empty output.
    pub fn execute(
        &self,
        executor: &dyn Executor,
        timeout: Option<Duration>,
    ) -> Result<String, ExecutionError> {
        self.execute_in(executor, REPOS, timeout)
    }

    pub fn execute_in(
        &self,
        executor: &dyn Executor,
        repos: &[&str],
        timeout: Option<Duration>,
    ) -> Result<String, ExecutionError> {
        let query = self.query();
        for repo in repos {
            let output = executor.execute(&format!("{} {}", query, repo), timeout)?;
            if !output.is_empty() {
                return Ok(output);
            }
        }
        debug!("no ODM objects for {}", query);
        Ok(String::new())
    }
}

/// Splits `odmget` output into objects of `attribute -> value`.
///
/// Each object starts with a `Class:` header line; attribute lines are
/// `name = "value"` or `name = number`.
pub fn parse_stanzas(output: &str) -> Vec<BTreeMap<String, String>> {
    let mut objects = Vec::new();
    let mut current: Option<BTreeMap<String, String>> = None;

    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.ends_with(':') && !trimmed.contains('=') {
            objects.extend(current.replace(BTreeMap::new()));
            continue;
        }
        let (Some(object), Some((name, value))) = (current.as_mut(), trimmed.split_once('=')) else {
            continue;
        };
        object.insert(
            name.trim().to_string(),
            value.trim().trim_matches('"').to_string(),
        );
    }
    objects.extend(current);
    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::MockExecutor;

    #[test]
    fn test_single_condition() {
        let query = OdmQuery::new().equals("name", "12345");
        assert_eq!(query.query(), "odmget -q \"name='12345'\"");

        let executor = MockExecutor::new().on("odmget -q \"name='12345'\" CuAt", "CuAt:\n\tname = \"12345\"");
        assert_eq!(
            query.execute_in(&executor, &["CuAt"], None).unwrap(),
            "CuAt:\n\tname = \"12345\""
        );
        assert_eq!(executor.call_count("odmget -q \"name='12345'\" CuAt"), 1);
    }

    #[test]
    fn test_chained_conditions() {
        let query = OdmQuery::new()
            .equals("field1", "value")
            .like("field2", "value*");
        let command = "odmget -q \"field1='value' AND field2 like 'value*'\" CuAt";
        let executor = MockExecutor::new().on(command, "CuAt:");

        query.execute_in(&executor, &["CuAt"], None).unwrap();
        assert_eq!(executor.call_count(command), 1);
    }

    #[test]
    fn test_first_non_empty_repository_wins() {
        let query = OdmQuery::new().equals("name", "proc0");
        let executor = MockExecutor::new().on("odmget -q \"name='proc0'\" CuDv", "CuDv:\n\tname = \"proc0\"");

        let output = query.execute(&executor, None).unwrap();

        assert_eq!(output, "CuDv:\n\tname = \"proc0\"");
        assert_eq!(executor.call_count("odmget -q \"name='proc0'\" CuAt"), 1);
        assert_eq!(executor.call_count("odmget -q \"name='proc0'\" CuDep"), 1);
        assert_eq!(executor.call_count("odmget -q \"name='proc0'\" CuDvDr"), 0);
    }

    #[test]
    fn test_no_objects_anywhere() {
        let executor = MockExecutor::new();
        let output = OdmQuery::new().equals("name", "x").execute(&executor, None).unwrap();
        assert_eq!(output, "");
        assert_eq!(executor.call_count("odmget -q \"name='x'\" PdDv"), 1);
    }

    #[test]
    fn test_timeout_stops_search() {
        let executor = MockExecutor::new().timing_out("odmget -q \"name='x'\" CuAt");
        let err = OdmQuery::new()
            .equals("name", "x")
            .execute(&executor, None)
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Timeout { .. }));
        assert_eq!(executor.call_count("odmget -q \"name='x'\" CuDep"), 0);
    }

    #[test]
    fn test_parse_stanzas() {
        let output = "\
CuAt:
\tname = \"sys0\"
\tattribute = \"modelname\"
\tvalue = \"IBM,8284-22A\"

CuAt:
\tname = \"proc0\"
\tnls_index = 0
";
        let objects = parse_stanzas(output);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0]["value"], "IBM,8284-22A");
        assert_eq!(objects[0]["attribute"], "modelname");
        assert_eq!(objects[1]["nls_index"], "0");
    }

    #[test]
    fn test_parse_stanzas_empty() {
        assert!(parse_stanzas("").is_empty());
    }
}
