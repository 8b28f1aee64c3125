//! Scripted management interface.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::source::management::{
    ManagementError, ManagementInterface, ManagementObject, ManagementQuery,
};

/// Answers queries by class name. Classes without an object return `None`.
#[derive(Debug, Clone, Default)]
pub struct MockManagement {
    objects: HashMap<String, ManagementObject>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockManagement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, class: impl Into<String>, object: ManagementObject) -> Self {
        self.objects.insert(class.into(), object);
        self
    }

    /// Returns every query issued so far, rendered as text.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ManagementInterface for MockManagement {
    fn return_first(
        &self,
        query: &ManagementQuery,
    ) -> Result<Option<ManagementObject>, ManagementError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());
        Ok(self.objects.get(&query.class).cloned())
    }
}
