//! Unexpected resolver failures.
//!
//! Expected absence (missing file, missing command, empty query result) is
//! never an error; resolvers return no value for it. Anything that does
//! reach this type is logged and dropped by the fact manager.

use thiserror::Error;

use crate::source::{ExecutionError, ManagementError};

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("management query failed: {0}")]
    Management(#[from] ManagementError),
}
