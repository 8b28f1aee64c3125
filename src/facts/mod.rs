//! Facts: what a user asks for, how it is bound to a resolver, and what
//! comes back.

mod binding;
mod catalog;
mod manager;
mod searched;
mod value;

pub use binding::{FactBinding, FactError};
pub use catalog::{FACTS, FactCatalog, FactDefinition};
pub use manager::{InternalFactManager, ManagerOptions};
pub use searched::{FactKind, ResolvedFact, SearchedFact};
pub use value::{FactMap, FactValue};
