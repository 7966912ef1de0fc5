//! Core module - framework-agnostic business logic.
//! Nothing here knows how records are rendered; the store collaborator is
//! injected through [`store::KeyValueStore`].

/// Column visibility policy
pub mod columns;
/// Identifier generators
pub mod ids;
/// Payroll metrics calculator
pub mod payroll;
/// Record store adapter
pub mod record_store;
/// Typed records and form inputs
pub mod records;
/// Roster and payroll reports
pub mod report;
/// Schema registry
pub mod schema;
/// Key-value store collaborator
pub mod store;
/// Search, pagination and table columns
pub mod table;
/// Field validation
pub mod validation;

pub use record_store::RecordStore;
pub use store::{DatabaseStore, KeyValueStore, MemoryStore};
