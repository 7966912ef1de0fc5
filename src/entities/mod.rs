//! Entity module - Contains the SeaORM entity definitions for the database.
//! The records core persists whole collections as JSON documents, so a single
//! key-value table is all the database needs.

pub mod kv_entry;

pub use kv_entry::{Entity as KvEntry, Model as KvEntryModel};
