//! Entity module - `SeaORM` entity definitions for the database.
//! The only table is the key-value store backing goal persistence.

pub mod storage_entry;

pub use storage_entry::{
    Column as StorageEntryColumn, Entity as StorageEntry, Model as StorageEntryModel,
};
