//! Database module: the receipt table and its storage handle.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `sqlite.rs`: `ReceiptStorage`, the create/read surface

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{NewReceipt, OrgDetails, Receipt};
pub use schema::SQLITE_INIT;
pub use sqlite::{ReceiptStorage, SqlitePool, connect};
