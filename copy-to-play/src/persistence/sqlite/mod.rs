//! SQLite-backed puzzle collections.
//!
//! ## Database setup
//!
//! [`Database`] wraps a `sqlx::SqlitePool` opened in WAL mode. Embedded
//! migrations (`migrations/001_initial_schema.sql`) create both collections
//! when [`Database::open`] is called. The schema is idempotent.
//!
//! ## Collections
//!
//! | Table | Type | Trait |
//! |-------|------|-------|
//! | `puzzle2` | [`SqliteSourceRepository`] | `SourceRepository` |
//! | `puzzle2_puzzle` | [`SqlitePlayRepository`] | `PlayRepository` |
//!
//! Build documents are stored as raw JSON and validated when read. Play
//! puzzles are stored one column per field.
//!
//! ## Import
//!
//! [`import_build_documents`] loads a newline-delimited JSON export into
//! `puzzle2`.

mod database;
mod import;
mod play_repo;
mod source_repo;

pub use database::Database;
pub use import::import_build_documents;
pub use play_repo::SqlitePlayRepository;
pub use source_repo::SqliteSourceRepository;
