//! SQLite-Backend fuer den Key-Value-Speicher

pub mod pool;

pub use pool::SqliteKeyValueStore;
