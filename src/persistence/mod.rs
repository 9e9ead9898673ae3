//! JSON-backed persistence for settings files
//!
//! Features:
//! - Whole-file snapshots (every change rewrites the file)
//! - Temp file + rename so a crash never leaves a truncated file
//! - One shared `ConfigFile` handle per path, which serializes its writes
//! - Bounded retry on save failures

pub mod file;
pub mod store;

pub use file::{ConfigFile, SAVE_ATTEMPTS, SAVE_BACKOFF};
pub use store::{load, save};
