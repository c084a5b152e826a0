// Key-value store module.
// The persisted string store shared with the application shell, plus its key layout.

pub mod keys;
pub mod prefs;

pub use keys::KeyLayout;
pub use prefs::{FileStore, KeyValueStore, MemoryStore};
