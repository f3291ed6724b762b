// Per-key storage wrappers: a local/session pair and a cookie jar, over any
// string key-value backend.
pub mod cookie;
pub mod store;

pub use cookie::CookieJar;
pub use store::{KeyValueStore, MemoryStore, StorageKind, WebStorage};
