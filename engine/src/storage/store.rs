use std::collections::HashMap;

use serde_json::Value;

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: String);
    fn remove_item(&mut self, key: &str);
    fn clear(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.items.insert(key.to_string(), value);
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Local,
    Session,
}

// A long-lived store paired with a per-session one.
// Strings are stored as they are; every other value is stored as JSON text.
// Reads decode JSON when they can and fall back to the raw string.
#[derive(Debug, Clone, Default)]
pub struct WebStorage<L = MemoryStore, S = MemoryStore> {
    local: L,
    session: S,
}

impl<L: KeyValueStore, S: KeyValueStore> WebStorage<L, S> {
    pub fn new(local: L, session: S) -> Self {
        WebStorage { local, session }
    }

    pub fn set(&mut self, kind: StorageKind, key: &str, value: &Value) {
        let text = encode(value);
        tracing::trace!(?kind, key, "Storing item");
        self.store_mut(kind).set_item(key, text);
    }

    pub fn get(&self, kind: StorageKind, key: &str) -> Option<Value> {
        self.store(kind).get_item(key).map(|text| decode(&text))
    }

    pub fn remove(&mut self, kind: StorageKind, key: &str) {
        self.store_mut(kind).remove_item(key);
    }

    pub fn set_local(&mut self, key: &str, value: &Value) {
        self.set(StorageKind::Local, key, value);
    }

    pub fn get_local(&self, key: &str) -> Option<Value> {
        self.get(StorageKind::Local, key)
    }

    pub fn remove_local(&mut self, key: &str) {
        self.remove(StorageKind::Local, key);
    }

    pub fn set_session(&mut self, key: &str, value: &Value) {
        self.set(StorageKind::Session, key, value);
    }

    pub fn get_session(&self, key: &str) -> Option<Value> {
        self.get(StorageKind::Session, key)
    }

    pub fn remove_session(&mut self, key: &str) {
        self.remove(StorageKind::Session, key);
    }

    pub fn clear_all(&mut self) {
        self.local.clear();
        self.session.clear();
    }

    fn store(&self, kind: StorageKind) -> &dyn KeyValueStore {
        match kind {
            StorageKind::Local => &self.local,
            StorageKind::Session => &self.session,
        }
    }

    fn store_mut(&mut self, kind: StorageKind) -> &mut dyn KeyValueStore {
        match kind {
            StorageKind::Local => &mut self.local,
            StorageKind::Session => &mut self.session,
        }
    }
}

fn encode(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn decode(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_objects_round_trip_as_json() {
        let mut storage: WebStorage = WebStorage::default();
        storage.set_local("user", &json!({ "id": 1, "tags": ["a"] }));
        assert_eq!(storage.get_local("user"), Some(json!({ "id": 1, "tags": ["a"] })));
        assert_eq!(storage.get_session("user"), None);
    }

    #[test]
    fn test_plain_strings_stay_strings() {
        let mut storage: WebStorage = WebStorage::default();
        storage.set_session("token", &json!("abc"));
        assert_eq!(storage.get_session("token"), Some(json!("abc")));
    }

    #[test]
    fn test_json_looking_strings_decode() {
        // Strings are stored raw, so numeric text reads back as a number.
        let mut storage: WebStorage = WebStorage::default();
        storage.set_local("count", &json!("42"));
        assert_eq!(storage.get_local("count"), Some(json!(42)));
        storage.set_local("flag", &json!(true));
        assert_eq!(storage.get_local("flag"), Some(json!(true)));
        storage.set_local("nothing", &json!(null));
        assert_eq!(storage.get_local("nothing"), Some(json!(null)));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut storage: WebStorage = WebStorage::default();
        storage.set_local("a", &json!(1));
        storage.set_session("b", &json!(2));
        storage.remove_local("a");
        assert_eq!(storage.get_local("a"), None);
        assert_eq!(storage.get_session("b"), Some(json!(2)));
        storage.clear_all();
        assert_eq!(storage.get_session("b"), None);
    }

    #[test]
    fn test_custom_backend() {
        let mut local = MemoryStore::new();
        local.set_item("seed", "[1,2]".to_string());
        let storage = WebStorage::new(local, MemoryStore::new());
        assert_eq!(storage.get(StorageKind::Local, "seed"), Some(json!([1, 2])));
    }
}
