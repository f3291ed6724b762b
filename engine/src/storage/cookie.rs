use serde_json::Value;
use shared::utils::js_string;

use super::store::{KeyValueStore, MemoryStore};

#[derive(Debug, Clone, Default)]
pub struct CookieJar<S = MemoryStore> {
    store: S,
}

impl<S: KeyValueStore> CookieJar<S> {
    pub fn new(store: S) -> Self {
        CookieJar { store }
    }

    pub fn get_cookie(&self, key: &str) -> Option<String> {
        self.store.get_item(key)
    }

    // Stores `value` and returns the `name=value` pair that was written.
    pub fn set_cookie(&mut self, key: &str, value: &Value) -> String {
        let text = js_string(Some(value));
        self.store.set_item(key, text.clone());
        format!("{}={}", key, text)
    }

    pub fn remove_cookie(&mut self, key: &str) {
        self.store.remove_item(key);
    }
}
