// Query-string helpers. Keys and values are taken as written, without
// percent-decoding, and anything after `#` is treated as part of the query.
use serde_json::Value;
use shared::models::Record;
use shared::utils::{is_truthy, js_string};

// Parses the query part of `url` into a record.
// Each `&`-separated part is split on `=`, keeping only the first value after
// the key. A key without `=` maps to `null` and empty parts are skipped. A
// URL without `?` has no params.
pub fn get_url_params(url: &str) -> Record {
    let mut params = Record::new();
    let Some((_, query)) = url.split_once('?') else {
        return params;
    };
    for part in query.split('&').filter(|part| !part.is_empty()) {
        let mut pieces = part.split('=');
        let key = pieces.next().unwrap_or_default();
        let value = pieces
            .next()
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null);
        params.insert(key.to_string(), value);
    }
    params
}

pub fn get_url_param(url: &str, name: &str) -> String {
    let params = get_url_params(url);
    let value = params.get(name);
    if is_truthy(value) {
        js_string(value)
    } else {
        String::new()
    }
}

// Joins params into `?k=v&k2=v2`, or `""` when there are none.
// A `null` value is written as a bare key.
pub fn params_concat(params: &Record) -> String {
    if params.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = params
        .iter()
        .map(|(key, value)| match value {
            Value::Null => key.clone(),
            other => format!("{}={}", key, js_string(Some(other))),
        })
        .collect();
    format!("?{}", parts.join("&"))
}

pub fn set_url_params(url: &str, params: &Record) -> String {
    let (base, mut merged) = match url.split_once('?') {
        Some((base, _)) => (base, get_url_params(url)),
        None => (url, Record::new()),
    };
    for (key, value) in params {
        merged.insert(key.clone(), value.clone());
    }
    format!("{}{}", base, params_concat(&merged))
}
