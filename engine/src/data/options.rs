// Conversions between the object, list and map forms of option data.
//
// An options object maps a value to its label: `{ "1": "Open" }`.
// The list form holds items `{ label: "Open", value: "1" }`.
// The map form is keyed by the raw `value`, so `1` and `"1"` stay distinct keys
// there while they collapse into one key in the object form. Prefer string
// values to avoid the mix-up.
use serde_json::{Map, Value};
use shared::models::{OptionsConfig, Record};
use shared::utils::{is_truthy, property_key};

// Insertion-ordered map keyed by raw JSON values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionMap {
    entries: Vec<(Value, Value)>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    // Inserts or replaces; a replaced key keeps its original position.
    pub fn set(&mut self, key: Value, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionSet {
    pub obj: Record,
    pub list: Vec<Value>,
    pub map: OptionMap,
}

impl OptionSet {
    pub fn get_key_to_value(&self, value: &Value) -> Option<&Value> {
        self.map.get(value).filter(|item| is_truthy(Some(*item)))
    }
}

// Object entries, with arrays treated as objects keyed by index.
fn entries(data: &Value) -> Option<Vec<(String, &Value)>> {
    match data {
        Value::Object(obj) => Some(obj.iter().map(|(k, v)| (k.clone(), v)).collect()),
        Value::Array(items) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        ),
        _ => None,
    }
}

pub fn obj_to_list(obj: &Value, config: &OptionsConfig) -> Vec<Value> {
    let Some(entries) = entries(obj) else {
        return Vec::new();
    };
    entries
        .into_iter()
        .map(|(key, value)| {
            let mut item = Map::new();
            item.insert(config.label.clone(), value.clone());
            item.insert(config.value.clone(), Value::String(key));
            Value::Object(item)
        })
        .collect()
}

pub fn list_to_obj(list: &Value, config: &OptionsConfig) -> Record {
    let mut obj = Record::new();
    let Value::Array(items) = list else {
        return obj;
    };
    for item in items {
        obj.insert(property_key(field(item, &config.value)), item.clone());
    }
    obj
}

pub fn list_to_map(list: &Value, config: &OptionsConfig) -> Option<OptionMap> {
    let Value::Array(items) = list else {
        return None;
    };
    let mut map = OptionMap::new();
    for item in items {
        // A missing value field keys the item under null.
        let key = field(item, &config.value).cloned().unwrap_or(Value::Null);
        map.set(key, item.clone());
    }
    Some(map)
}

pub fn obj_to_map(obj: &Value) -> Option<OptionMap> {
    let entries = entries(obj)?;
    let mut map = OptionMap::new();
    for (key, value) in entries {
        map.set(Value::String(key), value.clone());
    }
    Some(map)
}

// Builds every form of the options in `data`, which may be an options object
// or a list of items. Anything else yields `None`.
pub fn options_handle(data: &Value, config: &OptionsConfig) -> Option<OptionSet> {
    let (obj, list) = match data {
        Value::Array(items) => (list_to_obj(data, config), items.clone()),
        Value::Object(obj) => (obj.clone(), obj_to_list(data, config)),
        _ => {
            tracing::debug!("Options data is neither an object nor a list");
            return None;
        }
    };
    let map = list_to_map(&Value::Array(list.clone()), config)?;
    Some(OptionSet { obj, list, map })
}

fn field<'a>(item: &'a Value, name: &str) -> Option<&'a Value> {
    item.as_object().and_then(|obj| obj.get(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_obj_to_list() {
        let list = obj_to_list(&json!({ "1": "Open", "2": "Closed" }), &OptionsConfig::default());
        assert_eq!(
            list,
            vec![
                json!({ "label": "Open", "value": "1" }),
                json!({ "label": "Closed", "value": "2" }),
            ]
        );
    }

    #[test]
    fn test_obj_to_list_custom_fields_and_bad_input() {
        let config = OptionsConfig { label: "name".into(), value: "code".into() };
        let list = obj_to_list(&json!({ "a": "Alpha" }), &config);
        assert_eq!(list, vec![json!({ "name": "Alpha", "code": "a" })]);
        assert!(obj_to_list(&json!(null), &config).is_empty());
        assert!(obj_to_list(&json!("text"), &config).is_empty());
    }

    #[test]
    fn test_obj_to_list_treats_arrays_as_indexed_objects() {
        let list = obj_to_list(&json!(["x", "y"]), &OptionsConfig::default());
        assert_eq!(list[1], json!({ "label": "y", "value": "1" }));
    }

    #[test]
    fn test_list_to_obj_keys_by_value_field() {
        let obj = list_to_obj(
            &json!([
                { "label": "Open", "value": 1 },
                { "label": "Closed", "value": "2" },
                { "label": "Other" }
            ]),
            &OptionsConfig::default(),
        );
        assert_eq!(obj["1"], json!({ "label": "Open", "value": 1 }));
        assert_eq!(obj["2"]["label"], json!("Closed"));
        assert_eq!(obj["undefined"]["label"], json!("Other"));
        assert!(list_to_obj(&json!({}), &OptionsConfig::default()).is_empty());
    }

    #[test]
    fn test_list_to_obj_collapses_number_and_string_keys() {
        let obj = list_to_obj(
            &json!([{ "label": "A", "value": 1 }, { "label": "B", "value": "1" }]),
            &OptionsConfig::default(),
        );
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["1"]["label"], json!("B"));
    }

    #[test]
    fn test_list_to_map_keeps_raw_keys() {
        let map = list_to_map(
            &json!([{ "label": "A", "value": 1 }, { "label": "B", "value": "1" }]),
            &OptionsConfig::default(),
        )
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&json!(1)).unwrap()["label"], json!("A"));
        assert_eq!(map.get(&json!("1")).unwrap()["label"], json!("B"));
        assert!(list_to_map(&json!("nope"), &OptionsConfig::default()).is_none());
    }

    #[test]
    fn test_option_map_replaces_in_place() {
        let mut map = OptionMap::new();
        map.set(json!("a"), json!(1));
        map.set(json!("b"), json!(2));
        map.set(json!("a"), json!(3));
        let keys: Vec<_> = map.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![json!("a"), json!("b")]);
        assert_eq!(map.get(&json!("a")), Some(&json!(3)));
    }

    #[test]
    fn test_obj_to_map() {
        let map = obj_to_map(&json!({ "a": 1, "b": 2 })).unwrap();
        assert_eq!(map.get(&json!("b")), Some(&json!(2)));
        assert!(obj_to_map(&json!(3)).is_none());
    }

    #[test]
    fn test_options_handle_from_object() {
        let set = options_handle(&json!({ "1": "Open", "2": "Closed" }), &OptionsConfig::default())
            .unwrap();
        assert_eq!(set.obj["2"], json!("Closed"));
        assert_eq!(set.list.len(), 2);
        assert_eq!(
            set.get_key_to_value(&json!("1")),
            Some(&json!({ "label": "Open", "value": "1" }))
        );
        assert_eq!(set.get_key_to_value(&json!(1)), None);
    }

    #[test]
    fn test_options_handle_from_list() {
        let data = json!([{ "label": "Open", "value": "o" }, { "label": "Closed", "value": "c" }]);
        let set = options_handle(&data, &OptionsConfig::default()).unwrap();
        assert_eq!(Value::Array(set.list.clone()), data);
        assert_eq!(set.obj["c"]["label"], json!("Closed"));
        assert_eq!(set.get_key_to_value(&json!("o")).unwrap()["label"], json!("Open"));
        assert_eq!(set.get_key_to_value(&json!("x")), None);
    }

    #[test]
    fn test_options_handle_rejects_scalars() {
        assert!(options_handle(&json!(null), &OptionsConfig::default()).is_none());
        assert!(options_handle(&json!(5), &OptionsConfig::default()).is_none());
    }
}
