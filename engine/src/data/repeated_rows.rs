// Run-length annotation of consecutive duplicate rows.
//
// Every compare key `k` gets a `<k>_total` field on each row: the first row of
// a run of equal values carries the run length, the other rows carry 0. Runs
// never cross a group boundary. Tables use the totals as row spans.
use serde_json::Value;
use shared::models::Record;

// Field names whose values must all match for two adjacent rows to share a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupKeys(Vec<String>);

impl GroupKeys {
    pub fn none() -> Self {
        GroupKeys(Vec::new())
    }

    fn is_boundary(&self, current: &Record, previous: &Record) -> bool {
        self.0
            .iter()
            .any(|key| current.get(key) != previous.get(key))
    }
}

impl From<&str> for GroupKeys {
    fn from(key: &str) -> Self {
        GroupKeys(vec![key.to_string()])
    }
}

impl From<String> for GroupKeys {
    fn from(key: String) -> Self {
        GroupKeys(vec![key])
    }
}

impl From<Vec<String>> for GroupKeys {
    fn from(keys: Vec<String>) -> Self {
        GroupKeys(keys)
    }
}

impl From<&[&str]> for GroupKeys {
    fn from(keys: &[&str]) -> Self {
        GroupKeys(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for GroupKeys {
    fn from(keys: [&str; N]) -> Self {
        GroupKeys(keys.iter().map(|k| k.to_string()).collect())
    }
}

pub fn total_field(key: &str) -> String {
    format!("{}_total", key)
}

#[derive(Debug)]
struct RunState<'a> {
    value: Option<&'a Value>,
    count: u64,
}

impl<'a> RunState<'a> {
    fn start(value: Option<&'a Value>) -> Self {
        RunState { value, count: 1 }
    }

    // Count recorded for `value`, or 1 if the state tracks a different value.
    fn count_for(&self, value: Option<&Value>) -> u64 {
        if self.value == value {
            self.count
        } else {
            1
        }
    }
}

/// Annotates each row with `<key>_total` for every compare key.
///
/// Sequences shorter than two rows, or an empty `compare_keys`, come back
/// unchanged. Rows are copied before annotation, so `rows` is never touched.
/// Values compare strictly: `1` and `"1"` are different, and a missing field
/// differs from `null`.
pub fn annotate_runs<K, G>(rows: &[Record], compare_keys: &[K], group_keys: G) -> Vec<Record>
where
    K: AsRef<str>,
    G: Into<GroupKeys>,
{
    if rows.len() < 2 || compare_keys.is_empty() {
        tracing::debug!(
            rows = rows.len(),
            compare_keys = compare_keys.len(),
            "Nothing to annotate, returning rows unchanged"
        );
        return rows.to_vec();
    }
    let group_keys = group_keys.into();
    let last = rows.len() - 1;

    // (index, field, total) assignments, applied to the copies once the scan is done.
    let mut totals: Vec<(usize, String, u64)> = Vec::with_capacity(rows.len() * compare_keys.len());
    let mut states: Vec<RunState> = compare_keys
        .iter()
        .map(|key| RunState::start(rows[last].get(key.as_ref())))
        .collect();

    for i in (1..=last).rev() {
        let boundary = group_keys.is_boundary(&rows[i], &rows[i - 1]);
        for (key, state) in compare_keys.iter().zip(states.iter_mut()) {
            let key = key.as_ref();
            let current = rows[i].get(key);
            let previous = rows[i - 1].get(key);

            if boundary || current != previous {
                totals.push((i, total_field(key), state.count_for(current)));
                *state = RunState::start(previous);
            } else {
                state.count += 1;
                totals.push((i, total_field(key), 0));
            }

            if i == 1 {
                totals.push((0, total_field(key), state.count_for(previous)));
            }
        }
    }

    let mut annotated = rows.to_vec();
    for (index, field, total) in totals {
        annotated[index].insert(field, Value::from(total));
    }
    tracing::trace!(rows = annotated.len(), "Annotated repeated rows");
    annotated
}
