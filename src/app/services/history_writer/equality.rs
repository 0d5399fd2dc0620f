//! Change detection between persisted snapshot documents

use serde_json::Value;

use crate::constants::RUN_TIMESTAMP_FIELD;

/// Structural equality ignoring the run timestamp.
///
/// Object keys compare as sets, arrays compare in order.
pub fn same_content(previous: &Value, current: &Value) -> bool {
    match (previous.as_object(), current.as_object()) {
        (Some(prev), Some(curr)) => {
            let relevant = |key: &&String| key.as_str() != RUN_TIMESTAMP_FIELD;
            prev.keys().filter(relevant).count() == curr.keys().filter(relevant).count()
                && prev
                    .iter()
                    .filter(|(key, _)| relevant(key))
                    .all(|(key, value)| curr.get(key) == Some(value))
        }
        _ => previous == current,
    }
}
