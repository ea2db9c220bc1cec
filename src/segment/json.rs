use crate::corrector::{Corrector, Tally};
use crate::segment::merge_tallies;
use serde_json::Value;

/// JSON is corrected structurally: object keys are never touched, string
/// values are corrected, and the tree is re-serialized with 2-space
/// indentation. Input that fails to parse degrades to plain-text
/// correction.
pub(crate) fn process(text: &str, corrector: &Corrector) -> (String, Tally) {
    match serde_json::from_str::<Value>(text) {
        Ok(mut value) => {
            let mut tally = Tally::new();
            correct_value(&mut value, corrector, &mut tally);
            let serialized =
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| text.to_string());
            (serialized, tally)
        }
        Err(_) => corrector.correct(text),
    }
}

fn correct_value(value: &mut Value, corrector: &Corrector, tally: &mut Tally) {
    match value {
        Value::Object(map) => {
            for (_, v) in map.iter_mut() {
                correct_entry(v, corrector, tally);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                correct_entry(item, corrector, tally);
            }
        }
        _ => {}
    }
}

fn correct_entry(value: &mut Value, corrector: &Corrector, tally: &mut Tally) {
    if let Value::String(s) = value {
        let (corrected, changes) = corrector.correct(s);
        *s = corrected;
        merge_tallies(tally, changes);
    } else {
        correct_value(value, corrector, tally);
    }
}
