use serde_json::Value;
use std::io;

/// Write the result as a two-column `field,value` CSV to stdout.
///
/// Messages are joined with ` | ` so each evaluation stays one row per field.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let fields = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match fields {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
            }
        }
        other => {
            let _ = wtr.write_record([&format_csv_value(other)]);
        }
    }

    let _ = wtr.flush();
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(format_csv_value)
            .collect::<Vec<_>>()
            .join(" | "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
