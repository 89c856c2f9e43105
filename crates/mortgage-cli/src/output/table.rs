use serde_json::Value;
use tabled::{builder::Builder, Table};

use mortgage_eligibility_core::eligibility::rules::RiskStatus;

/// Print the evaluation as a field/value table followed by the rule
/// messages, any warnings and the methodology.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{}", value);
        return;
    };
    let Some(Value::Object(result)) = envelope.get("result") else {
        print_fields(envelope);
        return;
    };

    let figures: serde_json::Map<String, Value> = result
        .iter()
        .filter(|(key, _)| key.as_str() != "messages")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    print_fields(&figures);

    if let Some(status) = result
        .get("status")
        .and_then(|s| serde_json::from_value::<RiskStatus>(s.clone()).ok())
    {
        println!("\n{}", status.summary());
    }

    print_list("Messages", result.get("messages"));
    print_list("Warnings", envelope.get("warnings"));

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_list(title: &str, items: Option<&Value>) {
    if let Some(Value::Array(items)) = items {
        if !items.is_empty() {
            println!("\n{}:", title);
            for item in items {
                println!("  - {}", format_value(item));
            }
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
