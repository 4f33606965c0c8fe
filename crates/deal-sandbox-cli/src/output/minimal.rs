use serde_json::Value;

use super::{result_of, scalar_to_string};

/// Print just the headline number of a deal, payment or grade.
///
/// Looks for well-known fields in priority order, descending one level into
/// nested sections, then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = result_of(value);

    let priority_keys = [
        "display",
        "cash_on_cash_return",
        "monthly_payment",
        "rating",
    ];

    let sections: Vec<&Value> = match result_obj {
        Value::Object(map) => std::iter::once(result_obj)
            .chain(map.values().filter(|v| v.is_object()))
            .collect(),
        _ => Vec::new(),
    };

    for key in &priority_keys {
        for section in &sections {
            if let Some(val) = section.get(*key) {
                if !val.is_null() {
                    println!("{}", scalar_to_string(val));
                    return;
                }
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_to_string(val));
            return;
        }
    }

    println!("{}", scalar_to_string(result_obj));
}
