use colored::Colorize;
use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, result_of};

/// Render the result as a two-column Field / Value table, nested sections
/// flattened to dotted field names, followed by warnings and methodology.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    if result.is_object() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in flatten(result) {
            builder.push_record([key, val]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{result}");
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}
