use serde_json::Value;
use std::io;

use super::{flatten, result_of};

/// Write the result as `field,value` CSV rows to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Err(e) = write_rows(&mut wtr, result_of(value)) {
        tracing::error!(error = %e, "CSV output failed");
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in flatten(result) {
        wtr.write_record([key, val])?;
    }
    wtr.flush()?;
    Ok(())
}
