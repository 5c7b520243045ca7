// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Loading replay sequences from uploaded CSV data.

use simtel_error::{EngineError, Result};
use std::io;

/// Reads every numeric field of every record, in order.
///
/// The input has no header row. Records may have different lengths, fields
/// are trimmed and empty fields are skipped, so both a single column and a
/// single comma-separated line are accepted.
///
/// # Errors
/// Returns `InvalidReplaySequence` naming the record of the first field that
/// is not a finite number, or if no values were found.
pub fn parse_replay_csv<R: io::Read>(reader: R) -> Result<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = index + 1;
        let record = record.map_err(|e| EngineError::invalid_replay(format!("record {line}: {e}")))?;

        for field in record.iter().filter(|field| !field.is_empty()) {
            let value: f64 = field.parse().map_err(|_| {
                EngineError::invalid_replay(format!("record {line}: '{field}' is not a number"))
            })?;
            if !value.is_finite() {
                return Err(EngineError::invalid_replay(format!(
                    "record {line}: '{field}' is not a finite number"
                )));
            }
            values.push(value);
        }
    }

    if values.is_empty() {
        return Err(EngineError::invalid_replay("no values found"));
    }
    Ok(values)
}

/// [`parse_replay_csv`] over an in-memory string.
///
/// # Errors
/// See [`parse_replay_csv`].
pub fn parse_replay_str(csv: &str) -> Result<Vec<f64>> {
    parse_replay_csv(csv.as_bytes())
}
