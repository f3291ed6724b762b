use anyhow::{anyhow, Result as AnyResult};
use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use shared::models::Record;

use crate::config::CsvSettings;
use crate::error::{Result, ShapeError};

// Cells are kept as strings; empty cells become `null`. Without a header
// row the fields are named by column index.
pub fn records_from_str(text: &str, settings: &CsvSettings) -> Result<Vec<Record>> {
    let delimiter = delimiter_byte(settings.delimiter)?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(settings.has_headers)
        .from_reader(text.as_bytes());

    let headers = if settings.has_headers {
        Some(rdr.headers()?.clone())
    } else {
        None
    };

    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        // Line numbers are 1-based and skip the header.
        let line = idx + if settings.has_headers { 2 } else { 1 };
        let row = result.map_err(|e| {
            ShapeError::CsvDataFormatError(format!("Error reading CSV record at line {}: {}", line, e))
        })?;
        records.push(to_record(&row, headers.as_ref(), line)?);
    }
    tracing::debug!(records = records.len(), "Parsed records from CSV text");
    Ok(records)
}

fn to_record(row: &StringRecord, headers: Option<&StringRecord>, line: usize) -> AnyResult<Record> {
    let mut record = Record::new();
    for (col, cell) in row.iter().enumerate() {
        let name = match headers {
            Some(headers) => headers
                .get(col)
                .ok_or_else(|| anyhow!("Column {} at line {} has no header", col + 1, line))?
                .to_string(),
            None => col.to_string(),
        };
        let value = if cell.is_empty() {
            Value::Null
        } else {
            Value::String(cell.to_string())
        };
        record.insert(name, value);
    }
    Ok(record)
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(ShapeError::ConfigError(format!(
            "CSV delimiter must be a single ASCII character, got '{}'",
            delimiter
        )))
    }
}
