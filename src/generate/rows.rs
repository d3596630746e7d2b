//! Row extraction: turn raw spreadsheet or CSV bytes into an ordered
//! sequence of normalized rows.

use std::io::Cursor;

use calamine::{Data, DataType, Reader, Xlsx};
use chrono::{NaiveDateTime, NaiveTime};

use super::models::DataRow;
use super::GenerateError;

/// Parse the uploaded data file into the row sequence. Keys and values are
/// trimmed; absent cells become empty strings. Fails when the content is
/// malformed or when no data rows remain after the header.
pub fn extract_rows(bytes: &[u8], extension: &str) -> Result<Vec<DataRow>, GenerateError> {
    let rows = match extension {
        "csv" => parse_csv(bytes)?,
        _ => parse_xlsx(bytes)?,
    };
    if rows.is_empty() {
        return Err(GenerateError::EmptyData);
    }
    Ok(rows)
}

fn parse_xlsx(bytes: &[u8]) -> Result<Vec<DataRow>, GenerateError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes)).map_err(spreadsheet_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| GenerateError::Spreadsheet {
            detail: "Spreadsheet has no sheets.".to_string(),
        })?
        .map_err(spreadsheet_err)?;

    let mut row_iter = range.rows();
    let headers: Vec<String> = match row_iter.next() {
        Some(cells) => cells.iter().map(cell_to_string).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for cells in row_iter {
        let mut row = DataRow::new();
        for (i, header) in headers.iter().enumerate() {
            let key = header.trim();
            if key.is_empty() {
                continue;
            }
            let value = cells.get(i).map(cell_to_string).unwrap_or_default();
            row.insert(key.to_string(), value.trim().to_string());
        }
        if row.values().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<DataRow>, GenerateError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers = reader.headers().map_err(spreadsheet_err)?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(spreadsheet_err)?;
        let mut row = DataRow::new();
        for (i, header) in headers.iter().enumerate() {
            let key = header.trim();
            if key.is_empty() {
                continue;
            }
            let value = record.get(i).unwrap_or("");
            row.insert(key.to_string(), value.trim().to_string());
        }
        if row.values().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

fn spreadsheet_err(error: impl ToString) -> GenerateError {
    GenerateError::Spreadsheet {
        detail: error.to_string(),
    }
}

/// Stringify a cell the way a formatted export would: integral floats lose
/// the trailing `.0`, date-typed cells print as dates.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(format_datetime)
            .unwrap_or_else(|| cell.to_string()),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.date().format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
