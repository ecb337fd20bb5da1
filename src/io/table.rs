//! Shared plumbing for the tab-separated tables read through `csv`.

use crate::io::error::Error;
use csv::{ErrorKind, Reader, ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::io::Read;

/// Tab-separated reader tolerating ragged rows, with every field trimmed.
///
/// Quotes carry no meaning in these tables and `#` starts a comment line only where the caller
/// asks for it.
pub(crate) fn tsv_reader<R: Read>(reader: R, has_headers: bool, comments: bool) -> Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .trim(Trim::All)
        .quoting(false)
        .comment(comments.then_some(b'#'))
        .from_reader(reader)
}

/// Reads the header line and rewrites it to bare upper-case column names (`#uniprot_ac` becomes
/// `UNIPROT_AC`), so rows deserialize by name. Returns `false` for a stream without any header.
pub(crate) fn normalize_headers<R: Read>(
    format: &'static str,
    reader: &mut Reader<R>,
) -> Result<bool, Error> {
    let headers = reader.headers().map_err(|e| table_error(format, e))?;
    if headers.iter().all(str::is_empty) {
        return Ok(false);
    }
    let normalized: StringRecord = headers
        .iter()
        .map(|name| name.trim_start_matches('#').trim().to_ascii_uppercase())
        .collect();
    reader.set_headers(normalized);
    Ok(true)
}

/// Fails with [`Error::MissingColumn`] naming the first absent column.
pub(crate) fn require_columns<R: Read>(
    format: &'static str,
    reader: &mut Reader<R>,
    columns: &[&str],
) -> Result<(), Error> {
    let headers = reader.headers().map_err(|e| table_error(format, e))?;
    match columns
        .iter()
        .find(|column| !headers.iter().any(|name| name == **column))
    {
        Some(column) => Err(Error::missing_column(format, None, *column)),
        None => Ok(()),
    }
}

/// Deserializes every row that holds any text, matching fields to header names.
pub(crate) fn read_rows<R: Read, T: DeserializeOwned>(
    format: &'static str,
    reader: &mut Reader<R>,
) -> Result<Vec<T>, Error> {
    let headers = reader.headers().map_err(|e| table_error(format, e))?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| table_error(format, e))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = record
            .deserialize(Some(&headers))
            .map_err(|e| Error::parse(format, None, line_of(&record), e.to_string()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Line of a record, 1-based, or 0 when the reader did not track it.
pub(crate) fn line_of(record: &StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

pub(crate) fn table_error(format: &'static str, err: csv::Error) -> Error {
    let line_number = err.position().map_or(0, |p| p.line() as usize);
    let details = err.to_string();
    match err.into_kind() {
        ErrorKind::Io(source) => Error::from_io(source, None),
        _ => Error::parse(format, None, line_number, details),
    }
}
