use crate::io::error::Error;
use needletail::errors::{ParseError, ParseErrorKind};
use needletail::parse_fastx_reader;
use std::io::Read;

const FORMAT: &str = "FASTA";

/// Reads every record of a FASTA stream as `(identifier, sequence)` pairs.
///
/// The identifier is the first word of the header. UniProt-style headers
/// (`sp|P04637|P53_HUMAN ...`) are reduced to their accession. Sequence lines are
/// concatenated with whitespace removed and letters upper-cased; a trailing `*` stop
/// marker is dropped. An empty stream holds no records.
pub fn read<R: Read + Send>(reader: R) -> Result<Vec<(String, String)>, Error> {
    let mut reader = match parse_fastx_reader(reader) {
        Ok(reader) => reader,
        Err(err) if matches!(err.kind, ParseErrorKind::EmptyFile) => return Ok(Vec::new()),
        Err(err) => return Err(parse_error(err)),
    };

    let mut records = Vec::new();
    while let Some(record) = reader.next() {
        let record = record.map_err(parse_error)?;
        let header = String::from_utf8_lossy(record.id());
        let id = header_id(&header).ok_or_else(|| {
            Error::parse(
                FORMAT,
                None,
                record.start_line_number() as usize,
                "Empty FASTA header",
            )
        })?;
        records.push((id, clean_sequence(&record.seq())));
    }
    Ok(records)
}

fn parse_error(err: ParseError) -> Error {
    let details = match err.kind {
        ParseErrorKind::UnknownFormat | ParseErrorKind::InvalidStart => {
            "Sequence data before the first header".to_string()
        }
        _ => err.to_string(),
    };
    Error::parse(FORMAT, None, (err.position.line as usize).max(1), details)
}

fn clean_sequence(raw: &[u8]) -> String {
    let mut seq: String = raw
        .iter()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| b.to_ascii_uppercase() as char)
        .collect();
    if seq.ends_with('*') {
        seq.pop();
    }
    seq
}

fn header_id(header: &str) -> Option<String> {
    let word = header.split_whitespace().next()?;
    let mut fields = word.split('|');
    match (fields.next(), fields.next()) {
        (Some("sp" | "tr"), Some(accession)) if !accession.is_empty() => {
            Some(accession.to_string())
        }
        _ => Some(word.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_joins_multiline_records() {
        let fasta = ">ENSP0001 some protein\nMKV\nal\n\n>ENSP0002\nGG*\n";
        let records = read(Cursor::new(fasta)).unwrap();
        assert_eq!(
            records,
            vec![
                ("ENSP0001".to_string(), "MKVAL".to_string()),
                ("ENSP0002".to_string(), "GG".to_string()),
            ]
        );
    }

    #[test]
    fn read_reduces_uniprot_headers_to_accessions() {
        let fasta = ">sp|P04637|P53_HUMAN Cellular tumor antigen p53\nMEEP\n";
        let records = read(Cursor::new(fasta)).unwrap();
        assert_eq!(records[0].0, "P04637");
    }

    #[test]
    fn read_accepts_crlf_line_endings() {
        let records = read(Cursor::new(">ENSP1\r\nMK\r\nva\r\n")).unwrap();
        assert_eq!(records, vec![("ENSP1".to_string(), "MKVA".to_string())]);
    }

    #[test]
    fn read_rejects_sequence_before_header() {
        let err = read(Cursor::new("MKV\n>x\nA\n")).unwrap_err();
        assert!(matches!(err, Error::Parse { format: "FASTA", .. }));
    }

    #[test]
    fn read_rejects_empty_header() {
        assert!(read(Cursor::new(">\nMKV\n")).is_err());
    }

    #[test]
    fn empty_stream_has_no_records() {
        assert!(read(Cursor::new("")).unwrap().is_empty());
    }
}
