//! Field-level delimited-text codec
//!
//! Encoding always quotes. Decoding is a small state machine that honors quoted
//! fields, so delimiters, record separators and doubled quotes inside quotes are
//! read back as literal content.

use crate::{DecodeError, DecodeResult};

/// Field delimiter
pub const DELIMITER: char = ',';

/// Record separator emitted by the encoder (`\r\n` is also accepted on decode)
pub const RECORD_SEPARATOR: char = '\n';

const QUOTE: char = '"';

/// Scanner position relative to quoting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside quotes
    Unquoted,
    /// Inside an open quoted field
    Quoted,
    /// Just saw a quote while inside a quoted field: either an escape or the close
    QuotedQuote,
}

/// Encodes a single value as a quoted field
///
/// Every literal `"` is doubled and the result is always wrapped in quotes,
/// even when the value has no special characters.
///
/// # Examples
///
/// ```
/// use crawl_report::codec::encode_field;
///
/// assert_eq!(encode_field("plain"), "\"plain\"");
/// assert_eq!(encode_field("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
pub fn encode_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(QUOTE);
    for c in value.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
    out
}

/// Encodes an ordered list of values as one record (no trailing separator)
pub fn encode_record<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| encode_field(v.as_ref()))
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

/// Decodes a single raw field back to its value
///
/// This is the exact inverse of [`encode_field`]. Unquoted input is accepted
/// as-is; an unquoted delimiter means the input holds more than one field.
pub fn decode_field(raw: &str) -> DecodeResult<String> {
    let mut records = parse_records(raw)?.into_iter();
    let Some(mut fields) = records.next() else {
        return Ok(String::new());
    };

    if records.next().is_some() {
        return Err(DecodeError::MalformedField {
            record: 2,
            column: 1,
            reason: "input contains more than one record".to_string(),
        });
    }

    if fields.len() > 1 {
        return Err(DecodeError::MalformedField {
            record: 1,
            column: 2,
            reason: "input contains more than one field".to_string(),
        });
    }

    Ok(fields.remove(0))
}

/// Splits a payload into records of decoded fields
///
/// Records are separated by `\n` (or `\r\n`) outside of quotes. Blank lines,
/// including a trailing one, produce no record.
///
/// # Errors
///
/// Returns `DecodeError::MalformedField` for an unterminated quoted field or
/// for text following a closing quote that is not a delimiter or line break.
pub fn parse_records(payload: &str) -> DecodeResult<Vec<Vec<String>>> {
    let mut scanner = Scanner::default();
    let mut chars = payload.chars().peekable();

    while let Some(c) = chars.next() {
        // CRLF collapses to a plain record separator outside quotes
        if c == '\r' && scanner.state != ScanState::Quoted && chars.peek() == Some(&'\n') {
            continue;
        }
        scanner.feed(c)?;
    }

    scanner.finish()
}

#[derive(Debug)]
struct Scanner {
    state: ScanState,
    records: Vec<Vec<String>>,
    fields: Vec<String>,
    field: String,
    /// Whether the current field opened with a quote
    field_quoted: bool,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            state: ScanState::Unquoted,
            records: Vec::new(),
            fields: Vec::new(),
            field: String::new(),
            field_quoted: false,
        }
    }
}

impl Scanner {
    fn feed(&mut self, c: char) -> DecodeResult<()> {
        match self.state {
            ScanState::Unquoted => match c {
                DELIMITER => self.end_field(),
                RECORD_SEPARATOR => self.end_record(),
                QUOTE if self.field.is_empty() && !self.field_quoted => {
                    self.field_quoted = true;
                    self.state = ScanState::Quoted;
                }
                // a stray quote inside an unquoted field is kept literally
                _ => self.field.push(c),
            },
            ScanState::Quoted => match c {
                QUOTE => self.state = ScanState::QuotedQuote,
                _ => self.field.push(c),
            },
            ScanState::QuotedQuote => match c {
                QUOTE => {
                    self.field.push(QUOTE);
                    self.state = ScanState::Quoted;
                }
                DELIMITER => {
                    self.state = ScanState::Unquoted;
                    self.end_field();
                }
                RECORD_SEPARATOR => {
                    self.state = ScanState::Unquoted;
                    self.end_record();
                }
                other => {
                    return Err(self.malformed(format!(
                        "unexpected character {:?} after closing quote",
                        other
                    )))
                }
            },
        }
        Ok(())
    }

    fn end_field(&mut self) {
        self.fields.push(std::mem::take(&mut self.field));
        self.field_quoted = false;
    }

    fn end_record(&mut self) {
        if self.is_blank_record() {
            return;
        }
        self.end_field();
        self.records.push(std::mem::take(&mut self.fields));
    }

    fn is_blank_record(&self) -> bool {
        self.fields.is_empty() && self.field.is_empty() && !self.field_quoted
    }

    fn malformed(&self, reason: String) -> DecodeError {
        DecodeError::MalformedField {
            record: self.records.len() + 1,
            column: self.fields.len() + 1,
            reason,
        }
    }

    fn finish(mut self) -> DecodeResult<Vec<Vec<String>>> {
        if self.state == ScanState::Quoted {
            return Err(self.malformed("unterminated quoted field".to_string()));
        }
        self.end_record();
        Ok(self.records)
    }
}
