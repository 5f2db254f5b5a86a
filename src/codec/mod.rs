//! Delimited-text codec for crawl reports
//!
//! - `field`: quoting rules for a single value and the quote-aware record scanner
//! - `report`: the five-column report schema, decoding by header name, encoding
//!   in canonical order
//!
//! `decode(&encode(report)) == report` holds for every report, including values
//! that contain delimiters, quotes or line breaks.

mod field;
mod report;

pub use field::{
    decode_field, encode_field, encode_record, parse_records, DELIMITER, RECORD_SEPARATOR,
};
pub use report::{
    decode, encode, ColumnMapping, Report, ReportRow, SchemaField, LIST_SEPARATOR,
};
