//! Report-level codec
//!
//! Maps whole payloads to and from [`Report`] using the fixed five-column
//! schema. Columns are matched by header name, so the collaborator is free to
//! reorder them.

use crate::codec::field::{encode_record, parse_records, DELIMITER, RECORD_SEPARATOR};
use crate::{DecodeError, DecodeResult};
use std::fmt;

/// Join character the crawl service uses inside the list-valued columns
pub const LIST_SEPARATOR: char = ';';

/// One column of the report schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaField {
    PageUrl,
    H1,
    FirstParagraph,
    OutgoingLinkUrls,
    ImageUrls,
}

impl SchemaField {
    /// All fields, in canonical schema order
    pub const ALL: [SchemaField; 5] = [
        Self::PageUrl,
        Self::H1,
        Self::FirstParagraph,
        Self::OutgoingLinkUrls,
        Self::ImageUrls,
    ];

    /// Column name as it appears in the header record
    pub fn name(&self) -> &'static str {
        match self {
            Self::PageUrl => "page_url",
            Self::H1 => "h1",
            Self::FirstParagraph => "first_paragraph",
            Self::OutgoingLinkUrls => "outgoing_link_urls",
            Self::ImageUrls => "image_urls",
        }
    }

    /// Looks up a field by exact header name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for SchemaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single decoded crawl-result row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportRow {
    pub page_url: String,
    pub h1: String,
    pub first_paragraph: String,
    /// Outgoing links, pre-joined by the crawl service
    pub outgoing_link_urls: String,
    /// Image URLs, pre-joined by the crawl service
    pub image_urls: String,
}

impl ReportRow {
    /// Returns the value of one schema field
    pub fn get(&self, field: SchemaField) -> &str {
        match field {
            SchemaField::PageUrl => &self.page_url,
            SchemaField::H1 => &self.h1,
            SchemaField::FirstParagraph => &self.first_paragraph,
            SchemaField::OutgoingLinkUrls => &self.outgoing_link_urls,
            SchemaField::ImageUrls => &self.image_urls,
        }
    }

    /// Sets the value of one schema field
    pub fn set(&mut self, field: SchemaField, value: String) {
        let slot = match field {
            SchemaField::PageUrl => &mut self.page_url,
            SchemaField::H1 => &mut self.h1,
            SchemaField::FirstParagraph => &mut self.first_paragraph,
            SchemaField::OutgoingLinkUrls => &mut self.outgoing_link_urls,
            SchemaField::ImageUrls => &mut self.image_urls,
        };
        *slot = value;
    }

    /// Field values in canonical schema order
    pub fn values(&self) -> [&str; 5] {
        SchemaField::ALL.map(|f| self.get(f))
    }

    /// Outgoing links split on the service's list separator
    pub fn outgoing_links(&self) -> Vec<&str> {
        split_list(&self.outgoing_link_urls)
    }

    /// Image URLs split on the service's list separator
    pub fn images(&self) -> Vec<&str> {
        split_list(&self.image_urls)
    }
}

fn split_list(joined: &str) -> Vec<&str> {
    joined
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Ordered collection of report rows, in page discovery order
///
/// Duplicate page URLs are legal and kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<ReportRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&ReportRow> {
        self.rows.get(index)
    }

    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReportRow> {
        self.rows.iter()
    }
}

impl FromIterator<ReportRow> for Report {
    fn from_iter<I: IntoIterator<Item = ReportRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a ReportRow;
    type IntoIter = std::slice::Iter<'a, ReportRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Column-to-field mapping derived from a header record
///
/// Unknown header names map to nothing. When a name repeats, the first
/// occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: Vec<Option<SchemaField>>,
}

impl ColumnMapping {
    /// Builds a mapping from the header record
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::UnrecognizedSchema` if no header name matches a
    /// schema field.
    pub fn from_header(header: &[String]) -> DecodeResult<Self> {
        let mut columns = Vec::with_capacity(header.len());
        let mut seen = Vec::with_capacity(SchemaField::ALL.len());

        for name in header {
            let field = SchemaField::from_name(name).filter(|f| !seen.contains(f));
            if let Some(f) = field {
                seen.push(f);
            }
            columns.push(field);
        }

        if seen.is_empty() {
            return Err(DecodeError::UnrecognizedSchema {
                header: header.to_vec(),
            });
        }

        Ok(Self { columns })
    }

    /// Number of columns in the header
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Schema field for a column position, if the column is recognized
    pub fn field_at(&self, column: usize) -> Option<SchemaField> {
        self.columns.get(column).copied().flatten()
    }

    /// Builds a row from one data record
    ///
    /// Missing trailing values stay empty and values past the header width are
    /// dropped.
    pub fn build_row(&self, record: Vec<String>) -> ReportRow {
        let mut row = ReportRow::default();
        for (column, value) in record.into_iter().take(self.width()).enumerate() {
            if let Some(field) = self.field_at(column) {
                row.set(field, value);
            }
        }
        row
    }
}

/// Decodes a delimited-text payload into a report
///
/// The first record is the header. An empty or header-only payload decodes to
/// an empty report.
///
/// # Examples
///
/// ```
/// use crawl_report::codec::decode;
///
/// let payload = "h1,page_url\nHello,https://a.com\n";
/// let report = decode(payload).unwrap();
/// assert_eq!(report.rows()[0].page_url, "https://a.com");
/// assert_eq!(report.rows()[0].h1, "Hello");
/// ```
pub fn decode(payload: &str) -> DecodeResult<Report> {
    let payload = payload.strip_prefix('\u{feff}').unwrap_or(payload);
    let mut records = parse_records(payload)?.into_iter();

    let Some(header) = records.next() else {
        return Ok(Report::new());
    };
    let mapping = ColumnMapping::from_header(&header)?;

    Ok(records.map(|record| mapping.build_row(record)).collect())
}

/// Encodes a report as a delimited-text payload
///
/// The header lists the schema names in canonical order; every data field is
/// quoted. Records are joined by line breaks with no trailing separator.
pub fn encode(report: &Report) -> String {
    let header = SchemaField::ALL
        .iter()
        .map(SchemaField::name)
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string());

    let mut out = header;
    for row in report {
        out.push(RECORD_SEPARATOR);
        out.push_str(&encode_record(&row.values()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "page_url,h1,first_paragraph,outgoing_link_urls,image_urls";

    fn row(values: [&str; 5]) -> ReportRow {
        ReportRow {
            page_url: values[0].to_string(),
            h1: values[1].to_string(),
            first_paragraph: values[2].to_string(),
            outgoing_link_urls: values[3].to_string(),
            image_urls: values[4].to_string(),
        }
    }

    #[test]
    fn test_schema_names_roundtrip() {
        for field in SchemaField::ALL {
            assert_eq!(SchemaField::from_name(field.name()), Some(field));
        }
        assert_eq!(SchemaField::from_name("Page_URL"), None);
    }

    #[test]
    fn test_decode_embedded_comma() {
        let payload = "page_url,h1,first_paragraph,outgoing_link_urls,image_urls\nhttps://a.com,Hello,\"Para, with comma\",https://b.com,https://a.com/img.png";
        let report = decode(payload).unwrap();

        assert_eq!(report.len(), 1);
        let r = &report.rows()[0];
        assert_eq!(r.page_url, "https://a.com");
        assert_eq!(r.h1, "Hello");
        assert_eq!(r.first_paragraph, "Para, with comma");
        assert_eq!(r.outgoing_link_urls, "https://b.com");
        assert_eq!(r.image_urls, "https://a.com/img.png");

        let encoded = encode(&report);
        assert!(encoded.contains("\"Para, with comma\""));
        assert_eq!(decode(&encoded).unwrap(), report);
    }

    #[test]
    fn test_decode_empty_payload() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode(HEADER).unwrap().is_empty());
        assert!(decode(&format!("{}\n", HEADER)).unwrap().is_empty());
    }

    #[test]
    fn test_decode_permuted_header() {
        let payload = "image_urls,first_paragraph,page_url,outgoing_link_urls,h1\nimg,para,url,links,title\n";
        let report = decode(payload).unwrap();
        assert_eq!(report.rows()[0], row(["url", "title", "para", "links", "img"]));
    }

    #[test]
    fn test_decode_short_record_fills_empty() {
        let payload = format!("{}\nu,h,p,l", HEADER);
        let report = decode(&payload).unwrap();
        assert_eq!(report.rows()[0], row(["u", "h", "p", "l", ""]));
    }

    #[test]
    fn test_decode_long_record_truncates() {
        let payload = format!("{}\nu,h,p,l,i,extra", HEADER);
        let report = decode(&payload).unwrap();
        assert_eq!(report.rows()[0], row(["u", "h", "p", "l", "i"]));
    }

    #[test]
    fn test_decode_partial_header() {
        let payload = "page_url,unknown,h1\nu,ignored,h\n";
        let report = decode(payload).unwrap();
        assert_eq!(report.rows()[0], row(["u", "h", "", "", ""]));
    }

    #[test]
    fn test_decode_duplicate_header_first_wins() {
        let payload = "page_url,page_url\nfirst,second\n";
        let report = decode(payload).unwrap();
        assert_eq!(report.rows()[0].page_url, "first");
    }

    #[test]
    fn test_decode_unrecognized_schema() {
        let err = decode("name,age\nbob,3\n").unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnrecognizedSchema {
                header: vec!["name".to_string(), "age".to_string()]
            }
        );
    }

    #[test]
    fn test_decode_malformed_field() {
        let payload = format!("{}\nu,\"broken", HEADER);
        assert!(matches!(
            decode(&payload),
            Err(DecodeError::MalformedField { record: 2, .. })
        ));
    }

    #[test]
    fn test_decode_strips_bom() {
        let payload = format!("\u{feff}{}\nu,h,p,l,i", HEADER);
        assert_eq!(decode(&payload).unwrap().rows()[0].page_url, "u");
    }

    #[test]
    fn test_decode_keeps_duplicates_and_order() {
        let payload = format!("{}\nb,1,,,\na,2,,,\nb,3,,,", HEADER);
        let report = decode(&payload).unwrap();
        let urls: Vec<_> = report.iter().map(|r| r.page_url.as_str()).collect();
        assert_eq!(urls, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_encode_empty_report_is_header_only() {
        assert_eq!(encode(&Report::new()), HEADER);
    }

    #[test]
    fn test_encode_quotes_every_field() {
        let report = Report::from_rows(vec![row(["u", "h", "p", "l", "i"])]);
        assert_eq!(
            encode(&report),
            format!("{}\n\"u\",\"h\",\"p\",\"l\",\"i\"", HEADER)
        );
    }

    #[test]
    fn test_roundtrip_special_characters() {
        let report = Report::from_rows(vec![
            row([
                "https://a.com/?q=1,2",
                "Say \"hello\"",
                "first line\nsecond line",
                "https://b.com;https://c.com",
                "",
            ]),
            row(["", "", "", "", "\r\n"]),
            row(["https://a.com", "dup", "", "", ""]),
            row(["https://a.com", "dup", "", "", ""]),
        ]);
        assert_eq!(decode(&encode(&report)).unwrap(), report);
    }

    #[test]
    fn test_reencode_canonicalizes_quoting() {
        let payload = "h1,page_url\nTitle,https://a.com";
        let reencoded = encode(&decode(payload).unwrap());
        assert_eq!(
            reencoded,
            format!("{}\n\"https://a.com\",\"Title\",\"\",\"\",\"\"", HEADER)
        );
    }

    #[test]
    fn test_split_lists() {
        let r = row(["u", "", "", "https://b.com; https://c.com;", ""]);
        assert_eq!(r.outgoing_links(), vec!["https://b.com", "https://c.com"]);
        assert!(r.images().is_empty());
    }
}
