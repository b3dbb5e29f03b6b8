//! CSV and tab-separated "Excel" renderings of the submission collection.

use chrono::NaiveDate;
use jarmark_database::models::SubmissionRecord;
use jarmark_database::schema::Field;
use strum::EnumString;

pub const UTF8_BOM: &str = "\u{feff}";

const CSV_DELIMITER: &str = ";";
const SUBMISSIONS_SHEET: &str = "WORKSHEET: Zgłoszenia";
const DESCRIPTIONS_SHEET: &str = "WORKSHEET: Opis pól";
const DESCRIPTIONS_HEADER: &str = "Nazwa pola\tOpis";
const FILENAME_PREFIX: &str = "jarmark_baltycki_zgloszenia";

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Semicolon separated, one quoted value per field, a plain header of labels.
/// Line breaks inside a value are kept within its quotes.
#[must_use]
pub fn generate_csv(records: &[SubmissionRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let header = Field::all().map(Field::label).collect::<Vec<_>>();
    let mut lines = vec![header.join(CSV_DELIMITER)];
    lines.extend(records.iter().map(|record| {
        Field::all()
            .map(|field| quote(&record.value(field).display()))
            .collect::<Vec<_>>()
            .join(CSV_DELIMITER)
    }));
    lines.join("\n")
}

/// Tabs and line breaks inside a value would shift or split the row.
fn flatten_cell(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\t', '\n', '\r'], " ")
}

/// Two sheets in one text blob: the records, then a label/description table.
#[must_use]
pub fn generate_tab_sheets(records: &[SubmissionRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(SUBMISSIONS_SHEET);
    out.push('\n');
    out.push_str(&Field::all().map(Field::label).collect::<Vec<_>>().join("\t"));
    out.push('\n');
    for record in records {
        let row = Field::all()
            .map(|field| flatten_cell(&record.value(field).display()))
            .collect::<Vec<_>>();
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(DESCRIPTIONS_SHEET);
    out.push('\n');
    out.push_str(DESCRIPTIONS_HEADER);
    out.push('\n');
    for field in Field::all() {
        out.push_str(field.label());
        out.push('\t');
        out.push_str(field.description());
        out.push('\n');
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[strum(serialize = "excel", serialize = "xls")]
    Excel,
}

impl ExportFormat {
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv;charset=utf-8",
            Self::Excel => "application/vnd.ms-excel;charset=utf-8",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xls",
        }
    }
}

/// A download ready to be sent as an attachment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

#[must_use]
pub fn export(format: ExportFormat, records: &[SubmissionRecord], date: NaiveDate) -> ExportFile {
    let text = match format {
        ExportFormat::Csv => generate_csv(records),
        ExportFormat::Excel => generate_tab_sheets(records),
    };
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
    bytes.extend_from_slice(UTF8_BOM.as_bytes());
    bytes.extend_from_slice(text.as_bytes());
    ExportFile {
        bytes,
        content_type: format.content_type(),
        filename: format!(
            "{FILENAME_PREFIX}_{}.{}",
            date.format("%Y-%m-%d"),
            format.extension()
        ),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use jarmark_database::models::{
        BoothType, Category, NewSubmission, PowerConnection, SubmissionRecord, YesNo,
    };

    use super::*;

    fn record(products: &str) -> SubmissionRecord {
        let submission = NewSubmission {
            company_name: "Bursztynowa Pracownia".to_owned(),
            first_name: "Anna".to_owned(),
            last_name: "Kowalska".to_owned(),
            street: "ul. Portowa 5".to_owned(),
            postal_code: "80-231".to_owned(),
            city: "Gdańsk".to_owned(),
            nip: "5840000000".to_owned(),
            email: "anna@bursztyn.pl".to_owned(),
            phone: "+48 600 100 200".to_owned(),
            participated_last_year: YesNo::Tak,
            category: Category::Artisans,
            booth_type: BoothType::OrganizerTent,
            booth_dimensions: String::new(),
            power_connection: PowerConnection::UpTo2Kw,
            products: products.to_owned(),
            notes: String::new(),
            needs_parking: YesNo::Nie,
            location1: "A1".to_owned(),
            location2: "A2".to_owned(),
            location3: "B4".to_owned(),
            accept_terms: true,
            accept_privacy: false,
        };
        let at = NaiveDate::from_ymd_opt(2025, 6, 7)
            .unwrap()
            .and_hms_opt(9, 5, 3)
            .unwrap();
        SubmissionRecord::stamp(submission, at)
    }

    /// Splits one CSV line of quoted values back into the raw strings.
    fn parse_quoted_line(line: &str) -> Vec<String> {
        let mut values = Vec::new();
        let mut chars = line.chars().peekable();
        while chars.peek().is_some() {
            assert_eq!(chars.next(), Some('"'));
            let mut value = String::new();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        value.push('"');
                    }
                    Some('"') => break,
                    Some(c) => value.push(c),
                    None => panic!("unterminated value in {line}"),
                }
            }
            values.push(value);
            if chars.peek() == Some(&';') {
                chars.next();
            }
        }
        values
    }

    #[test]
    fn empty_collection_exports_nothing() {
        assert_eq!(generate_csv(&[]), "");
        assert_eq!(generate_tab_sheets(&[]), "");
    }

    #[test]
    fn one_record_is_header_plus_one_row() {
        let csv = generate_csv(&[record("miody")]);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split(';').count(), 23);
        assert_eq!(parse_quoted_line(lines[1]).len(), 23);
        assert!(lines[0].starts_with("Data i godzina zgłoszenia;Pełna nazwa firmy;"));
        assert!(lines[1].starts_with("\"2025-06-07 09:05:03\";\"Bursztynowa Pracownia\";"));
        assert!(lines[1].ends_with("\"TAK\";\"NIE\""));
    }

    #[test]
    fn quotes_round_trip() {
        let products = "\"wood crafts\", 5cm";
        let csv = generate_csv(&[record(products)]);
        let row = csv.lines().nth(1).unwrap();
        let values = parse_quoted_line(row);
        let position = Field::all().position(|field| field == Field::Products).unwrap();
        assert_eq!(values[position], products);
        assert_eq!(values[1], "Bursztynowa Pracownia");
        assert_eq!(values[position + 1], "");
    }

    #[test]
    fn line_breaks_stay_inside_quoted_values() {
        let products = "miody\nwosk";
        let csv = generate_csv(&[record(products)]);
        assert_eq!(csv.lines().count(), 3);
        let (header, row) = csv.split_once('\n').unwrap();
        let values = parse_quoted_line(row);
        assert_eq!(values.len(), header.split(';').count());
        let position = Field::all().position(|field| field == Field::Products).unwrap();
        assert_eq!(values[position], products);
    }

    #[test]
    fn tab_sheets_keep_rows_intact() {
        let text = generate_tab_sheets(&[record("miody\tpyłek\nwosk")]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "WORKSHEET: Zgłoszenia");
        assert_eq!(lines[1].split('\t').count(), 23);
        assert_eq!(lines[2].split('\t').count(), 23);
        assert!(lines[2].contains("miody pyłek wosk"));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "WORKSHEET: Opis pól");
        assert_eq!(lines[5], "Nazwa pola\tOpis");
        assert_eq!(lines.len(), 6 + 23);
        assert_eq!(lines[6], "Data i godzina zgłoszenia\tData i godzina przesłania zgłoszenia");
    }

    #[test]
    fn export_adds_bom_and_names_the_file() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let csv = export(ExportFormat::Csv, &[record("miody")], date);
        assert!(csv.bytes.starts_with(UTF8_BOM.as_bytes()));
        assert_eq!(csv.content_type, "text/csv;charset=utf-8");
        assert_eq!(csv.filename, "jarmark_baltycki_zgloszenia_2025-07-01.csv");

        let sheet = export(ExportFormat::Excel, &[], date);
        assert_eq!(sheet.bytes, UTF8_BOM.as_bytes());
        assert_eq!(sheet.content_type, "application/vnd.ms-excel;charset=utf-8");
        assert_eq!(sheet.filename, "jarmark_baltycki_zgloszenia_2025-07-01.xls");
    }

    #[test]
    fn formats_by_path_segment() {
        assert_eq!("csv".parse(), Ok(ExportFormat::Csv));
        assert_eq!("excel".parse(), Ok(ExportFormat::Excel));
        assert_eq!("xls".parse(), Ok(ExportFormat::Excel));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn serializers_are_deterministic() {
        let records = [record("a"), record("b")];
        assert_eq!(generate_csv(&records), generate_csv(&records));
        assert_eq!(generate_tab_sheets(&records), generate_tab_sheets(&records));
    }
}
