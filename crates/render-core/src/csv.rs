//! CSV output.
//!
//! Every table with at least one column and one row contributes a header
//! line followed by its data lines. All fields are double-quoted, nulls are
//! empty and the text is encoded as UTF-16LE with a byte-order mark.

use reportdef_types::DataTable;

pub const MIME_TYPE: &str = "text/csv";

#[cfg(windows)]
pub const LINE_TERMINATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_TERMINATOR: &str = "\n";

const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Renders the tables as CSV text.
pub fn to_csv_string<'a>(tables: impl IntoIterator<Item = &'a DataTable>) -> String {
    let mut out = String::new();
    for table in tables {
        if table.columns.is_empty() || table.rows.is_empty() {
            continue;
        }
        write_line(&mut out, table.columns.iter().map(|c| c.name.clone()));
        for row in &table.rows {
            write_line(&mut out, row.iter().map(|cell| cell.to_string()));
        }
    }
    out
}

/// Renders the tables as UTF-16LE encoded CSV bytes.
pub fn to_csv_bytes<'a>(tables: impl IntoIterator<Item = &'a DataTable>) -> Vec<u8> {
    encode_utf16le(&to_csv_string(tables))
}

fn write_line(out: &mut String, fields: impl Iterator<Item = String>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    }
    out.push_str(LINE_TERMINATOR);
}

fn encode_utf16le(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&UTF16LE_BOM);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportdef_types::{CellValue, ColumnType};

    fn decode(bytes: &[u8]) -> String {
        assert_eq!(&bytes[..2], &UTF16LE_BOM);
        let units: Vec<u16> =
            bytes[2..].chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect();
        String::from_utf16(&units).unwrap()
    }

    fn sales() -> DataTable {
        let mut table = DataTable::new("Sales")
            .with_column("Region", ColumnType::Text)
            .with_column("Total", ColumnType::Integer);
        table.push_row(vec!["North".into(), 10.into()]);
        table.push_row(vec!["South".into(), CellValue::Null]);
        table.push_row(vec!["Say \"hi\"".into(), 3.into()]);
        table
    }

    #[test]
    fn writes_header_and_quoted_rows() {
        let text = to_csv_string([&sales()]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#""Region","Total""#,
                r#""North","10""#,
                r#""South","""#,
                r#""Say ""hi""","3""#,
            ]
        );
        assert!(text.ends_with(LINE_TERMINATOR));
    }

    #[test]
    fn skips_tables_without_rows_or_columns() {
        let empty_rows = DataTable::new("Empty").with_column("A", ColumnType::Text);
        let no_columns = DataTable::new("Nothing");
        assert_eq!(to_csv_string([&empty_rows, &no_columns]), "");
    }

    #[test]
    fn concatenates_multiple_tables() {
        let mut other = DataTable::new("Other").with_column("X", ColumnType::Integer);
        other.push_row(vec![1.into()]);
        let text = to_csv_string([&sales(), &other]);
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn bytes_are_utf16le_with_bom() {
        let bytes = to_csv_bytes([&sales()]);
        assert_eq!(decode(&bytes), to_csv_string([&sales()]));
        assert_eq!(to_csv_bytes(std::iter::empty()), UTF16LE_BOM.to_vec());
    }
}
