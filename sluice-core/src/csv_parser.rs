use csv::{ReaderBuilder, StringRecord};

use crate::output::RowIssue;
use crate::row::CsvRow;

/// Columns per record: address, coins, hours.
pub const CSV_COLUMNS: usize = 3;

/// Split headerless CSV input into rows. Structural problems (bad quoting,
/// wrong column count) become row issues so the caller can keep going.
pub fn read_csv_rows(input: &[u8]) -> Vec<Result<CsvRow, RowIssue>> {
    let normalized = strip_utf8_bom(input);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(normalized);

    reader
        .records()
        .enumerate()
        .map(|(row, result)| match result {
            Ok(record) => record_to_row(row, &record),
            Err(err) => Err(RowIssue {
                row,
                field: "row".to_string(),
                value: String::new(),
                message: format!("csv parse error: {err}"),
            }),
        })
        .collect()
}

fn record_to_row(row: usize, record: &StringRecord) -> Result<CsvRow, RowIssue> {
    if record.len() != CSV_COLUMNS {
        return Err(RowIssue {
            row,
            field: "row".to_string(),
            value: record.iter().collect::<Vec<_>>().join(","),
            message: format!(
                "expected {CSV_COLUMNS} columns (address,coins,hours), found {}",
                record.len()
            ),
        });
    }

    Ok(CsvRow {
        address: record[0].to_string(),
        coins: record[1].to_string(),
        hours: record[2].to_string(),
    })
}

fn strip_utf8_bom(input: &[u8]) -> &[u8] {
    if input.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &input[3..]
    } else {
        input
    }
}

#[cfg(test)]
mod tests {
    use super::read_csv_rows;

    const ADDR: &str = "2GgFvqoyk9RjwVzj8tqfcXVXB4orBwoc9qv";

    #[test]
    fn reads_rows_without_header() {
        let csv = format!("{ADDR},10.2,1\n{ADDR},5,2\n");
        let rows = read_csv_rows(csv.as_bytes());
        assert_eq!(rows.len(), 2);
        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.address, ADDR);
        assert_eq!(first.coins, "10.2");
        assert_eq!(first.hours, "1");
    }

    #[test]
    fn keeps_surrounding_whitespace_for_row_parser() {
        let csv = format!(" {ADDR} ,1,1\n");
        let rows = read_csv_rows(csv.as_bytes());
        assert_eq!(rows[0].as_ref().unwrap().address, format!(" {ADDR} "));
    }

    #[test]
    fn wrong_column_count_is_a_row_issue() {
        let csv = format!("{ADDR},1,1\n{ADDR},1\n{ADDR},1,1\n");
        let rows = read_csv_rows(csv.as_bytes());
        assert_eq!(rows.len(), 3);
        let issue = rows[1].as_ref().unwrap_err();
        assert_eq!(issue.row, 1);
        assert_eq!(issue.field, "row");
        assert!(rows[2].is_ok());
    }

    #[test]
    fn parses_csv_with_bom_and_crlf() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(format!("{ADDR},2,3\r\n").as_bytes());
        let rows = read_csv_rows(&bytes);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_ref().unwrap().address, ADDR);
        assert_eq!(rows[0].as_ref().unwrap().hours, "3");
    }

    #[test]
    fn parses_quoted_fields() {
        let csv = format!("\"{ADDR}\",\"1.5\",\"4\"\n");
        let rows = read_csv_rows(csv.as_bytes());
        assert_eq!(rows[0].as_ref().unwrap().coins, "1.5");
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert!(read_csv_rows(b"").is_empty());
    }
}
