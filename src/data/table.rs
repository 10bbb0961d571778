use serde::{Deserialize, Serialize};

use super::model::RawTable;

// ---------------------------------------------------------------------------
// Delimiter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
}

impl Delimiter {
    fn byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Parse comma-separated text into a [`RawTable`].
pub fn parse(text: &str) -> RawTable {
    parse_with(text, Delimiter::Comma)
}

/// Parse delimited text into a [`RawTable`].
///
/// * a leading byte-order mark is dropped
/// * `\r\n`, `\r` and `\n` all end a record
/// * quoted fields may hold the delimiter and line breaks, `""` is a quote
/// * lines without visible characters are skipped
/// * the first remaining line is the header
///
/// Never fails: an unterminated quote runs to the end of input and reading
/// stops quietly on anything the csv reader rejects.
pub fn parse_with(text: &str, delimiter: Delimiter) -> RawTable {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.byte())
        .from_reader(text.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record = csv::ByteRecord::new();
    for line_no in 0.. {
        let start = reader.position().byte() as usize;
        match reader.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                log::warn!("CSV reading stopped at record {line_no}: {e}");
                break;
            }
        }
        let end = reader.position().byte() as usize;
        if is_blank(text, start, end) {
            continue;
        }
        records.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }

    let mut records = records.into_iter();
    let header = records.next().unwrap_or_default();
    RawTable {
        header,
        rows: records.collect(),
    }
}

/// The raw text of a record has no visible characters. Judged on the source
/// rather than the cells, so `""` or a bare delimiter still counts as a row.
fn is_blank(text: &str, start: usize, end: usize) -> bool {
    text.get(start..end).is_some_and(|raw| raw.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn rectangular_file_has_one_row_per_line() {
        let table = parse("Feature,A1,B1\nGeneX,1,2\nGeneY,3,4\nGeneZ,5,6\n");
        assert_eq!(table.header, row(&["Feature", "A1", "B1"]));
        assert_eq!(table.len(), 3);
        assert!(table.rows.iter().all(|r| r.len() == table.header.len()));
        assert_eq!(table.rows[2], row(&["GeneZ", "5", "6"]));
    }

    #[test]
    fn quoted_fields_keep_delimiters_and_line_breaks() {
        let text = "name,note\n\"a,b\",\"line one\nline two\"\n\"say \"\"hi\"\"\",x\n";
        let table = parse(text);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0], row(&["a,b", "line one\nline two"]));
        assert_eq!(table.rows[1], row(&["say \"hi\"", "x"]));
    }

    #[test]
    fn bom_and_mixed_line_endings() {
        let text = "\u{feff}Feature,A1\r\nGeneX,1\rGeneY,2\nGeneZ,3";
        let table = parse(text);
        assert_eq!(table.header, row(&["Feature", "A1"]));
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1], row(&["GeneY", "2"]));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = "\n\nFeature,A1\n\n   \nGeneX,1\n\r\n";
        let table = parse(text);
        assert_eq!(table.header, row(&["Feature", "A1"]));
        assert_eq!(table.rows, vec![row(&["GeneX", "1"])]);
    }

    #[test]
    fn whitespace_only_lines_are_skipped_in_tab_mode() {
        let table = parse_with("a\tb\n\t\n \t \n1\t2\n", Delimiter::Tab);
        assert_eq!(table.header, row(&["a", "b"]));
        assert_eq!(table.rows, vec![row(&["1", "2"])]);
    }

    #[test]
    fn quoted_empty_field_and_bare_delimiter_are_rows() {
        let table = parse("a,b\n\"\"\n,\n1,2\n");
        assert_eq!(
            table.rows,
            vec![row(&[""]), row(&["", ""]), row(&["1", "2"])]
        );
    }

    #[test]
    fn empty_cells_are_kept() {
        let table = parse("Feature,A1,B1,C1\nGeneX,1.0,,4.0\n");
        assert_eq!(table.rows[0], row(&["GeneX", "1.0", "", "4.0"]));
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_input() {
        let table = parse("a,b\n1,\"open\n2,3\n");
        assert_eq!(table.header, row(&["a", "b"]));
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][0], "1");
        assert!(table.rows[0][1].starts_with("open"));
    }

    #[test]
    fn ragged_rows_pass_through() {
        let table = parse("a,b,c\n1\n1,2,3,4\n");
        assert_eq!(table.rows[0], row(&["1"]));
        assert_eq!(table.rows[1].len(), 4);
    }

    #[test]
    fn tab_delimiter() {
        let table = parse_with("Feature\tA1\nGene,X\t7\n", Delimiter::Tab);
        assert_eq!(table.header, row(&["Feature", "A1"]));
        assert_eq!(table.rows[0], row(&["Gene,X", "7"]));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert_eq!(parse(""), RawTable::default());
        assert_eq!(parse("\u{feff}\n\n"), RawTable::default());
    }

    #[test]
    fn cells_are_not_trimmed() {
        let table = parse("a, b\n1 , 2\n");
        assert_eq!(table.header, row(&["a", " b"]));
        assert_eq!(table.rows[0], row(&["1 ", " 2"]));
    }
}
