//! Line-oriented text form of table cells.
//!
//! Grammar, one cell per line, no header:
//!
//! ```text
//! record := text "," col "," row
//! text   := quoted | raw
//! quoted := '"' ( any char except '"' | '""' )* '"'
//! col    := digits
//! row    := digits
//! ```
//!
//! `col` and `row` are taken from the right, so a translated `raw` text may
//! itself contain commas. Blank lines are ignored.

use crate::error::{Error, Result};
use crate::model::{CellKey, CellSet, CellText};

/// Serialize cells as `text,col,row` lines in collection order.
pub fn serialize_cells<'a, C, I>(cells: I) -> String
where
    C: CellKey + 'a,
    I: IntoIterator<Item = &'a C>,
{
    let mut out = String::new();
    for cell in cells {
        out.push_str(&quote(cell.text()));
        out.push(',');
        out.push_str(&cell.col().to_string());
        out.push(',');
        out.push_str(&cell.row().to_string());
        out.push('\n');
    }
    out
}

/// Parse `text,col,row` lines back into a cell collection.
pub fn parse_cells(input: &str) -> Result<CellSet<CellText>> {
    let mut cells = Vec::new();
    for (idx, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        cells.push(parse_record(line, idx + 1)?);
    }

    if cells.is_empty() {
        return Err(Error::TableFormat {
            line: 0,
            reason: "no cell records".to_string(),
        });
    }
    CellSet::new(cells)
}

fn parse_record(line: &str, line_no: usize) -> Result<CellText> {
    let malformed = |reason: String| Error::TableFormat {
        line: line_no,
        reason,
    };

    let mut fields = line.rsplitn(3, ',');
    let (Some(row), Some(col), Some(text)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(malformed("expected `text,col,row`".to_string()));
    };

    let row: usize = row
        .trim()
        .parse()
        .map_err(|_| malformed(format!("row {:?} is not a number", row.trim())))?;
    let col: usize = col
        .trim()
        .parse()
        .map_err(|_| malformed(format!("col {:?} is not a number", col.trim())))?;
    let text = unquote(text.trim()).map_err(malformed)?;

    Ok(CellText::new(text, row, col))
}

/// Quote a cell text when it contains a delimiter or quote. Line breaks
/// become spaces so one cell stays on one line.
fn quote(text: &str) -> String {
    let flat = text.replace(['\r', '\n'], " ");
    if flat.contains([',', '"']) || flat.trim() != flat {
        format!("\"{}\"", flat.replace('"', "\"\""))
    } else {
        flat
    }
}

fn unquote(text: &str) -> std::result::Result<String, String> {
    let Some(inner) = text.strip_prefix('"') else {
        return Ok(text.to_string());
    };
    let Some(inner) = inner.strip_suffix('"') else {
        return Err("unterminated quoted text".to_string());
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.next_if_eq(&'"').is_none() {
                return Err("stray quote inside quoted text".to_string());
            }
        }
        out.push(c);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(items: &[(&str, usize, usize)]) -> CellSet<CellText> {
        CellSet::new(
            items
                .iter()
                .map(|(t, r, c)| CellText::new(*t, *r, *c))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_serialize_format() {
        let set = cells(&[("A", 0, 0), ("B", 0, 1), ("x, y", 1, 0)]);
        assert_eq!(serialize_cells(&set), "A,0,0\nB,1,0\n\"x, y\",0,1\n");
    }

    #[test]
    fn test_parse_roundtrip() {
        let set = cells(&[("A", 0, 0), ("B", 0, 1), ("C", 1, 0), ("D", 1, 1)]);
        let parsed = parse_cells(&serialize_cells(&set)).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn test_quotes_escaped() {
        let set = cells(&[("say \"hi\"", 0, 0)]);
        let text = serialize_cells(&set);
        assert_eq!(text, "\"say \"\"hi\"\"\",0,0\n");
        assert_eq!(parse_cells(&text).unwrap(), set);
    }

    #[test]
    fn test_unquoted_commas_in_translated_text() {
        let parsed = parse_cells("你好，世界, again,2,3\n").unwrap();
        let cell = parsed.get(3, 2).unwrap();
        assert_eq!(cell.text, "你好，世界, again");
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let parsed = parse_cells("\r\nA,0,0\r\n\r\nB,1,0\r\n").unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_missing_field() {
        let err = parse_cells("A,0,0\nB,1\n").unwrap_err();
        assert!(matches!(err, Error::TableFormat { line: 2, .. }));
    }

    #[test]
    fn test_non_numeric_row() {
        let err = parse_cells("A,0,first\n").unwrap_err();
        assert!(matches!(err, Error::TableFormat { line: 1, .. }));
    }

    #[test]
    fn test_negative_col() {
        assert!(parse_cells("A,-1,0\n").is_err());
    }

    #[test]
    fn test_bad_quoting() {
        assert!(parse_cells("\"open,0,0\n").is_err());
        assert!(parse_cells("\"a\"b\",0,0\n").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            parse_cells("  \n\n"),
            Err(Error::TableFormat { line: 0, .. })
        ));
    }

    #[test]
    fn test_duplicate_keys() {
        assert!(matches!(
            parse_cells("A,0,0\nB,0,0\n"),
            Err(Error::DuplicateCell { row: 0, col: 0 })
        ));
    }

    #[test]
    fn test_prose_is_rejected() {
        assert!(parse_cells("Here is your table:\nA,0,0").is_err());
    }
}
