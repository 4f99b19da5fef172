use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::report::Row;

/// Write a pipe-delimited, fixed-width report to `path`.
pub fn render(rows: &[Row], path: &Path, words: bool) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("could not create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_report(&mut out, rows, words)?;
    out.flush()?;
    Ok(())
}

pub fn write_report<W: Write>(out: &mut W, rows: &[Row], words: bool) -> std::io::Result<()> {
    let mut headers = vec!["Package", "Version", "License", "Match"];
    if words {
        headers.push("Words");
    }
    let cells: Vec<Vec<&str>> = rows
        .iter()
        .map(|r| {
            let mut cells = vec![
                r.package.as_str(),
                r.version.as_str(),
                r.license.as_str(),
                r.matched.as_str(),
            ];
            if words {
                cells.push(r.words.as_str());
            }
            cells
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|c| width(c[i]))
                .chain(std::iter::once(width(name)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    write!(out, "|")?;
    for (name, w) in headers.iter().zip(&widths) {
        write_cell(out, name, *w)?;
    }
    writeln!(out)?;

    write!(out, "|")?;
    for w in &widths {
        write!(out, " {} |", "-".repeat(*w))?;
    }
    writeln!(out)?;

    for row in &cells {
        write!(out, "|")?;
        for (data, w) in row.iter().zip(&widths) {
            write_cell(out, data, *w)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn write_cell<W: Write>(out: &mut W, data: &str, w: usize) -> std::io::Result<()> {
    let padding = w.saturating_sub(width(data));
    write!(out, " {}{} |", data, " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::matcher::Confidence;
    use crate::report::Status;

    fn rows() -> Vec<Row> {
        vec![
            Row {
                package: "example.com/pkg".to_string(),
                version: "abc123".to_string(),
                license: "MIT License".to_string(),
                matched: "98%".to_string(),
                words: "+acme".to_string(),
                score: 0.98,
                status: Status::Matched(Confidence::Probable),
            },
            Row {
                package: "x.org/y".to_string(),
                version: "?".to_string(),
                license: "?".to_string(),
                matched: " 0%".to_string(),
                words: String::new(),
                score: 0.0,
                status: Status::Missing,
            },
        ]
    }

    #[test]
    fn test_write_report() {
        let mut out = Vec::new();
        write_report(&mut out, &rows(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = "\
| Package         | Version | License     | Match |
| --------------- | ------- | ----------- | ----- |
| example.com/pkg | abc123  | MIT License | 98%   |
| x.org/y         | ?       | ?           |  0%   |
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_write_report_with_words() {
        let mut out = Vec::new();
        write_report(&mut out, &rows(), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        let first = text.lines().next().unwrap();
        assert!(first.ends_with("| Words |"));
        assert!(text.lines().nth(2).unwrap().ends_with("| +acme |"));
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("licenses.txt");
        render(&rows(), &path, false).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
    }
}
