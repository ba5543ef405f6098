//! The line-oriented trace format.
//!
//! ```text
//! CELL <row> <col> <name> cont <value> <decimals> <units>
//! CELL <row> <col> <name> disc <index> <code>
//! CELL <row> <col> <name> text <text...>
//! CELL <row> <col> <name> none
//! begin proc <Function>()
//! <in|out> <name> <value> <decimals> <units>      (one per declared input/output)
//! <x> <y>                                         (trajectory points)
//! begin output <name> <row> <col>
//! ```
//!
//! The writer remembers the byte offset of every trajectory block so a
//! reader can seek straight to it.

use std::io::{self, BufRead, Seek, SeekFrom, Write};

use ff_core::Real;
use serde::{Deserialize, Serialize};

use crate::{ResultsError, ResultsResult};

/// Payload of one `CELL` line.
#[derive(Debug, Clone, PartialEq)]
pub enum CellRecord {
    Continuous {
        value: Real,
        decimals: u32,
        units: String,
    },
    Discrete {
        index: usize,
        code: String,
    },
    Text(String),
    NoResult,
}

/// One `<in|out>` line of a procedure block.
#[derive(Debug, Clone, PartialEq)]
pub struct IoLine {
    pub output: bool,
    pub name: String,
    pub value: String,
    pub decimals: u32,
    pub units: String,
}

/// Where one trajectory block lives in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceBlock {
    pub row: usize,
    pub col: usize,
    pub function: String,
    pub variable: String,
    /// Offset of the `begin proc` line.
    pub marker_offset: u64,
    pub io_lines: usize,
    /// Offset of the first point line.
    pub points_offset: u64,
    pub points: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceIndex {
    pub blocks: Vec<TraceBlock>,
}

impl TraceIndex {
    pub fn block(&self, row: usize, col: usize, variable: &str) -> Option<&TraceBlock> {
        self.blocks
            .iter()
            .find(|b| b.row == row && b.col == col && b.variable == variable)
    }
}

/// Placeholder for an empty units token.
const NO_UNITS: &str = "-";

fn units_token(units: &str) -> &str {
    if units.is_empty() { NO_UNITS } else { units }
}

/// Keep free text on one line: backslash, CR and LF become escapes.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

pub struct TraceWriter<W: Write> {
    out: W,
    offset: u64,
    index: TraceIndex,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            offset: 0,
            index: TraceIndex::default(),
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.offset += text.len() as u64 + 1;
        Ok(())
    }

    pub fn cell(&mut self, row: usize, col: usize, name: &str, record: &CellRecord) -> io::Result<()> {
        let body = match record {
            CellRecord::Continuous {
                value,
                decimals,
                units,
            } => format!("cont {value} {decimals} {}", units_token(units)),
            CellRecord::Discrete { index, code } => format!("disc {index} {code}"),
            CellRecord::Text(text) => format!("text {}", escape_text(text)),
            CellRecord::NoResult => "none".to_string(),
        };
        self.line(&format!("CELL {row} {col} {name} {body}"))
    }

    /// Write a procedure block with its trajectory, then the output marker
    /// tying it to the cell.
    pub fn trajectory(
        &mut self,
        row: usize,
        col: usize,
        function: &str,
        io_lines: &[IoLine],
        variable: &str,
        points: &[(Real, Real)],
    ) -> io::Result<()> {
        let marker_offset = self.offset;
        self.line(&format!("begin proc {function}()"))?;
        for io in io_lines {
            let dir = if io.output { "out" } else { "in" };
            self.line(&format!(
                "{dir} {} {} {} {}",
                io.name,
                io.value,
                io.decimals,
                units_token(&io.units)
            ))?;
        }
        let points_offset = self.offset;
        for (x, y) in points {
            self.line(&format!("{x} {y}"))?;
        }
        self.line(&format!("begin output {variable} {row} {col}"))?;
        self.index.blocks.push(TraceBlock {
            row,
            col,
            function: function.to_string(),
            variable: variable.to_string(),
            marker_offset,
            io_lines: io_lines.len(),
            points_offset,
            points: points.len(),
        });
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<(W, TraceIndex)> {
        self.out.flush()?;
        Ok((self.out, self.index))
    }
}

/// Parse a `CELL` line into `(row, col, name, record)`.
pub fn parse_cell(line: &str) -> Option<(usize, usize, String, CellRecord)> {
    let mut parts = line.splitn(6, ' ');
    if parts.next()? != "CELL" {
        return None;
    }
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    let name = parts.next()?.to_string();
    let kind = parts.next()?;
    let rest = parts.next().unwrap_or("");
    let record = match kind {
        "cont" => {
            let mut t = rest.split_whitespace();
            let value = t.next()?.parse().ok()?;
            let decimals = t.next()?.parse().ok()?;
            let units = match t.next()? {
                NO_UNITS => String::new(),
                u => u.to_string(),
            };
            CellRecord::Continuous {
                value,
                decimals,
                units,
            }
        }
        "disc" => {
            let (index, code) = rest.split_once(' ')?;
            CellRecord::Discrete {
                index: index.parse().ok()?,
                code: code.to_string(),
            }
        }
        "text" => CellRecord::Text(unescape_text(rest)),
        "none" => CellRecord::NoResult,
        _ => return None,
    };
    Some((row, col, name, record))
}

/// Random-access reader over a trace stream.
pub struct TraceReader<R: BufRead + Seek> {
    inner: R,
}

impl<R: BufRead + Seek> TraceReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read one line without its terminator; `None` at end of stream.
    fn next_line(&mut self) -> ResultsResult<Option<String>> {
        let mut buf = String::new();
        if self.inner.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        if buf.ends_with('\n') {
            buf.pop();
        }
        Ok(Some(buf))
    }

    /// Scan from the start for the first line containing every token.
    /// Returns the line's byte offset and text.
    pub fn find_marker(&mut self, tokens: &[&str]) -> ResultsResult<Option<(u64, String)>> {
        self.find_marker_from(0, tokens)
    }

    pub fn find_marker_from(
        &mut self,
        offset: u64,
        tokens: &[&str],
    ) -> ResultsResult<Option<(u64, String)>> {
        let mut at = self.inner.seek(SeekFrom::Start(offset))?;
        while let Some(line) = self.next_line()? {
            if tokens.iter().all(|t| line.contains(t)) {
                return Ok(Some((at, line)));
            }
            at = self.inner.stream_position()?;
        }
        Ok(None)
    }

    /// Seek to `offset` and read exactly `n` lines.
    pub fn read_lines_at(&mut self, offset: u64, n: usize) -> ResultsResult<Vec<String>> {
        self.inner.seek(SeekFrom::Start(offset))?;
        let mut lines = Vec::with_capacity(n);
        for _ in 0..n {
            match self.next_line()? {
                Some(line) => lines.push(line),
                None => {
                    return Err(ResultsError::Trace {
                        offset,
                        message: format!("expected {n} lines, found {}", lines.len()),
                    });
                }
            }
        }
        Ok(lines)
    }

    pub fn read_points_at(&mut self, offset: u64, n: usize) -> ResultsResult<Vec<(Real, Real)>> {
        self.read_lines_at(offset, n)?
            .iter()
            .map(|line| {
                let mut t = line.split_whitespace();
                let x = t.next().and_then(|s| s.parse().ok());
                let y = t.next().and_then(|s| s.parse().ok());
                match (x, y) {
                    (Some(x), Some(y)) => Ok((x, y)),
                    _ => Err(ResultsError::Trace {
                        offset,
                        message: format!("not a coordinate pair: '{line}'"),
                    }),
                }
            })
            .collect()
    }

    /// Linear scan for one cell's record.
    pub fn cell_value(&mut self, row: usize, col: usize, name: &str) -> ResultsResult<Option<CellRecord>> {
        self.inner.seek(SeekFrom::Start(0))?;
        while let Some(line) = self.next_line()? {
            if let Some((r, c, n, record)) = parse_cell(&line)
                && r == row
                && c == col
                && n == name
            {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Points of the block announced by `begin output <variable> <row> <col>`,
    /// found by scanning: the block is the most recent `begin proc` before
    /// the marker.
    pub fn scan_trajectory(
        &mut self,
        row: usize,
        col: usize,
        variable: &str,
    ) -> ResultsResult<Option<Vec<(Real, Real)>>> {
        let marker = format!("begin output {variable} {row} {col}");
        self.inner.seek(SeekFrom::Start(0))?;
        let mut points: Vec<(Real, Real)> = Vec::new();
        while let Some(line) = self.next_line()? {
            if line.starts_with("begin proc ") {
                points.clear();
            } else if line == marker {
                return Ok(Some(points));
            } else {
                let mut t = line.split_whitespace();
                if let (Some(Ok(x)), Some(Ok(y)), None) = (
                    t.next().map(str::parse::<Real>),
                    t.next().map(str::parse::<Real>),
                    t.next(),
                ) {
                    points.push((x, y));
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn cell_lines_parse_back() {
        let cases = [
            CellRecord::Continuous {
                value: 12.5,
                decimals: 1,
                units: "ft/min".into(),
            },
            CellRecord::Discrete {
                index: 1,
                code: "Yes".into(),
            },
            CellRecord::Text("two words".into()),
            CellRecord::NoResult,
        ];
        let mut w = TraceWriter::new(Vec::new());
        for record in &cases {
            w.cell(0, 1, "vX", record).unwrap();
        }
        let (bytes, _) = w.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let parsed: Vec<CellRecord> = text.lines().map(|l| parse_cell(l).unwrap().3).collect();
        assert_eq!(parsed, cases);
        assert!(text.starts_with("CELL 0 1 vX cont 12.5 1 ft/min\n"));
    }

    #[test]
    fn multi_line_text_stays_on_one_line() {
        let note = CellRecord::Text("crew A\nline 2\r\nC:\\runs".into());
        let mut w = TraceWriter::new(Vec::new());
        w.cell(2, 0, "vNote", &note).unwrap();
        w.cell(2, 1, "vNote", &CellRecord::NoResult).unwrap();
        let (bytes, _) = w.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "CELL 2 0 vNote text crew A\\nline 2\\r\\nC:\\\\runs");
        assert_eq!(parse_cell(lines[0]).unwrap().3, note);

        let mut reader = TraceReader::new(Cursor::new(text.into_bytes()));
        assert_eq!(reader.cell_value(2, 0, "vNote").unwrap(), Some(note));
        assert_eq!(reader.cell_value(2, 1, "vNote").unwrap(), Some(CellRecord::NoResult));
    }

    #[test]
    fn empty_units_use_placeholder() {
        let line = "CELL 0 0 vX cont 1 0 -";
        let (_, _, _, record) = parse_cell(line).unwrap();
        assert_eq!(
            record,
            CellRecord::Continuous {
                value: 1.0,
                decimals: 0,
                units: String::new()
            }
        );
        assert!(parse_cell("begin proc f()").is_none());
    }

    #[test]
    fn missing_lines_are_an_error() {
        let mut r = TraceReader::new(Cursor::new(b"a\nb\n".to_vec()));
        assert_eq!(r.read_lines_at(2, 1).unwrap(), vec!["b".to_string()]);
        assert!(matches!(r.read_lines_at(0, 3), Err(ResultsError::Trace { .. })));
    }
}
