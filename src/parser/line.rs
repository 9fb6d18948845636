// LogLens - GPL-3.0-or-later
// This file is part of LogLens.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// LogLens is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LogLens is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LogLens.  If not, see <https://www.gnu.org/licenses/>.

use super::timestamp::{extract_timestamp, LogTime};
use serde::Serialize;

/// One raw line of the file with its memoized timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    pub text: String,
    pub timestamp: Option<LogTime>,
    /// 0-based position in the raw split, used for proximity windows
    pub original_index: usize,
}

impl LineRecord {
    pub fn new(text: String, original_index: usize) -> Self {
        let timestamp = extract_timestamp(&text);
        Self {
            text,
            timestamp,
            original_index,
        }
    }
}

/// A line that is known to carry a timestamp. Correlators only ever see these.
#[derive(Debug, Clone, Copy)]
pub struct TimedLine<'a> {
    pub text: &'a str,
    pub timestamp: LogTime,
    pub original_index: usize,
}

impl<'a> TimedLine<'a> {
    pub fn from_record(record: &'a LineRecord) -> Option<Self> {
        record.timestamp.map(|timestamp| Self {
            text: &record.text,
            timestamp,
            original_index: record.original_index,
        })
    }
}

/// Split decoded file content into line records.
///
/// Lines break at `\n` only. A single trailing `\r` is dropped from each
/// line so that CRLF files behave like LF files.
pub fn split_lines(content: &str) -> Vec<LineRecord> {
    profiling::scope!("split_lines");
    content
        .split('\n')
        .enumerate()
        .map(|(idx, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            LineRecord::new(line.to_string(), idx)
        })
        .collect()
}

/// Iterate the timestamped subset of `records`, in file order.
pub fn timed_lines(records: &[LineRecord]) -> impl Iterator<Item = TimedLine<'_>> {
    records.iter().filter_map(TimedLine::from_record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_original_indices() {
        let records = split_lines("A 1 10:00:00.000 one\nno time here\nA 1 10:00:01.000 three");
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].original_index, 1);
        assert!(records[1].timestamp.is_none());
        assert_eq!(
            records[2].timestamp.map(|t| t.to_string()).as_deref(),
            Some("10:00:01.000")
        );
    }

    #[test]
    fn test_split_strips_carriage_return() {
        let records = split_lines("A 1 10:00:00.000 DPI: 96\r\nnext\r\n");
        assert_eq!(records[0].text, "A 1 10:00:00.000 DPI: 96");
        assert_eq!(records[1].text, "next");
        // Trailing newline yields an empty last line, like a plain split
        assert_eq!(records[2].text, "");
    }

    #[test]
    fn test_timed_lines_skips_untimed() {
        let records = split_lines("junk\nA 7 00:00:01.000 x\nmore junk");
        let timed: Vec<_> = timed_lines(&records).collect();
        assert_eq!(timed.len(), 1);
        assert_eq!(timed[0].original_index, 1);
    }
}
