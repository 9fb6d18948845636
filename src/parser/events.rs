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

use super::line::{timed_lines, LineRecord};
use super::timestamp::LogTime;
use fancy_regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

// ASCII word boundaries: CJK text right next to the keyword still counts
static ERROR_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?<![A-Za-z0-9_])error(?![A-Za-z0-9_])").expect("valid regex literal")
});

static WARNING_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?<![A-Za-z0-9_])warn(?:ing)?(?![A-Za-z0-9_])")
        .expect("valid regex literal")
});

static UI_LANGUAGE_OK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)UI\s+Language\s+OK").expect("valid regex literal"));

/// Error and warning tallies for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogStatistics {
    pub error_count: usize,
    pub warn_count: usize,
}

/// Whole-word, case-insensitive `error`.
pub fn is_error_line(line: &str) -> bool {
    ERROR_WORD.is_match(line).unwrap_or(false)
}

/// Whole-word, case-insensitive `warn` or `warning`.
pub fn is_warning_line(line: &str) -> bool {
    WARNING_WORD.is_match(line).unwrap_or(false)
}

/// Count error and warning lines. A line may count towards both.
pub fn count_events(records: &[LineRecord]) -> LogStatistics {
    profiling::scope!("count_events");
    records
        .iter()
        .fold(LogStatistics::default(), |mut stats, record| {
            if is_error_line(&record.text) {
                stats.error_count += 1;
            }
            if is_warning_line(&record.text) {
                stats.warn_count += 1;
            }
            stats
        })
}

/// Timestamps of application start markers ("UI Language OK").
pub fn find_start_markers(records: &[LineRecord]) -> Vec<LogTime> {
    profiling::scope!("find_start_markers");
    timed_lines(records)
        .filter(|line| UI_LANGUAGE_OK.is_match(line.text).unwrap_or(false))
        .map(|line| line.timestamp)
        .collect()
}
