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

//! Time-of-day extraction and arithmetic.
//!
//! Log lines carry a bare `HH:MM:SS.mmm` time after a short prefix
//! (`<token> <thread> HH:MM:SS.mmm ...`). There is no date, so every
//! comparison assumes all lines come from the same day.

use chrono::{NaiveTime, Timelike};
use fancy_regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

// Prefix shape: non-space token, integer, then the time
static LINE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S+\s+\d+\s+(\d{2}:\d{2}:\d{2}\.\d{3})").expect("valid regex literal")
});

const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// A time of day with millisecond precision, as printed in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogTime {
    millis: u32,
}

impl LogTime {
    /// Parse a canonical `HH:MM:SS.mmm` string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        // chrono accepts a variable number of fraction digits; the log never does
        if s.len() != 12 {
            return None;
        }
        let time = NaiveTime::parse_from_str(s, TIME_FORMAT).ok()?;
        let millis = time.num_seconds_from_midnight() * 1000 + time.nanosecond() / 1_000_000;
        Some(Self { millis })
    }

    /// Seconds since midnight, fractional milliseconds included.
    pub fn seconds(self) -> f64 {
        f64::from(self.millis) / 1000.0
    }

    /// Absolute distance to another time, in milliseconds.
    pub const fn abs_diff_millis(self, other: Self) -> u32 {
        self.millis.abs_diff(other.millis)
    }
}

impl fmt::Display for LogTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.millis % 1000;
        let total_secs = self.millis / 1000;
        write!(
            f,
            "{:02}:{:02}:{:02}.{ms:03}",
            total_secs / 3600,
            (total_secs / 60) % 60,
            total_secs % 60
        )
    }
}

impl Serialize for LogTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pull the time of day out of a raw line.
///
/// Returns `None` for lines without the expected prefix, and for prefixes
/// whose digits do not form a valid time (`25:61:00.000`).
pub fn extract_timestamp(line: &str) -> Option<LogTime> {
    let caps = LINE_TIME.captures(line).ok().flatten()?;
    LogTime::parse(caps.get(1)?.as_str())
}

/// Convert a `HH:MM:SS.mmm` string to seconds since midnight.
///
/// Malformed or empty input yields `0.0` so that ordering stays total.
pub fn time_to_seconds(s: &str) -> f64 {
    LogTime::parse(s).map_or(0.0, LogTime::seconds)
}
