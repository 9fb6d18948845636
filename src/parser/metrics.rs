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

//! Memory, GDI and CPU metric streams.
//!
//! Each parser is a single forward pass. A cheap substring check gates the
//! full regex; a line whose marker is present but whose numbers do not parse
//! produces nothing.

use super::line::{timed_lines, LineRecord, TimedLine};
use super::{captures, named};
use fancy_regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

const MEMORY_MARKER: &str = "Memory Usage";
const GDI_MARKER: &str = "GDI Objects";
const CPU_MARKER: &str = "CPU Usage";

static MEMORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Memory Usage:\s*(?P<mb>\d+(?:\.\d+)?)\s*MB").expect("valid regex literal")
});

static GDI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"GDI Objects:\s*(?P<gdi>\d+)(?:,\s*User Objects:\s*(?P<user>\d+))?")
        .expect("valid regex literal")
});

static CPU_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"CPU Usage:\s*Main=(?P<main>[\d.]+)%,\s*Total=(?P<total>[\d.]+)%,\s*Delay=(?P<delay>[\d.]+)\s*ms",
    )
    .expect("valid regex literal")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryPoint {
    /// Seconds since midnight
    pub timestamp: f64,
    pub memory_mb: f64,
    pub original_log_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GdiPoint {
    pub timestamp: f64,
    pub gdi_objects: u64,
    pub user_objects: Option<u64>,
    pub original_log_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuPoint {
    pub timestamp: f64,
    pub main_percent: f64,
    pub total_percent: f64,
    pub delay_ms: f64,
    pub original_log_time: String,
}

/// Run `extract` over every timestamped line carrying `marker`.
fn collect_stream<T>(
    records: &[LineRecord],
    marker: &str,
    extract: impl Fn(&TimedLine<'_>) -> Option<T>,
) -> Vec<T> {
    timed_lines(records)
        .filter(|line| line.text.contains(marker))
        .filter_map(|line| extract(&line))
        .collect()
}

pub fn parse_memory(records: &[LineRecord]) -> Vec<MemoryPoint> {
    profiling::scope!("parse_memory");
    let points = collect_stream(records, MEMORY_MARKER, |line| {
        let caps = captures(&MEMORY_PATTERN, line.text)?;
        Some(MemoryPoint {
            timestamp: line.timestamp.seconds(),
            memory_mb: named(&caps, "mb")?.parse().ok()?,
            original_log_time: line.timestamp.to_string(),
        })
    });
    tracing::debug!("Memory stream: {} points", points.len());
    points
}

pub fn parse_gdi(records: &[LineRecord]) -> Vec<GdiPoint> {
    profiling::scope!("parse_gdi");
    let points = collect_stream(records, GDI_MARKER, |line| {
        let caps = captures(&GDI_PATTERN, line.text)?;
        let user_objects = match named(&caps, "user") {
            Some(user) => Some(user.parse().ok()?),
            None => None,
        };
        Some(GdiPoint {
            timestamp: line.timestamp.seconds(),
            gdi_objects: named(&caps, "gdi")?.parse().ok()?,
            user_objects,
            original_log_time: line.timestamp.to_string(),
        })
    });
    tracing::debug!("GDI stream: {} points", points.len());
    points
}

pub fn parse_cpu(records: &[LineRecord]) -> Vec<CpuPoint> {
    profiling::scope!("parse_cpu");
    let points = collect_stream(records, CPU_MARKER, |line| {
        let caps = captures(&CPU_PATTERN, line.text)?;
        // `[\d.]+` admits "1.2.3"; all three must survive f64 parsing
        Some(CpuPoint {
            timestamp: line.timestamp.seconds(),
            main_percent: named(&caps, "main")?.parse().ok()?,
            total_percent: named(&caps, "total")?.parse().ok()?,
            delay_ms: named(&caps, "delay")?.parse().ok()?,
            original_log_time: line.timestamp.to_string(),
        })
    });
    tracing::debug!("CPU stream: {} points", points.len());
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::line::split_lines;

    #[test]
    fn test_memory_points_in_file_order() {
        let records = split_lines(
            "[I] 1 10:00:02.000 Memory Usage: 300.5 MB\n\
             [I] 1 10:00:01.000 Memory Usage: 280 MB",
        );
        let points = parse_memory(&records);
        assert_eq!(points.len(), 2);
        assert!((points[0].memory_mb - 300.5).abs() < 1e-9);
        assert_eq!(points[1].original_log_time, "10:00:01.000");
        assert!((points[1].timestamp - 36001.0).abs() < 1e-9);
    }

    #[test]
    fn test_memory_non_numeric_value_is_skipped() {
        let records = split_lines("[I] 1 10:00:02.000 Memory Usage: unknown MB");
        assert!(parse_memory(&records).is_empty());
    }

    #[test]
    fn test_memory_requires_timestamp() {
        let records = split_lines("Memory Usage: 300 MB");
        assert!(parse_memory(&records).is_empty());
    }

    #[test]
    fn test_gdi_with_and_without_user_objects() {
        let records = split_lines(
            "[I] 1 10:00:00.000 GDI Objects: 812, User Objects: 455\n\
             [I] 1 10:00:05.000 GDI Objects: 820",
        );
        let points = parse_gdi(&records);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].gdi_objects, 812);
        assert_eq!(points[0].user_objects, Some(455));
        assert_eq!(points[1].user_objects, None);
    }

    #[test]
    fn test_cpu_requires_all_three_fields() {
        let records = split_lines(
            "[I] 1 10:00:00.000 CPU Usage: Main=12.5%, Total=40.0%, Delay=16ms\n\
             [I] 1 10:00:01.000 CPU Usage: Main=12.5%, Total=40.0%\n\
             [I] 1 10:00:02.000 CPU Usage: Main=1.2.3%, Total=40.0%, Delay=16ms",
        );
        let points = parse_cpu(&records);
        assert_eq!(points.len(), 1);
        assert!((points[0].main_percent - 12.5).abs() < 1e-9);
        assert!((points[0].total_percent - 40.0).abs() < 1e-9);
        assert!((points[0].delay_ms - 16.0).abs() < 1e-9);
    }
}
