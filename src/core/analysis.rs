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

//! One analysis result per file.
//!
//! All extraction passes read the same frozen record slice and write to
//! their own output, so they run in any order (or concurrently) with the
//! same result. `analyze` returns only once every pass is done.

use crate::config::AnalyzerConfig;
use crate::core::chunked::ChunkedLineDeliverer;
use crate::parser::events::{count_events, find_start_markers, LogStatistics};
use crate::parser::indicators::{correlate_indicators, IndicatorStartEvent};
use crate::parser::metrics::{parse_cpu, parse_gdi, parse_memory, CpuPoint, GdiPoint, MemoryPoint};
use crate::parser::permissions::{build_permissions, PermissionSnapshot, ProximityWindow};
use crate::parser::system_info::{build_system_info, SystemInfoSnapshot};
use crate::parser::{split_lines, LineRecord, LogTime};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Tuning knobs for the extraction passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub system_info_window: usize,
    pub permission_window: ProximityWindow,
    pub parallel: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from(&AnalyzerConfig::default())
    }
}

impl From<&AnalyzerConfig> for AnalysisOptions {
    fn from(config: &AnalyzerConfig) -> Self {
        Self {
            system_info_window: config.system_info_window,
            permission_window: ProximityWindow {
                max_line_gap: config.permission_max_line_gap,
                max_time_gap_ms: config.permission_max_time_gap_ms,
            },
            parallel: config.parallel,
        }
    }
}

/// Everything extracted from one log file.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    #[serde(skip)]
    pub records: Arc<[LineRecord]>,
    pub statistics: LogStatistics,
    pub memory: Vec<MemoryPoint>,
    pub gdi: Vec<GdiPoint>,
    pub cpu: Vec<CpuPoint>,
    pub system_info: Vec<SystemInfoSnapshot>,
    pub permissions: Vec<PermissionSnapshot>,
    pub indicator_starts: Vec<IndicatorStartEvent>,
    pub start_markers: Vec<LogTime>,
}

impl FileAnalysis {
    pub fn line_count(&self) -> usize {
        self.records.len()
    }

    /// A paged text view over this file's lines.
    pub fn deliverer(&self, page_size: usize) -> ChunkedLineDeliverer {
        ChunkedLineDeliverer::new(Arc::clone(&self.records), page_size)
    }
}

/// Split `content` into lines and run every extraction pass.
pub fn analyze(content: &str, options: &AnalysisOptions) -> FileAnalysis {
    analyze_records(split_lines(content).into(), options)
}

pub fn analyze_records(records: Arc<[LineRecord]>, options: &AnalysisOptions) -> FileAnalysis {
    profiling::scope!("analyze_records");
    let start = Instant::now();
    let lines: &[LineRecord] = &records;

    let analysis = if options.parallel {
        let mut statistics = LogStatistics::default();
        let mut start_markers = Vec::new();
        let mut memory = Vec::new();
        let mut gdi = Vec::new();
        let mut cpu = Vec::new();
        let mut system_info = Vec::new();
        let mut permissions = Vec::new();
        let mut indicator_starts = Vec::new();

        rayon::scope(|s| {
            s.spawn(|_| statistics = count_events(lines));
            s.spawn(|_| start_markers = find_start_markers(lines));
            s.spawn(|_| memory = parse_memory(lines));
            s.spawn(|_| gdi = parse_gdi(lines));
            s.spawn(|_| cpu = parse_cpu(lines));
            s.spawn(|_| system_info = build_system_info(lines, options.system_info_window));
            s.spawn(|_| permissions = build_permissions(lines, options.permission_window));
            s.spawn(|_| indicator_starts = correlate_indicators(lines));
        });

        FileAnalysis {
            records: Arc::clone(&records),
            statistics,
            memory,
            gdi,
            cpu,
            system_info,
            permissions,
            indicator_starts,
            start_markers,
        }
    } else {
        FileAnalysis {
            records: Arc::clone(&records),
            statistics: count_events(lines),
            memory: parse_memory(lines),
            gdi: parse_gdi(lines),
            cpu: parse_cpu(lines),
            system_info: build_system_info(lines, options.system_info_window),
            permissions: build_permissions(lines, options.permission_window),
            indicator_starts: correlate_indicators(lines),
            start_markers: find_start_markers(lines),
        }
    };

    tracing::info!(
        "Analyzed {} lines in {:?}: {} errors, {} warnings, {} memory/{} GDI/{} CPU points, \
         {} system snapshots, {} permission sets, {} indicator starts",
        analysis.line_count(),
        start.elapsed(),
        analysis.statistics.error_count,
        analysis.statistics.warn_count,
        analysis.memory.len(),
        analysis.gdi.len(),
        analysis.cpu.len(),
        analysis.system_info.len(),
        analysis.permissions.len(),
        analysis.indicator_starts.len()
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::LineFilter;

    const SAMPLE: &str = "\
[I] 1 09:00:00.000 UI Language OK
[I] 1 09:00:00.100 CPU: Intel(R) Xeon(R) W-2235
[I] 1 09:00:00.200 Monitor0: 1920x1080
[I] 1 09:00:00.300 AP Version: 6.80.2
[I] 1 09:00:01.000 Features: Quote,Trade
[I] 1 09:00:01.100 XSAuth: Pro
[I] 1 09:00:01.200 XSPreset: Default
[W] 2 09:00:02.000 warning: slow quote feed
[E] 2 09:00:03.000 error: order rejected
[I] 1 09:00:04.000 Memory Usage: 512 MB
[I] 1 09:00:04.000 GDI Objects: 900, User Objects: 400
[I] 1 09:00:04.000 CPU Usage: Main=5.0%, Total=22.5%, Delay=12ms
[I] 3 09:00:05.000 CreateIndicator IndicatorID:9,Name:MACD,MainSymbolID:2330.TW,Freq:1
[I] 3 09:00:06.000 StartXSIndicator IndicatorID:9,TotalBar:300,FirstBarDate:20240105,TDayCount:5,AlignType:0,AlignMode:0,Sync:1,AddFakeBar:0,AutoCloseK:0
continuation line without timestamp";

    #[test]
    fn test_analyze_collects_every_stream() {
        let analysis = analyze(SAMPLE, &AnalysisOptions::default());
        assert_eq!(analysis.line_count(), 15);
        assert_eq!(analysis.statistics.error_count, 1);
        assert_eq!(analysis.statistics.warn_count, 1);
        assert_eq!(analysis.memory.len(), 1);
        assert_eq!(analysis.gdi.len(), 1);
        assert_eq!(analysis.cpu.len(), 1);
        assert_eq!(analysis.system_info.len(), 1);
        assert_eq!(analysis.permissions.len(), 1);
        assert_eq!(analysis.indicator_starts.len(), 1);
        assert_eq!(analysis.indicator_starts[0].name.as_deref(), Some("MACD"));
        assert_eq!(analysis.start_markers.len(), 1);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let parallel = analyze(SAMPLE, &AnalysisOptions::default());
        let sequential = analyze(
            SAMPLE,
            &AnalysisOptions {
                parallel: false,
                ..AnalysisOptions::default()
            },
        );
        assert_eq!(parallel.statistics, sequential.statistics);
        assert_eq!(parallel.memory, sequential.memory);
        assert_eq!(parallel.gdi, sequential.gdi);
        assert_eq!(parallel.cpu, sequential.cpu);
        assert_eq!(parallel.system_info, sequential.system_info);
        assert_eq!(parallel.permissions, sequential.permissions);
        assert_eq!(parallel.indicator_starts, sequential.indicator_starts);
        assert_eq!(parallel.start_markers, sequential.start_markers);
    }

    #[test]
    fn test_deliverer_shares_records() {
        let analysis = analyze(SAMPLE, &AnalysisOptions::default());
        let mut deliverer = analysis.deliverer(500);
        let text = deliverer.restart(LineFilter::Error);
        assert_eq!(text, "[E] 2 09:00:03.000 error: order rejected");
    }

    #[test]
    fn test_serializes_for_the_ui() {
        let analysis = analyze(SAMPLE, &AnalysisOptions::default());
        let json = serde_json::to_value(&analysis).expect("serializes");
        assert_eq!(json["statistics"]["error_count"], 1);
        assert_eq!(json["start_markers"][0], "09:00:00.000");
        assert_eq!(json["system_info"][0]["ap_version"]["value"], "6.80.2");
        assert!(json.get("records").is_none());
    }
}
