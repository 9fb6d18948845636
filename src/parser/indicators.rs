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

//! Indicator lifecycle: `CreateIndicator` followed by `StartXSIndicator`.
//!
//! Start events are enriched with name, symbol and frequency from the most
//! recent creation of the same id seen earlier in the file.

use super::line::{timed_lines, LineRecord, TimedLine};
use super::timestamp::LogTime;
use super::{captures, named};
use fancy_regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

static CREATE_INDICATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"CreateIndicator\s+IndicatorID:(?P<id>[^,\s]+),\s*Name:(?P<name>[^,]*),\s*MainSymbolID:(?P<symbol>[^,]*),\s*Freq:(?P<freq>[^,\s]*)",
    )
    .expect("valid regex literal")
});

static START_INDICATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"StartXSIndicator\s+IndicatorID:(?P<id>[^,\s]+),",
        r"\s*TotalBar:(?P<total_bar>[^,]*),",
        r"\s*FirstBarDate:(?P<first_bar_date>[^,]*),",
        r"\s*TDayCount:(?P<t_day_count>[^,]*),",
        r"\s*AlignType:(?P<align_type>[^,]*),",
        r"\s*AlignMode:(?P<align_mode>[^,]*),",
        r"\s*Sync:(?P<sync>[^,]*),",
        r"\s*AddFakeBar:(?P<add_fake_bar>[^,]*),",
        r"\s*AutoCloseK:(?P<auto_close_k>[^,\s]*)",
    ))
    .expect("valid regex literal")
});

/// Lookup entry from a `CreateIndicator` line. Lives only during one pass.
#[derive(Debug, Clone)]
struct IndicatorCreation {
    name: String,
    main_symbol_id: String,
    freq: String,
    creation_timestamp: LogTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorStartEvent {
    pub start_timestamp: LogTime,
    pub indicator_id: String,
    pub name: Option<String>,
    pub main_symbol_id: Option<String>,
    pub freq: Option<String>,
    pub total_bar: i64,
    pub first_bar_date: String,
    pub t_day_count: i64,
    pub align_type: String,
    pub align_mode: String,
    pub sync: String,
    pub add_fake_bar: String,
    pub auto_close_k: String,
}

fn trimmed(caps: &fancy_regex::Captures<'_>, name: &str) -> Option<String> {
    named(caps, name).map(|v| v.trim().to_string())
}

fn parse_creation(line: &TimedLine<'_>) -> Option<(String, IndicatorCreation)> {
    let caps = captures(&CREATE_INDICATOR, line.text)?;
    Some((
        trimmed(&caps, "id")?,
        IndicatorCreation {
            name: trimmed(&caps, "name")?,
            main_symbol_id: trimmed(&caps, "symbol")?,
            freq: trimmed(&caps, "freq")?,
            creation_timestamp: line.timestamp,
        },
    ))
}

fn parse_start(line: &TimedLine<'_>) -> Option<IndicatorStartEvent> {
    let caps = captures(&START_INDICATOR, line.text)?;
    Some(IndicatorStartEvent {
        start_timestamp: line.timestamp,
        indicator_id: trimmed(&caps, "id")?,
        name: None,
        main_symbol_id: None,
        freq: None,
        total_bar: named(&caps, "total_bar")?.trim().parse().ok()?,
        first_bar_date: trimmed(&caps, "first_bar_date")?,
        t_day_count: named(&caps, "t_day_count")?.trim().parse().ok()?,
        align_type: trimmed(&caps, "align_type")?,
        align_mode: trimmed(&caps, "align_mode")?,
        sync: trimmed(&caps, "sync")?,
        add_fake_bar: trimmed(&caps, "add_fake_bar")?,
        auto_close_k: trimmed(&caps, "auto_close_k")?,
    })
}

/// Correlate indicator creations with their start events, in one pass.
pub fn correlate_indicators(records: &[LineRecord]) -> Vec<IndicatorStartEvent> {
    profiling::scope!("correlate_indicators");
    let mut created: HashMap<String, IndicatorCreation> = HashMap::new();
    let mut events = Vec::new();

    for line in timed_lines(records) {
        if line.text.contains("CreateIndicator") {
            if let Some((id, creation)) = parse_creation(&line) {
                created.insert(id, creation);
            }
        } else if line.text.contains("StartXSIndicator") {
            let Some(mut event) = parse_start(&line) else {
                continue;
            };
            if let Some(creation) = created.get(&event.indicator_id) {
                tracing::trace!(
                    "Indicator {} started at {}, created at {}",
                    event.indicator_id,
                    event.start_timestamp,
                    creation.creation_timestamp
                );
                event.name = Some(creation.name.clone());
                event.main_symbol_id = Some(creation.main_symbol_id.clone());
                event.freq = Some(creation.freq.clone());
            }
            events.push(event);
        }
    }

    tracing::debug!(
        "Indicators: {} creations, {} start events",
        created.len(),
        events.len()
    );
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::line::split_lines;

    const START_42: &str = "[I] 3 09:01:00.000 StartXSIndicator IndicatorID:42,TotalBar:500,FirstBarDate:20240102,TDayCount:20,AlignType:1,AlignMode:0,Sync:1,AddFakeBar:0,AutoCloseK:1";

    #[test]
    fn test_start_without_creation_is_still_emitted() {
        let events = correlate_indicators(&split_lines(START_42));
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.indicator_id, "42");
        assert_eq!(e.name, None);
        assert_eq!(e.main_symbol_id, None);
        assert_eq!(e.freq, None);
        assert_eq!(e.total_bar, 500);
        assert_eq!(e.first_bar_date, "20240102");
        assert_eq!(e.t_day_count, 20);
        assert_eq!(e.align_type, "1");
        assert_eq!(e.align_mode, "0");
        assert_eq!(e.sync, "1");
        assert_eq!(e.add_fake_bar, "0");
        assert_eq!(e.auto_close_k, "1");
        assert_eq!(e.start_timestamp.to_string(), "09:01:00.000");
    }

    #[test]
    fn test_latest_creation_enriches_start() {
        let text = format!(
            "[I] 3 09:00:00.000 CreateIndicator IndicatorID:42,Name:MA,MainSymbolID:2330.TW,Freq:1\n\
             [I] 3 09:00:30.000 CreateIndicator IndicatorID:42,Name:KD,MainSymbolID:2317.TW,Freq:5\n\
             {START_42}"
        );
        let events = correlate_indicators(&split_lines(&text));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name.as_deref(), Some("KD"));
        assert_eq!(events[0].main_symbol_id.as_deref(), Some("2317.TW"));
        assert_eq!(events[0].freq.as_deref(), Some("5"));
    }

    #[test]
    fn test_creation_after_start_does_not_enrich() {
        let text = format!(
            "{START_42}\n\
             [I] 3 09:02:00.000 CreateIndicator IndicatorID:42,Name:MA,MainSymbolID:2330.TW,Freq:1"
        );
        let events = correlate_indicators(&split_lines(&text));
        assert_eq!(events.len(), 1);
        assert!(events[0].name.is_none());
    }

    #[test]
    fn test_creation_only_produces_nothing() {
        let events = correlate_indicators(&split_lines(
            "[I] 3 09:00:00.000 CreateIndicator IndicatorID:7,Name:RSI,MainSymbolID:TSE,Freq:D",
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn test_malformed_start_is_skipped() {
        let events = correlate_indicators(&split_lines(
            "[I] 3 09:01:00.000 StartXSIndicator IndicatorID:42,TotalBar:many,FirstBarDate:20240102,TDayCount:20,AlignType:1,AlignMode:0,Sync:1,AddFakeBar:0,AutoCloseK:1\n\
             [I] 3 09:01:00.000 StartXSIndicator IndicatorID:43",
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn test_events_follow_file_order() {
        let text = "[I] 3 09:00:00.000 CreateIndicator IndicatorID:1,Name:A,MainSymbolID:X,Freq:1\n\
             [I] 3 09:05:00.000 StartXSIndicator IndicatorID:2,TotalBar:10,FirstBarDate:20240101,TDayCount:1,AlignType:0,AlignMode:0,Sync:0,AddFakeBar:0,AutoCloseK:0\n\
             [I] 3 09:04:00.000 StartXSIndicator IndicatorID:1,TotalBar:10,FirstBarDate:20240101,TDayCount:1,AlignType:0,AlignMode:0,Sync:0,AddFakeBar:0,AutoCloseK:0";
        let events = correlate_indicators(&split_lines(text));
        let ids: Vec<&str> = events.iter().map(|e| e.indicator_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert!(events[0].name.is_none());
        assert_eq!(events[1].name.as_deref(), Some("A"));
    }
}
