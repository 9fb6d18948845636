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

//! System configuration snapshots.
//!
//! The application prints its configuration piecemeal: AP version, CPU,
//! memory, OS, DPI and one line per monitor, not necessarily together.
//! Every "AP Version" line anchors a snapshot, and the fields are gathered
//! from a backward window of timestamped lines ending at the anchor.

use super::line::{timed_lines, LineRecord, TimedLine};
use super::timestamp::LogTime;
use super::{captures, named};
use fancy_regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Number of timestamped lines (anchor included) searched for each snapshot
pub const DEFAULT_WINDOW: usize = 50;

static AP_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"AP Version:\s*(?P<value>\S+)").expect("valid regex literal")
});
static CPU_MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CPU:\s*(?P<value>.+)").expect("valid regex literal"));
static TOTAL_MEMORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Total Memory:\s*(?P<value>.+)").expect("valid regex literal")
});
static OS_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"OS Version:\s*(?P<value>.+)").expect("valid regex literal"));
static DPI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"DPI:\s*(?P<value>\d+)").expect("valid regex literal"));
static MONITOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Monitor(?P<id>\d+):\s*(?P<value>.+)").expect("valid regex literal")
});
static DATACENTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:datacenter|server\s*group)\s*[:=]\s*(?P<value>.+)")
        .expect("valid regex literal")
});

/// A value together with the time of the line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stamped<T> {
    pub value: T,
    pub timestamp: LogTime,
}

impl<T> Stamped<T> {
    pub const fn new(value: T, timestamp: LogTime) -> Self {
        Self { value, timestamp }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorInfo {
    /// `Monitor<n>`
    pub id: String,
    pub resolution: String,
    pub timestamp: LogTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfoSnapshot {
    pub anchor_timestamp: LogTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_version: Option<Stamped<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_model: Option<Stamped<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_memory: Option<Stamped<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<Stamped<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpi: Option<Stamped<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitors: Option<Stamped<Vec<MonitorInfo>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_datacenter_connections: Option<Vec<Stamped<String>>>,
}

impl SystemInfoSnapshot {
    const fn empty(anchor_timestamp: LogTime) -> Self {
        Self {
            anchor_timestamp,
            ap_version: None,
            cpu_model: None,
            total_memory: None,
            os_version: None,
            dpi: None,
            monitors: None,
            all_datacenter_connections: None,
        }
    }

    /// True if any configuration field (connections aside) was found.
    pub const fn has_system_fields(&self) -> bool {
        self.ap_version.is_some()
            || self.cpu_model.is_some()
            || self.total_memory.is_some()
            || self.os_version.is_some()
            || self.dpi.is_some()
            || self.monitors.is_some()
    }
}

/// First capture named `value`, trimmed, if non-empty.
fn field_value(re: &Regex, text: &str) -> Option<String> {
    let caps = captures(re, text)?;
    let value = named(&caps, "value")?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Replace `slot` unless it already holds a strictly later value.
fn keep_latest(slot: &mut Option<Stamped<String>>, value: String, timestamp: LogTime) {
    if slot.as_ref().is_none_or(|current| timestamp >= current.timestamp) {
        *slot = Some(Stamped::new(value, timestamp));
    }
}

/// Compare identifiers so that embedded numbers order by value
/// (`Monitor2` before `Monitor10`).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();
    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let mut na = String::new();
                while let Some(c) = a_chars.next_if(char::is_ascii_digit) {
                    na.push(c);
                }
                let mut nb = String::new();
                while let Some(c) = b_chars.next_if(char::is_ascii_digit) {
                    nb.push(c);
                }
                let na_trimmed = na.trim_start_matches('0');
                let nb_trimmed = nb.trim_start_matches('0');
                let ord = na_trimmed
                    .len()
                    .cmp(&nb_trimmed.len())
                    .then_with(|| na_trimmed.cmp(nb_trimmed))
                    .then_with(|| na.len().cmp(&nb.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                if ca != cb {
                    return ca.cmp(&cb);
                }
                a_chars.next();
                b_chars.next();
            }
        }
    }
}

fn collect_datacenter_connections(timed: &[TimedLine<'_>]) -> Vec<Stamped<String>> {
    timed
        .iter()
        .filter_map(|line| {
            let value = field_value(&DATACENTER, line.text)?;
            (!value.eq_ignore_ascii_case("no data")).then(|| Stamped::new(value, line.timestamp))
        })
        .collect()
}

fn is_fallback_anchor(text: &str) -> bool {
    [&*CPU_MODEL, &*TOTAL_MEMORY, &*OS_VERSION, &*DPI, &*MONITOR]
        .iter()
        .any(|re| re.is_match(text).unwrap_or(false))
}

/// Assemble one snapshot from the window ending at its anchor (the last line).
fn snapshot_from_window(window: &[TimedLine<'_>]) -> Option<SystemInfoSnapshot> {
    let anchor = window.last()?;
    let mut snapshot = SystemInfoSnapshot::empty(anchor.timestamp);
    snapshot.ap_version =
        field_value(&AP_VERSION, anchor.text).map(|v| Stamped::new(v, anchor.timestamp));

    let mut monitors: HashMap<String, MonitorInfo> = HashMap::new();
    for line in window {
        let ts = line.timestamp;
        if let Some(v) = field_value(&CPU_MODEL, line.text) {
            keep_latest(&mut snapshot.cpu_model, v, ts);
        }
        if let Some(v) = field_value(&TOTAL_MEMORY, line.text) {
            keep_latest(&mut snapshot.total_memory, v, ts);
        }
        if let Some(v) = field_value(&OS_VERSION, line.text) {
            keep_latest(&mut snapshot.os_version, v, ts);
        }
        if let Some(v) = field_value(&DPI, line.text) {
            keep_latest(&mut snapshot.dpi, v, ts);
        }
        if let Some(caps) = captures(&MONITOR, line.text) {
            let (Some(id), Some(resolution)) = (named(&caps, "id"), named(&caps, "value")) else {
                continue;
            };
            let resolution = resolution.trim();
            if resolution.is_empty() {
                continue;
            }
            let id = format!("Monitor{id}");
            let newer = monitors.get(&id).is_none_or(|m| ts >= m.timestamp);
            if newer {
                monitors.insert(
                    id.clone(),
                    MonitorInfo {
                        id,
                        resolution: resolution.to_string(),
                        timestamp: ts,
                    },
                );
            }
        }
    }

    if !monitors.is_empty() {
        let mut list: Vec<MonitorInfo> = monitors.into_values().collect();
        list.sort_by(|a, b| natural_cmp(&a.id, &b.id));
        let latest = list.iter().map(|m| m.timestamp).max().unwrap_or(anchor.timestamp);
        snapshot.monitors = Some(Stamped::new(list, latest));
    }

    Some(snapshot)
}

/// Most recent AP Version anywhere in the file, timed or not.
fn latest_ap_version(records: &[LineRecord], fallback_time: LogTime) -> Option<Stamped<String>> {
    records.iter().rev().find_map(|record| {
        field_value(&AP_VERSION, &record.text)
            .map(|v| Stamped::new(v, record.timestamp.unwrap_or(fallback_time)))
    })
}

/// Build every system-info snapshot for a file.
///
/// `window` is the number of timestamped lines, anchor included, searched
/// backwards from each anchor.
pub fn build_system_info(records: &[LineRecord], window: usize) -> Vec<SystemInfoSnapshot> {
    profiling::scope!("build_system_info");
    let window = window.max(1);
    let timed: Vec<TimedLine<'_>> = timed_lines(records).collect();
    let connections = collect_datacenter_connections(&timed);

    let mut anchors: Vec<usize> = timed
        .iter()
        .enumerate()
        .filter(|(_, line)| AP_VERSION.is_match(line.text).unwrap_or(false))
        .map(|(pos, _)| pos)
        .collect();
    if anchors.is_empty() {
        if let Some(pos) = timed.iter().position(|line| is_fallback_anchor(line.text)) {
            tracing::debug!(
                "No AP Version lines, using line {} as anchor",
                timed[pos].original_index
            );
            anchors.push(pos);
        }
    }

    let single_anchor = anchors.len() == 1;
    let shared_connections = (!connections.is_empty()).then(|| connections.clone());
    let mut snapshots = Vec::with_capacity(anchors.len());

    for pos in anchors {
        let start = (pos + 1).saturating_sub(window);
        let Some(mut snapshot) = snapshot_from_window(&timed[start..=pos]) else {
            continue;
        };
        if single_anchor && snapshot.ap_version.is_none() {
            snapshot.ap_version = latest_ap_version(records, snapshot.anchor_timestamp);
        }
        if snapshot.has_system_fields() {
            snapshot.all_datacenter_connections.clone_from(&shared_connections);
            snapshots.push(snapshot);
        }
    }

    if snapshots.is_empty() {
        if let Some(first) = connections.first() {
            let mut snapshot = SystemInfoSnapshot::empty(first.timestamp);
            snapshot.all_datacenter_connections = Some(connections);
            snapshots.push(snapshot);
        }
    }

    tracing::debug!("System info: {} snapshots", snapshots.len());
    snapshots
}
