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

//! Permission snapshots.
//!
//! A login prints `Features:`, `XSAuth:` and `XSPreset:` on separate lines
//! in no fixed order after `Features:`. A group opened by a `Features:` line
//! collects the other two while lines stay within a small index and time
//! window of it. Only complete groups become snapshots.

use super::line::{timed_lines, LineRecord, TimedLine};
use super::timestamp::LogTime;
use super::{captures, named};
use fancy_regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const DEFAULT_MAX_LINE_GAP: usize = 10;
pub const DEFAULT_MAX_TIME_GAP_MS: u32 = 2000;

static FEATURES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Features:\s*(?P<value>.*)").expect("valid regex literal"));
static XS_AUTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"XSAuth:\s*(?P<value>.*)").expect("valid regex literal"));
static XS_PRESET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"XSPreset:\s*(?P<value>.*)").expect("valid regex literal"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permissions {
    pub features: String,
    pub xs_auth: String,
    pub xs_preset: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionSnapshot {
    /// Time of the `Features:` line that opened the group
    pub timestamp: LogTime,
    pub permissions: Permissions,
}

/// Bounds within which a line still belongs to the open group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityWindow {
    /// Exclusive bound on the original-index distance from the anchor
    pub max_line_gap: usize,
    /// Inclusive bound on the time distance from the anchor
    pub max_time_gap_ms: u32,
}

impl Default for ProximityWindow {
    fn default() -> Self {
        Self {
            max_line_gap: DEFAULT_MAX_LINE_GAP,
            max_time_gap_ms: DEFAULT_MAX_TIME_GAP_MS,
        }
    }
}

impl ProximityWindow {
    const fn contains(&self, group: &OpenGroup, line: &TimedLine<'_>) -> bool {
        line.original_index.abs_diff(group.anchor_index) < self.max_line_gap
            && line.timestamp.abs_diff_millis(group.timestamp) <= self.max_time_gap_ms
    }
}

#[derive(Debug)]
struct OpenGroup {
    timestamp: LogTime,
    anchor_index: usize,
    features: String,
    xs_auth: Option<String>,
    xs_preset: Option<String>,
}

impl OpenGroup {
    /// Convert into a snapshot if every field is present.
    fn finish(self) -> Option<PermissionSnapshot> {
        let xs_auth = self.xs_auth.filter(|v| !v.trim().is_empty())?;
        let xs_preset = self.xs_preset.filter(|v| !v.trim().is_empty())?;
        if self.features.trim().is_empty() {
            return None;
        }
        Some(PermissionSnapshot {
            timestamp: self.timestamp,
            permissions: Permissions {
                features: self.features,
                xs_auth,
                xs_preset,
            },
        })
    }
}

fn non_empty_value(re: &Regex, text: &str) -> Option<String> {
    let caps = captures(re, text)?;
    let value = named(&caps, "value")?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Collector state: either idle or holding one open group.
#[derive(Debug, Default)]
struct PermissionCollector {
    window: ProximityWindow,
    open: Option<OpenGroup>,
    snapshots: Vec<PermissionSnapshot>,
}

impl PermissionCollector {
    fn new(window: ProximityWindow) -> Self {
        Self {
            window,
            open: None,
            snapshots: Vec::new(),
        }
    }

    fn finalize(&mut self) {
        if let Some(group) = self.open.take() {
            match group.finish() {
                Some(snapshot) => self.snapshots.push(snapshot),
                None => tracing::trace!("Discarding incomplete permission group"),
            }
        }
    }

    fn feed(&mut self, line: &TimedLine<'_>) {
        if let Some(features) = non_empty_value(&FEATURES, line.text) {
            self.finalize();
            self.open = Some(OpenGroup {
                timestamp: line.timestamp,
                anchor_index: line.original_index,
                features,
                xs_auth: None,
                xs_preset: None,
            });
            return;
        }

        let Some(group) = self.open.as_mut() else {
            return;
        };

        if !self.window.contains(group, line) {
            self.finalize();
            return;
        }

        if group.xs_auth.is_none() {
            group.xs_auth = non_empty_value(&XS_AUTH, line.text);
        }
        if group.xs_preset.is_none() {
            group.xs_preset = non_empty_value(&XS_PRESET, line.text);
        }
    }

    fn into_snapshots(mut self) -> Vec<PermissionSnapshot> {
        self.finalize();
        self.snapshots
    }
}

/// Group `Features:`/`XSAuth:`/`XSPreset:` lines into permission snapshots.
pub fn build_permissions(
    records: &[LineRecord],
    window: ProximityWindow,
) -> Vec<PermissionSnapshot> {
    profiling::scope!("build_permissions");
    let mut collector = PermissionCollector::new(window);
    for line in timed_lines(records) {
        collector.feed(&line);
    }
    let snapshots = collector.into_snapshots();
    tracing::debug!("Permissions: {} snapshots", snapshots.len());
    snapshots
}
