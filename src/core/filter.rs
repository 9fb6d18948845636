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

//! Severity filter for the raw line view.

use crate::parser::events::{is_error_line, is_warning_line};
use crate::parser::LineRecord;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which lines the text view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineFilter {
    #[default]
    All,
    Error,
    Warn,
}

impl LineFilter {
    /// Map the UI selector (`null`, `"error"`, `"warn"`) to a filter.
    /// Unknown selectors yield `None`.
    pub fn from_selector(selector: Option<&str>) -> Option<Self> {
        match selector.map(str::trim) {
            None | Some("") => Some(Self::All),
            Some(s) if s.eq_ignore_ascii_case("error") => Some(Self::Error),
            Some(s) if s.eq_ignore_ascii_case("warn") || s.eq_ignore_ascii_case("warning") => {
                Some(Self::Warn)
            }
            Some(_) => None,
        }
    }

    /// The UI selector for this filter.
    pub const fn selector(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Error => Some("error"),
            Self::Warn => Some("warn"),
        }
    }

    pub fn matches(self, line: &str) -> bool {
        match self {
            Self::All => true,
            Self::Error => is_error_line(line),
            Self::Warn => is_warning_line(line),
        }
    }
}

impl fmt::Display for LineFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector().unwrap_or("all"))
    }
}

/// Indices of the records that pass a filter, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterData {
    pub filtered_indices: Vec<usize>,
}

impl FilterData {
    pub fn compute(records: &[LineRecord], filter: LineFilter) -> Self {
        profiling::scope!("FilterData::compute");

        let filtered_indices = match filter {
            LineFilter::All => (0..records.len()).collect(),
            LineFilter::Error | LineFilter::Warn => records
                .par_iter()
                .enumerate()
                .filter_map(|(idx, record)| filter.matches(&record.text).then_some(idx))
                .collect(),
        };

        Self { filtered_indices }
    }

    pub fn len(&self) -> usize {
        self.filtered_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered_indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::split_lines;

    #[test]
    fn test_selector_mapping() {
        assert_eq!(LineFilter::from_selector(None), Some(LineFilter::All));
        assert_eq!(LineFilter::from_selector(Some("error")), Some(LineFilter::Error));
        assert_eq!(LineFilter::from_selector(Some("WARN")), Some(LineFilter::Warn));
        assert_eq!(LineFilter::from_selector(Some("fatal")), None);
        assert_eq!(LineFilter::Warn.selector(), Some("warn"));
        assert_eq!(LineFilter::All.to_string(), "all");
    }

    #[test]
    fn test_compute_keeps_file_order() {
        let records = split_lines("ok\nan error\nwarn: x\nERROR and warning\nfine");
        let errors = FilterData::compute(&records, LineFilter::Error);
        assert_eq!(errors.filtered_indices, vec![1, 3]);
        let warnings = FilterData::compute(&records, LineFilter::Warn);
        assert_eq!(warnings.filtered_indices, vec![2, 3]);
        let all = FilterData::compute(&records, LineFilter::All);
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_cjk_adjacent_keywords_pass_filter() {
        let records = split_lines("行情正常\n連線error發生\n記憶體warning");
        let errors = FilterData::compute(&records, LineFilter::Error);
        assert_eq!(errors.filtered_indices, vec![1]);
        let warnings = FilterData::compute(&records, LineFilter::Warn);
        assert_eq!(warnings.filtered_indices, vec![2]);
    }

    #[test]
    fn test_filter_serde_names() {
        let json = serde_json::to_string(&LineFilter::Error).expect("serializes");
        assert_eq!(json, "\"error\"");
        let back: LineFilter = serde_json::from_str("\"warn\"").expect("deserializes");
        assert_eq!(back, LineFilter::Warn);
    }
}
