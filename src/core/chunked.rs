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

//! Paged delivery of the (optionally filtered) raw text.
//!
//! The filtered subset is materialized once per `restart` and then handed
//! out in fixed-size pages, so scrolling never re-filters the file.

use crate::core::filter::{FilterData, LineFilter};
use crate::parser::LineRecord;
use std::sync::Arc;

/// Lines per page
pub const DEFAULT_PAGE_SIZE: usize = 500;

pub struct ChunkedLineDeliverer {
    records: Arc<[LineRecord]>,
    page_size: usize,
    filter: LineFilter,
    /// `None` until the first `restart`
    filtered: Option<FilterData>,
    /// Number of filtered lines already handed out
    current_display_end_index: usize,
}

impl ChunkedLineDeliverer {
    pub fn new(records: Arc<[LineRecord]>, page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            filter: LineFilter::All,
            filtered: None,
            current_display_end_index: 0,
        }
    }

    /// Recompute the subset for `filter`, rewind, and return the first page.
    pub fn restart(&mut self, filter: LineFilter) -> String {
        let data = FilterData::compute(&self.records, filter);
        tracing::debug!(
            "Display restarted with filter {filter}: {} of {} lines",
            data.len(),
            self.records.len()
        );
        self.filter = filter;
        self.filtered = Some(data);
        self.current_display_end_index = 0;
        self.next_page().unwrap_or_default()
    }

    /// Append the next page to `text`. Returns false when nothing was added.
    pub fn load_more(&mut self, text: &mut String) -> bool {
        // Pages after the first need a separator, even if earlier lines were empty
        let continues = self.current_display_end_index > 0;
        let Some(page) = self.next_page() else {
            return false;
        };
        if continues {
            text.push('\n');
        }
        text.push_str(&page);
        true
    }

    pub fn has_more(&self) -> bool {
        self.filtered
            .as_ref()
            .is_some_and(|data| self.current_display_end_index < data.len())
    }

    pub const fn filter(&self) -> LineFilter {
        self.filter
    }

    /// Number of filtered lines delivered so far.
    pub const fn displayed_lines(&self) -> usize {
        self.current_display_end_index
    }

    /// Size of the current filtered subset, if one was computed.
    pub fn filtered_len(&self) -> Option<usize> {
        self.filtered.as_ref().map(FilterData::len)
    }

    fn next_page(&mut self) -> Option<String> {
        let data = self.filtered.as_ref()?;
        let start = self.current_display_end_index;
        if start >= data.len() {
            return None;
        }
        let end = (start + self.page_size).min(data.len());
        let page = data.filtered_indices[start..end]
            .iter()
            .map(|&idx| self.records[idx].text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.current_display_end_index = end;
        Some(page)
    }
}
