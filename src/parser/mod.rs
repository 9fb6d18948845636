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

//! Line-level extractors.
//!
//! Every parser here is a pure function over a frozen slice of
//! [`LineRecord`]s. A regex non-match is a normal outcome and never an
//! error: lines that do not fit simply contribute nothing.

pub mod events;
pub mod indicators;
pub mod line;
pub mod metrics;
pub mod permissions;
pub mod system_info;
pub mod timestamp;

pub use line::{split_lines, LineRecord};
pub use timestamp::{extract_timestamp, time_to_seconds, LogTime};

use fancy_regex::{Captures, Regex};

/// Captures of the first match, treating backtracking errors as no match.
pub(crate) fn captures<'t>(re: &Regex, text: &'t str) -> Option<Captures<'t>> {
    re.captures(text).ok().flatten()
}

/// Text of a named group, if it participated in the match.
pub(crate) fn named<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name).map(|m| m.as_str())
}
