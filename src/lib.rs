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

//! `LogLens` turns trading-terminal diagnostic logs into structured data:
//! metric streams, system-info snapshots, permission sets, indicator start
//! events and error/warning counts, plus a paged, filtered text view.

pub mod config;
pub mod core;
pub mod logging;
pub mod parser;

pub use crate::config::AnalyzerConfig;
pub use crate::core::{
    analyze, AnalysisOptions, AnalysisSession, ChunkedLineDeliverer, FileAnalysis, LineFilter,
    LoadError, LoadState, LogFileLoader,
};

/// Short git hash of the build, with a `-dirty` suffix for modified trees
pub const GIT_HASH: &str = env!("GIT_HASH");
