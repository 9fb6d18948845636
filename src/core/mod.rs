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

pub mod analysis;
pub mod chunked;
pub mod filter;
pub mod log_file;
pub mod session;
pub mod task_worker;

pub use analysis::{analyze, AnalysisOptions, FileAnalysis};
pub use chunked::ChunkedLineDeliverer;
pub use filter::LineFilter;
pub use log_file::{LoadError, LogFileLoader};
pub use session::{AnalysisSession, LoadState, SessionState};
