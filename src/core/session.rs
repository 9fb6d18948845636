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

//! The active file and its analysis.
//!
//! Opening a file bumps a generation counter and queues the load on a
//! background worker. The result is published over a `watch` channel only
//! if its generation is still current, so once another file is opened (or
//! the session is closed) nothing from the old file can appear.

use crate::config::AnalyzerConfig;
use crate::core::analysis::FileAnalysis;
use crate::core::log_file::LogFileLoader;
use crate::core::task_worker::TaskWorker;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

/// Where the active file is in its lifecycle
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    /// No file selected
    #[default]
    Idle,
    Loading {
        path: PathBuf,
    },
    Ready {
        path: PathBuf,
        analysis: Arc<FileAnalysis>,
    },
    /// Reading or decoding failed; the message is meant for the user
    Failed {
        path: PathBuf,
        message: String,
    },
}

impl LoadState {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn analysis(&self) -> Option<&Arc<FileAnalysis>> {
        match self {
            Self::Ready { analysis, .. } => Some(analysis),
            Self::Idle | Self::Loading { .. } | Self::Failed { .. } => None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Idle => None,
            Self::Loading { path } | Self::Ready { path, .. } | Self::Failed { path, .. } => {
                Some(path)
            }
        }
    }
}

/// Published session state, tagged with the generation it belongs to
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub generation: u64,
    pub load: LoadState,
}

pub struct AnalysisSession {
    config: Arc<AnalyzerConfig>,
    worker: TaskWorker,
    tx: watch::Sender<SessionState>,
}

impl AnalysisSession {
    pub fn new(config: AnalyzerConfig) -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self {
            config: Arc::new(config),
            worker: TaskWorker::new(),
            tx,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Start analyzing `path`, superseding whatever was active.
    /// Returns the generation of the new load.
    pub fn open(&self, path: impl Into<PathBuf>) -> u64 {
        let path = path.into();
        let generation = self.advance(LoadState::Loading { path: path.clone() });
        tracing::info!("Opening {} (generation {generation})", path.display());

        let tx = self.tx.clone();
        let config = Arc::clone(&self.config);
        self.worker.handle().submit(move || {
            if tx.borrow().generation != generation {
                tracing::debug!("Skipping stale load of {}", path.display());
                return;
            }
            let load = match LogFileLoader::load(&path, &config) {
                Ok(analysis) => LoadState::Ready {
                    path,
                    analysis: Arc::new(analysis),
                },
                Err(e) => {
                    tracing::error!("Failed to load {}: {e}", path.display());
                    LoadState::Failed {
                        path,
                        message: e.to_string(),
                    }
                }
            };
            Self::publish(&tx, generation, load);
        });

        generation
    }

    /// Drop the active file. Any load still in flight is discarded.
    pub fn close(&self) {
        let generation = self.advance(LoadState::Idle);
        tracing::info!("Closed active file (generation {generation})");
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Wait until the given generation is no longer loading, or has been
    /// superseded. Returns the state observed at that point.
    pub async fn settled(&self, generation: u64) -> SessionState {
        let mut rx = self.subscribe();
        let result = rx
            .wait_for(|state| state.generation != generation || !state.load.is_loading())
            .await
            .map(|state| state.clone());
        // The sender lives in `self`, so the channel cannot close here
        result.unwrap_or_else(|_| self.state())
    }

    fn advance(&self, load: LoadState) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|state| {
            state.generation += 1;
            state.load = load;
            generation = state.generation;
        });
        generation
    }

    fn publish(tx: &watch::Sender<SessionState>, generation: u64, load: LoadState) {
        let published = tx.send_if_modified(|state| {
            if state.generation == generation {
                state.load = load;
                true
            } else {
                false
            }
        });
        if !published {
            tracing::debug!("Discarded result of superseded generation {generation}");
        }
    }
}
