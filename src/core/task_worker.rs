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

//! Background worker that only ever runs the newest job.
//!
//! Jobs submitted while another one is running queue up; when the worker
//! becomes free it drains the queue and runs only the last job, dropping
//! the superseded ones unrun.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

type Task = Box<dyn FnOnce() + Send>;

/// Handle to submit jobs to the worker.
///
/// When all handles are dropped, the worker thread exits gracefully.
#[derive(Clone)]
pub struct TaskWorkerHandle {
    request_tx: Sender<Task>,
}

impl TaskWorkerHandle {
    /// Submit a job. Any job still waiting to run is discarded.
    pub fn submit<F>(&self, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.request_tx.send(Box::new(work)).is_err() {
            tracing::warn!("Task worker is gone, dropping job");
        }
    }
}

/// Single-threaded latest-job-wins worker.
pub struct TaskWorker {
    handle: TaskWorkerHandle,
    _thread: thread::JoinHandle<()>,
}

impl TaskWorker {
    /// Create a new worker with a background thread.
    #[must_use]
    pub fn new() -> Self {
        let (request_tx, request_rx) = channel();

        let thread = thread::spawn(move || {
            Self::worker_loop(&request_rx);
        });

        Self {
            handle: TaskWorkerHandle { request_tx },
            _thread: thread,
        }
    }

    /// Get a handle to submit jobs to this worker.
    pub fn handle(&self) -> TaskWorkerHandle {
        self.handle.clone()
    }

    fn worker_loop(request_rx: &Receiver<Task>) {
        tracing::debug!("Task worker thread started");

        // Main loop - exits when all senders are dropped
        while let Ok(mut task) = request_rx.recv() {
            let mut dropped = 0usize;
            while let Ok(newer) = request_rx.try_recv() {
                task = newer;
                dropped += 1;
            }
            if dropped > 0 {
                tracing::trace!("Skipping {dropped} superseded job(s)");
            }
            task();
        }

        tracing::debug!("Task worker thread shutting down (channel closed)");
    }
}

impl Default for TaskWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_runs_submitted_job() {
        let worker = TaskWorker::new();
        let (tx, rx) = mpsc::channel();
        worker.handle().submit(move || {
            let _ = tx.send(7);
        });
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(7));
    }

    #[test]
    fn test_queued_jobs_collapse_to_latest() {
        let worker = TaskWorker::new();
        let handle = worker.handle();
        let (started_tx, started_rx) = mpsc::channel::<()>();
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel();

        // Block the worker so the next jobs pile up
        handle.submit(move || {
            let _ = started_tx.send(());
            let _ = gate_rx.recv();
        });
        started_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker picked up the blocking job");
        for i in 0..5 {
            let done_tx = done_tx.clone();
            handle.submit(move || {
                let _ = done_tx.send(i);
            });
        }
        drop(done_tx);
        gate_tx.send(()).expect("blocking job is waiting");

        let ran: Vec<i32> = done_rx.iter().collect();
        assert_eq!(ran, vec![4]);
    }
}
