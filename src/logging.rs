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

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Honours `RUST_LOG` (e.g. `RUST_LOG=loglens=debug`) and falls back to
/// `info`. Returns false if a subscriber was already installed, which is
/// harmless when an embedding application set up its own.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            "LogLens {} ({}) logging initialised",
            env!("CARGO_PKG_VERSION"),
            crate::GIT_HASH
        );
    } else {
        tracing::debug!("Tracing subscriber already installed, keeping it");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_keeps_first_subscriber() {
        let _ = init();
        assert!(!init());
    }
}
