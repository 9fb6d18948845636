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

use crate::config::AnalyzerConfig;
use crate::core::analysis::{analyze, AnalysisOptions, FileAnalysis};
use encoding_rs::Encoding;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown text encoding '{0}'")]
    UnknownEncoding(String),

    #[error("File is not valid {encoding} text")]
    Decode { encoding: &'static str },
}

/// Reads and decodes log files, then hands them to the analyzer
pub struct LogFileLoader;

impl LogFileLoader {
    /// Decode raw bytes with the encoding named by `label`.
    ///
    /// The configured encoding is applied as-is; a BOM does not switch it.
    /// Invalid sequences become U+FFFD unless `strict` is set.
    pub fn decode(bytes: &[u8], label: &str, strict: bool) -> Result<String, LoadError> {
        profiling::scope!("LogFileLoader::decode");
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| LoadError::UnknownEncoding(label.to_string()))?;

        let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
        if had_errors {
            if strict {
                return Err(LoadError::Decode {
                    encoding: encoding.name(),
                });
            }
            tracing::warn!(
                "Replaced malformed {} sequences while decoding",
                encoding.name()
            );
        }
        Ok(text.into_owned())
    }

    /// Read a whole file into memory and decode it.
    pub fn read(path: &Path, config: &AnalyzerConfig) -> Result<String, LoadError> {
        let read_start = Instant::now();
        let buffer = std::fs::read(path).map_err(|source| {
            tracing::error!("Cannot read {}: {source}", path.display());
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::info!(
            "File I/O took {:?} to read {} bytes from {}",
            read_start.elapsed(),
            buffer.len(),
            path.display()
        );

        let decode_start = Instant::now();
        let content = Self::decode(&buffer, &config.encoding, config.strict_decoding)?;
        tracing::info!(
            "Decoding as {} took {:?}",
            config.encoding,
            decode_start.elapsed()
        );
        Ok(content)
    }

    /// Read, decode and analyze one file.
    pub fn load(path: &Path, config: &AnalyzerConfig) -> Result<FileAnalysis, LoadError> {
        let start_time = Instant::now();
        tracing::debug!("Loading {}", path.display());
        let content = Self::read(path, config)?;
        let analysis = analyze(&content, &AnalysisOptions::from(config));
        tracing::info!(
            "Total processing time for {}: {:?}",
            path.display(),
            start_time.elapsed()
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_big5() {
        let (bytes, _, had_errors) =
            encoding_rs::BIG5.encode("[I] 1 09:00:00.000 OS Version: 繁體中文版");
        assert!(!had_errors);
        let text = LogFileLoader::decode(&bytes, "big5", true).expect("valid big5");
        assert!(text.ends_with("繁體中文版"));
    }

    #[test]
    fn test_wrong_encoding_changes_text() {
        let (bytes, _, _) = encoding_rs::BIG5.encode("中文");
        let text = LogFileLoader::decode(&bytes, "windows-1252", false).expect("lossy decode");
        assert_ne!(text, "中文");
    }

    #[test]
    fn test_unknown_encoding_label() {
        let err = LogFileLoader::decode(b"abc", "klingon", false).expect_err("unknown label");
        assert!(matches!(err, LoadError::UnknownEncoding(ref l) if l == "klingon"));
    }

    #[test]
    fn test_strict_decoding_rejects_malformed_bytes() {
        // 0x81 0x20 is not a valid Big5 pair
        let bytes = [b'o', b'k', 0x81, 0x20];
        let err = LogFileLoader::decode(&bytes, "big5", true).expect_err("malformed");
        assert!(matches!(err, LoadError::Decode { encoding: "Big5" }));
        let lossy = LogFileLoader::decode(&bytes, "big5", false).expect("lossy decode");
        assert!(lossy.starts_with("ok"));
        assert!(lossy.contains('\u{fffd}'));
    }

    #[test]
    fn test_load_big5_file_end_to_end() {
        use crate::core::filter::LineFilter;
        use std::fmt::Write as _;

        let mut body = String::from(
            "[I] 1 09:00:00.000 OS Version: Windows 10 專業版\r\n\
             [I] 1 09:00:00.100 AP Version: 6.80.2\r\n\
             [I] 1 09:00:00.200 Features: 期貨,選擇權\r\n\
             [I] 1 09:00:00.300 XSAuth: Pro\r\n\
             [I] 1 09:00:00.400 XSPreset: Default\r\n",
        );
        for i in 0..1200 {
            let _ = writeln!(body, "[I] 2 09:00:01.000 heartbeat {i}");
        }
        body.push_str("[E] 2 09:00:02.000 error: 連線中斷");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("terminal.log");
        let (bytes, _, had_errors) = encoding_rs::BIG5.encode(&body);
        assert!(!had_errors);
        std::fs::write(&path, &bytes).expect("write log");

        let config = AnalyzerConfig {
            strict_decoding: true,
            ..AnalyzerConfig::default()
        };
        let analysis = LogFileLoader::load(&path, &config).expect("loads");

        assert_eq!(analysis.line_count(), 1206);
        assert_eq!(analysis.statistics.error_count, 1);
        let snapshot = &analysis.system_info[0];
        let os = snapshot.os_version.as_ref().expect("os version");
        assert_eq!(os.value, "Windows 10 專業版");
        assert_eq!(analysis.permissions.len(), 1);
        assert_eq!(analysis.permissions[0].permissions.features, "期貨,選擇權");
        assert_eq!(analysis.permissions[0].permissions.xs_auth, "Pro");

        let mut deliverer = analysis.deliverer(config.page_size);
        let mut text = deliverer.restart(LineFilter::All);
        assert_eq!(text.lines().count(), 500);
        assert!(deliverer.load_more(&mut text));
        assert!(deliverer.load_more(&mut text));
        assert!(!deliverer.has_more());
        assert!(text.ends_with("error: 連線中斷"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = LogFileLoader::load(
            Path::new("/definitely/not/here.log"),
            &AnalyzerConfig::default(),
        )
        .expect_err("missing file");
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.log"));
    }
}
