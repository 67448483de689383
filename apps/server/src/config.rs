// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use archimaestro_core::PipelineConfig;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Directory for cache storage.
    pub cache_dir: String,
    /// Maximum upload size in MB; also the pipeline's hard ceiling.
    pub max_file_size_mb: usize,
    /// Uploads at or below this size in MB get a full structural parse.
    pub full_parse_below_mb: usize,
    /// Enumeration cap for parsed entities.
    pub max_entities: usize,
    /// Line cap for the fallback scanner.
    pub max_scan_lines: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Allowed CORS origins (comma-separated, or "*" for all in development).
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .unwrap_or(8080),
            cache_dir: std::env::var("CACHE_DIR").unwrap_or_else(|_| {
                // Docker gets a fixed path; local dev a project-relative one.
                if std::path::Path::new("/.dockerenv").exists() {
                    "/app/cache".into()
                } else {
                    std::env::current_dir()
                        .ok()
                        .and_then(|dir| dir.join(".cache").to_str().map(|s| s.to_string()))
                        .unwrap_or_else(|| "./.cache".into())
                }
            }),
            max_file_size_mb: std::env::var("MAX_FILE_SIZE_MB")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),
            full_parse_below_mb: std::env::var("FULL_PARSE_BELOW_MB")
                .unwrap_or_else(|_| "5".into())
                .parse()
                .unwrap_or(5),
            max_entities: std::env::var("MAX_ENTITIES")
                .unwrap_or_else(|_| "200".into())
                .parse()
                .unwrap_or(200),
            max_scan_lines: std::env::var("MAX_SCAN_LINES")
                .unwrap_or_else(|_| "300".into())
                .parse()
                .unwrap_or(300),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .unwrap_or(60),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| {
                    "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000,http://127.0.0.1:5173".into()
                })
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Pipeline bounds derived from the server configuration.
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            reject_above_bytes: (self.max_file_size_mb * 1024 * 1024) as u64,
            full_parse_below_bytes: (self.full_parse_below_mb * 1024 * 1024) as u64,
            max_enumerated_entities: self.max_entities,
            max_scan_lines: self.max_scan_lines,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
