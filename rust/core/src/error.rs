// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the ingestion pipeline.

use thiserror::Error;

/// Pipeline error.
#[derive(Debug, Error)]
pub enum Error {
    /// Document is larger than the configured hard ceiling.
    /// Raised before any content byte is read.
    #[error("document is {size} bytes, exceeding the {limit} byte ceiling")]
    SizeExceeded { size: u64, limit: u64 },

    /// The document could not be interpreted as DXF group pairs.
    /// Recoverable: callers fall back to the line scanner.
    #[error("structural error at line {line}: {message}")]
    Structural { line: usize, message: String },

    /// The document could not be read at all. Fatal for the invocation.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a structural error with a 1-based source line.
    pub fn structural(line: usize, message: impl Into<String>) -> Self {
        Error::Structural {
            line,
            message: message.into(),
        }
    }

    /// Whether this error signals fallback rather than failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Structural { .. })
    }
}

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
