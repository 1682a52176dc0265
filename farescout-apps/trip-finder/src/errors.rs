//!  Farescout Trip Finder
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Provider Errors
//!
//! Failure classification shared by the flight and hotel provider adapters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider rejected credentials (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid JSON response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Authentication-style failures are the only ones worth another operating mode.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ProviderError::Unauthorized { .. })
    }

    /// Map a non-2xx status and its body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        let preview = body.chars().take(300).collect::<String>();
        match status {
            401 | 403 => ProviderError::Unauthorized {
                status,
                message: preview,
            },
            _ => ProviderError::Status {
                status,
                body: preview,
            },
        }
    }
}

impl From<wreq::Error> for ProviderError {
    fn from(e: wreq::Error) -> Self {
        ProviderError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        ProviderError::Decode(e.to_string())
    }
}
