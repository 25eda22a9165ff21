//! URL status definitions for tracking crawl progress
//!
//! Every queue entry carries exactly one of these. The numeric codes are the
//! on-disk representation in the queue file and must never be renumbered.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raised when a persisted status code does not map to any known status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown URL status code {0}")]
pub struct UnknownStatusCode(pub u8);

/// Represents the crawl status of a single queued URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UrlStatus {
    /// Queued and waiting to be visited
    Pending,

    /// Visited, and an article was extracted and stored
    Downloaded,

    /// No configured source recognizes the URL
    Unsupported,

    /// The URL could not be reached
    Unavailable,

    /// The URL is not a valid absolute URL
    Invalid,

    /// The page holds no article but was mined for links
    IsIndex,

    /// The fetch failed (transport error or non-success response)
    Failed,
}

impl UrlStatus {
    /// Returns the persisted integer code
    pub fn code(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Downloaded => 1,
            Self::Unsupported => 2,
            Self::Unavailable => 3,
            Self::Invalid => 4,
            Self::IsIndex => 5,
            Self::Failed => 6,
        }
    }

    /// Parses a persisted integer code
    ///
    /// Returns None if the code doesn't match any known status.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Downloaded),
            2 => Some(Self::Unsupported),
            3 => Some(Self::Unavailable),
            4 => Some(Self::Invalid),
            5 => Some(Self::IsIndex),
            6 => Some(Self::Failed),
            _ => None,
        }
    }

    /// Human readable description used in progress reporting
    pub fn description(&self) -> &'static str {
        match self {
            Self::Pending => "Pending download",
            Self::Downloaded => "Downloaded",
            Self::Unsupported => "The source is unsupported",
            Self::Unavailable => "The URL is unavailable",
            Self::Invalid => "The URL is invalid",
            Self::IsIndex => "The page is an index",
            Self::Failed => "Download failed",
        }
    }

    /// Returns true if the cursor may hand out an entry with this status
    ///
    /// Unsupported entries stay eligible so that a later run with more
    /// sources configured picks them up again.
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Pending | Self::Unsupported)
    }

    /// Returns all possible statuses in code order
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Downloaded,
            Self::Unsupported,
            Self::Unavailable,
            Self::Invalid,
            Self::IsIndex,
            Self::Failed,
        ]
    }
}

impl From<UrlStatus> for u8 {
    fn from(status: UrlStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for UrlStatus {
    type Error = UnknownStatusCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(UnknownStatusCode(code))
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
