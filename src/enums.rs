// src/enums.rs
//! Lifecycle status of one artifact, as stored in the ledger's `status` column

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// `created → zipped → encrypted → decrypted → extracted`, plus the absorbing `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Created,
    Zipped,
    Encrypted,
    Decrypted,
    Extracted,
    Error,
}

impl Status {
    /// Forward order of the happy path
    pub const SEQUENCE: [Status; 5] = [
        Status::Created,
        Status::Zipped,
        Status::Encrypted,
        Status::Decrypted,
        Status::Extracted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Created => "created",
            Status::Zipped => "zipped",
            Status::Encrypted => "encrypted",
            Status::Decrypted => "decrypted",
            Status::Extracted => "extracted",
            Status::Error => "error",
        }
    }

    /// The single status a successful transition moves to, if any
    pub fn next(self) -> Option<Status> {
        match self {
            Status::Created => Some(Status::Zipped),
            Status::Zipped => Some(Status::Encrypted),
            Status::Encrypted => Some(Status::Decrypted),
            Status::Decrypted => Some(Status::Extracted),
            Status::Extracted | Status::Error => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Extracted | Status::Error)
    }

    /// `error` is reachable from every non-terminal status
    pub fn can_fail(self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Status::Created),
            "zipped" => Ok(Status::Zipped),
            "encrypted" => Ok(Status::Encrypted),
            "decrypted" => Ok(Status::Decrypted),
            "extracted" => Ok(Status::Extracted),
            "error" => Ok(Status::Error),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}
