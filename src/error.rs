use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DdnsError>;

/// Errors raised by the DDNS client and by credential resolution.
#[derive(Debug, Error)]
pub enum DdnsError {
    /// Missing or invalid configuration, detected before any request is sent
    #[error("{0}")]
    Configuration(String),

    /// The endpoint answered with a non-2xx status
    #[error("DDNS endpoint returned {status} for {url}: {body}")]
    Http {
        status: StatusCode,
        url: String,
        body: String,
    },

    /// The request never produced a response
    #[error("Failed to send request to {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl DdnsError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Status code of an HTTP failure, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Perform,
    Cleanup,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Perform => write!(f, "perform"),
            Operation::Cleanup => write!(f, "cleanup"),
        }
    }
}

/// Fatal error surfaced by the authenticator during perform or cleanup.
///
/// The client error that caused it is kept intact and is reachable through
/// [`PluginError::cause`] or [`std::error::Error::source`].
#[derive(Debug, Error)]
#[error("DNS-01 {operation} failed for {record}")]
pub struct PluginError {
    pub operation: Operation,
    pub record: String,
    #[source]
    source: DdnsError,
}

impl PluginError {
    pub fn new(operation: Operation, record: impl Into<String>, source: DdnsError) -> Self {
        Self {
            operation,
            record: record.into(),
            source,
        }
    }

    pub fn cause(&self) -> &DdnsError {
        &self.source
    }

    pub fn into_cause(self) -> DdnsError {
        self.source
    }
}
