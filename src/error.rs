//! Error types.
//!
//! Configuration errors are fatal to one level only (the controller falls
//! back to minimal geometry). Persistence errors are never fatal.

use std::fmt::{self, Display, Formatter};

/// Problems with level data or settings
#[derive(Debug)]
pub enum ConfigError {
    /// No level definition exists for this number
    MissingLevel(u32),
    /// Level has no platforms at all
    EmptyGeometry { level: u32 },
    /// Pipe pair refers to a pipe index that does not exist
    PipeOutOfRange { index: usize, len: usize },
    /// Pipe targets itself or its target does not point back
    UnpairedPipe { index: usize },
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ConfigError::MissingLevel(level) => write!(f, "no definition for level {}", level),
            ConfigError::EmptyGeometry { level } => write!(f, "level {} has no platforms", level),
            ConfigError::PipeOutOfRange { index, len } => {
                write!(f, "pipe index {} out of range ({} pipes)", index, len)
            }
            ConfigError::UnpairedPipe { index } => {
                write!(f, "pipe {} is not part of a mutual pair", index)
            }
            ConfigError::Io(e) => write!(f, "config I/O error, {}", e),
            ConfigError::Parse(e) => write!(f, "config parse error, {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Parse(error)
    }
}

/// Failures reported by a progress store
#[derive(Debug)]
pub enum PersistenceError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    UnknownUser(u64),
    /// The store refused the write
    Rejected(String),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "store I/O error, {}", e),
            PersistenceError::Serde(e) => write!(f, "store encoding error, {}", e),
            PersistenceError::UnknownUser(id) => write!(f, "unknown user {}", id),
            PersistenceError::Rejected(reason) => write!(f, "store rejected write, {}", reason),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(error: std::io::Error) -> Self {
        PersistenceError::Io(error)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(error: serde_json::Error) -> Self {
        PersistenceError::Serde(error)
    }
}
