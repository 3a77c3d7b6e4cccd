use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::TransportError;

/// Where the relay listens (and where clients connect).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenAddress {
    /// A name in the Linux abstract socket namespace. Never touches the filesystem.
    Abstract(String),
    /// A filesystem socket path.
    Path(PathBuf),
}

impl ListenAddress {
    /// Interpret an externally supplied name.
    ///
    /// Names containing `/` are filesystem paths. Anything else is an
    /// abstract-namespace name; a leading `@` is accepted and stripped.
    pub fn from_name(name: &str) -> Result<Self, TransportError> {
        if name.contains('/') {
            return Ok(Self::Path(PathBuf::from(name)));
        }
        let bare = name.strip_prefix('@').unwrap_or(name);
        if bare.is_empty() {
            return Err(TransportError::InvalidAddress(name.to_string()));
        }
        Ok(Self::Abstract(bare.to_string()))
    }

    /// Filesystem path, if this is a path address.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Abstract(_) => None,
        }
    }
}

impl FromStr for ListenAddress {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for ListenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abstract(name) => write!(f, "@{name}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
