use std::fmt;
use std::path::PathBuf;

use msgrelay_codec::CodecError;
use msgrelay_transport::TransportError;

/// Pipeline stage at which a connection was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Accept,
    Read,
    Decode,
    Encode,
    Persist,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Accept => "accept",
            Stage::Read => "read",
            Stage::Decode => "decode",
            Stage::Encode => "encode",
            Stage::Persist => "persist",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors writing the output file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The output file could not be created. The sink stays uninitialized.
    #[error("failed to create output file in {dir}: {source}")]
    Create {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to truncate output file: {0}")]
    Truncate(std::io::Error),

    #[error("failed to seek output file: {0}")]
    Seek(std::io::Error),

    /// The write stopped partway; the file may hold a malformed payload.
    #[error("failed to write output file: {0}")]
    Write(std::io::Error),

    #[error("failed to sync output file: {0}")]
    Sync(std::io::Error),
}

/// A failed relay attempt, tagged with the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("accept failed: {0}")]
    Accept(#[source] TransportError),

    #[error("read failed: {0}")]
    Read(#[source] CodecError),

    #[error("decode failed: {0}")]
    Decode(#[source] CodecError),

    #[error("encode failed: {0}")]
    Encode(#[source] CodecError),

    #[error("persist failed: {0}")]
    Persist(#[from] PersistError),
}

impl RelayError {
    /// The stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            RelayError::Accept(_) => Stage::Accept,
            RelayError::Read(_) => Stage::Read,
            RelayError::Decode(_) => Stage::Decode,
            RelayError::Encode(_) => Stage::Encode,
            RelayError::Persist(_) => Stage::Persist,
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_are_stable() {
        let err = RelayError::Decode(CodecError::Empty);
        assert_eq!(err.stage(), Stage::Decode);
        assert_eq!(err.stage().to_string(), "decode");
        assert_eq!(err.to_string(), "decode failed: empty payload");

        let err = RelayError::from(PersistError::Seek(std::io::Error::other("boom")));
        assert_eq!(err.stage(), Stage::Persist);
    }
}
