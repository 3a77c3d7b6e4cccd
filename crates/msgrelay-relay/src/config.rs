use std::path::PathBuf;
use std::time::Duration;

use msgrelay_codec::DEFAULT_MAX_PAYLOAD;

/// Prefix of the generated output file name.
pub const DEFAULT_OUTPUT_PREFIX: &str = "socket-";

/// Relay behavior configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Directory the output file is created in. Default: the working directory.
    pub output_dir: PathBuf,
    /// Output file name prefix. Default: [`DEFAULT_OUTPUT_PREFIX`].
    pub output_prefix: String,
    /// Largest accepted payload in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Per-connection read timeout. Default: none, a stalled producer blocks the relay.
    pub read_timeout: Option<Duration>,
    /// `fsync` the output file after every rewrite. Default: false.
    pub sync_on_write: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            sync_on_write: false,
        }
    }
}
