use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::config::RelayConfig;
use crate::error::PersistError;

/// Attempts at finding an unused output file name before giving up.
const MAX_CREATE_ATTEMPTS: u32 = 16;

/// Owner of the single reusable output file.
///
/// The file is created on the first successful [`persist`](Self::persist)
/// and kept open until the sink is dropped. Every call truncates it and
/// rewrites it from offset zero, so after a successful call the file holds
/// exactly the bytes passed in.
#[derive(Debug)]
pub struct PersistenceSink {
    dir: PathBuf,
    prefix: String,
    sync_on_write: bool,
    /// `None` until the first successful creation.
    output: Option<OutputFile>,
}

#[derive(Debug)]
struct OutputFile {
    path: PathBuf,
    file: File,
}

impl PersistenceSink {
    /// Sink that will create `<dir>/<prefix>…` on first use.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            sync_on_write: false,
            output: None,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(&config.output_dir, &config.output_prefix).with_sync(config.sync_on_write)
    }

    /// `fsync` file data after each rewrite.
    pub fn with_sync(mut self, sync_on_write: bool) -> Self {
        self.sync_on_write = sync_on_write;
        self
    }

    /// Location of the output file, once it exists.
    pub fn path(&self) -> Option<&Path> {
        self.output.as_ref().map(|output| output.path.as_path())
    }

    pub fn is_open(&self) -> bool {
        self.output.is_some()
    }

    /// Replace the output file's contents with `bytes`.
    ///
    /// Returns the path of the output file. A failure after creation (truncate,
    /// seek, write) is not rolled back and may leave a malformed payload behind.
    pub fn persist(&mut self, bytes: &[u8]) -> Result<&Path, PersistError> {
        let output = match self.output.take() {
            Some(output) => output,
            None => OutputFile::create(&self.dir, &self.prefix)?,
        };
        let output = self.output.insert(output);
        output.rewrite(bytes, self.sync_on_write)?;
        debug!(path = ?output.path, len = bytes.len(), "output file rewritten");
        Ok(&output.path)
    }
}

impl OutputFile {
    fn create(dir: &Path, prefix: &str) -> Result<Self, PersistError> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let base = format!("{prefix}{}-{stamp}", std::process::id());

        let mut last_err = None;
        for attempt in 0..MAX_CREATE_ATTEMPTS {
            let name = if attempt == 0 {
                base.clone()
            } else {
                format!("{base}-{attempt}")
            };
            let path = dir.join(name);
            match open_new(&path) {
                Ok(file) => {
                    info!(?path, "created output file");
                    return Ok(Self { path, file });
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => last_err = Some(err),
                Err(err) => {
                    return Err(PersistError::Create {
                        dir: dir.to_path_buf(),
                        source: err,
                    })
                }
            }
        }

        Err(PersistError::Create {
            dir: dir.to_path_buf(),
            source: last_err
                .unwrap_or_else(|| std::io::Error::from(ErrorKind::AlreadyExists)),
        })
    }

    fn rewrite(&mut self, bytes: &[u8], sync: bool) -> Result<(), PersistError> {
        self.file.set_len(0).map_err(PersistError::Truncate)?;
        self.file
            .seek(SeekFrom::Start(0))
            .map_err(PersistError::Seek)?;
        self.file.write_all(bytes).map_err(PersistError::Write)?;
        if sync {
            self.file.sync_data().map_err(PersistError::Sync)?;
        }
        Ok(())
    }
}

fn open_new(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}
