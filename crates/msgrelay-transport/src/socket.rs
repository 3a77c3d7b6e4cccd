use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;

use tracing::{debug, info};

use crate::address::ListenAddress;
use crate::error::{Result, TransportError};
use crate::stream::LocalStream;

/// Listening local socket.
///
/// Abstract-namespace addresses leave nothing on disk. Filesystem paths are
/// created with mode `0o600` and removed again on drop, provided the path
/// still refers to the socket this listener created.
pub struct LocalSocket {
    listener: UnixListener,
    addr: ListenAddress,
    /// `(dev, ino)` of the socket file we created (filesystem sockets only).
    created_inode: Option<(u64, u64)>,
}

impl LocalSocket {
    /// Default permission mode for created socket paths.
    pub const DEFAULT_SOCKET_MODE: u32 = 0o600;
    /// Unix `sockaddr_un.sun_path` is 108 bytes on Linux, 104 on macOS.
    #[cfg(target_os = "linux")]
    const MAX_PATH_LEN: usize = 108;
    #[cfg(not(target_os = "linux"))]
    const MAX_PATH_LEN: usize = 104;

    /// Bind and listen on `addr`.
    pub fn bind(addr: &ListenAddress) -> Result<Self> {
        match addr {
            ListenAddress::Abstract(name) => Self::bind_abstract(name),
            ListenAddress::Path(path) => Self::bind_path(path),
        }
    }

    #[cfg(target_os = "linux")]
    fn bind_abstract(name: &str) -> Result<Self> {
        let addr = ListenAddress::Abstract(name.to_string());
        let listener = abstract_socket_addr(name)
            .and_then(|sa| UnixListener::bind_addr(&sa))
            .map_err(|source| TransportError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        info!(%addr, "listening on abstract socket");

        Ok(Self {
            listener,
            addr,
            created_inode: None,
        })
    }

    #[cfg(not(target_os = "linux"))]
    fn bind_abstract(_name: &str) -> Result<Self> {
        Err(TransportError::Unsupported("abstract namespace"))
    }

    fn bind_path(path: &Path) -> Result<Self> {
        let bind_err = |source| TransportError::Bind {
            addr: path.display().to_string(),
            source,
        };

        let path_bytes = path.as_os_str().len();
        if path_bytes >= Self::MAX_PATH_LEN {
            return Err(TransportError::PathTooLong {
                path: path.to_path_buf(),
                len: path_bytes,
                max: Self::MAX_PATH_LEN,
            });
        }

        // Remove a stale socket, but never anything that is not a socket.
        if let Ok(metadata) = std::fs::symlink_metadata(path) {
            if !metadata.file_type().is_socket() {
                return Err(bind_err(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "existing path is not a unix socket",
                )));
            }
            debug!(?path, "removing stale socket");
            std::fs::remove_file(path).map_err(bind_err)?;
        }

        let listener = UnixListener::bind(path).map_err(bind_err)?;
        std::fs::set_permissions(
            path,
            std::fs::Permissions::from_mode(Self::DEFAULT_SOCKET_MODE),
        )
        .map_err(bind_err)?;
        let created = std::fs::symlink_metadata(path).map_err(bind_err)?;

        info!(?path, "listening on unix domain socket");

        Ok(Self {
            listener,
            addr: ListenAddress::Path(path.to_path_buf()),
            created_inode: Some((created.dev(), created.ino())),
        })
    }

    /// Accept an incoming connection (blocking).
    pub fn accept(&self) -> Result<LocalStream> {
        let (stream, _peer) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!(addr = %self.addr, "accepted connection");
        Ok(LocalStream::from_unix(stream))
    }

    /// Connect to a listening socket (blocking).
    pub fn connect(addr: &ListenAddress) -> Result<LocalStream> {
        let connect_err = |source| TransportError::Connect {
            addr: addr.to_string(),
            source,
        };
        let stream = match addr {
            ListenAddress::Path(path) => UnixStream::connect(path).map_err(connect_err)?,
            #[cfg(target_os = "linux")]
            ListenAddress::Abstract(name) => abstract_socket_addr(name)
                .and_then(|sa| UnixStream::connect_addr(&sa))
                .map_err(connect_err)?,
            #[cfg(not(target_os = "linux"))]
            ListenAddress::Abstract(_) => {
                return Err(TransportError::Unsupported("abstract namespace"))
            }
        };
        debug!(%addr, "connected to local socket");
        Ok(LocalStream::from_unix(stream))
    }

    /// The address this socket is bound to.
    pub fn local_addr(&self) -> &ListenAddress {
        &self.addr
    }
}

#[cfg(target_os = "linux")]
fn abstract_socket_addr(name: &str) -> std::io::Result<std::os::unix::net::SocketAddr> {
    use std::os::linux::net::SocketAddrExt;

    std::os::unix::net::SocketAddr::from_abstract_name(name.as_bytes())
}

impl Drop for LocalSocket {
    fn drop(&mut self) {
        let (Some(path), Some((expected_dev, expected_ino))) =
            (self.addr.as_path(), self.created_inode)
        else {
            return;
        };
        if let Ok(metadata) = std::fs::symlink_metadata(path) {
            if metadata.file_type().is_socket()
                && metadata.dev() == expected_dev
                && metadata.ino() == expected_ino
            {
                debug!(?path, "cleaning up socket file");
                let _ = std::fs::remove_file(path);
            } else {
                debug!(?path, "socket path identity changed; skipping cleanup");
            }
        }
    }
}
