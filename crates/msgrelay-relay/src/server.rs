use std::path::Path;

use msgrelay_transport::{ListenAddress, LocalSocket, TransportError};
use tracing::{info, warn};

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::handler::{handle_connection, Delivery, InboundConnection};
use crate::sink::PersistenceSink;

/// Source of inbound connections for a [`RelayServer`].
pub trait Acceptor {
    type Connection: InboundConnection;

    /// Block until the next connection arrives.
    fn accept(&mut self) -> std::result::Result<Self::Connection, TransportError>;

    /// Where connections come from, for logging.
    fn endpoint(&self) -> String;
}

impl Acceptor for LocalSocket {
    type Connection = msgrelay_transport::LocalStream;

    fn accept(&mut self) -> std::result::Result<Self::Connection, TransportError> {
        LocalSocket::accept(self)
    }

    fn endpoint(&self) -> String {
        self.local_addr().to_string()
    }
}

/// The accept loop.
///
/// Owns the connection source and the [`PersistenceSink`]. Connections are
/// accepted and handled one after another and never overlap, which is the
/// only thing serialising writes to the output file.
pub struct RelayServer<A = LocalSocket> {
    acceptor: A,
    sink: PersistenceSink,
    config: RelayConfig,
}

impl RelayServer<LocalSocket> {
    /// Bind the listening socket. A failure here is fatal to the relay.
    pub fn bind(
        addr: &ListenAddress,
        config: RelayConfig,
    ) -> std::result::Result<Self, TransportError> {
        let socket = LocalSocket::bind(addr)?;
        Ok(Self::with_acceptor(socket, config))
    }

    pub fn local_addr(&self) -> &ListenAddress {
        self.acceptor.local_addr()
    }
}

impl<A: Acceptor> RelayServer<A> {
    /// Relay connections from an already established source.
    pub fn with_acceptor(acceptor: A, config: RelayConfig) -> Self {
        Self {
            acceptor,
            sink: PersistenceSink::from_config(&config),
            config,
        }
    }

    /// Output file location, once the first message has been persisted.
    pub fn output_path(&self) -> Option<&Path> {
        self.sink.path()
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Accept one connection and relay it to completion.
    pub fn serve_one(&mut self) -> Result<Delivery> {
        let conn = self.acceptor.accept().map_err(RelayError::Accept)?;
        handle_connection(conn, &mut self.sink, &self.config)
    }

    /// Serve connections sequentially, calling `on_delivery` after each
    /// successful one.
    ///
    /// Failures are logged with their stage and never end the loop. With
    /// `limit` set, returns after that many accept attempts; otherwise runs
    /// for the life of the process.
    pub fn run<F>(&mut self, limit: Option<usize>, mut on_delivery: F) -> usize
    where
        F: FnMut(&Delivery),
    {
        info!(addr = %self.acceptor.endpoint(), "relay ready");

        let mut attempts = 0usize;
        while limit.is_none_or(|limit| attempts < limit) {
            attempts = attempts.saturating_add(1);
            match self.serve_one() {
                Ok(delivery) => {
                    info!(
                        id = delivery.message.id,
                        sender = delivery.message.sender.id,
                        received = delivery.text.len(),
                        written = delivery.encoded_len,
                        output = ?delivery.output,
                        "message relayed"
                    );
                    on_delivery(&delivery);
                }
                Err(err) => {
                    warn!(stage = %err.stage(), error = %err, "connection abandoned");
                }
            }
        }
        attempts
    }
}
