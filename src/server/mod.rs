//! TCP query server.
//!
//! This module ties the corpus store and the matching strategies to the
//! wire: a listener accepts connections (optionally TLS-wrapped) and
//! hands each one to a freshly spawned handler thread.
//!
//! Architecture:
//! - `Server`: binds the socket and runs the accept loop
//! - `handler`: one-query-per-connection protocol logic
//! - `client`: one-shot client used by `lineq query`
//! - `daemon`: background process management (Unix)
//!
//! Concurrency model: one OS thread per accepted connection, unbounded,
//! with blocking IO throughout. The dispatch seam (`Dispatch`) exists so
//! a bounded pool could be substituted without touching the handler.

pub mod client;
#[cfg(unix)]
pub mod daemon;
mod handler;
mod tls;

pub use client::send_query;
pub use handler::{
    HandlerContext, READ_BUFFER_SIZE, RESPONSE_EXISTS, RESPONSE_NOT_FOUND, decode_query,
};

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Config;

/// Read/write timeout on accepted sockets. Hardening only; a stalled
/// peer ties up one thread for at most this long.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Hands a connection job to some execution context.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, job: Box<dyn FnOnce() + Send + 'static>);
}

/// The reference dispatcher: spawn a detached thread per connection.
pub struct ThreadPerConnection;

impl Dispatch for ThreadPerConnection {
    fn dispatch(&self, job: Box<dyn FnOnce() + Send + 'static>) {
        thread::spawn(job);
    }
}

/// The query server: bound listener plus everything handlers share.
pub struct Server {
    listener: TcpListener,
    tls: Option<Arc<rustls::ServerConfig>>,
    ctx: Arc<HandlerContext>,
    dispatcher: Box<dyn Dispatch>,
}

impl Server {
    /// Bind with the reference thread-per-connection dispatcher.
    ///
    /// TLS material and the socket are resolved here so that a bad
    /// certificate, key, or address is fatal before any query is
    /// accepted.
    pub fn bind(config: &Config) -> Result<Self> {
        Self::bind_with_dispatcher(config, Box::new(ThreadPerConnection))
    }

    /// Bind with a caller-supplied dispatcher.
    pub fn bind_with_dispatcher(config: &Config, dispatcher: Box<dyn Dispatch>) -> Result<Self> {
        let tls = if config.ssl_enabled {
            Some(tls::load_server_config(&config.certfile, &config.keyfile)?)
        } else {
            None
        };

        let addr = config.bind_addr();
        let listener =
            TcpListener::bind(&addr).with_context(|| format!("failed to bind to {addr}"))?;

        info!(
            addr = %addr,
            tls = config.ssl_enabled,
            strategy = %config.strategy,
            reread_on_query = config.reread_on_query,
            corpus = %config.corpus_path.display(),
            "server listening"
        );

        Ok(Self {
            listener,
            tls,
            ctx: Arc::new(HandlerContext::from_config(config)),
            dispatcher,
        })
    }

    /// The actual bound address (useful when the config asked for port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept loop. Never returns under normal operation.
    ///
    /// Per-connection failures are contained in their own thread; only
    /// the bind/TLS failures in [`Server::bind`] are fatal.
    pub fn serve(&self) -> Result<()> {
        for stream in self.listener.incoming() {
            match stream {
                Ok(socket) => {
                    let _ = socket.set_read_timeout(Some(CONNECTION_TIMEOUT));
                    let _ = socket.set_write_timeout(Some(CONNECTION_TIMEOUT));

                    let ctx = Arc::clone(&self.ctx);
                    let tls = self.tls.clone();
                    self.dispatcher
                        .dispatch(Box::new(move || serve_connection(socket, tls, &ctx)));
                }
                Err(err) => {
                    warn!(error = %err, "accept failed");
                }
            }
        }
        Ok(())
    }
}

/// Run one connection to completion and close it, success or not.
fn serve_connection(
    socket: TcpStream,
    tls: Option<Arc<rustls::ServerConfig>>,
    ctx: &HandlerContext,
) {
    let peer = socket
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let result = match tls {
        Some(tls_config) => serve_tls_connection(socket, tls_config, &peer, ctx),
        None => {
            let mut socket = socket;
            handler::handle_connection(&mut socket, &peer, ctx)
        }
    };

    if let Err(err) = result {
        debug!(peer = %peer, error = %err, "connection closed with error");
    }
}

/// TLS variant: drive the handshake eagerly so failures get classified,
/// then run the same handler over the encrypted stream.
fn serve_tls_connection(
    socket: TcpStream,
    tls_config: Arc<rustls::ServerConfig>,
    peer: &str,
    ctx: &HandlerContext,
) -> std::io::Result<()> {
    let conn = rustls::ServerConnection::new(tls_config)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    let mut stream = rustls::StreamOwned::new(conn, socket);

    while stream.conn.is_handshaking() {
        if let Err(err) = stream.conn.complete_io(&mut stream.sock) {
            warn!(
                peer = %peer,
                class = tls::handshake_failure_class(&err),
                error = %err,
                "tls handshake failed"
            );
            return Ok(());
        }
    }

    let result = handler::handle_connection(&mut stream, peer, ctx);

    // Clean TLS shutdown; without close_notify a strict client treats
    // the close as truncation.
    stream.conn.send_close_notify();
    let _ = stream.conn.complete_io(&mut stream.sock);

    result
}
