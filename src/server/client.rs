//! One-shot query client.
//!
//! Connects, sends the raw query bytes with no framing, reads the single
//! verdict line, done. Mirrors the server's wire contract exactly: one
//! query per connection, 1024-byte bounded read.

use std::io::{self, Read, Write};
use std::net::TcpStream;

use anyhow::{Context, Result};
use rustls::pki_types::ServerName;

use crate::config::Config;

use super::handler::READ_BUFFER_SIZE;
use super::tls;

/// Send one query to the configured server and return the verdict line.
pub fn send_query(config: &Config, query: &str) -> Result<String> {
    let addr = config.bind_addr();
    let socket =
        TcpStream::connect(&addr).with_context(|| format!("failed to connect to {addr}"))?;

    if config.ssl_enabled {
        let server_name = ServerName::try_from(config.host.clone())
            .with_context(|| format!("invalid server name {:?}", config.host))?;
        let conn = rustls::ClientConnection::new(tls::insecure_client_config(), server_name)
            .context("failed to set up TLS client")?;
        let mut stream = rustls::StreamOwned::new(conn, socket);
        exchange(&mut stream, query).context("query over TLS failed")
    } else {
        let mut socket = socket;
        exchange(&mut socket, query).with_context(|| format!("query to {addr} failed"))
    }
}

/// Write the query, read the one response the server sends back.
fn exchange<S: Read + Write>(stream: &mut S, query: &str) -> io::Result<String> {
    stream.write_all(query.as_bytes())?;
    stream.flush()?;

    let mut buf = [0u8; READ_BUFFER_SIZE];
    let n = stream.read(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf[..n]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_exchange_writes_raw_query_bytes() {
        let mut stream = Cursor::new(Vec::new());
        // Empty backing buffer: the read sees EOF, which models a server
        // that closed without answering.
        let response = exchange(&mut stream, "hello").unwrap();
        assert_eq!(response, "");
        assert_eq!(&stream.get_ref()[..5], b"hello");
    }
}
