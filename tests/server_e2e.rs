//! End-to-end tests over real TCP (and TLS) connections.
//!
//! Each test binds a server on port 0, spawns the accept loop on a
//! background thread, and talks to it with plain sockets or the bundled
//! client, verifying the byte-exact wire contract.

use std::fs;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::thread;

use tempfile::NamedTempFile;

use lineq::config::Config;
use lineq::search::{MatchMode, Strategy};
use lineq::server::{RESPONSE_EXISTS, RESPONSE_NOT_FOUND, Server, send_query};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn corpus_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn base_config(corpus: &Path) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        reread_on_query: true,
        ssl_enabled: false,
        certfile: fixture("cert.pem"),
        keyfile: fixture("key.pem"),
        corpus_path: corpus.to_path_buf(),
        strategy: Strategy::Linear,
        match_mode: MatchMode::Substring,
    }
}

/// Bind on port 0, run the accept loop in the background, return the
/// real address.
fn start_server(config: &Config) -> SocketAddr {
    let server = Server::bind(config).unwrap();
    let addr = server.local_addr().unwrap();
    thread::spawn(move || {
        let _ = server.serve();
    });
    addr
}

/// One query over a raw socket: write, half-close, read the verdict.
fn query_raw(addr: SocketAddr, query: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(query).unwrap();
    stream.shutdown(Shutdown::Write).unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[test]
fn test_reread_scenario_connecting_now() {
    let corpus = corpus_file("connecting\nnow\n");
    let addr = start_server(&base_config(corpus.path()));

    assert_eq!(query_raw(addr, b"connecting"), RESPONSE_EXISTS);
    assert_eq!(query_raw(addr, b"now"), RESPONSE_EXISTS);
    assert_eq!(query_raw(addr, b"later"), RESPONSE_NOT_FOUND);
    assert_eq!(query_raw(addr, b""), RESPONSE_NOT_FOUND);
}

#[test]
fn test_every_strategy_over_the_wire() {
    let corpus = corpus_file("connecting\nnow\n");
    for strategy in Strategy::ALL {
        let config = Config {
            strategy,
            ..base_config(corpus.path())
        };
        let addr = start_server(&config);

        assert_eq!(
            query_raw(addr, b"connecting"),
            RESPONSE_EXISTS,
            "strategy {strategy}"
        );
        assert_eq!(
            query_raw(addr, b"later"),
            RESPONSE_NOT_FOUND,
            "strategy {strategy}"
        );
    }
}

#[test]
fn test_substring_semantics_diverge_on_the_wire() {
    let corpus = corpus_file("hello\nworld\n");

    let kmp = Config {
        strategy: Strategy::Kmp,
        ..base_config(corpus.path())
    };
    let addr = start_server(&kmp);
    assert_eq!(query_raw(addr, b"ell"), RESPONSE_EXISTS);

    let linear = base_config(corpus.path());
    let addr = start_server(&linear);
    assert_eq!(query_raw(addr, b"ell"), RESPONSE_NOT_FOUND);
}

#[test]
fn test_whole_line_only_unifies_semantics() {
    let corpus = corpus_file("hello\nworld\n");
    let config = Config {
        strategy: Strategy::RabinKarp,
        match_mode: MatchMode::WholeLine,
        ..base_config(corpus.path())
    };
    let addr = start_server(&config);

    assert_eq!(query_raw(addr, b"ell"), RESPONSE_NOT_FOUND);
    assert_eq!(query_raw(addr, b"world"), RESPONSE_EXISTS);
}

#[test]
fn test_query_terminators_and_padding_are_stripped() {
    let corpus = corpus_file("connecting\n");
    let addr = start_server(&base_config(corpus.path()));

    assert_eq!(query_raw(addr, b"connecting\n"), RESPONSE_EXISTS);
    assert_eq!(query_raw(addr, b"connecting\r\n"), RESPONSE_EXISTS);
    assert_eq!(query_raw(addr, b"connecting\x00\x00"), RESPONSE_EXISTS);
}

#[test]
fn test_reread_mode_reflects_file_changes() {
    let corpus = corpus_file("before\n");
    let addr = start_server(&base_config(corpus.path()));

    assert_eq!(query_raw(addr, b"before"), RESPONSE_EXISTS);
    assert_eq!(query_raw(addr, b"after"), RESPONSE_NOT_FOUND);

    fs::write(corpus.path(), "after\n").unwrap();
    assert_eq!(query_raw(addr, b"before"), RESPONSE_NOT_FOUND);
    assert_eq!(query_raw(addr, b"after"), RESPONSE_EXISTS);
}

#[test]
fn test_cached_mode_serves_stale_snapshot() {
    let corpus = corpus_file("before\n");
    let config = Config {
        reread_on_query: false,
        ..base_config(corpus.path())
    };
    let addr = start_server(&config);

    assert_eq!(query_raw(addr, b"before"), RESPONSE_EXISTS);

    fs::write(corpus.path(), "after\n").unwrap();
    assert_eq!(query_raw(addr, b"before"), RESPONSE_EXISTS);
    assert_eq!(query_raw(addr, b"after"), RESPONSE_NOT_FOUND);
}

#[test]
fn test_repeated_queries_are_idempotent() {
    let corpus = corpus_file("connecting\nnow\n");
    for reread in [true, false] {
        let config = Config {
            reread_on_query: reread,
            ..base_config(corpus.path())
        };
        let addr = start_server(&config);
        for _ in 0..3 {
            assert_eq!(query_raw(addr, b"now"), RESPONSE_EXISTS);
            assert_eq!(query_raw(addr, b"never"), RESPONSE_NOT_FOUND);
        }
    }
}

#[test]
fn test_missing_corpus_reports_error_and_keeps_serving() {
    let corpus_path = std::env::temp_dir().join(format!("lineq-absent-{}.txt", std::process::id()));
    let _ = fs::remove_file(&corpus_path);

    let addr = start_server(&base_config(&corpus_path));

    assert_eq!(query_raw(addr, b"anything"), "Error: File not found.\n");

    // The listener survives the failed query; later connections work
    // once the corpus appears.
    fs::write(&corpus_path, "anything\n").unwrap();
    assert_eq!(query_raw(addr, b"anything"), RESPONSE_EXISTS);
    let _ = fs::remove_file(&corpus_path);
}

#[test]
fn test_oversized_query_is_truncated() {
    let line = "x".repeat(1024);
    let corpus = corpus_file(&format!("{line}\n"));
    let addr = start_server(&base_config(corpus.path()));

    // 1500 bytes sent, 1024 read: the truncated query equals the line
    let oversized = "x".repeat(1500);
    assert_eq!(query_raw(addr, oversized.as_bytes()), RESPONSE_EXISTS);
}

#[test]
fn test_concurrent_clients_are_isolated() {
    let corpus = corpus_file("connecting\nnow\n");
    let addr = start_server(&base_config(corpus.path()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let (query, expected): (&[u8], &str) = if i % 2 == 0 {
                    (b"connecting", RESPONSE_EXISTS)
                } else {
                    (b"missing", RESPONSE_NOT_FOUND)
                };
                for _ in 0..5 {
                    assert_eq!(query_raw(addr, query), expected);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_tls_round_trip_with_bundled_client() {
    let corpus = corpus_file("connecting\nnow\n");
    let mut config = Config {
        ssl_enabled: true,
        ..base_config(corpus.path())
    };
    let addr = start_server(&config);
    config.port = addr.port();

    assert_eq!(send_query(&config, "connecting").unwrap(), RESPONSE_EXISTS);
    assert_eq!(send_query(&config, "later").unwrap(), RESPONSE_NOT_FOUND);
}

#[test]
fn test_plaintext_client_against_tls_listener_is_dropped() {
    let corpus = corpus_file("connecting\n");
    let mut config = Config {
        ssl_enabled: true,
        ..base_config(corpus.path())
    };
    let addr = start_server(&config);
    config.port = addr.port();

    // Not a TLS ClientHello; the handshake fails and the server closes
    // without a response.
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(b"connecting").unwrap();
    stream.shutdown(Shutdown::Write).unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    assert!(response.is_empty());

    // The listener keeps accepting proper TLS clients afterwards
    assert_eq!(send_query(&config, "connecting").unwrap(), RESPONSE_EXISTS);
}

#[test]
fn test_plain_client_helper_matches_raw_socket() {
    let corpus = corpus_file("connecting\n");
    let mut config = base_config(corpus.path());
    let addr = start_server(&config);
    config.port = addr.port();

    assert_eq!(send_query(&config, "connecting").unwrap(), RESPONSE_EXISTS);
    assert_eq!(send_query(&config, "nope").unwrap(), RESPONSE_NOT_FOUND);
}
