//! # lineq - Exact-Line Query Server
//!
//! lineq answers a single question per TCP connection: does this exact
//! line exist in a configured text file? A client sends raw query bytes,
//! the server replies with one verdict line and closes.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`config`] - TOML configuration loading and validation
//! - [`corpus`] - Corpus file store with cache/reread freshness policies
//! - [`search`] - The pluggable matching strategies
//! - [`server`] - Listener, per-connection handler, TLS, client, daemon
//! - [`output`] - Verdict formatting for the CLI client
//!
//! ## Quick Start
//!
//! ```ignore
//! use lineq::config::Config;
//! use lineq::server::Server;
//!
//! let config = Config::load(std::path::Path::new("lineq.toml")).unwrap();
//! let server = Server::bind(&config).unwrap();
//! server.serve().unwrap(); // never returns under normal operation
//! ```
//!
//! ## Matching strategies
//!
//! Seven interchangeable backends answer the same membership question:
//! `linear`, `sorted`, `aho-corasick` and `regex` require whole-line
//! equality, while `kmp`, `boyer-moore` and `rabin-karp` historically
//! report any substring occurrence. The `whole_line_only` configuration
//! knob unifies all seven under exact equality.

pub mod config;
pub mod corpus;
pub mod output;
pub mod search;
pub mod server;
