#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Command-line client for the Simpli.fi advertising API.
//!
//! Layout:
//! - `cli.rs`: argument parsing, the closed action set, and dispatch
//! - `commands/`: one handler per action, grouped by API resource
//! - `client.rs`: shared HTTP context, errors, and response classification
//! - `output.rs`: console and file output in JSON or CSV form
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;

pub use cli::run;
