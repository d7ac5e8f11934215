//! Tint Language Server Binary
//!
//! Run with: `tint-lsp`
//!
//! The server communicates via stdin/stdout using the Language Server Protocol.

use tint_lsp::run_server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    run_server().await
}
