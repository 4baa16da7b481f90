use anyhow::{Context, Result};
use std::io::Write;

use crate::Client;

/// Prints the absolute URL a request for `path` and `query` would target.
#[tracing::instrument(skip(client, out))]
pub fn resolve(client: &Client, path: &str, query: &str, out: &mut impl Write) -> Result<()> {
    let url = client
        .resolve_url(path, query)
        .context("Failed to resolve request URL")?;
    writeln!(out, "{}", url)?;
    Ok(())
}
