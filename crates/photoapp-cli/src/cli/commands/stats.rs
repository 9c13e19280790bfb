//! `photoapp stats` – bucket status and database counts.

use crate::cli::render::settle;
use anyhow::Result;
use photoapp_core::client::PhotoAppClient;
use photoapp_core::transport::Transport;
use std::io::Write;

pub fn run_stats<T: Transport>(client: &PhotoAppClient<T>, out: &mut impl Write) -> Result<()> {
    let url = client.endpoint(&["stats"], None)?;
    if let Some(stats) = settle(out, &url, client.stats())? {
        writeln!(out, "bucket status: {}", stats.message)?;
        writeln!(out, "# of users: {}", stats.num_users)?;
        writeln!(out, "# of assets: {}", stats.num_assets)?;
    }
    Ok(())
}
