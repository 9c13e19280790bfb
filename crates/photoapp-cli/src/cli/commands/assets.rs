//! `photoapp assets` – list all assets.

use crate::cli::render::settle;
use anyhow::Result;
use photoapp_core::client::PhotoAppClient;
use photoapp_core::transport::Transport;
use std::io::Write;

pub fn run_assets<T: Transport>(client: &PhotoAppClient<T>, out: &mut impl Write) -> Result<()> {
    let url = client.endpoint(&["assets"], None)?;
    let Some(assets) = settle(out, &url, client.assets())? else {
        return Ok(());
    };
    for asset in assets {
        writeln!(out, "{}", asset.assetid)?;
        writeln!(out, "  {}", asset.userid)?;
        writeln!(out, "  {}", asset.assetname)?;
        writeln!(out, "  {}", asset.bucketkey)?;
    }
    Ok(())
}
