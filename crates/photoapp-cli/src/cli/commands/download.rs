//! `photoapp download` – fetch an asset and save it locally.

use crate::cli::render::settle;
use anyhow::Result;
use photoapp_core::client::PhotoAppClient;
use photoapp_core::transport::Transport;
use std::io::Write;
use std::path::Path;

pub fn run_download<T: Transport>(
    client: &PhotoAppClient<T>,
    asset_id: &str,
    display: bool,
    dir: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let url = client.endpoint(&["image", asset_id], None)?;
    let Some(saved) = settle(out, &url, client.download_to_dir(asset_id, dir))? else {
        return Ok(());
    };

    writeln!(out, "userid: {}", saved.user_id)?;
    writeln!(out, "asset name: {}", saved.asset_name)?;
    writeln!(out, "bucket key: {}", saved.bucket_key)?;
    writeln!(out, "Downloaded from S3 and saved as '{}'", saved.path.display())?;

    if display {
        writeln!(
            out,
            "Displaying images is not supported here; open '{}' with a local viewer.",
            saved.path.display()
        )?;
    }
    Ok(())
}
