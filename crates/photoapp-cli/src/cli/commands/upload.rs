//! `photoapp upload` – upload a local image for a user.

use crate::cli::render::settle;
use anyhow::Result;
use photoapp_core::client::PhotoAppClient;
use photoapp_core::transport::Transport;
use std::io::Write;
use std::path::Path;

pub fn run_upload<T: Transport>(
    client: &PhotoAppClient<T>,
    path: &Path,
    user_id: &str,
    out: &mut impl Write,
) -> Result<()> {
    if !path.is_file() {
        writeln!(out, "Local file '{}' does not exist...", path.display())?;
        return Ok(());
    }

    let url = client.endpoint(&["image", user_id], None)?;
    if let Some(uploaded) = settle(out, &url, client.upload_file(path, user_id))? {
        writeln!(out, "Image uploaded, asset id = {}", uploaded.assetid)?;
    }
    Ok(())
}
