//! `photoapp users` – list all users.

use crate::cli::render::settle;
use anyhow::Result;
use photoapp_core::client::PhotoAppClient;
use photoapp_core::transport::Transport;
use std::io::Write;

pub fn run_users<T: Transport>(client: &PhotoAppClient<T>, out: &mut impl Write) -> Result<()> {
    let url = client.endpoint(&["users"], None)?;
    let Some(users) = settle(out, &url, client.users())? else {
        return Ok(());
    };
    for user in users {
        writeln!(out, "{}", user.userid)?;
        writeln!(out, "  {}", user.email)?;
        writeln!(out, "  {} , {}", user.lastname, user.firstname)?;
        writeln!(out, "  {}", user.bucketfolder)?;
    }
    Ok(())
}
