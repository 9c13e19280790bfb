//! `photoapp add-user` – insert or update a user.

use crate::cli::render::settle;
use anyhow::Result;
use photoapp_core::client::PhotoAppClient;
use photoapp_core::records::NewUser;
use photoapp_core::transport::Transport;
use std::io::Write;
use uuid::Uuid;

/// Upsert by email. A new user gets a fresh bucket folder name.
pub fn run_add_user<T: Transport>(
    client: &PhotoAppClient<T>,
    email: &str,
    lastname: &str,
    firstname: &str,
    out: &mut impl Write,
) -> Result<()> {
    let user = NewUser {
        email: email.to_string(),
        lastname: lastname.to_string(),
        firstname: firstname.to_string(),
        bucketfolder: Uuid::new_v4().to_string(),
    };
    tracing::debug!(email, bucketfolder = %user.bucketfolder, "upserting user");

    let url = client.endpoint(&["user"], None)?;
    if let Some(done) = settle(out, &url, client.upsert_user(&user))? {
        writeln!(out, "User {} successfully {}", done.userid, done.message)?;
    }
    Ok(())
}
