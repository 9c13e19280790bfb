//! `photoapp shell` – interactive numbered menu.

use super::{run_add_user, run_assets, run_bucket, run_download, run_stats, run_upload, run_users};
use crate::cli::prompt::{ask, read_line};
use anyhow::Result;
use photoapp_core::client::PhotoAppClient;
use photoapp_core::transport::Transport;
use std::io::{BufRead, Write};
use std::path::Path;

const MENU: &str = "\
>> Enter a command:
   0 => end
   1 => stats
   2 => users
   3 => assets
   4 => download
   5 => download and display
   6 => bucket contents
   7 => add user
   8 => upload
";

/// Prompt for commands until `0` or end of input. Downloads go to `download_dir`.
pub fn run_shell<T: Transport>(
    client: &PhotoAppClient<T>,
    download_dir: &Path,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "** Welcome to PhotoApp **")?;

    loop {
        writeln!(out)?;
        write!(out, "{}", MENU)?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            break;
        };
        let cmd: u32 = match line.trim().parse() {
            Ok(cmd) => cmd,
            Err(_) => {
                writeln!(out, "ERROR: invalid input")?;
                continue;
            }
        };
        tracing::debug!(cmd, "shell command");

        match cmd {
            0 => break,
            1 => run_stats(client, out)?,
            2 => run_users(client, out)?,
            3 => run_assets(client, out)?,
            4 | 5 => {
                let Some(asset_id) = ask(input, out, "Enter asset id>")? else {
                    break;
                };
                run_download(client, asset_id.trim(), cmd == 5, download_dir, out)?;
            }
            6 => run_bucket(client, false, input, out)?,
            7 => {
                let Some(email) = ask(input, out, "Enter user's email>")? else {
                    break;
                };
                let Some(lastname) = ask(input, out, "Enter user's last (family) name>")? else {
                    break;
                };
                let Some(firstname) = ask(input, out, "Enter user's first (given) name>")? else {
                    break;
                };
                run_add_user(client, &email, &lastname, &firstname, out)?;
            }
            8 => {
                let Some(filename) = ask(input, out, "Enter local filename>")? else {
                    break;
                };
                let path = Path::new(&filename);
                if !path.is_file() {
                    writeln!(out, "Local file '{}' does not exist...", filename)?;
                    continue;
                }
                let Some(user_id) = ask(input, out, "Enter user id>")? else {
                    break;
                };
                run_upload(client, path, user_id.trim(), out)?;
            }
            _ => writeln!(out, "** Unknown command, try again...")?,
        }
    }

    writeln!(out)?;
    writeln!(out, "** done **")?;
    Ok(())
}
