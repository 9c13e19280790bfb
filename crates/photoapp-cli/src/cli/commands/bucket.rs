//! `photoapp bucket` – page through the bucket contents.

use crate::cli::prompt::confirm;
use crate::cli::render::report;
use anyhow::Result;
use photoapp_core::client::PhotoAppClient;
use photoapp_core::paginate::PAGE_SIZE;
use photoapp_core::transport::Transport;
use std::io::{BufRead, Write};

/// Print pages until the listing ends, the user declines another page, or a
/// request fails. With `all`, never ask.
pub fn run_bucket<T: Transport>(
    client: &PhotoAppClient<T>,
    all: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let mut pages = client.bucket_pages();
    let mut last_len = None;

    loop {
        let page = match pages.next() {
            Some(Ok(page)) => page,
            Some(Err(err)) => {
                report(out, &err)?;
                break;
            }
            None => {
                // Ended on an empty page rather than a short one.
                if last_len.map_or(true, |n| n == PAGE_SIZE) {
                    writeln!(out, "No more data.")?;
                }
                break;
            }
        };

        for item in &page {
            writeln!(out, "{}", item.key)?;
            writeln!(out, "  {}", item.last_modified)?;
            writeln!(out, "  {}", item.size)?;
        }
        last_len = Some(page.len());

        if all || pages.is_finished() {
            continue;
        }
        if !confirm(input, out, "another page? [y/n]")? {
            break;
        }
    }

    tracing::debug!(fetches = pages.fetches(), "bucket listing done");
    Ok(())
}
