//! CLI for the PhotoApp web service client.

mod commands;
mod prompt;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use photoapp_core::client::PhotoAppClient;
use photoapp_core::config;
use photoapp_core::transport::Transport;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use commands::{
    run_add_user, run_assets, run_bucket, run_download, run_shell, run_stats, run_upload, run_users,
};

/// Top-level CLI for the PhotoApp client.
#[derive(Debug, Parser)]
#[command(name = "photoapp")]
#[command(about = "PhotoApp: client for the PhotoApp photo storage web service", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/photoapp/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show bucket status and the number of users and assets.
    Stats,

    /// List all users.
    Users,

    /// List all assets.
    Assets,

    /// Download an asset into a local file named after it.
    Download {
        /// Asset identifier.
        asset_id: String,
        /// Also try to display the image (not supported in a terminal).
        #[arg(long)]
        display: bool,
        /// Directory to write into (default: current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// List the bucket contents, one page at a time.
    Bucket {
        /// Fetch every page without asking.
        #[arg(long)]
        all: bool,
    },

    /// Add a user, or update the user with the same email.
    AddUser {
        email: String,
        /// Last (family) name.
        lastname: String,
        /// First (given) name.
        firstname: String,
    },

    /// Upload a local image for a user.
    Upload {
        /// Path to the local file.
        path: PathBuf,
        /// User identifier.
        user_id: String,
    },

    /// Interactive numbered menu.
    Shell,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let path = match cli.config {
            Some(path) => path,
            None => config::config_path()?,
        };
        let cfg = config::load(&path)?;
        let client = PhotoAppClient::from_config(&cfg)?;

        let mut input = io::stdin().lock();
        let mut out = io::stdout().lock();
        cli.command.run(&client, &mut input, &mut out)
    }

    /// Run one command. Service and transport failures are rendered to `out`
    /// and do not fail the command; only local I/O errors do.
    pub fn run<T: Transport>(
        self,
        client: &PhotoAppClient<T>,
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> Result<()> {
        match self {
            CliCommand::Stats => run_stats(client, out)?,
            CliCommand::Users => run_users(client, out)?,
            CliCommand::Assets => run_assets(client, out)?,
            CliCommand::Download {
                asset_id,
                display,
                dir,
            } => {
                let dir = match dir {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                run_download(client, &asset_id, display, &dir, out)?;
            }
            CliCommand::Bucket { all } => run_bucket(client, all, input, out)?,
            CliCommand::AddUser {
                email,
                lastname,
                firstname,
            } => run_add_user(client, &email, &lastname, &firstname, out)?,
            CliCommand::Upload { path, user_id } => run_upload(client, &path, &user_id, out)?,
            CliCommand::Shell => {
                let dir = std::env::current_dir()?;
                run_shell(client, &dir, input, out)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
