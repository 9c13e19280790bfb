//! CLI command handlers. Each command is in its own file.

mod add_user;
mod assets;
mod bucket;
mod download;
mod shell;
mod stats;
mod upload;
mod users;

pub use add_user::run_add_user;
pub use assets::run_assets;
pub use bucket::run_bucket;
pub use download::run_download;
pub use shell::run_shell;
pub use stats::run_stats;
pub use upload::run_upload;
pub use users::run_users;
