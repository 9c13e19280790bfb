pub mod config;
pub mod logging;

// Request layer
pub mod client;
pub mod codec;
pub mod error;
pub mod filename;
pub mod paginate;
pub mod records;
pub mod response;
pub mod retry;
pub mod transport;
