//! Errors surfaced by the request layer.
//!
//! Every variant carries the URL (or local path) it failed on, so callers can
//! render a complete diagnostic without tracking request state themselves.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was obtained: the retry budget ran out on transport
    /// failures, or the request could not be issued at all.
    #[error("no response from {url}: {cause}")]
    Transport { url: String, cause: String },

    /// The service answered 400 or 500 with a `message`.
    #[error("{url} returned HTTP {status}: {message}")]
    Application {
        url: String,
        status: u16,
        message: String,
    },

    /// Any status other than 200, 400 or 500. No message is assumed.
    #[error("{url} returned unexpected HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The request body could not be encoded as JSON; nothing was sent.
    #[error("cannot encode request body for {url}: {source}")]
    Encode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A field that should hold base64 did not decode.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] base64::DecodeError),

    /// A body was not JSON, or lacked a field it must carry.
    #[error("malformed response from {url}: {detail}")]
    MalformedResponse { url: String, detail: String },

    /// Local file read or write failed.
    #[error("local file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    pub(crate) fn malformed(url: &str, detail: impl Into<String>) -> Self {
        ClientError::MalformedResponse {
            url: url.to_string(),
            detail: detail.into(),
        }
    }

    /// HTTP status carried by the error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Application { status, .. } | ClientError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
