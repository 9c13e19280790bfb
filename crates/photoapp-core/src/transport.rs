//! Transport envelope: a single outbound HTTP request attempt.
//!
//! Uses the curl crate (libcurl easy interface) in blocking mode. One call to
//! [`Transport::send`] is one attempt; retrying is the caller's business.

use crate::error::ClientError;
use curl::easy::{Easy, List};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        };
        f.write_str(s)
    }
}

/// A fully built request: method, absolute URL and optional JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Request {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    /// Request carrying `body` serialized as JSON.
    pub fn json<B: Serialize>(method: Method, url: impl Into<String>, body: &B) -> Result<Self, ClientError> {
        let url = url.into();
        let body = serde_json::to_vec(body).map_err(|source| ClientError::Encode {
            url: url.clone(),
            source,
        })?;
        Ok(Request {
            method,
            url,
            body: Some(body),
        })
    }
}

/// Result of one network attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The service answered, whatever the status.
    Responded { status: u16, body: Vec<u8> },
    /// No response: connect error, timeout, truncated or garbled reply.
    TransportFailed(String),
}

/// Issues one attempt of a request.
///
/// `Err` means the request could not be issued at all (bad URL, handle setup
/// failure) and the whole call should be abandoned. A failed attempt on the
/// wire is `Ok(RequestOutcome::TransportFailed(..))`.
pub trait Transport {
    fn send(&self, request: &Request) -> Result<RequestOutcome, ClientError>;
}

/// Timeouts applied to every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Blocking libcurl transport. A fresh easy handle is used per attempt.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: CurlOptions,
}

impl CurlTransport {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }

    fn prepare(&self, request: &Request) -> Result<Easy, curl::Error> {
        let mut easy = Easy::new();
        easy.url(&request.url)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;

        match request.method {
            Method::Get => easy.get(true)?,
            Method::Post => easy.post(true)?,
            Method::Put => easy.custom_request("PUT")?,
        }

        let mut list = List::new();
        list.append("Accept: application/json")?;
        if let Some(body) = &request.body {
            list.append("Content-Type: application/json")?;
            // Large bodies would otherwise wait on `100 Continue`.
            list.append("Expect:")?;
            easy.post_fields_copy(body)?;
        }
        easy.http_headers(list)?;
        Ok(easy)
    }
}

impl Transport for CurlTransport {
    fn send(&self, request: &Request) -> Result<RequestOutcome, ClientError> {
        let setup_failed = |e: curl::Error| ClientError::Transport {
            url: request.url.clone(),
            cause: e.to_string(),
        };

        let mut easy = self.prepare(request).map_err(setup_failed)?;
        let mut body = Vec::new();
        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(setup_failed)?;
            transfer.perform()
        };

        if let Err(e) = performed {
            return Ok(RequestOutcome::TransportFailed(e.to_string()));
        }

        match easy.response_code() {
            Ok(code) if (100..=599).contains(&code) => Ok(RequestOutcome::Responded {
                status: code as u16,
                body,
            }),
            Ok(code) => Ok(RequestOutcome::TransportFailed(format!(
                "invalid HTTP status {}",
                code
            ))),
            Err(e) => Ok(RequestOutcome::TransportFailed(e.to_string())),
        }
    }
}
