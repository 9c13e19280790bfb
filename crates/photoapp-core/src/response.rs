//! Response classification.
//!
//! Interprets a response the retry layer has already settled on. 200 is
//! success, 400 and 500 are application errors that must carry a `message`,
//! anything else is unexpected.

use crate::error::ClientError;
use serde_json::Value;

/// Interpretation of a received response.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedResult<T = Value> {
    /// Status 200 with its decoded body.
    Ok(T),
    /// Status 400 or 500 with the service's `message`.
    AppError { status: u16, message: String },
    /// Any other status.
    Unexpected(u16),
}

impl<T> ClassifiedResult<T> {
    /// Convert the success payload with a fallible `f` (e.g. record decoding).
    pub fn try_map<U, E, F>(self, f: F) -> Result<ClassifiedResult<U>, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        Ok(match self {
            ClassifiedResult::Ok(v) => ClassifiedResult::Ok(f(v)?),
            ClassifiedResult::AppError { status, message } => ClassifiedResult::AppError { status, message },
            ClassifiedResult::Unexpected(status) => ClassifiedResult::Unexpected(status),
        })
    }

    /// Collapse into a `Result`, turning the two failure kinds into errors for `url`.
    pub fn into_result(self, url: &str) -> Result<T, ClientError> {
        match self {
            ClassifiedResult::Ok(v) => Ok(v),
            ClassifiedResult::AppError { status, message } => Err(ClientError::Application {
                url: url.to_string(),
                status,
                message,
            }),
            ClassifiedResult::Unexpected(status) => Err(ClientError::UnexpectedStatus {
                url: url.to_string(),
                status,
            }),
        }
    }
}

/// Classify a response received from `url`.
///
/// Fails with `MalformedResponse` when a 200 body is not JSON, or when a
/// 400/500 body has no string `message`.
pub fn classify(url: &str, status: u16, body: &[u8]) -> Result<ClassifiedResult, ClientError> {
    match status {
        200 => parse_json(url, body).map(ClassifiedResult::Ok),
        400 | 500 => {
            let json = parse_json(url, body)?;
            let message = json
                .get("message")
                .and_then(Value::as_str)
                .ok_or_else(|| ClientError::malformed(url, format!("HTTP {} body has no `message`", status)))?;
            Ok(ClassifiedResult::AppError {
                status,
                message: message.to_string(),
            })
        }
        other => Ok(ClassifiedResult::Unexpected(other)),
    }
}

fn parse_json(url: &str, body: &[u8]) -> Result<Value, ClientError> {
    serde_json::from_slice(body).map_err(|e| ClientError::malformed(url, format!("body is not JSON: {}", e)))
}
