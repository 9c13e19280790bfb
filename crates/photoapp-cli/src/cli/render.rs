//! Rendering of failed operations.

use photoapp_core::error::ClientError;
use photoapp_core::response::ClassifiedResult;
use std::io::{self, Write};

/// Returns the success payload, or prints a diagnostic for `url` and returns `None`.
pub fn settle<T>(
    out: &mut impl Write,
    url: &str,
    result: Result<ClassifiedResult<T>, ClientError>,
) -> io::Result<Option<T>> {
    match result {
        Ok(ClassifiedResult::Ok(value)) => Ok(Some(value)),
        Ok(ClassifiedResult::AppError { status, message }) => {
            tracing::warn!(url, status, "service error: {}", message);
            writeln!(out, "Failed with status code: {}", status)?;
            writeln!(out, "url: {}", url)?;
            writeln!(out, "Error message: {}", message)?;
            Ok(None)
        }
        Ok(ClassifiedResult::Unexpected(status)) => {
            tracing::warn!(url, status, "unexpected status");
            writeln!(out, "Failed with status code: {}", status)?;
            writeln!(out, "url: {}", url)?;
            Ok(None)
        }
        Err(err) => {
            report(out, &err)?;
            Ok(None)
        }
    }
}

/// Print a request-layer error. Transport failures have no status code to show.
pub fn report(out: &mut impl Write, err: &ClientError) -> io::Result<()> {
    tracing::error!("{}", err);
    if let Some(status) = err.status() {
        writeln!(out, "Failed with status code: {}", status)?;
    }
    writeln!(out, "**ERROR** {}", err)
}
