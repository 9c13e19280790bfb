//! Line-oriented prompts for the interactive flows.

use std::io::{self, BufRead, Write};

/// Read one line without its line ending; `None` at end of input.
///
/// Bytes that are not UTF-8 become U+FFFD, so garbled input reaches the
/// caller as an ordinary (invalid) answer.
pub fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut raw = Vec::new();
    if input.read_until(b'\n', &mut raw)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(&raw);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Print `prompt` on its own line and read the answer.
pub fn ask(input: &mut impl BufRead, out: &mut impl Write, prompt: &str) -> io::Result<Option<String>> {
    writeln!(out, "{}", prompt)?;
    out.flush()?;
    read_line(input)
}

/// Yes/no question; anything but `y`/`Y` (including end of input) is no.
pub fn confirm(input: &mut impl BufRead, out: &mut impl Write, prompt: &str) -> io::Result<bool> {
    Ok(ask(input, out, prompt)?.is_some_and(|answer| answer.trim().eq_ignore_ascii_case("y")))
}
