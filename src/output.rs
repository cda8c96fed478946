use std::io::Write;

use crate::error::{Error, Result};
use crate::params::parse_optional_limit;

/// Write up to `limit` log lines to `out`, one per line. A blank or zero limit
/// writes every line. Returns the number of lines written.
pub fn print_logs<W: Write>(out: &mut W, logs: &[String], limit: &str) -> Result<usize> {
    let limit = parse_optional_limit(Some(limit))?;
    if logs.is_empty() {
        return Err(Error::NoLogs);
    }

    let count = match limit {
        Some(l) if !l.is_unlimited() => logs.len().min(usize::from(l.get())),
        _ => logs.len(),
    };
    for line in &logs[..count] {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(count)
}
