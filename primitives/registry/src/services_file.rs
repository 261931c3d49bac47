//! Services file format
//!
//! A services file is UTF-8 text with one implementer name per line. A `#` starts
//! a comment that runs to the end of the line; surrounding whitespace and blank
//! lines are ignored. Files written by this module are sorted when the caller
//! passes a sorted collection, which `ProviderRegistry` always provides.

use std::collections::BTreeSet;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};

/// Parse the entries of a services file.
///
/// Duplicate lines collapse into one entry. Invalid UTF-8 surfaces as an
/// [`io::ErrorKind::InvalidData`] error.
pub fn read_services(input: impl Read) -> io::Result<BTreeSet<String>> {
    let mut services = BTreeSet::new();
    for line in BufReader::new(input).lines() {
        let line = line?;
        let entry = match line.find('#') {
            Some(comment_start) => &line[..comment_start],
            None => line.as_str(),
        };
        let entry = entry.trim();
        if !entry.is_empty() {
            services.insert(entry.to_string());
        }
    }
    Ok(services)
}

/// Write `services` to `output`, one per line, and flush.
///
/// Every entry is checked with [`check_services`] before anything is written.
pub fn write_services<S: AsRef<str>>(
    services: impl IntoIterator<Item = S>,
    output: impl Write,
) -> io::Result<()> {
    let services: Vec<S> = services.into_iter().collect();
    check_services(&services)?;

    let mut writer = BufWriter::new(output);
    for service in &services {
        writer.write_all(service.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Check that every entry reads back unchanged from a services file.
///
/// Empty entries, entries with surrounding whitespace and entries containing a
/// line break or `#` are rejected with [`io::ErrorKind::InvalidInput`].
pub fn check_services<S: AsRef<str>>(services: &[S]) -> io::Result<()> {
    match services.iter().find(|s| !is_valid_entry(s.as_ref())) {
        Some(bad) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid services file entry {:?}", bad.as_ref()),
        )),
        None => Ok(()),
    }
}

fn is_valid_entry(entry: &str) -> bool {
    !entry.is_empty()
        && entry == entry.trim()
        && !entry.contains(['\n', '\r'])
        && !entry.contains('#')
}
