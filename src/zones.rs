//! Reading zone lists.

use std::io::{self, BufRead};

/// Reads zone identifiers, one per line.
///
/// Lines are trimmed; blank lines and lines starting with `#` are ignored.
pub fn read_zones<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut zones = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        zones.push(line.to_owned());
    }
    Ok(zones)
}
