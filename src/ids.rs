// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Reads the content ids to scrape from a CSV file.

use log::error;
use std::fs;
use std::path::Path;

/// Reads content ids from the first column of the CSV file at `path`.
///
/// The first line is always treated as a header and skipped, even when it is
/// blank. Cells are trimmed, and rows whose first cell is missing or blank
/// are ignored.
///
/// A file that is missing or cannot be read is logged and yields no ids, in
/// which case there is simply nothing to scrape.
pub fn read_ids(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    try_read_ids(path).unwrap_or_else(|err| {
        error!("Could not read ids from '{}': {err}", path.display());
        vec![]
    })
}

fn try_read_ids(path: &Path) -> Result<Vec<String>, csv::Error> {
    let contents = fs::read(path)?;

    // The csv reader drops blank lines before it picks a header, so a blank
    // first line has to be consumed here.
    let (has_headers, body) = match contents.iter().position(|&b| b == b'\n') {
        Some(end) if contents[..end].trim_ascii().is_empty() => (false, &contents[end + 1..]),
        _ => (true, &contents[..]),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(body);

    let mut ids = vec![];
    for record in reader.records() {
        let record = record?;
        if let Some(id) = record.get(0).map(str::trim).filter(|id| !id.is_empty()) {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_input(contents: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.csv");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn it_reads_the_first_column_after_the_header() {
        let (_dir, path) = write_input("id,url\nabc,https://x\ndef,https://y\n");
        assert_eq!(read_ids(&path), vec!["abc", "def"]);
    }

    #[test]
    fn it_trims_ids() {
        let (_dir, path) = write_input("id\n  abc  \n\tdef\n");
        assert_eq!(read_ids(&path), vec!["abc", "def"]);
    }

    #[test]
    fn it_skips_blank_first_cells() {
        let (_dir, path) = write_input("id,note\n,orphan\n   ,spaces\nghi,ok\n");
        assert_eq!(read_ids(&path), vec!["ghi"]);
    }

    #[test]
    fn it_skips_the_first_row_unconditionally() {
        let (_dir, path) = write_input("7301234567890\n7309876543210\n");
        assert_eq!(read_ids(&path), vec!["7309876543210"]);
    }

    #[test]
    fn it_skips_a_blank_first_line_as_the_header() {
        let (_dir, path) = write_input("\nabc\ndef\n");
        assert_eq!(read_ids(&path), vec!["abc", "def"]);

        let (_dir, path) = write_input("\r\nabc\r\n");
        assert_eq!(read_ids(&path), vec!["abc"]);
    }

    #[test]
    fn it_skips_blank_lines_between_ids() {
        let (_dir, path) = write_input("id\nabc\n\n\ndef\n");
        assert_eq!(read_ids(&path), vec!["abc", "def"]);
    }

    #[test]
    fn it_accepts_rows_of_different_lengths() {
        let (_dir, path) = write_input("id,a,b\nabc\ndef,1,2,3\n");
        assert_eq!(read_ids(&path), vec!["abc", "def"]);
    }

    #[test]
    fn it_returns_nothing_for_a_header_only_file() {
        let (_dir, path) = write_input("id\n");
        assert!(read_ids(&path).is_empty());
    }

    #[test]
    fn it_returns_nothing_for_a_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(read_ids(dir.path().join("nope.csv")).is_empty());
    }
}
