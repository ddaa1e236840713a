// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Writes collected comments to CSV.

use crate::record::OutputTable;
use log::{info, warn};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Writes `table` to a CSV file at `path`.
///
/// The header is the sorted union of every record's columns; fields a
/// record lacks are left empty. Rows follow the order in which they were
/// collected. Missing parent directories are created.
///
/// If the table is empty nothing is written, a warning is logged, and
/// `None` is returned. Otherwise the number of rows written is returned.
pub fn write_csv(table: &OutputTable, path: impl AsRef<Path>) -> Result<Option<usize>, Error> {
    let path = path.as_ref();

    if table.is_empty() {
        warn!("No comments were retrieved; nothing to save");
        return Ok(None);
    }

    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)?;
    writer.write_record(table.header())?;
    for row in table.rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    info!("Saved {} comments to {}", table.len(), path.display());
    Ok(Some(table.len()))
}

/// An error writing the output file.
#[derive(Debug, Error)]
pub enum Error {
    /// The destination could not be created or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be encoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
