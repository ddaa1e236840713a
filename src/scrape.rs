// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Runs a scraper over a list of content ids and saves what it finds.

use crate::ids;
use crate::record::{self, FlatRecord, OutputTable};
use crate::sink;
use log::{error, info};
use std::path::Path;

/// Something that can turn a content id into flat comment records.
pub trait Scraper {
    /// Name of the platform being scraped, for log messages.
    fn platform(&self) -> &'static str;

    /// Collects every comment and reply on `content_id`, flattened into
    /// records.
    ///
    /// Network failures are not errors: they end the walk early and the
    /// records collected so far are returned.
    fn scrape(
        &self,
        content_id: &str,
    ) -> impl Future<Output = Result<Vec<FlatRecord>, record::Error>>;
}

/// Scrapes each of `ids` in turn and combines the results, in order.
///
/// An id whose records cannot be built is logged and skipped; the remaining
/// ids are still scraped.
pub async fn scrape_all<S: Scraper>(scraper: &S, ids: &[String]) -> OutputTable {
    let mut batches = Vec::with_capacity(ids.len());

    for (n, id) in ids.iter().enumerate() {
        info!(
            "Scraping {} comments for {id} ({}/{})",
            scraper.platform(),
            n + 1,
            ids.len()
        );
        match scraper.scrape(id).await {
            Ok(records) => {
                info!("Retrieved {} comments for {id}", records.len());
                batches.push(records);
            }
            Err(err) => error!("Could not collect comments for {id}: {err}"),
        }
    }

    OutputTable::from_batches(batches)
}

/// Reads content ids from `input`, scrapes them all, and writes the
/// combined records to `output`.
///
/// Returns the number of rows written, or `None` if there was nothing to
/// write.
pub async fn dump<S: Scraper>(
    scraper: &S,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<Option<usize>, sink::Error> {
    let input = input.as_ref();
    let ids = ids::read_ids(input);
    if ids.is_empty() {
        error!("No content ids found in {}", input.display());
        return Ok(None);
    }

    info!("Found {} ids in {}", ids.len(), input.display());
    let table = scrape_all(scraper, &ids).await;
    sink::write_csv(&table, output)
}
