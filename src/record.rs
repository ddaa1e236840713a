// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Flat, tabular comment records.
//!
//! Each platform produces its own typed rows. Before they are written they
//! are turned into [`FlatRecord`]s, which are nothing more than a mapping of
//! column names to scalar values, so rows with different field sets can
//! share one table. An [`OutputTable`] gathers records from every content
//! id and discovers the columns of the final CSV.

use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// A single output row: column names mapped to scalar values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatRecord {
    fields: BTreeMap<String, Value>,
}

impl FlatRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts a typed row into a record.
    ///
    /// The row must serialize to a JSON object; each of its fields becomes
    /// a column. Fields skipped during serialization are absent from the
    /// record altogether.
    pub fn from_serialize<T: Serialize>(row: &T) -> Result<Self, Error> {
        match serde_json::to_value(row)? {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(Error::NotAnObject(other.to_string())),
        }
    }

    /// Adds a field to the record and returns it.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// The value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Column names present in this record, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The CSV cell for `key`; empty if the record has no such field.
    pub fn cell(&self, key: &str) -> String {
        self.get(key).map(render).unwrap_or_default()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let fields = iter.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self { fields }
    }
}

/// Renders a value as the text of a CSV cell.
///
/// Nulls become empty cells and booleans are written as `True` or `False`.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => String::from("True"),
        Value::Bool(false) => String::from("False"),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Every record collected during a run, in discovery order.
#[derive(Debug, Default)]
pub struct OutputTable {
    records: Vec<FlatRecord>,
}

impl OutputTable {
    /// Folds per-content-id batches into one table.
    ///
    /// Batches are appended in order and records keep their relative order
    /// within each batch. Nothing is deduplicated.
    pub fn from_batches(batches: impl IntoIterator<Item = Vec<FlatRecord>>) -> Self {
        batches
            .into_iter()
            .fold(Self::default(), |mut table, batch| {
                table.extend(batch);
                table
            })
    }

    /// Appends a batch of records.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = FlatRecord>) {
        self.records.extend(batch);
    }

    /// The collected records.
    pub fn records(&self) -> &[FlatRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The sorted union of every record's column names.
    pub fn header(&self) -> Vec<String> {
        self.records
            .iter()
            .map(FlatRecord::keys)
            .kmerge()
            .dedup()
            .map(String::from)
            .collect()
    }

    /// Every record rendered as a row of cells aligned with
    /// [`header()`](OutputTable::header).
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> {
        let header = self.header();
        self.records
            .iter()
            .map(move |record| header.iter().map(|key| record.cell(key)).collect())
    }
}

impl FromIterator<FlatRecord> for OutputTable {
    fn from_iter<I: IntoIterator<Item = FlatRecord>>(iter: I) -> Self {
        let records = iter.into_iter().collect();
        Self { records }
    }
}

/// An error converting a typed row into a record.
#[derive(Debug, Error)]
pub enum Error {
    /// The row could not be serialized.
    #[error("Could not serialize row: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The row serialized to something other than an object.
    #[error("Row is not a record: {0}")]
    NotAnObject(String),
}
