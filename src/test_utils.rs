// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

use crate::http::{HTTPError, HTTPResult};
use crate::instagram::service::{self as instagram, Query, Variables};
use crate::tiktok::service::{self as tiktok, Listing};
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::fs;
use std::sync::Mutex;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

/// A service that replays canned responses in order and remembers every
/// request made of it.
///
/// Once the script runs out, every further request fails with a 404.
#[derive(Debug, Default)]
pub struct ScriptedService {
    responses: Mutex<VecDeque<HTTPResult<String>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers the next request with the contents of `tests/data/<fixture>.json`.
    pub fn respond_with(self, fixture: &str) -> Self {
        self.respond_with_body(&load_data(fixture))
    }

    pub fn respond_with_body(self, body: &str) -> Self {
        self.push(Ok(body.to_string()))
    }

    pub fn fail_with(self, status: StatusCode) -> Self {
        self.push(Err(HTTPError::Http(status)))
    }

    /// A description of every request made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, response: HTTPResult<String>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    fn answer(&self, call: String) -> HTTPResult<String> {
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(HTTPError::Http(StatusCode::NOT_FOUND)))
    }
}

impl instagram::Service for ScriptedService {
    fn query(
        &self,
        shortcode: &str,
        query: Query,
        variables: &Variables,
    ) -> impl Future<Output = HTTPResult<String>> + Send {
        let variables = serde_json::to_string(variables).expect("could not serialize variables");
        std::future::ready(self.answer(format!("{query:?} {shortcode} {variables}")))
    }
}

impl tiktok::Service for ScriptedService {
    fn list(
        &self,
        listing: &Listing<'_>,
        count: u32,
        page: u32,
    ) -> impl Future<Output = HTTPResult<String>> + Send {
        std::future::ready(self.answer(format!("{listing} count {count} page {page}")))
    }
}
