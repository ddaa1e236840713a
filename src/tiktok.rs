// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Retrieves comments on TikTok videos.

pub mod client;
pub mod service;
pub mod thing;
pub mod thread;

pub use client::TikTokScraper;
pub use service::TikTokService;
pub use thread::Thread;
