// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! commentdump is a command-line tool for saving the comment threads of
//! Instagram posts and TikTok videos. It pages through every comment on
//! each post or video, along with the replies to those comments, and writes
//! the lot to a single CSV file with one row per comment or reply.
//!
//! # Examples
//!
//! Dump the comments on every TikTok video listed in the first column of
//! `urls.csv` to `data/tiktok/all_comments.csv`:
//!
//! ```bash
//! commentdump tiktok
//! ```
//!
//! Read video ids from another file and write somewhere else:
//!
//! ```bash
//! commentdump tiktok --input-file videos.csv --output tiktok.csv
//! ```
//!
//! Dump the comments on every Instagram post listed in
//! `instagram_urls.csv` to `data/instagram/all_instagram_comments.csv`:
//!
//! ```bash
//! commentdump instagram
//! ```
//!
//! Show each comment as it is retrieved:
//!
//! ```bash
//! commentdump -v tiktok
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! commentdump --help
//! ```
//!
//! # Instagram Setup
//!
//! Instagram only answers comment queries for logged-in sessions. Log in to
//! Instagram in a web browser, copy the values of the `sessionid`,
//! `ds_user_id`, `csrftoken`, and `mid` cookies, and store them in the
//! following environment variables:
//!
//! ```bash
//! $ export INSTAGRAM_SESSION_ID='copied sessionid'
//! $ export INSTAGRAM_USER_ID='copied ds_user_id'
//! $ export INSTAGRAM_CSRF_TOKEN='copied csrftoken'
//! $ export INSTAGRAM_MID='copied mid'
//! ```
//!
//! They can also be passed as `--session-id`, `--user-id`, `--csrf-token`,
//! and `--machine-id`. Requests are spaced two seconds apart so the session
//! is not flagged for scraping.
//!
//! # Input and Output
//!
//! Input files are CSV files with a header row. Only the first column is
//! read; it holds one post shortcode or video id per row, and blank rows
//! are skipped.
//!
//! The output's header is the sorted union of the columns of every row.
//! Replies immediately follow the comment they answer and carry its id in
//! `parent_comment_id`. If no comments are found, no file is written.
//!
//! # License
//!
//! commentdump is licensed under the terms of the [Apache License 2.0].
//! Please see the LICENSE file accompanying this source code or visit the
//! previous link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0

pub mod cli;
pub mod clock;
pub mod conf;
pub mod http;
pub mod ids;
pub mod instagram;
pub mod record;
pub mod scrape;
pub mod sink;
pub mod tiktok;
pub mod walk;

#[cfg(test)]
mod test_utils;
