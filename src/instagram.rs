// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Retrieves comments on Instagram posts.
//!
//! Instagram's GraphQL endpoint requires a logged-in session, so every
//! request carries the session cookies supplied as [`Credentials`].

pub mod client;
pub mod service;
pub mod thing;

pub use client::InstagramScraper;
pub use service::{Credentials, InstagramService};
