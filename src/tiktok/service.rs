// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for TikTok's web comment API.
//!
//! TikTok pages comments by numeric offset rather than by opaque cursor:
//! page `n` of size `count` starts at offset `(n - 1) * count`.

use crate::http::{self, HTTPResult, HTTPService};
use reqwest::{Client, RequestBuilder};
use std::fmt;

/// Base URL of TikTok's web API.
pub const API_URL: &str = "https://www.tiktok.com/api";

const APP_ID: &str = "1988";

/// A paginated comment listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Listing<'a> {
    /// Top-level comments on a video.
    Comments {
        /// The video's id.
        aweme_id: &'a str,
    },

    /// Replies to a single comment.
    Replies {
        /// The id of the video the comment was posted on.
        aweme_id: &'a str,

        /// The comment's id.
        comment_id: &'a str,
    },
}

impl Listing<'_> {
    /// Endpoint serving the listing.
    pub fn uri(&self) -> String {
        match self {
            Listing::Comments { .. } => format!("{API_URL}/comment/list/"),
            Listing::Replies { .. } => format!("{API_URL}/comment/list/reply/"),
        }
    }

    /// Query parameters selecting `count` items from `page` (1-based).
    pub fn params(&self, count: u32, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("aid", APP_ID.to_string())];
        match self {
            Listing::Comments { aweme_id } => {
                params.push(("aweme_id", aweme_id.to_string()));
            }
            Listing::Replies {
                aweme_id,
                comment_id,
            } => {
                params.push(("comment_id", comment_id.to_string()));
                params.push(("item_id", aweme_id.to_string()));
            }
        }
        params.push(("count", count.to_string()));
        params.push(("cursor", offset(count, page).to_string()));
        params
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listing::Comments { aweme_id } => write!(f, "comments on {aweme_id}"),
            Listing::Replies {
                aweme_id,
                comment_id,
            } => write!(f, "replies to {comment_id} on {aweme_id}"),
        }
    }
}

/// The offset of the first item of `page` (1-based).
///
/// # Examples
///
/// ```
/// use commentdump::tiktok::service::offset;
/// assert_eq!(offset(50, 1), 0);
/// assert_eq!(offset(50, 3), 100);
/// ```
pub fn offset(count: u32, page: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(count)
}

/// A service for retrieving comment listings from TikTok.
///
/// Using this trait, clients can implement different ways of connecting
/// to TikTok, such as an actual connector for production code, and a
/// mocked connector for testing purposes.
pub trait Service {
    /// Retrieves `page` (1-based) of `listing`, `count` items at a time,
    /// and returns the raw JSON response.
    fn list(
        &self,
        listing: &Listing<'_>,
        count: u32,
        page: u32,
    ) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A service that contacts TikTok directly.
#[derive(Debug)]
pub struct TikTokService {
    client: Client,
}

impl TikTokService {
    /// Creates a new TikTok service.
    pub fn new() -> HTTPResult<Self> {
        let client = Self::client()?;
        Ok(Self { client })
    }

    fn request(&self, listing: &Listing<'_>, count: u32, page: u32) -> RequestBuilder {
        self.client
            .get(listing.uri())
            .query(&listing.params(count, page))
    }
}

impl HTTPService for TikTokService {}

impl Service for TikTokService {
    async fn list(&self, listing: &Listing<'_>, count: u32, page: u32) -> HTTPResult<String> {
        http::fetch(self.request(listing, count, page)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMENTS: Listing<'static> = Listing::Comments {
        aweme_id: "7301234567890",
    };

    const REPLIES: Listing<'static> = Listing::Replies {
        aweme_id: "7301234567890",
        comment_id: "7302000000000000001",
    };

    #[test]
    fn it_computes_offsets_from_pages() {
        assert_eq!(offset(50, 1), 0);
        assert_eq!(offset(50, 2), 50);
        assert_eq!(offset(20, 4), 60);
    }

    #[test]
    fn it_computes_offsets_past_the_range_of_a_page_number() {
        assert_eq!(offset(50, u32::MAX), 214_748_364_700);
        assert_eq!(offset(u32::MAX, u32::MAX), 18_446_744_060_824_649_730);
    }

    #[test]
    fn it_treats_page_zero_as_the_first_page() {
        assert_eq!(offset(50, 0), 0);
    }

    #[test]
    fn it_returns_a_uri_for_comments() {
        let request = TikTokService::new()
            .unwrap()
            .request(&COMMENTS, 50, 2)
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://www.tiktok.com/api/comment/list/?aid=1988&aweme_id=7301234567890&count=50&cursor=50"
        );
    }

    #[test]
    fn it_returns_a_uri_for_replies() {
        let request = TikTokService::new()
            .unwrap()
            .request(&REPLIES, 50, 1)
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://www.tiktok.com/api/comment/list/reply/\
            ?aid=1988&comment_id=7302000000000000001&item_id=7301234567890&count=50&cursor=0"
        );
    }

    #[test]
    fn it_describes_listings() {
        assert_eq!(COMMENTS.to_string(), "comments on 7301234567890");
        assert_eq!(
            REPLIES.to_string(),
            "replies to 7302000000000000001 on 7301234567890"
        );
    }
}
