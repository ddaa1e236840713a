// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Walks Instagram comment threads.
//!
//! Comments on a post are paged through with the GraphQL cursor. Whenever a
//! comment reports threaded replies, a second walk pages through those
//! replies before the next comment is considered. Replies are flattened as
//! they arrive: each one becomes a row right after its parent, carrying the
//! parent's id.

use crate::clock;
use crate::http::HTTPResult;
use crate::instagram::service::{Credentials, InstagramService, Query, Service, Variables};
use crate::instagram::thing::{self, Connection, Node};
use crate::record::{self, FlatRecord};
use crate::scrape::Scraper;
use crate::walk::{self, WalkState};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::time::Duration;

/// Number of comments requested per page.
pub const COMMENTS_PER_PAGE: u32 = 50;

/// Time to wait between two pages of the same walk.
///
/// Instagram flags sessions that page through comments too quickly.
pub const PAGE_DELAY: Duration = Duration::from_secs(2);

/// A comment or reply, flattened into an output row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommentRow {
    /// Shortcode of the post the comment belongs to.
    pub post_id: String,

    /// Id of the top-level comment; a parent comment carries its own id.
    pub parent_comment_id: Option<String>,

    /// Id of the comment itself.
    pub comment_id: Option<String>,

    /// Author's username.
    pub username: Option<String>,

    /// Text of the comment.
    pub comment_text: Option<String>,

    /// When the comment was posted, in seconds since the Unix epoch.
    pub created_at: Option<i64>,

    /// True for threaded replies.
    pub is_reply: bool,
}

impl CommentRow {
    fn parent(shortcode: &str, node: &Node) -> Self {
        Self {
            post_id: shortcode.to_string(),
            parent_comment_id: node.id().map(String::from),
            comment_id: node.id().map(String::from),
            username: node.username().map(String::from),
            comment_text: node.text().map(String::from),
            created_at: node.created_at(),
            is_reply: false,
        }
    }

    fn reply(shortcode: &str, parent_id: &str, node: &Node) -> Self {
        Self {
            parent_comment_id: Some(parent_id.to_string()),
            is_reply: true,
            ..Self::parent(shortcode, node)
        }
    }
}

/// Scrapes comments and replies from Instagram posts.
#[derive(Debug)]
pub struct InstagramScraper<S = InstagramService> {
    service: S,
    page_delay: Duration,
}

impl InstagramScraper {
    /// Creates a scraper that talks to Instagram with the given session.
    pub fn new(credentials: Credentials) -> HTTPResult<Self> {
        let service = InstagramService::new(credentials)?;
        Ok(Self::with_service(service))
    }
}

impl<S: Service> InstagramScraper<S> {
    /// Creates a scraper backed by `service`.
    pub fn with_service(service: S) -> Self {
        Self {
            service,
            page_delay: PAGE_DELAY,
        }
    }

    /// Changes the delay between pages; [`PAGE_DELAY`] by default.
    #[must_use]
    pub fn page_delay(self, page_delay: Duration) -> Self {
        Self { page_delay, ..self }
    }

    /// Retrieves every comment on the post identified by `shortcode`, each
    /// followed by its replies.
    ///
    /// The walk ends early if a page cannot be fetched or decoded; whatever
    /// was collected up to that point is returned.
    pub async fn fetch_comments(&self, shortcode: &str) -> Vec<CommentRow> {
        info!("Fetching comments for post {shortcode}");

        let mut rows = vec![];
        let mut cursor = String::new();

        loop {
            let variables = Variables::comments(shortcode, COMMENTS_PER_PAGE, &cursor);
            let Some(body) = self.fetch(shortcode, Query::Comments, &variables).await else {
                break;
            };

            let connection = match thing::parse_comments(&body) {
                Ok(Some(connection)) => connection,
                Ok(None) => {
                    warn!("No parent comments found for post {shortcode}");
                    break;
                }
                Err(err) => {
                    error!("Invalid response for post {shortcode}, skipping: {err}");
                    break;
                }
            };

            let (nodes, state) = connection.into_page().into_parts();
            for node in nodes {
                log_node(&node);
                rows.push(CommentRow::parent(shortcode, &node));

                if let Some(comment_id) = node.id()
                    && node.reply_count() > 0
                {
                    info!(
                        "Fetching {} replies for comment {comment_id}",
                        node.reply_count()
                    );
                    rows.extend(self.fetch_replies(shortcode, comment_id).await);
                }
            }

            match state {
                WalkState::Walking(next) => {
                    info!("Fetching next page of comments for post {shortcode}");
                    cursor = next;
                    walk::pause(self.page_delay).await;
                }
                WalkState::Done => break,
            }
        }

        rows
    }

    /// Retrieves every reply to the comment identified by `comment_id` on
    /// the post identified by `shortcode`.
    ///
    /// Replies are never expanded further, even if Instagram reports
    /// replies of their own.
    pub async fn fetch_replies(&self, shortcode: &str, comment_id: &str) -> Vec<CommentRow> {
        let mut rows = vec![];
        let mut cursor = String::new();

        loop {
            let variables = Variables::replies(comment_id, COMMENTS_PER_PAGE, &cursor);
            let Some(body) = self.fetch(shortcode, Query::Replies, &variables).await else {
                break;
            };

            let connection: Connection = match thing::parse_replies(&body) {
                Ok(Some(connection)) => connection,
                Ok(None) => {
                    warn!("No replies found for comment {comment_id}");
                    break;
                }
                Err(err) => {
                    error!("Invalid reply data for comment {comment_id}: {err}");
                    break;
                }
            };

            let (nodes, state) = connection.into_page().into_parts();
            for node in nodes {
                log_node(&node);
                rows.push(CommentRow::reply(shortcode, comment_id, &node));
            }

            match state {
                WalkState::Walking(next) => {
                    cursor = next;
                    walk::pause(self.page_delay).await;
                }
                WalkState::Done => break,
            }
        }

        rows
    }

    async fn fetch(&self, shortcode: &str, query: Query, variables: &Variables) -> Option<String> {
        match self.service.query(shortcode, query, variables).await {
            Ok(body) => Some(body),
            Err(err) => {
                error!("HTTP error for {query:?} query on post {shortcode}: {err}");
                None
            }
        }
    }
}

impl<S: Service> Scraper for InstagramScraper<S> {
    fn platform(&self) -> &'static str {
        "Instagram"
    }

    async fn scrape(&self, content_id: &str) -> Result<Vec<FlatRecord>, record::Error> {
        self.fetch_comments(content_id)
            .await
            .iter()
            .map(FlatRecord::from_serialize)
            .collect()
    }
}

fn log_node(node: &Node) {
    debug!(
        "{} - {}: {}",
        clock::describe(node.created_at()),
        node.username().unwrap_or_default(),
        node.text().unwrap_or_default()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ScriptedService, do_logging};
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    fn scraper(service: ScriptedService) -> InstagramScraper<ScriptedService> {
        do_logging();
        InstagramScraper::with_service(service).page_delay(Duration::ZERO)
    }

    fn ids(rows: &[CommentRow]) -> Vec<&str> {
        rows.iter()
            .map(|r| r.comment_id.as_deref().unwrap_or_default())
            .collect()
    }

    #[tokio::test]
    async fn it_walks_every_page_of_comments() {
        let scraper = scraper(
            ScriptedService::new()
                .respond_with("instagram_comments_page1")
                .respond_with("instagram_comments_page2"),
        );
        let rows = scraper.fetch_comments("abc").await;
        assert_eq!(
            ids(&rows),
            vec!["17800000000000001", "17800000000000002", "17800000000000003"]
        );
        assert!(rows.iter().all(|r| !r.is_reply && r.post_id == "abc"));
        assert_eq!(
            scraper.service.calls(),
            vec![
                r#"Comments abc {"shortcode":"abc","first":50}"#,
                r#"Comments abc {"shortcode":"abc","first":50,"after":"c1"}"#,
            ]
        );
    }

    #[tokio::test]
    async fn it_links_parent_comments_to_themselves() {
        let scraper = scraper(ScriptedService::new().respond_with("instagram_comments_page2"));
        let rows = scraper.fetch_comments("abc").await;
        assert_eq!(
            rows,
            vec![CommentRow {
                post_id: String::from("abc"),
                parent_comment_id: Some(String::from("17800000000000003")),
                comment_id: Some(String::from("17800000000000003")),
                username: Some(String::from("third_commenter")),
                comment_text: Some(String::from("Where is this?")),
                created_at: Some(1_700_000_200),
                is_reply: false,
            }]
        );
    }

    #[tokio::test]
    async fn it_places_replies_right_after_their_parent() {
        let scraper = scraper(
            ScriptedService::new()
                .respond_with("instagram_comments_with_replies")
                .respond_with("instagram_replies"),
        );
        let rows = scraper.fetch_comments("abc").await;
        assert_eq!(
            ids(&rows),
            vec![
                "17800000000000010",
                "17900000000000001",
                "17900000000000002",
                "17800000000000011",
            ]
        );
        for reply in &rows[1..3] {
            assert!(reply.is_reply);
            assert_eq!(reply.parent_comment_id.as_deref(), Some("17800000000000010"));
        }
        assert!(!rows[3].is_reply);
    }

    #[tokio::test]
    async fn it_walks_every_page_of_replies() {
        let scraper = scraper(
            ScriptedService::new()
                .respond_with("instagram_comments_with_replies")
                .respond_with("instagram_replies_page1")
                .respond_with("instagram_replies_page2"),
        );
        let rows = scraper.fetch_comments("abc").await;
        assert_eq!(
            ids(&rows),
            vec![
                "17800000000000010",
                "17900000000000021",
                "17900000000000022",
                "17800000000000011",
            ]
        );
        assert!(rows[1].is_reply && rows[2].is_reply);
        assert_eq!(
            scraper.service.calls()[1..].to_vec(),
            vec![
                r#"Replies abc {"comment_id":"17800000000000010","first":50}"#,
                r#"Replies abc {"comment_id":"17800000000000010","first":50,"after":"rc1"}"#,
            ]
        );
    }

    #[tokio::test]
    async fn it_walks_replies_once_per_parent_and_never_deeper() {
        let scraper = scraper(
            ScriptedService::new()
                .respond_with("instagram_comments_with_replies")
                .respond_with("instagram_replies"),
        );
        scraper.fetch_comments("abc").await;
        let calls = scraper.service.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            r#"Replies abc {"comment_id":"17800000000000010","first":50}"#
        );
    }

    #[tokio::test]
    async fn it_keeps_collected_comments_when_a_fetch_fails() {
        let scraper = scraper(
            ScriptedService::new()
                .respond_with("instagram_comments_page1")
                .fail_with(StatusCode::BAD_GATEWAY),
        );
        let rows = scraper.fetch_comments("abc").await;
        assert_eq!(ids(&rows), vec!["17800000000000001", "17800000000000002"]);
        assert_eq!(scraper.service.calls().len(), 2);
    }

    #[tokio::test]
    async fn it_keeps_walking_parents_when_a_reply_fetch_fails() {
        let scraper = scraper(
            ScriptedService::new()
                .respond_with("instagram_comments_with_replies")
                .fail_with(StatusCode::TOO_MANY_REQUESTS),
        );
        let rows = scraper.fetch_comments("abc").await;
        assert_eq!(ids(&rows), vec!["17800000000000010", "17800000000000011"]);
    }

    #[tokio::test]
    async fn it_stops_when_the_post_has_no_media() {
        let scraper = scraper(
            ScriptedService::new()
                .respond_with("instagram_missing_media")
                .respond_with("instagram_comments_page2"),
        );
        let rows = scraper.fetch_comments("abc").await;
        assert!(rows.is_empty());
        assert_eq!(scraper.service.calls().len(), 1);
    }

    #[tokio::test]
    async fn it_stops_when_the_post_has_no_comment_connection() {
        let scraper = scraper(ScriptedService::new().respond_with("instagram_no_comments"));
        let rows = scraper.fetch_comments("abc").await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn it_stops_on_malformed_responses() {
        let scraper = scraper(ScriptedService::new().respond_with_body("not json"));
        let rows = scraper.fetch_comments("abc").await;
        assert!(rows.is_empty());
        assert_eq!(scraper.service.calls().len(), 1);
    }

    #[tokio::test]
    async fn it_scrapes_records() {
        let scraper = scraper(
            ScriptedService::new()
                .respond_with("instagram_comments_with_replies")
                .respond_with("instagram_replies"),
        );
        let records = scraper.scrape("abc").await.unwrap();
        assert_eq!(records.len(), 4);
        let keys = records[1].keys().collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                "comment_id",
                "comment_text",
                "created_at",
                "is_reply",
                "parent_comment_id",
                "post_id",
                "username",
            ]
        );
        assert_eq!(records[1].cell("is_reply"), "True");
        assert_eq!(records[1].cell("parent_comment_id"), "17800000000000010");
        assert_eq!(records[0].cell("is_reply"), "False");
    }
}
