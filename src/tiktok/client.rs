// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Walks TikTok comment threads.
//!
//! Each page of a video's comments is stored in a [`Thread`]. Comments that
//! report replies are queued as the page is read, and the queue is drained,
//! one reply walk per comment, before the next page is requested. The
//! thread is flattened into rows once the walk is over.

use crate::clock;
use crate::http::HTTPResult;
use crate::record::{self, FlatRecord};
use crate::scrape::Scraper;
use crate::tiktok::service::{Listing, Service, TikTokService};
use crate::tiktok::thing::{Comment, CommentList};
use crate::tiktok::thread::{NodeId, Thread};
use crate::walk::{self, WalkState};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

/// Number of comments requested per page.
pub const COMMENTS_PER_PAGE: u32 = 50;

/// Time to wait between two pages of the same walk.
///
/// TikTok tolerates back-to-back requests, so there is no delay by default.
pub const PAGE_DELAY: Duration = Duration::ZERO;

/// A comment or reply, flattened into an output row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommentRow {
    /// Id of the video the comment belongs to.
    pub aweme_id: String,

    /// Id of the comment itself.
    pub comment_id: Option<String>,

    /// Id of the comment a reply answers; absent for top-level comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<String>,

    /// Author's unique handle.
    pub username: Option<String>,

    /// Author's display name.
    pub nickname: Option<String>,

    /// Text of the comment.
    pub comment: Option<String>,

    /// When the comment was posted, in seconds since the Unix epoch.
    pub create_time: Option<i64>,

    /// URL of the author's avatar thumbnail.
    pub avatar: Option<String>,

    /// Number of replies TikTok reports for the comment.
    pub total_reply: Option<u64>,

    /// True for replies.
    pub is_reply: bool,
}

impl CommentRow {
    fn new(aweme_id: &str, comment: &Comment, parent: Option<&Comment>) -> Self {
        Self {
            aweme_id: aweme_id.to_string(),
            comment_id: comment.id().map(String::from),
            parent_comment_id: parent.and_then(Comment::id).map(String::from),
            username: comment.username().map(String::from),
            nickname: comment.nickname().map(String::from),
            comment: comment.text().map(String::from),
            create_time: comment.create_time(),
            avatar: comment.avatar().map(String::from),
            total_reply: comment.total_reply(),
            is_reply: parent.is_some(),
        }
    }

    /// Flattens `thread` into rows for the video `aweme_id`.
    pub fn from_thread(aweme_id: &str, thread: &Thread) -> Vec<Self> {
        thread
            .flatten()
            .into_iter()
            .map(|node| {
                let parent = node
                    .parent()
                    .and_then(|id| thread.get(id))
                    .map(|p| p.comment());
                Self::new(aweme_id, node.comment(), parent)
            })
            .collect()
    }
}

/// Scrapes comments and replies from TikTok videos.
///
/// The scraper holds no per-video state; every call names the video it is
/// about.
#[derive(Debug)]
pub struct TikTokScraper<S = TikTokService> {
    service: S,
    page_delay: Duration,
}

impl TikTokScraper {
    /// Creates a scraper that talks to TikTok.
    pub fn new() -> HTTPResult<Self> {
        let service = TikTokService::new()?;
        Ok(Self::with_service(service))
    }
}

impl<S: Service> TikTokScraper<S> {
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

    /// Retrieves every comment on the video `aweme_id`, along with their
    /// replies.
    ///
    /// The walk ends early if a page cannot be fetched or decoded, or comes
    /// back without comments; whatever was collected up to that point is
    /// returned.
    pub async fn fetch_thread(&self, aweme_id: &str) -> Thread {
        let mut thread = Thread::default();
        let listing = Listing::Comments { aweme_id };
        let mut page = 1;

        loop {
            let Some(list) = self.fetch(&listing, page).await else {
                break;
            };
            if list.is_empty() {
                break;
            }
            if page == 1
                && let Some(caption) = list.caption()
            {
                info!("Video {aweme_id}: {caption}");
            }

            let (comments, state) = list.into_page(page).into_parts();
            let mut pending: VecDeque<NodeId> = VecDeque::new();
            for comment in comments {
                log_comment(&comment);
                let wants_replies = comment.has_replies();
                let id = thread.push_comment(comment);
                if wants_replies {
                    pending.push_back(id);
                }
            }

            while let Some(parent) = pending.pop_front() {
                self.expand_replies(aweme_id, &mut thread, parent).await;
            }

            match state {
                WalkState::Walking(next) => {
                    page = next;
                    walk::pause(self.page_delay).await;
                }
                WalkState::Done => break,
            }
        }

        thread
    }

    /// Retrieves every reply to the comment `comment_id` on the video
    /// `aweme_id`.
    ///
    /// Replies are never expanded further, even if TikTok reports replies
    /// of their own.
    pub async fn fetch_replies(&self, aweme_id: &str, comment_id: &str) -> Vec<Comment> {
        let listing = Listing::Replies {
            aweme_id,
            comment_id,
        };
        let mut replies = vec![];
        let mut page = 1;

        loop {
            let Some(list) = self.fetch(&listing, page).await else {
                break;
            };
            if list.is_empty() {
                break;
            }

            let (comments, state) = list.into_page(page).into_parts();
            for comment in &comments {
                log_comment(comment);
            }
            replies.extend(comments);

            match state {
                WalkState::Walking(next) => {
                    page = next;
                    walk::pause(self.page_delay).await;
                }
                WalkState::Done => break,
            }
        }

        replies
    }

    async fn expand_replies(&self, aweme_id: &str, thread: &mut Thread, parent: NodeId) {
        let Some(comment_id) = thread
            .get(parent)
            .and_then(|node| node.comment().id())
            .map(String::from)
        else {
            warn!("Comment without an id on video {aweme_id} reports replies; skipping them");
            return;
        };

        info!("Fetching replies for comment {comment_id}");
        for reply in self.fetch_replies(aweme_id, &comment_id).await {
            if thread.push_reply(parent, reply).is_none() {
                warn!("Comment {comment_id} is itself a reply; dropping its replies");
                return;
            }
        }
    }

    async fn fetch(&self, listing: &Listing<'_>, page: u32) -> Option<CommentList> {
        let body = match self.service.list(listing, COMMENTS_PER_PAGE, page).await {
            Ok(body) => body,
            Err(err) => {
                error!("HTTP error fetching page {page} of {listing}: {err}");
                return None;
            }
        };

        match CommentList::parse(&body) {
            Ok(list) => Some(list),
            Err(err) => {
                error!("Invalid response for page {page} of {listing}: {err}");
                None
            }
        }
    }
}

impl<S: Service> Scraper for TikTokScraper<S> {
    fn platform(&self) -> &'static str {
        "TikTok"
    }

    async fn scrape(&self, content_id: &str) -> Result<Vec<FlatRecord>, record::Error> {
        let thread = self.fetch_thread(content_id).await;
        CommentRow::from_thread(content_id, &thread)
            .iter()
            .map(FlatRecord::from_serialize)
            .collect()
    }
}

fn log_comment(comment: &Comment) {
    debug!(
        "{} - {}: {}",
        clock::describe(comment.create_time()),
        comment.username().unwrap_or_default(),
        comment.text().unwrap_or_default()
    );
}
