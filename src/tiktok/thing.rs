// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Comment listings as returned by TikTok's web API.
//!
//! The comment and reply endpoints answer with the same shape: a
//! `comments` array (or `null` once the listing is exhausted) and a
//! `has_more` flag that TikTok sends as either `0`/`1` or a boolean.

use crate::walk::Page;
use serde::Deserialize;
use thiserror::Error;

/// One page of a comment listing.
#[derive(Debug, Deserialize)]
pub struct CommentList {
    #[serde(default)]
    comments: Option<Vec<Comment>>,

    #[serde(default)]
    has_more: Option<Flag>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(n) => n != 0,
        }
    }
}

impl CommentList {
    /// Parses a response from either listing endpoint.
    pub fn parse(body: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(body)?)
    }

    /// True if the page holds no comments at all.
    pub fn is_empty(&self) -> bool {
        self.comments.as_ref().is_none_or(Vec::is_empty)
    }

    /// True if TikTok says there are more pages after this one.
    pub fn has_more(&self) -> bool {
        self.has_more.is_some_and(Flag::is_set)
    }

    /// Title of the video the comments belong to, as shared alongside the
    /// first comment.
    pub fn caption(&self) -> Option<&str> {
        self.comments
            .as_ref()?
            .first()?
            .share_info
            .as_ref()?
            .title
            .as_deref()
    }

    /// Converts the list into a [`Page`]; the following page is `page + 1`.
    ///
    /// There is no following page once page numbers run out.
    pub fn into_page(self, page: u32) -> Page<Comment, u32> {
        let has_more = self.has_more();
        Page::new(self.comments.unwrap_or_default(), has_more, page.checked_add(1))
    }
}

/// A single comment or reply.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Comment {
    cid: Option<String>,
    text: Option<String>,
    create_time: Option<i64>,
    reply_comment_total: Option<u64>,
    user: Option<User>,
    share_info: Option<ShareInfo>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct User {
    unique_id: Option<String>,
    nickname: Option<String>,
    avatar_thumb: Option<Avatar>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct Avatar {
    #[serde(default)]
    url_list: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct ShareInfo {
    title: Option<String>,
}

impl Comment {
    /// The comment's id.
    pub fn id(&self) -> Option<&str> {
        self.cid.as_deref()
    }

    /// The author's unique handle.
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref()?.unique_id.as_deref()
    }

    /// The author's display name.
    pub fn nickname(&self) -> Option<&str> {
        self.user.as_ref()?.nickname.as_deref()
    }

    /// The comment's text.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// When the comment was posted, in seconds since the Unix epoch.
    pub fn create_time(&self) -> Option<i64> {
        self.create_time
    }

    /// URL of the author's avatar thumbnail.
    pub fn avatar(&self) -> Option<&str> {
        self.user
            .as_ref()?
            .avatar_thumb
            .as_ref()?
            .url_list
            .first()
            .map(String::as_str)
    }

    /// Number of replies TikTok reports for the comment, if it reports one.
    pub fn total_reply(&self) -> Option<u64> {
        self.reply_comment_total
    }

    /// True if the comment has replies worth fetching.
    pub fn has_replies(&self) -> bool {
        self.reply_comment_total.unwrap_or(0) > 0
    }
}

/// An error decoding a listing.
#[derive(Debug, Error)]
pub enum Error {
    /// The response is not valid JSON or has the wrong shape.
    #[error("Could not decode response: {0}")]
    Json(#[from] serde_json::Error),
}
