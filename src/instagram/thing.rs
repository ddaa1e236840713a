// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Comment connections as returned by Instagram's GraphQL API.
//!
//! Both queries answer with a GraphQL "connection": a list of edges, each
//! wrapping a comment node, plus `page_info` describing the next page.
//! Parent comments live under `data.shortcode_media.edge_media_to_parent_comment`
//! and replies under `data.comment.edge_threaded_comments`.

use crate::walk::Page;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Data>,
}

#[derive(Debug, Deserialize)]
struct Data {
    shortcode_media: Option<Media>,
    comment: Option<ThreadedComment>,
}

#[derive(Debug, Deserialize)]
struct Media {
    edge_media_to_parent_comment: Option<Connection>,
}

#[derive(Debug, Deserialize)]
struct ThreadedComment {
    edge_threaded_comments: Option<Connection>,
}

/// One page of comments.
#[derive(Debug, Deserialize)]
pub struct Connection {
    #[serde(default)]
    edges: Vec<Edge>,

    #[serde(default)]
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: Option<Node>,
}

#[derive(Debug, Default, Deserialize)]
struct PageInfo {
    #[serde(default)]
    has_next_page: bool,
    end_cursor: Option<String>,
}

/// A single comment or reply.
#[derive(Clone, Debug, Deserialize)]
pub struct Node {
    id: Option<String>,
    owner: Option<Owner>,
    text: Option<String>,
    created_at: Option<i64>,
    edge_threaded_comments: Option<ReplyCount>,
}

#[derive(Clone, Debug, Deserialize)]
struct Owner {
    username: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct ReplyCount {
    #[serde(default)]
    count: u64,
}

impl Node {
    /// The comment's id.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The author's username.
    pub fn username(&self) -> Option<&str> {
        self.owner.as_ref().and_then(|o| o.username.as_deref())
    }

    /// The comment's text.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// When the comment was posted, in seconds since the Unix epoch.
    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    /// Number of threaded replies Instagram reports for the comment.
    pub fn reply_count(&self) -> u64 {
        self.edge_threaded_comments.as_ref().map_or(0, |r| r.count)
    }
}

impl Connection {
    /// Converts the connection into a [`Page`] of nodes keyed by cursor.
    ///
    /// Empty edges are dropped.
    pub fn into_page(self) -> Page<Node, String> {
        let nodes = self.edges.into_iter().filter_map(|e| e.node).collect();
        let cursor = self.page_info.end_cursor.filter(|c| !c.is_empty());
        Page::new(nodes, self.page_info.has_next_page, cursor)
    }
}

/// Parses a response to the parent comments query.
///
/// Returns an error if the body is not JSON or has no post media at all
/// (which is what Instagram sends when the session is rejected or the post
/// does not exist), and `None` if the post has no comment connection.
pub fn parse_comments(body: &str) -> Result<Option<Connection>, Error> {
    let envelope: Envelope = serde_json::from_str(body)?;
    let media = envelope
        .data
        .and_then(|d| d.shortcode_media)
        .ok_or(Error::Missing("data.shortcode_media"))?;
    Ok(media.edge_media_to_parent_comment)
}

/// Parses a response to the replies query.
///
/// Returns `None` if the response has no reply connection.
pub fn parse_replies(body: &str) -> Result<Option<Connection>, Error> {
    let envelope: Envelope = serde_json::from_str(body)?;
    Ok(envelope
        .data
        .and_then(|d| d.comment)
        .and_then(|c| c.edge_threaded_comments))
}

/// An error decoding a GraphQL response.
#[derive(Debug, Error)]
pub enum Error {
    /// The response is not valid JSON or has the wrong shape.
    #[error("Could not decode response: {0}")]
    Json(#[from] serde_json::Error),

    /// A required part of the response is missing.
    #[error("Response is missing {0}")]
    Missing(&'static str),
}
