// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for Instagram's GraphQL API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the GraphQL endpoint, essentially a specialized HTTPS client that
//! knows which query to ask for and which headers Instagram expects.

use crate::http::{self, HTTPResult, HTTPService};
use reqwest::{Client, RequestBuilder, header};
use serde::Serialize;
use std::fmt;

/// Instagram's GraphQL endpoint.
pub const GRAPHQL_URL: &str = "https://www.instagram.com/graphql/query/";

const APP_ID: &str = "936619743392459";

const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 13; SM-A125F) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/122.0.0.0 Mobile Safari/537.36";

/// A persisted GraphQL query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Query {
    /// Top-level comments on a post.
    Comments,

    /// Threaded replies to a single comment.
    Replies,
}

impl Query {
    /// The hash identifying the query to the GraphQL endpoint.
    pub fn hash(&self) -> &'static str {
        match self {
            Query::Comments => "97b41c52301f77ce508f55e66d17620e",
            Query::Replies => "863813fb3a4d6501723f11d1e44a42b1",
        }
    }
}

/// Variables sent along with a [`Query`].
///
/// Serializes to the compact JSON object Instagram expects, such as
/// `{"shortcode":"abc","first":50,"after":"cursor"}`. `after` is only
/// present when there is a cursor to resume from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Variables {
    #[serde(skip_serializing_if = "Option::is_none")]
    shortcode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    comment_id: Option<String>,

    first: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<String>,
}

impl Variables {
    /// Variables for a page of a post's comments.
    pub fn comments(shortcode: &str, first: u32, cursor: &str) -> Self {
        Self {
            shortcode: Some(shortcode.to_string()),
            comment_id: None,
            first,
            after: Self::after(cursor),
        }
    }

    /// Variables for a page of a comment's replies.
    pub fn replies(comment_id: &str, first: u32, cursor: &str) -> Self {
        Self {
            shortcode: None,
            comment_id: Some(comment_id.to_string()),
            first,
            after: Self::after(cursor),
        }
    }

    /// The cursor this page resumes from, if any.
    pub fn cursor(&self) -> Option<&str> {
        self.after.as_deref()
    }

    fn after(cursor: &str) -> Option<String> {
        (!cursor.is_empty()).then(|| cursor.to_string())
    }
}

/// Cookies identifying a logged-in Instagram session.
///
/// These are opaque to this crate; they are copied from a browser session
/// and passed in at runtime.
#[derive(Clone)]
pub struct Credentials {
    session_id: String,
    user_id: String,
    csrf_token: String,
    machine_id: String,
}

impl Credentials {
    /// Creates a new set of credentials from the `sessionid`, `ds_user_id`,
    /// `csrftoken`, and `mid` cookies.
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        csrf_token: impl Into<String>,
        machine_id: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            csrf_token: csrf_token.into(),
            machine_id: machine_id.into(),
        }
    }

    /// The value of the `Cookie` header.
    ///
    /// # Examples
    ///
    /// ```
    /// use commentdump::instagram::Credentials;
    /// let credentials = Credentials::new("s", "u", "c", "m");
    /// assert_eq!(credentials.cookie(), "sessionid=s; ds_user_id=u; csrftoken=c; mid=m;");
    /// ```
    pub fn cookie(&self) -> String {
        format!(
            "sessionid={}; ds_user_id={}; csrftoken={}; mid={};",
            self.session_id, self.user_id, self.csrf_token, self.machine_id
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// A service for running comment queries against Instagram.
///
/// Using this trait, clients can implement different ways of connecting
/// to Instagram, such as an actual connector for production code, and a
/// mocked connector for testing purposes.
pub trait Service {
    /// Runs `query` with `variables` for the post identified by `shortcode`
    /// and returns the raw JSON response.
    fn query(
        &self,
        shortcode: &str,
        query: Query,
        variables: &Variables,
    ) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A service that contacts Instagram directly.
#[derive(Debug)]
pub struct InstagramService {
    client: Client,
    credentials: Credentials,
}

impl InstagramService {
    /// Creates a new Instagram service authenticated with `credentials`.
    pub fn new(credentials: Credentials) -> HTTPResult<Self> {
        let client = Self::client()?;
        Ok(Self {
            client,
            credentials,
        })
    }

    fn request(
        &self,
        shortcode: &str,
        query: Query,
        variables: &Variables,
    ) -> HTTPResult<RequestBuilder> {
        let variables = serde_json::to_string(variables)?;
        let request = self
            .client
            .get(GRAPHQL_URL)
            .query(&[("query_hash", query.hash()), ("variables", variables.as_str())])
            .header(header::ACCEPT, "*/*")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header("X-Requested-With", "XMLHttpRequest")
            .header("X-IG-App-ID", APP_ID)
            .header(header::REFERER, format!("https://www.instagram.com/p/{shortcode}/"))
            .header(header::COOKIE, self.credentials.cookie());
        Ok(request)
    }
}

impl HTTPService for InstagramService {
    /// Instagram only answers GraphQL queries from browsers.
    fn user_agent() -> String {
        MOBILE_USER_AGENT.to_string()
    }
}

impl Service for InstagramService {
    async fn query(&self, shortcode: &str, query: Query, variables: &Variables) -> HTTPResult<String> {
        let request = self.request(shortcode, query, variables)?;
        http::fetch(request).await
    }
}
