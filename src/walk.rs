// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Cursor walking over paginated listings.
//!
//! Both platforms page through comments the same way: fetch a page, consume
//! its items, then either follow the page's cursor or stop. A [`Page`] is the
//! decoded form of one response and [`Page::into_parts`] yields its items
//! along with the [`WalkState`] the walk moves to next.

use log::warn;
use std::time::Duration;

/// Where a cursor walk stands after a page has been consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalkState<C> {
    /// More pages remain; the next one starts at the given cursor.
    Walking(C),

    /// No more pages.
    Done,
}

impl<C> WalkState<C> {
    /// True if the walk has finished.
    pub fn is_done(&self) -> bool {
        matches!(self, WalkState::Done)
    }
}

/// One page of a paginated listing.
#[derive(Debug)]
pub struct Page<T, C> {
    items: Vec<T>,
    has_more: bool,
    next: Option<C>,
}

impl<T, C> Page<T, C> {
    /// Creates a page holding `items`.
    ///
    /// `has_more` is the server's has-more flag and `next` the cursor it
    /// handed back for the following page, if any.
    pub fn new(items: Vec<T>, has_more: bool, next: Option<C>) -> Self {
        Self {
            items,
            has_more,
            next,
        }
    }

    /// The page's items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Splits the page into its items and the state of the walk after
    /// those items have been consumed.
    ///
    /// A page that claims more results but carries no cursor ends the walk,
    /// since following it would fetch the first page again.
    pub fn into_parts(self) -> (Vec<T>, WalkState<C>) {
        let state = match (self.has_more, self.next) {
            (true, Some(cursor)) => WalkState::Walking(cursor),
            (true, None) => {
                warn!("Page claims more results but has no cursor; stopping");
                WalkState::Done
            }
            (false, _) => WalkState::Done,
        };
        (self.items, state)
    }
}

/// Waits out the delay between two page fetches.
pub async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
