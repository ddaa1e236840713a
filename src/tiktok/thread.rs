// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Flat storage for a video's comment tree.
//!
//! Comments and replies are stored side by side in one arena, in the order
//! they were fetched. A reply points at its parent by index, which is the
//! only relationship kept: output only has room for two levels, so replies
//! always hang off a top-level comment.

use crate::tiktok::thing::Comment;

/// Index of a node in a [`Thread`].
pub type NodeId = usize;

/// A comment stored in a [`Thread`].
#[derive(Clone, Debug)]
pub struct ThreadNode {
    comment: Comment,
    parent: Option<NodeId>,
}

impl ThreadNode {
    /// The comment itself.
    pub fn comment(&self) -> &Comment {
        &self.comment
    }

    /// The node this one replies to, or `None` for top-level comments.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Every comment and reply fetched for one video.
#[derive(Clone, Debug, Default)]
pub struct Thread {
    nodes: Vec<ThreadNode>,
}

impl Thread {
    /// Adds a top-level comment and returns its id.
    pub fn push_comment(&mut self, comment: Comment) -> NodeId {
        self.push(comment, None)
    }

    /// Adds a reply to the top-level comment `parent` and returns its id.
    ///
    /// Returns `None`, leaving the thread untouched, if `parent` is not a
    /// top-level comment in this thread.
    pub fn push_reply(&mut self, parent: NodeId, comment: Comment) -> Option<NodeId> {
        let top_level = self.get(parent).is_some_and(|p| p.parent.is_none());
        top_level.then(|| self.push(comment, Some(parent)))
    }

    fn push(&mut self, comment: Comment, parent: Option<NodeId>) -> NodeId {
        self.nodes.push(ThreadNode { comment, parent });
        self.nodes.len() - 1
    }

    /// The node with the given id.
    pub fn get(&self, id: NodeId) -> Option<&ThreadNode> {
        self.nodes.get(id)
    }

    /// Number of comments and replies.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the thread has no comments.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in output order: every top-level comment, in the order it was
    /// fetched, immediately followed by its replies.
    pub fn flatten(&self) -> Vec<&ThreadNode> {
        let mut replies: Vec<Vec<NodeId>> = vec![vec![]; self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                replies[parent].push(id);
            }
        }

        let mut flattened = Vec::with_capacity(self.nodes.len());
        for (id, node) in self.nodes.iter().enumerate() {
            if node.parent.is_none() {
                flattened.push(node);
                flattened.extend(replies[id].iter().map(|&reply| &self.nodes[reply]));
            }
        }
        flattened
    }
}
