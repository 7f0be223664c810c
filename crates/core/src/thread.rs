//! Reply thread reconstruction
//!
//! Turns the flat message list into a forest of reply trees for display.
//! Everything here is read-only: nodes own clones of the messages, so a
//! forest stays valid after the store moves on.
//!
//! Both building and dropping a forest are iterative. A reply chain as long
//! as the whole collection is a legitimate thread and must not exhaust the
//! stack.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::models::{Message, MessageId, Reactor, Sender};

/// Shown in place of the quoted text when a reply's target no longer exists
pub const REPLY_NOT_FOUND: &str = "[message not found]";

/// A message and its direct replies in insertion order
///
/// `Clone`, `PartialEq`, `Debug` and `Drop` walk the subtree with an explicit
/// stack.
pub struct TreeNode {
    message: Message,
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Number of replies below this node at any depth
    pub fn reply_count(&self) -> usize {
        let mut count = 0;
        let mut pending: Vec<&TreeNode> = self.children.iter().collect();
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }
}

impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

struct CloneFrame<'a> {
    message: &'a Message,
    pending: std::slice::Iter<'a, TreeNode>,
    built: Vec<TreeNode>,
}

impl<'a> CloneFrame<'a> {
    fn new(node: &'a TreeNode) -> Self {
        Self {
            message: &node.message,
            pending: node.children.iter(),
            built: Vec::with_capacity(node.children.len()),
        }
    }
}

impl Clone for TreeNode {
    fn clone(&self) -> Self {
        let mut ancestors = Vec::new();
        let mut current = CloneFrame::new(self);
        loop {
            match current.pending.next() {
                Some(child) => {
                    ancestors.push(current);
                    current = CloneFrame::new(child);
                }
                None => {
                    let node = TreeNode {
                        message: current.message.clone(),
                        children: current.built,
                    };
                    match ancestors.pop() {
                        Some(mut parent) => {
                            parent.built.push(node);
                            current = parent;
                        }
                        None => return node,
                    }
                }
            }
        }
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.message != right.message || left.children.len() != right.children.len() {
                return false;
            }
            pending.extend(left.children.iter().zip(&right.children));
        }
        true
    }
}

impl Eq for TreeNode {}

/// Pre-order `(depth, message)` pairs, relative to this node
impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows = f.debug_list();
        let mut pending = vec![(0usize, self)];
        while let Some((depth, node)) = pending.pop() {
            rows.entry(&(depth, &node.message));
            pending.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        }
        rows.finish()
    }
}

/// Build the reply forest
///
/// Roots are top-level messages plus orphans whose parent was deleted, in
/// insertion order. Children of a message are the messages replying to it, in
/// insertion order. Messages only reachable through a reply cycle (which the
/// store never creates) are left out.
pub fn build_forest(messages: &[Message]) -> Vec<TreeNode> {
    let present: HashSet<MessageId> = messages.iter().map(Message::id).collect();

    let mut replies: HashMap<MessageId, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for (index, message) in messages.iter().enumerate() {
        match message.reply_to() {
            Some(parent) if present.contains(&parent) => {
                replies.entry(parent).or_default().push(index)
            }
            _ => roots.push(index),
        }
    }

    let mut visited = vec![false; messages.len()];
    roots
        .into_iter()
        .filter_map(|root| build_tree(root, messages, &replies, &mut visited))
        .collect()
}

struct Frame<'a> {
    index: usize,
    built: Vec<TreeNode>,
    pending: std::slice::Iter<'a, usize>,
}

fn build_tree(
    root: usize,
    messages: &[Message],
    replies: &HashMap<MessageId, Vec<usize>>,
    visited: &mut [bool],
) -> Option<TreeNode> {
    let frame = |index: usize| Frame {
        index,
        built: Vec::new(),
        pending: replies
            .get(&messages[index].id())
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter(),
    };

    if visited[root] {
        return None;
    }
    visited[root] = true;
    let mut stack = vec![frame(root)];

    while let Some(top) = stack.last_mut() {
        // Duplicate ids could otherwise route a message under itself
        match top.pending.by_ref().find(|&&child| !visited[child]) {
            Some(&child) => {
                visited[child] = true;
                stack.push(frame(child));
            }
            None => {
                let done = stack.pop()?;
                let node = TreeNode {
                    message: messages[done.index].clone(),
                    children: done.built,
                };
                match stack.last_mut() {
                    Some(parent) => parent.built.push(node),
                    None => return Some(node),
                }
            }
        }
    }

    None
}

/// Text of the message being replied to, or `REPLY_NOT_FOUND`
pub fn resolve_reply_preview(messages: &[Message], reply_to: MessageId) -> &str {
    messages
        .iter()
        .find(|m| m.id() == reply_to)
        .map(Message::text)
        .unwrap_or(REPLY_NOT_FOUND)
}

/// One line of a flattened forest
#[derive(Debug, Clone, Copy)]
pub struct ThreadRow<'a> {
    /// 0 for roots
    pub depth: usize,
    pub message: &'a Message,
}

/// Pre-order walk of the forest, for renderers that indent by depth
pub fn flatten(forest: &[TreeNode]) -> Vec<ThreadRow<'_>> {
    let mut rows = Vec::new();
    let mut stack: Vec<(usize, &TreeNode)> = forest.iter().rev().map(|node| (0, node)).collect();

    while let Some((depth, node)) = stack.pop() {
        rows.push(ThreadRow {
            depth,
            message: &node.message,
        });
        stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
    }

    rows
}

/// Count of one emoji on a message, from one viewer's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSummary {
    pub emoji: String,
    pub count: usize,
    pub reacted_by_viewer: bool,
}

/// Edit and reaction state of a message, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSummary {
    pub is_edited: bool,
    pub edit_count: u32,
    /// Non-empty reactions in emoji order
    pub reactions: Vec<ReactionSummary>,
}

pub fn summarize(message: &Message, viewer: Sender) -> MessageSummary {
    let viewer = Reactor::from(viewer);
    MessageSummary {
        is_edited: message.is_edited(),
        edit_count: message.edit_count(),
        reactions: message
            .reactions()
            .iter()
            .map(|(emoji, reactors)| ReactionSummary {
                emoji: emoji.to_string(),
                count: reactors.len(),
                reacted_by_viewer: reactors.contains(&viewer),
            })
            .collect(),
    }
}
