//! Node implementation for the Lanai Trie.
//!
//! Every node represents one character of some inserted key. A node owns its
//! children outright and optionally carries a [`Payload`]; carrying one is
//! what makes it terminal, so the terminal flag and the value can never
//! disagree.

use fnv::FnvHashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use super::payload::Payload;

/// Key of the root node. It never appears as a real node's key at depth one
/// because empty keys are rejected before traversal.
pub const ROOT_KEY: char = '\0';

/// Why [`TrieNode::insert_child`] refused a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The slot key and the child's own key differ.
    KeyMismatch,
    /// A child already occupies the slot.
    Occupied,
}

/// A child node handed back by [`TrieNode::insert_child`], still owned by
/// the caller.
#[derive(Debug, thiserror::Error)]
#[error("child '{}' rejected for slot '{slot}': {reason:?}", .child.key())]
pub struct RejectedChild {
    /// The slot the caller tried to fill.
    pub slot: char,
    /// Why the insertion was refused.
    pub reason: RejectReason,
    /// The node that was not inserted.
    pub child: TrieNode,
}

impl RejectedChild {
    /// Takes the rejected node back.
    pub fn into_child(self) -> TrieNode {
        self.child
    }
}

/// A node in the Lanai Trie.
///
/// Keys may be arbitrarily long, so nothing that walks a subtree (building,
/// counting, dropping or printing it) recurses per level.
pub struct TrieNode {
    key: char,
    children: FnvHashMap<char, TrieNode>,
    value: Option<Payload>,
}

impl TrieNode {
    /// Creates a new non-terminal node with no children.
    pub fn new(key: char) -> Self {
        Self {
            key,
            children: FnvHashMap::default(),
            value: None,
        }
    }

    /// Creates the sentinel root node.
    pub fn root() -> Self {
        Self::new(ROOT_KEY)
    }

    /// Builds a detached chain `key -> suffix[0] -> ... -> suffix[n-1]` whose
    /// last node is terminal and holds `payload`.
    pub fn branch(key: char, suffix: &[char], payload: Payload) -> Self {
        let mut node = Self::new(suffix.last().copied().unwrap_or(key));
        node.value = Some(payload);

        // Wrap the leaf bottom-up in the remaining ancestors.
        if let Some((_, ancestors)) = suffix.split_last() {
            for &c in ancestors.iter().rev().chain(std::iter::once(&key)) {
                let mut parent = Self::new(c);
                parent.children.insert(node.key, node);
                node = parent;
            }
        }
        node
    }

    /// The character this node represents.
    pub fn key(&self) -> char {
        self.key
    }

    /// Whether a child is stored under `c`.
    pub fn has_child(&self, c: char) -> bool {
        self.children.contains_key(&c)
    }

    /// Whether this node has any children at all.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether a key ends here, i.e. the node carries a payload.
    pub fn is_terminal(&self) -> bool {
        self.value.is_some()
    }

    /// A non-terminal leaf. Such nodes are pruned as soon as they appear.
    pub fn is_dead(&self) -> bool {
        !self.is_terminal() && !self.has_children()
    }

    /// Moves `child` into the slot `c`.
    ///
    /// Fails if `child.key() != c` or the slot is taken; in both cases the
    /// node is returned inside the error and nothing changes.
    pub fn insert_child(&mut self, c: char, child: TrieNode) -> Result<&mut TrieNode, RejectedChild> {
        if child.key != c {
            return Err(RejectedChild {
                slot: c,
                reason: RejectReason::KeyMismatch,
                child,
            });
        }
        match self.children.entry(c) {
            Entry::Occupied(_) => Err(RejectedChild {
                slot: c,
                reason: RejectReason::Occupied,
                child,
            }),
            Entry::Vacant(slot) => Ok(slot.insert(child)),
        }
    }

    /// Borrows the child stored under `c`.
    pub fn child(&self, c: char) -> Option<&TrieNode> {
        self.children.get(&c)
    }

    /// Mutably borrows the child stored under `c`.
    pub fn child_mut(&mut self, c: char) -> Option<&mut TrieNode> {
        self.children.get_mut(&c)
    }

    /// Drops the subtree under `c`. Absent children are ignored.
    pub fn remove_child(&mut self, c: char) {
        self.children.remove(&c);
    }

    /// Drops every child subtree. The node's own key and payload stay.
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Makes the node terminal with `payload`, or non-terminal with `None`.
    ///
    /// Returns whatever payload the node held before.
    pub fn set_terminal(&mut self, payload: Option<Payload>) -> Option<Payload> {
        std::mem::replace(&mut self.value, payload)
    }

    /// The payload of a terminal node, `None` otherwise.
    pub fn payload(&self) -> Option<&Payload> {
        self.value.as_ref()
    }

    /// Number of nodes below this one, excluding itself.
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&TrieNode> = self.children.values().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.values());
        }
        count
    }
}

impl Drop for TrieNode {
    fn drop(&mut self) {
        // Detach grandchildren before each child drops, keeping the drop flat.
        let mut stack: Vec<TrieNode> = self.children.drain().map(|(_, child)| child).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.drain().map(|(_, child)| child));
        }
    }
}

impl fmt::Debug for TrieNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut children: Vec<char> = self.children.keys().copied().collect();
        children.sort_unstable();
        f.debug_struct("TrieNode")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("children", &children)
            .finish()
    }
}

impl Default for TrieNode {
    fn default() -> Self {
        Self::root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_dead_leaf() {
        let node = TrieNode::new('a');
        assert_eq!(node.key(), 'a');
        assert!(!node.is_terminal());
        assert!(!node.has_children());
        assert!(node.is_dead());
        assert!(node.payload().is_none());
    }

    #[test]
    fn test_insert_child_transfers_ownership() {
        let mut parent = TrieNode::root();
        let child = parent.insert_child('x', TrieNode::new('x')).unwrap();
        assert_eq!(child.key(), 'x');
        assert!(parent.has_child('x'));
        assert!(parent.has_children());
        assert_eq!(parent.child_count(), 1);
        assert!(!parent.has_child('y'));
    }

    #[test]
    fn test_insert_child_rejects_key_mismatch() {
        let mut parent = TrieNode::root();
        let err = parent.insert_child('x', TrieNode::new('y')).unwrap_err();
        assert_eq!(err.reason, RejectReason::KeyMismatch);
        assert_eq!(err.slot, 'x');
        assert_eq!(err.into_child().key(), 'y');
        assert!(!parent.has_children());
    }

    #[test]
    fn test_insert_child_rejects_occupied_slot() {
        let mut parent = TrieNode::root();
        parent
            .insert_child('x', TrieNode::branch('x', &[], Payload::new(1i32)))
            .unwrap();
        let err = parent.insert_child('x', TrieNode::new('x')).unwrap_err();
        assert_eq!(err.reason, RejectReason::Occupied);

        // The original occupant is untouched.
        let existing = parent.child('x').unwrap();
        assert!(existing.is_terminal());
        assert_eq!(existing.payload().unwrap().downcast_ref::<i32>(), Some(&1));
    }

    #[test]
    fn test_remove_child_is_noop_when_absent() {
        let mut parent = TrieNode::root();
        parent.remove_child('q');
        parent.insert_child('q', TrieNode::new('q')).unwrap();
        parent.remove_child('q');
        assert!(!parent.has_child('q'));
    }

    #[test]
    fn test_set_terminal_keeps_children_and_key() {
        let mut node = TrieNode::new('a');
        node.insert_child('b', TrieNode::new('b')).unwrap();

        assert!(node.set_terminal(Some(Payload::new("v"))).is_none());
        assert!(node.is_terminal());
        assert_eq!(node.key(), 'a');
        assert!(node.has_child('b'));

        let previous = node.set_terminal(None).unwrap();
        assert_eq!(previous.downcast_ref::<&str>(), Some(&"v"));
        assert!(!node.is_terminal());
        assert!(node.has_child('b'));
    }

    #[test]
    fn test_branch_builds_terminal_chain() {
        let node = TrieNode::branch('a', &['b', 'c'], Payload::new(3u8));
        assert_eq!(node.descendant_count(), 2);
        assert!(!node.is_terminal());

        let b = node.child('b').unwrap();
        assert!(!b.is_terminal());
        let c = b.child('c').unwrap();
        assert!(c.is_terminal());
        assert_eq!(c.key(), 'c');
        assert_eq!(c.payload().unwrap().downcast_ref::<u8>(), Some(&3));
    }

    #[test]
    fn test_deep_chain_builds_counts_and_drops() {
        const DEPTH: usize = 100_000;

        let suffix = vec!['z'; DEPTH - 1];
        let node = TrieNode::branch('z', &suffix, Payload::new(()));
        assert_eq!(node.descendant_count(), DEPTH - 1);
        assert!(!node.is_terminal());
        assert!(format!("{node:?}").contains("children: ['z']"));

        let mut root = TrieNode::root();
        root.insert_child('z', node).unwrap();
        root.clear_children();
        assert!(!root.has_children());
    }

    #[test]
    fn test_clear_children_keeps_payload() {
        let mut node = TrieNode::branch('a', &[], Payload::new(9u8));
        node.insert_child('b', TrieNode::new('b')).unwrap();
        node.clear_children();
        assert!(!node.has_children());
        assert!(node.is_terminal());
        assert_eq!(node.key(), 'a');
    }

    #[test]
    fn test_child_mut_allows_promotion_in_place() {
        let mut root = TrieNode::root();
        root.insert_child('a', TrieNode::branch('a', &['b'], Payload::new(2i64)))
            .unwrap();
        root.child_mut('a')
            .unwrap()
            .set_terminal(Some(Payload::new(1i64)));

        let a = root.child('a').unwrap();
        assert!(a.is_terminal());
        assert!(a.child('b').unwrap().is_terminal());
        assert_eq!(root.descendant_count(), 2);
    }
}
