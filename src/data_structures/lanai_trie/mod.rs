//! Lanai Trie Implementation
//!
//! A prefix tree mapping string keys to values of heterogeneous types. Each
//! key holds exactly one value whose type is chosen at insertion time and
//! checked again on every read.
//!
//! The whole tree sits behind a single reader-writer lock: lookups share it,
//! inserts and removals take it exclusively. A removal may prune an arbitrary
//! chain of ancestors, so finer-grained locking is not attempted.
//!
//! # Example
//!
//! ```
//! use lanai_lib::data_structures::lanai_trie::LanaiTrie;
//!
//! let trie = LanaiTrie::new();
//! assert!(trie.insert("port", 8080u16));
//! assert!(trie.insert("host", String::from("localhost")));
//!
//! assert_eq!(trie.get::<u16>("port"), Some(8080));
//! assert_eq!(trie.get::<u32>("port"), None);
//! assert!(!trie.insert("port", 9090u16));
//!
//! assert!(trie.remove("port"));
//! assert_eq!(trie.get::<u16>("port"), None);
//! ```

mod config;
mod error;
mod node;
mod payload;

use std::any::Any;

use parking_lot::RwLock;
use tracing::{debug, trace};

pub use config::LanaiTrieConfig;
pub use error::LanaiTrieError;
pub use node::{RejectReason, RejectedChild, TrieNode, ROOT_KEY};
pub use payload::Payload;

/// Result type for Lanai Trie operations
pub type LanaiTrieResult<T> = Result<T, LanaiTrieError>;

/// Everything guarded by the trie's lock.
#[derive(Debug, Default)]
struct TrieInner {
    root: TrieNode,
    len: usize,
}

/// Lanai Trie is a thread-safe prefix tree whose keys each hold a value of
/// an arbitrary `Send + Sync` type.
///
/// Key features:
/// * Duplicate inserts are rejected; stored values are never overwritten
/// * Typed reads fail on a type mismatch instead of reinterpreting
/// * Removal prunes dead branches back toward the root
/// * One coarse lock, so every operation is atomic with respect to the others
#[derive(Debug, Default)]
pub struct LanaiTrie {
    inner: RwLock<TrieInner>,
    config: LanaiTrieConfig,
}

impl LanaiTrie {
    /// Creates a new empty `LanaiTrie` with default configuration.
    pub fn new() -> Self {
        Self::with_config(LanaiTrieConfig::default())
    }

    /// Creates a new empty `LanaiTrie` with the specified configuration.
    pub fn with_config(config: LanaiTrieConfig) -> Self {
        Self {
            inner: RwLock::new(TrieInner::default()),
            config,
        }
    }

    /// The configuration this trie was built with.
    pub fn config(&self) -> &LanaiTrieConfig {
        &self.config
    }

    /// Inserts `value` under `key`.
    ///
    /// Returns `false` if the key is empty, too long, or already present.
    pub fn insert<T>(&self, key: &str, value: T) -> bool
    where
        T: Any + Send + Sync,
    {
        self.try_insert(key, value).is_ok()
    }

    /// Returns a clone of the value under `key` if it was stored as `T`.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone,
    {
        self.try_get(key).ok()
    }

    /// Removes the value under `key`, pruning nodes no other key needs.
    ///
    /// Returns `false` if the key is empty, too long, or not present.
    pub fn remove(&self, key: &str) -> bool {
        self.try_remove(key).is_ok()
    }

    /// Inserts `value` under `key`, reporting why an insert was refused.
    ///
    /// # Errors
    ///
    /// * [`LanaiTrieError::EmptyKey`] / [`LanaiTrieError::KeyTooLong`] for invalid keys.
    /// * [`LanaiTrieError::DuplicateKey`] if the key already holds a value.
    pub fn try_insert<T>(&self, key: &str, value: T) -> LanaiTrieResult<()>
    where
        T: Any + Send + Sync,
    {
        let chars = self.validate_key(key)?;
        let payload = Payload::new(value);
        trace!(key, type_name = payload.type_name(), "insert");

        let mut inner = self.inner.write();
        insert_at(&mut inner.root, &chars, payload, key).map_err(|e| {
            debug!(key, "insert rejected, key already present");
            e
        })?;
        inner.len += 1;
        Ok(())
    }

    /// Looks up `key` and clones its value as `T`.
    ///
    /// # Errors
    ///
    /// * [`LanaiTrieError::EmptyKey`] / [`LanaiTrieError::KeyTooLong`] for invalid keys.
    /// * [`LanaiTrieError::KeyNotFound`] if the path does not exist.
    /// * [`LanaiTrieError::NotTerminal`] if the key is only a prefix of stored keys.
    /// * [`LanaiTrieError::TypeMismatch`] if the value was not stored as `T`.
    pub fn try_get<T>(&self, key: &str) -> LanaiTrieResult<T>
    where
        T: Any + Clone,
    {
        self.try_get_with(key, T::clone)
    }

    /// Runs `f` on the value under `key` while the read lock is held.
    ///
    /// Useful for values that are not `Clone` or are expensive to copy.
    pub fn get_with<T, R, F>(&self, key: &str, f: F) -> Option<R>
    where
        T: Any,
        F: FnOnce(&T) -> R,
    {
        self.try_get_with(key, f).ok()
    }

    /// Like [`Self::get_with`] but reports why a lookup failed.
    pub fn try_get_with<T, R, F>(&self, key: &str, f: F) -> LanaiTrieResult<R>
    where
        T: Any,
        F: FnOnce(&T) -> R,
    {
        self.validate_key(key)?;
        trace!(key, type_name = std::any::type_name::<T>(), "get");

        let inner = self.inner.read();
        let payload = find_payload(&inner.root, key)?;
        match payload.downcast_ref::<T>() {
            Some(value) => Ok(f(value)),
            None => {
                debug!(
                    key,
                    expected = std::any::type_name::<T>(),
                    actual = payload.type_name(),
                    "get rejected, type mismatch"
                );
                Err(LanaiTrieError::TypeMismatch {
                    key: key.to_owned(),
                    expected: std::any::type_name::<T>(),
                    actual: payload.type_name(),
                })
            }
        }
    }

    /// Removes `key`, reporting why a removal was refused.
    ///
    /// # Errors
    ///
    /// * [`LanaiTrieError::EmptyKey`] / [`LanaiTrieError::KeyTooLong`] for invalid keys.
    /// * [`LanaiTrieError::KeyNotFound`] if the path does not exist.
    /// * [`LanaiTrieError::NotTerminal`] if the key is only a prefix of stored keys.
    pub fn try_remove(&self, key: &str) -> LanaiTrieResult<()> {
        let chars = self.validate_key(key)?;
        trace!(key, "remove");

        let mut inner = self.inner.write();
        let removed = remove_at(&mut inner.root, &chars, key)?;
        inner.len -= 1;
        drop(inner);

        trace!(key, type_name = removed.type_name(), "removed");
        Ok(())
    }

    /// Checks whether `key` holds a value of any type.
    pub fn contains_key(&self, key: &str) -> bool {
        if self.validate_key(key).is_err() {
            return false;
        }
        let inner = self.inner.read();
        find_payload(&inner.root, key).is_ok()
    }

    /// Name of the type the value under `key` was inserted as.
    pub fn type_name_of(&self, key: &str) -> Option<&'static str> {
        self.validate_key(key).ok()?;
        let inner = self.inner.read();
        find_payload(&inner.root, key).ok().map(Payload::type_name)
    }

    /// Returns the number of keys in the trie.
    pub fn len(&self) -> usize {
        self.inner.read().len
    }

    /// Checks if the trie holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes below the root. Zero exactly when the trie is empty.
    pub fn node_count(&self) -> usize {
        self.inner.read().root.descendant_count()
    }

    /// Clears all entries from the trie.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        debug!(len = inner.len, "clearing trie");
        inner.root.clear_children();
        inner.len = 0;
    }

    /// Rejects empty and over-long keys and splits the key into characters.
    fn validate_key(&self, key: &str) -> LanaiTrieResult<Vec<char>> {
        if key.is_empty() {
            debug!("rejected empty key");
            return Err(LanaiTrieError::EmptyKey);
        }

        let chars: Vec<char> = key.chars().collect();
        if let Some(max_len) = self.config.max_key_len() {
            if chars.len() > max_len {
                debug!(key, max_len, "rejected over-long key");
                return Err(LanaiTrieError::KeyTooLong {
                    key: key.to_owned(),
                    max_len,
                });
            }
        }
        Ok(chars)
    }
}

/// Descends along `path`, promoting the final node in place or attaching a
/// freshly built branch at the first missing character.
///
/// Fails only when the final node already holds a value.
fn insert_at(
    root: &mut TrieNode,
    path: &[char],
    payload: Payload,
    key: &str,
) -> LanaiTrieResult<()> {
    let mut node = root;
    let mut rest = path;
    while let Some((&c, tail)) = rest.split_first() {
        if !node.has_child(c) {
            return match node.insert_child(c, TrieNode::branch(c, tail, payload)) {
                Ok(_) => Ok(()),
                Err(rejected) => unreachable!("vacant slot refused a matching child: {rejected}"),
            };
        }
        node = node
            .child_mut(c)
            .ok_or_else(|| LanaiTrieError::KeyNotFound(key.to_owned()))?;
        rest = tail;
    }

    if node.is_terminal() {
        return Err(LanaiTrieError::DuplicateKey(key.to_owned()));
    }
    node.set_terminal(Some(payload));
    Ok(())
}

/// Walks `key` from `root` and returns the payload at its final node.
fn find_payload<'a>(root: &'a TrieNode, key: &str) -> LanaiTrieResult<&'a Payload> {
    let mut node = root;
    for c in key.chars() {
        node = node
            .child(c)
            .ok_or_else(|| LanaiTrieError::KeyNotFound(key.to_owned()))?;
    }
    node.payload()
        .ok_or_else(|| LanaiTrieError::NotTerminal(key.to_owned()))
}

/// Follows `path` from `root` mutably.
fn descend_mut<'a>(
    root: &'a mut TrieNode,
    path: &[char],
    key: &str,
) -> LanaiTrieResult<&'a mut TrieNode> {
    let mut node = root;
    for &c in path {
        node = node
            .child_mut(c)
            .ok_or_else(|| LanaiTrieError::KeyNotFound(key.to_owned()))?;
    }
    Ok(node)
}

/// Clears the value at the end of `path` and prunes the chain of nodes left
/// dead by it. Nothing is modified on failure.
///
/// A first read-only walk finds the shallowest edge below which every node
/// exists only for this key: the cut stops under the nearest ancestor that is
/// terminal or branches. The root is never cut.
fn remove_at(root: &mut TrieNode, path: &[char], key: &str) -> LanaiTrieResult<Payload> {
    let mut cut = 0;
    let mut node: &TrieNode = root;
    for (depth, &c) in path.iter().enumerate() {
        if depth > 0 && (node.is_terminal() || node.child_count() > 1) {
            cut = depth;
        }
        node = node
            .child(c)
            .ok_or_else(|| LanaiTrieError::KeyNotFound(key.to_owned()))?;
    }
    if !node.is_terminal() {
        return Err(LanaiTrieError::NotTerminal(key.to_owned()));
    }
    let prune = !node.has_children();

    let removed = descend_mut(root, path, key)?
        .set_terminal(None)
        .ok_or_else(|| LanaiTrieError::NotTerminal(key.to_owned()))?;

    if prune {
        trace!(key, depth = cut, pruned = path.len() - cut, "pruning dead branch");
        descend_mut(root, &path[..cut], key)?.remove_child(path[cut]);
    }
    Ok(removed)
}
