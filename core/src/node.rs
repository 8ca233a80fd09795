/*
 * Copyright (c) 2026 Mohamad Al-Zawahreh (dba Sovereign Systems).
 *
 * Persistent Data Structures for the Ark Language.
 * Immutable-by-default collections with structural sharing.
 *
 * Inspired by Clojure's persistent vectors and maps, implemented
 * in Rust with Arc-based structural sharing for zero-copy immutability.
 *
 * LICENSE: DUAL-LICENSED (AGPLv3 or COMMERCIAL).
 */

//! Trie node and edit-token primitives shared by `PersistentVector` and
//! `TransientVector`.
//!
//! A node is either a `Branch` of up to `WIDTH` children or a `Leaf` of up
//! to `WIDTH` values; every node carries an `Arc<EditToken>` identifying
//! whether (and to whom) it may be mutated in place.

use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

/// Branching factor of the trie. Kept symbolic per the design notes so
/// 16 or 64 could be explored without touching the arithmetic below.
pub(crate) const BITS: u32 = 5;
pub(crate) const WIDTH: usize = 1 << BITS;
pub(crate) const MASK: usize = WIDTH - 1;

/// The state an [`EditToken`] can be in: owned by exactly one thread, or
/// frozen forever. Once frozen, a token is never reset (§3 invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditState {
    Owned(ThreadId),
    Frozen,
}

/// Atomically readable/writable cell identifying which thread, if any, may
/// mutate the nodes tagged with it. Shared by every node belonging to the
/// same `TransientVector`; a `PersistentVector`'s nodes all carry a frozen
/// token.
#[derive(Debug)]
pub(crate) struct EditToken(Mutex<EditState>);

impl EditToken {
    /// A fresh token owned by the current thread, for a new transient.
    pub(crate) fn owned_by_current_thread() -> Arc<Self> {
        Arc::new(EditToken(Mutex::new(EditState::Owned(thread::current().id()))))
    }

    /// A token that starts out (and stays) frozen, for persistent-only nodes.
    pub(crate) fn frozen() -> Arc<Self> {
        Arc::new(EditToken(Mutex::new(EditState::Frozen)))
    }

    /// Flips this token to frozen. Irreversible, per the §3 invariant.
    pub(crate) fn freeze(&self) {
        *self.0.lock().unwrap() = EditState::Frozen;
    }

    pub(crate) fn is_frozen(&self) -> bool {
        matches!(*self.0.lock().unwrap(), EditState::Frozen)
    }

    pub(crate) fn owner(&self) -> Option<ThreadId> {
        match *self.0.lock().unwrap() {
            EditState::Owned(id) => Some(id),
            EditState::Frozen => None,
        }
    }

    pub(crate) fn is_owned_by_current_thread(&self) -> bool {
        self.owner() == Some(thread::current().id())
    }
}

/// Internal trie node: either a branch whose children are nodes, or a leaf
/// whose slots are user values. Node equality is identity, never structural
/// (§3: "nodes are never compared structurally").
pub(crate) enum Node<T> {
    Branch {
        children: Vec<Arc<Node<T>>>,
        edit: Arc<EditToken>,
    },
    Leaf {
        values: Vec<T>,
        edit: Arc<EditToken>,
    },
}

impl<T> Node<T> {
    /// The shared sentinel used as the root of any vector with `count <
    /// WIDTH`: an empty, permanently frozen branch.
    pub(crate) fn empty_branch_frozen() -> Arc<Self> {
        Arc::new(Node::Branch {
            children: Vec::new(),
            edit: EditToken::frozen(),
        })
    }

    pub(crate) fn leaf_frozen(values: Vec<T>) -> Arc<Self> {
        Arc::new(Node::Leaf {
            values,
            edit: EditToken::frozen(),
        })
    }

    pub(crate) fn edit_token(&self) -> &Arc<EditToken> {
        match self {
            Node::Branch { edit, .. } => edit,
            Node::Leaf { edit, .. } => edit,
        }
    }

    pub(crate) fn as_branch_children(&self) -> &[Arc<Node<T>>] {
        match self {
            Node::Branch { children, .. } => children,
            Node::Leaf { .. } => unreachable!("expected branch, found leaf"),
        }
    }

    pub(crate) fn as_leaf_values(&self) -> &[T] {
        match self {
            Node::Leaf { values, .. } => values,
            Node::Branch { .. } => unreachable!("expected leaf, found branch"),
        }
    }
}

impl<T: Clone> Node<T> {
    /// Clone this node's contents under a new edit token (path-copy / TV
    /// clone-on-first-touch).
    pub(crate) fn clone_with_edit(&self, edit: &Arc<EditToken>) -> Self {
        match self {
            Node::Branch { children, .. } => Node::Branch {
                children: children.clone(),
                edit: Arc::clone(edit),
            },
            Node::Leaf { values, .. } => Node::Leaf {
                values: values.clone(),
                edit: Arc::clone(edit),
            },
        }
    }
}
