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

//! `PersistentVector<T>` — a 32-way branching, immutable, structurally
//! shared indexed sequence (§3/§4.1 of the design spec).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::chunked_seq::ChunkedSeq;
use crate::error::PVecError;
use crate::node::{Node, BITS, MASK, WIDTH};
use crate::reduced::Step;
use crate::transient::TransientVector;

/// Opaque metadata blob attachable to a vector (§3, §9: "attach and
/// retrieve an opaque map" — the actual map semantics live outside this
/// crate, per §1's scope boundary).
pub type Meta = Arc<dyn Any + Send + Sync>;

/// An immutable, reference-counted, 32-way branching indexed sequence.
///
/// Every transformation (`assoc_n`, `cons`, `pop`, ...) returns a new
/// `PersistentVector` sharing all untouched structure with `self`; `self`
/// is never mutated.
pub struct PersistentVector<T> {
    count: usize,
    shift: u32,
    pub(crate) root: Arc<Node<T>>,
    pub(crate) tail: Arc<Vec<T>>,
    meta: Option<Meta>,
}

impl<T> Clone for PersistentVector<T> {
    fn clone(&self) -> Self {
        PersistentVector {
            count: self.count,
            shift: self.shift,
            root: Arc::clone(&self.root),
            tail: Arc::clone(&self.tail),
            meta: self.meta.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for PersistentVector<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.count != other.count {
            return false;
        }
        if Arc::ptr_eq(&self.root, &other.root) && Arc::ptr_eq(&self.tail, &other.tail) {
            return true;
        }
        self.iter().eq(other.iter())
    }
}

impl<T> Default for PersistentVector<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> PersistentVector<T> {
    /// The shared empty vector (§4.1.6 `empty`, no metadata).
    pub fn empty() -> Self {
        PersistentVector {
            count: 0,
            shift: 0,
            root: Node::empty_branch_frozen(),
            tail: Arc::new(Vec::new()),
            meta: None,
        }
    }

    /// Number of user-visible elements (§4.1.6 `count`).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Idiomatic alias for [`Self::count`].
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Boundary between trie-resident and tail-resident indices.
    fn tailoff(&self) -> usize {
        self.count - self.tail.len()
    }

    pub(crate) fn shift(&self) -> u32 {
        self.shift
    }

    /// Assembles a `PersistentVector` from raw trie parts, used when a
    /// `TransientVector` freezes itself via `persistent()`.
    pub(crate) fn from_transient_parts(count: usize, shift: u32, root: Arc<Node<T>>, tail: Vec<T>) -> Self {
        PersistentVector {
            count,
            shift,
            root,
            tail: Arc::new(tail),
            meta: None,
        }
    }

    /// Attach opaque metadata, returning a new vector (§9: metadata
    /// passthrough; this is the one operation that *changes* metadata).
    pub fn with_meta(&self, meta: Meta) -> Self {
        let mut v = self.clone();
        v.meta = Some(meta);
        v
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    /// `empty_of` — the shared empty vector but preserving this vector's
    /// metadata (§4.1.6).
    pub fn empty_of(&self) -> Self {
        let mut v = Self::empty();
        v.meta = self.meta.clone();
        v
    }

    /// Leaf array (trie leaf or tail) covering index `i`: the tail when `i
    /// >= tailoff()`, otherwise the trie leaf reached by descent. Callers
    /// must ensure `i < count`; out-of-range `i` silently returns the tail
    /// (or panics on an out-of-range trie descent) rather than failing
    /// cleanly, so every caller checks bounds first.
    pub(crate) fn leaf_for(&self, i: usize) -> &[T] {
        debug_assert!(i < self.count, "leaf_for called with out-of-range index");
        if i >= self.tailoff() {
            &self.tail
        } else {
            let mut node = &*self.root;
            let mut level = self.shift;
            loop {
                match node {
                    Node::Branch { children, .. } => {
                        let idx = (i >> level) & MASK;
                        node = &children[idx];
                        if level == BITS {
                            return node.as_leaf_values();
                        }
                        level -= BITS;
                    }
                    Node::Leaf { values, .. } => return values,
                }
            }
        }
    }
}

impl<T: Clone> PersistentVector<T> {
    /// Builds a vector by conjoining each item of `iter` onto a transient,
    /// then freezing (§6 `from_sequence`).
    pub fn from_sequence<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tv = TransientVector::new();
        for item in iter {
            tv.conj(item).expect("fresh transient cannot fail to conj");
        }
        tv.persistent().expect("fresh transient cannot fail to freeze")
    }

    /// Copies `arr` into a freshly built vector (§6 `from_array`).
    pub fn from_array(arr: Vec<T>) -> Self {
        Self::from_sequence(arr)
    }

    /// Takes ownership of `arr` as the tail when `arr.len() <= WIDTH`
    /// (§6 `adopt`, §9 Open Question: resolved to require `len <= WIDTH`
    /// rather than the spec's ambiguous `len <= 32` reading that also
    /// claimed `shift = 5` — here `shift` stays `0`, matching the tail
    /// invariant for every `count <= WIDTH`, including `count == WIDTH`).
    pub fn adopt(arr: Vec<T>) -> Self {
        if arr.len() <= WIDTH {
            PersistentVector {
                count: arr.len(),
                shift: 0,
                root: Node::empty_branch_frozen(),
                tail: Arc::new(arr),
                meta: None,
            }
        } else {
            Self::from_sequence(arr)
        }
    }

    /// `nth(i)` — fails with `IndexOutOfBounds` outside `[0, count)`.
    pub fn nth(&self, i: usize) -> Result<&T, PVecError> {
        if i >= self.count {
            return Err(PVecError::IndexOutOfBounds {
                index: i,
                len: self.count,
            });
        }
        let leaf = self.leaf_for(i);
        Ok(&leaf[i & MASK])
    }

    /// `nth(i, notFound)` — returns a clone of `not_found` instead of
    /// failing when `i` is out of range.
    pub fn nth_or(&self, i: usize, not_found: T) -> T {
        match self.nth(i) {
            Ok(v) => v.clone(),
            Err(_) => not_found,
        }
    }

    /// `assocN(i, v)` (§4.1.3).
    pub fn assoc_n(&self, i: usize, v: T) -> Result<Self, PVecError> {
        if i == self.count {
            return Ok(self.cons(v));
        }
        if i >= self.count {
            return Err(PVecError::IndexOutOfBounds {
                index: i,
                len: self.count,
            });
        }
        if i >= self.tailoff() {
            let mut new_tail = (*self.tail).clone();
            new_tail[i & MASK] = v;
            Ok(PersistentVector {
                count: self.count,
                shift: self.shift,
                root: Arc::clone(&self.root),
                tail: Arc::new(new_tail),
                meta: self.meta.clone(),
            })
        } else {
            let new_root = Self::do_assoc(self.shift, &self.root, i, v);
            Ok(PersistentVector {
                count: self.count,
                shift: self.shift,
                root: Arc::new(new_root),
                tail: Arc::clone(&self.tail),
                meta: self.meta.clone(),
            })
        }
    }

    fn do_assoc(level: u32, node: &Node<T>, i: usize, v: T) -> Node<T> {
        if level == 0 {
            let mut values = node.as_leaf_values().to_vec();
            values[i & MASK] = v;
            Node::Leaf {
                values,
                edit: Arc::clone(node.edit_token()),
            }
        } else {
            let children = node.as_branch_children();
            let idx = (i >> level) & MASK;
            let mut new_children = children.to_vec();
            new_children[idx] = Arc::new(Self::do_assoc(level - BITS, &children[idx], i, v));
            Node::Branch {
                children: new_children,
                edit: Arc::clone(node.edit_token()),
            }
        }
    }

    /// `cons(v)` — append (§4.1.4).
    pub fn cons(&self, v: T) -> Self {
        let tail_size = self.count - self.tailoff();
        if tail_size < WIDTH {
            let mut new_tail = (*self.tail).clone();
            new_tail.push(v);
            return PersistentVector {
                count: self.count + 1,
                shift: self.shift,
                root: Arc::clone(&self.root),
                tail: Arc::new(new_tail),
                meta: self.meta.clone(),
            };
        }

        let tail_node = Node::leaf_frozen((*self.tail).clone());
        let (new_root, new_shift) = if self.tailoff() == 0 {
            // Very first flush: the trie goes from wholly unused (shift 0,
            // sentinel root) to one level of branching over a single leaf.
            (
                Arc::new(Node::Branch {
                    children: vec![tail_node],
                    edit: Arc::clone(self.root.edit_token()),
                }),
                BITS,
            )
        } else if (self.count >> BITS) > (1 << self.shift) {
            let new_root = Node::Branch {
                children: vec![Arc::clone(&self.root), Self::new_path(self.shift, tail_node)],
                edit: Arc::clone(self.root.edit_token()),
            };
            (Arc::new(new_root), self.shift + BITS)
        } else {
            let new_root = Self::push_tail(self.shift, &self.root, tail_node, self.tailoff());
            (Arc::new(new_root), self.shift)
        };

        PersistentVector {
            count: self.count + 1,
            shift: new_shift,
            root: new_root,
            tail: Arc::new(vec![v]),
            meta: self.meta.clone(),
        }
    }

    /// Recursively place `tail_node` as the next leaf in the trie.
    /// `trie_len` is the number of elements currently held by the trie
    /// (i.e. `tailoff()` before this push).
    fn push_tail(level: u32, parent: &Node<T>, tail_node: Arc<Node<T>>, trie_len: usize) -> Node<T> {
        let children = parent.as_branch_children();
        let sub_idx = (trie_len >> level) & MASK;
        let mut new_children = children.to_vec();
        if level == BITS {
            if sub_idx < new_children.len() {
                new_children[sub_idx] = tail_node;
            } else {
                new_children.push(tail_node);
            }
        } else if sub_idx < new_children.len() {
            let child = Self::push_tail(level - BITS, &children[sub_idx], tail_node, trie_len);
            new_children[sub_idx] = Arc::new(child);
        } else {
            new_children.push(Self::new_path(level - BITS, tail_node));
        }
        Node::Branch {
            children: new_children,
            edit: Arc::clone(parent.edit_token()),
        }
    }

    /// A fresh linear chain of single-child branches from `level` down to
    /// the leaf, ending in `node`.
    fn new_path(level: u32, node: Arc<Node<T>>) -> Arc<Node<T>> {
        if level == 0 {
            node
        } else {
            Arc::new(Node::Branch {
                children: vec![Self::new_path(level - BITS, node)],
                edit: Arc::clone(node.edit_token()),
            })
        }
    }

    /// `pop()` (§4.1.5).
    pub fn pop(&self) -> Result<Self, PVecError> {
        match self.count {
            0 => Err(PVecError::EmptyPop),
            1 => Ok(self.empty_of()),
            _ => {
                let tail_size = self.count - self.tailoff();
                if tail_size > 1 {
                    let mut new_tail = (*self.tail).clone();
                    new_tail.pop();
                    Ok(PersistentVector {
                        count: self.count - 1,
                        shift: self.shift,
                        root: Arc::clone(&self.root),
                        tail: Arc::new(new_tail),
                        meta: self.meta.clone(),
                    })
                } else {
                    let new_tail = self.leaf_for(self.count - 2).to_vec();
                    let popped = Self::pop_tail(self.shift, &self.root, self.count);
                    let (new_root, new_shift) = match popped {
                        None => (Node::empty_branch_frozen(), 0),
                        Some(root) => {
                            if self.shift > BITS {
                                if let Node::Branch { children, .. } = &*root {
                                    if children.len() == 1 {
                                        (Arc::clone(&children[0]), self.shift - BITS)
                                    } else {
                                        (root, self.shift)
                                    }
                                } else {
                                    (root, self.shift)
                                }
                            } else {
                                (root, self.shift)
                            }
                        }
                    };
                    Ok(PersistentVector {
                        count: self.count - 1,
                        shift: new_shift,
                        root: new_root,
                        tail: Arc::new(new_tail),
                        meta: self.meta.clone(),
                    })
                }
            }
        }
    }

    /// Contracts the trie by one leaf. `count` is this vector's current
    /// (pre-pop) element count.
    fn pop_tail(level: u32, node: &Node<T>, count: usize) -> Option<Arc<Node<T>>> {
        let sub_idx = ((count - 2) >> level) & MASK;
        if level > BITS {
            let children = node.as_branch_children();
            let new_child = Self::pop_tail(level - BITS, &children[sub_idx], count);
            if new_child.is_none() && sub_idx == 0 {
                None
            } else {
                let mut new_children = children.to_vec();
                match new_child {
                    Some(child) => new_children[sub_idx] = child,
                    None => {
                        new_children.truncate(sub_idx);
                    }
                }
                Some(Arc::new(Node::Branch {
                    children: new_children,
                    edit: Arc::clone(node.edit_token()),
                }))
            }
        } else if sub_idx == 0 {
            None
        } else {
            let children = node.as_branch_children();
            let mut new_children = children.to_vec();
            new_children.truncate(sub_idx);
            Some(Arc::new(Node::Branch {
                children: new_children,
                edit: Arc::clone(node.edit_token()),
            }))
        }
    }

    /// `seq()` (§4.1.7): positioned at the very first element.
    pub fn seq(&self) -> Option<ChunkedSeq<T>> {
        self.chunked_seq()
    }

    /// `chunkedSeq()` (§4.1.7).
    pub fn chunked_seq(&self) -> Option<ChunkedSeq<T>> {
        if self.count == 0 {
            None
        } else {
            Some(ChunkedSeq::at(self.clone(), 0, 0))
        }
    }

    /// `drop(n)` (§4.1.8).
    pub fn drop(&self, n: i64) -> Option<ChunkedSeq<T>> {
        if n <= 0 {
            return self.chunked_seq();
        }
        let n = n as usize;
        if n >= self.count {
            return None;
        }
        let base = n - (n % WIDTH);
        Some(ChunkedSeq::at(self.clone(), base, n % WIDTH))
    }

    /// `reduce(f)` — no explicit seed; the first element seeds the fold.
    /// Returns `None` for an empty vector (idiomatic stand-in for the
    /// spec's "call the combining op with zero args" zero-ary form, which
    /// has no generic Rust equivalent without a `Monoid`-style trait; see
    /// DESIGN.md). Chunk-granular per §2/§4.1.9, driven by `ChunkedSeq`
    /// rather than re-descending the trie per element.
    pub fn reduce<F>(&self, f: F) -> Option<T>
    where
        F: FnMut(T, &T) -> Step<T>,
    {
        let seq = self.chunked_seq()?;
        let seed = seq.first()?.clone();
        match seq.next() {
            Some(rest) => Some(rest.reduce(seed, f)),
            None => Some(seed),
        }
    }

    /// `reduce(f, init)` (§4.1.9): chunk-granular left fold honoring
    /// `Reduced`, walking each leaf array (or the tail) via `ChunkedSeq`
    /// rather than re-descending the trie per element.
    pub fn reduce_from<B, F>(&self, init: B, f: F) -> B
    where
        F: FnMut(B, &T) -> Step<B>,
    {
        match self.chunked_seq() {
            Some(seq) => seq.reduce(init, f),
            None => init,
        }
    }

    /// `kvreduce(f, init)` (§4.1.9): `f` also receives the global index;
    /// same chunk-granular driver as `reduce_from`, with the index tracked
    /// alongside the chunk walk (elements arrive in strict ascending index
    /// order, so a running counter suffices).
    pub fn kv_reduce<B, F>(&self, init: B, mut f: F) -> B
    where
        F: FnMut(B, usize, &T) -> Step<B>,
    {
        match self.chunked_seq() {
            Some(seq) => {
                let mut i = 0usize;
                seq.reduce(init, move |acc, v| {
                    let step = f(acc, i, v);
                    i += 1;
                    step
                })
            }
            None => init,
        }
    }

    /// `asTransient()` (§3 lifecycle, §4.2.1).
    pub fn as_transient(&self) -> TransientVector<T> {
        TransientVector::from_persistent(self)
    }

    /// Flat element iterator, independent of [`ChunkedSeq`] (used
    /// internally by `reduce`/`PartialEq`/`Debug`, and exposed as the
    /// `IntoIterator` impl below).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { vec: self, index: 0 }
    }
}

impl<T: Clone> std::ops::Index<usize> for PersistentVector<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        self.nth(i).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<T: Clone> FromIterator<T> for PersistentVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_sequence(iter)
    }
}

impl<'a, T: Clone> IntoIterator for &'a PersistentVector<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Flat, index-walking iterator over a vector's elements, in the style of
/// the teacher crate's own `PVecIter`.
pub struct Iter<'a, T> {
    vec: &'a PersistentVector<T>,
    index: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.vec.count {
            return None;
        }
        let leaf = self.vec.leaf_for(self.index);
        let v = &leaf[self.index & MASK];
        self.index += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vec.count - self.index;
        (remaining, Some(remaining))
    }
}
