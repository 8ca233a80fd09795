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

//! Error taxonomy for the persistent vector / transient vector protocol.

use std::thread::ThreadId;
use thiserror::Error;

/// Everything that can go wrong calling into a [`crate::PersistentVector`]
/// or [`crate::TransientVector`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PVecError {
    #[error("index {index} out of bounds for vector of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("pop called on an empty vector")]
    EmptyPop,

    #[error("transient vector used after persistent() was called on it")]
    UseAfterPersistent,

    #[error("transient vector edited from thread {caller:?}, but is owned by thread {owner:?}")]
    CrossThreadEdit {
        owner: ThreadId,
        caller: ThreadId,
    },

    #[error("vector keys must be integral indices, got a non-integer key")]
    KeyTypeMismatch,
}
