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

//! The `Reduced` early-termination sentinel and the step result folds use
//! internally to recognize it.

/// A single-field wrapper signaling that a fold should stop early. Not an
/// error — a first-class control-flow value recognized and unwrapped by
/// `reduce`/`kv_reduce` before they return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduced<A>(pub A);

impl<A> Reduced<A> {
    pub fn new(value: A) -> Self {
        Reduced(value)
    }

    pub fn into_inner(self) -> A {
        self.0
    }
}

/// What a combining function hands back to a fold loop after each step:
/// either "keep going with this accumulator" or "stop, this is final".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<A> {
    Continue(A),
    Done(Reduced<A>),
}

impl<A> Step<A> {
    pub fn continue_with(value: A) -> Self {
        Step::Continue(value)
    }

    pub fn halt_with(value: A) -> Self {
        Step::Done(Reduced(value))
    }

    /// True when this step is a `Reduced` wrapper (`is_reduced` from §6).
    pub fn is_reduced(&self) -> bool {
        matches!(self, Step::Done(_))
    }

    /// Unwraps to the carried accumulator regardless of variant (`unwrap`
    /// from §6) — a fold loop calls this once it's done stepping.
    pub fn unwrap(self) -> A {
        match self {
            Step::Continue(a) => a,
            Step::Done(Reduced(a)) => a,
        }
    }
}
