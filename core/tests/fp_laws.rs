//! Property tests for the universally-quantified invariants over
//! `PersistentVector`/`TransientVector`: referential transparency of every
//! transformation, structural preservation across `assoc_n`/`cons`/`pop`,
//! and the transient freeze protocol.

use ark_pvector_core::{PersistentVector, Step};
use proptest::prelude::*;

fn pv_from(elements: &[i32]) -> PersistentVector<i32> {
    elements.iter().copied().collect()
}

proptest! {
    /// Invariant 1: `assoc_n` updates exactly the target index and leaves
    /// every other index untouched.
    #[test]
    fn prop_assoc_n_touches_only_its_index(
        elements in prop::collection::vec(any::<i32>(), 1..200),
        raw_index: usize,
        x: i32,
    ) {
        let v = pv_from(&elements);
        let i = raw_index % elements.len();
        let updated = v.assoc_n(i, x).unwrap();

        prop_assert_eq!(*updated.nth(i).unwrap(), x);
        for j in 0..elements.len() {
            if j != i {
                prop_assert_eq!(*updated.nth(j).unwrap(), elements[j]);
            }
        }
    }

    /// Invariant 2: `cons` grows count by exactly one and places the new
    /// value at the new last index.
    #[test]
    fn prop_cons_appends_at_new_tail(
        elements in prop::collection::vec(any::<i32>(), 0..200),
        x: i32,
    ) {
        let v = pv_from(&elements);
        let grown = v.cons(x);
        prop_assert_eq!(grown.count(), v.count() + 1);
        prop_assert_eq!(*grown.nth(v.count()).unwrap(), x);
        for j in 0..elements.len() {
            prop_assert_eq!(*grown.nth(j).unwrap(), elements[j]);
        }
    }

    /// Invariant 3: `pop` is the exact inverse of the `cons` that produced
    /// the popped vector's last element.
    #[test]
    fn prop_pop_inverts_cons(
        elements in prop::collection::vec(any::<i32>(), 1..200),
    ) {
        let v = pv_from(&elements);
        let last = *v.nth(v.count() - 1).unwrap();
        let popped = v.pop().unwrap();
        prop_assert_eq!(popped.count(), v.count() - 1);
        let restored = popped.cons(last);
        prop_assert_eq!(restored, v);
    }

    /// Invariant 4: materializing `seq()` reproduces `nth(0), ..., nth(count-1)`.
    #[test]
    fn prop_seq_matches_nth_walk(
        elements in prop::collection::vec(any::<i32>(), 0..200),
    ) {
        let v = pv_from(&elements);
        let expected: Vec<i32> = (0..v.count()).map(|i| *v.nth(i).unwrap()).collect();
        let materialized: Vec<i32> = match v.seq() {
            Some(seq) => seq.collect(),
            None => Vec::new(),
        };
        prop_assert_eq!(materialized, expected);
    }

    /// Invariant 5: `drop(n)` materialized reproduces the tail slice from
    /// index `n` onward.
    #[test]
    fn prop_drop_matches_suffix(
        elements in prop::collection::vec(any::<i32>(), 1..200),
        n in 0i64..400,
    ) {
        let v = pv_from(&elements);
        let expected: Vec<i32> = if n <= 0 {
            elements.clone()
        } else if (n as usize) >= elements.len() {
            Vec::new()
        } else {
            elements[(n as usize)..].to_vec()
        };
        let materialized: Vec<i32> = match v.drop(n) {
            Some(seq) => seq.collect(),
            None => Vec::new(),
        };
        prop_assert_eq!(materialized, expected);
    }

    /// Invariant 6: `asTransient().persistent()` is structurally equal to
    /// the source and leaves the source vector unchanged.
    #[test]
    fn prop_transient_round_trip_is_identity(
        elements in prop::collection::vec(any::<i32>(), 0..200),
    ) {
        let v = pv_from(&elements);
        let before: Vec<i32> = (0..v.count()).map(|i| *v.nth(i).unwrap()).collect();
        let mut tv = v.as_transient();
        let roundtripped = tv.persistent().unwrap();

        prop_assert_eq!(&roundtripped, &v);
        let after: Vec<i32> = (0..v.count()).map(|i| *v.nth(i).unwrap()).collect();
        prop_assert_eq!(before, after);
    }

    /// Invariant 7: conjoining a sequence onto a fresh transient and
    /// freezing yields a PV with exactly those elements, in order.
    #[test]
    fn prop_transient_build_matches_from_sequence(
        elements in prop::collection::vec(any::<i32>(), 0..300),
    ) {
        let mut tv = ark_pvector_core::TransientVector::new();
        for &x in &elements {
            tv.conj(x).unwrap();
        }
        let built = tv.persistent().unwrap();
        let expected = pv_from(&elements);
        prop_assert_eq!(built, expected);
    }

    /// Invariant 9: once `persistent()` has been called, any further
    /// mutation through the same transient handle fails.
    #[test]
    fn prop_no_aliasing_into_frozen(
        elements in prop::collection::vec(any::<i32>(), 0..100),
        extra: i32,
    ) {
        let mut tv = ark_pvector_core::TransientVector::new();
        for &x in &elements {
            tv.conj(x).unwrap();
        }
        let _frozen = tv.persistent().unwrap();
        prop_assert!(tv.conj(extra).is_err());
        prop_assert!(tv.assoc_n(0, extra).is_err() || elements.is_empty());
    }

    /// reduce_from never observes more elements than are in the vector,
    /// and with a pure running-sum never diverges from a plain fold.
    #[test]
    fn prop_reduce_from_matches_plain_sum(
        elements in prop::collection::vec(any::<i64>(), 0..300),
    ) {
        let v: PersistentVector<i64> = elements.iter().copied().collect();
        let summed = v.reduce_from(0i64, |acc, x| Step::continue_with(acc + x));
        let expected: i64 = elements.iter().sum();
        prop_assert_eq!(summed, expected);
    }
}
