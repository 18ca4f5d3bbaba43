#![cfg(loom)]

use afloat::{AtomicFloat, BackoffAtomicF64, BitwiseAtomicF64, LockingAtomicF64};
use loom::sync::Arc;
use loom::thread;

fn concurrent_adds_are_not_lost<F: AtomicFloat + 'static>() {
    loom::model(|| {
        let cell = Arc::new(F::new(0.0));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || cell.add(1.0))
            })
            .collect();
        let mut results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        results.sort_by(f64::total_cmp);

        // Each add observed a distinct predecessor.
        assert_eq!(results, vec![1.0, 2.0]);
        assert_eq!(cell.load(), 2.0);
    });
}

fn concurrent_swaps_form_a_permutation<F: AtomicFloat + 'static>() {
    loom::model(|| {
        let cell = Arc::new(F::new(0.0));
        let handles: Vec<_> = [1.0, 2.0]
            .into_iter()
            .map(|v| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || cell.swap(v))
            })
            .collect();
        let mut seen: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        seen.push(cell.load());
        seen.sort_by(f64::total_cmp);
        assert_eq!(seen, vec![0.0, 1.0, 2.0]);
    });
}

fn add_races_swap<F: AtomicFloat + 'static>() {
    loom::model(|| {
        let cell = Arc::new(F::new(1.0));
        let adder = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || cell.add(1.0))
        };
        let swapper = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || cell.swap(10.0))
        };
        let sum = adder.join().unwrap();
        let previous = swapper.join().unwrap();
        let last = cell.load();

        // Either the add is ordered first and its result is swapped out, or
        // the swap is ordered first and the add lands on top of it.
        let outcome = (sum, previous, last);
        assert!(
            outcome == (2.0, 2.0, 10.0) || outcome == (11.0, 1.0, 11.0),
            "sum={sum} previous={previous} last={last}"
        );
    });
}

#[test]
fn loom_bitwise_add() {
    concurrent_adds_are_not_lost::<BitwiseAtomicF64>();
}

#[test]
fn loom_backoff_add() {
    concurrent_adds_are_not_lost::<BackoffAtomicF64>();
}

#[test]
fn loom_locking_add() {
    concurrent_adds_are_not_lost::<LockingAtomicF64>();
}

#[test]
fn loom_bitwise_swap() {
    concurrent_swaps_form_a_permutation::<BitwiseAtomicF64>();
}

#[test]
fn loom_locking_swap() {
    concurrent_swaps_form_a_permutation::<LockingAtomicF64>();
}

#[test]
fn loom_bitwise_add_races_swap() {
    add_races_swap::<BitwiseAtomicF64>();
}

#[test]
fn loom_locking_add_races_swap() {
    add_races_swap::<LockingAtomicF64>();
}

#[test]
fn loom_backoff_add_races_swap() {
    add_races_swap::<BackoffAtomicF64>();
}
