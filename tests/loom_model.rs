//! Exhaustive interleaving checks. Run with
//! `RUSTFLAGS="--cfg loom" cargo test --test loom_model --release`.
#![cfg(loom)]

use condswap::{ConditionalSwap, Emitter};
use std::sync::atomic::Ordering;
use loom::sync::atomic::{AtomicU32, AtomicU64};
use loom::sync::Arc;
use loom::thread;

#[test]
fn add_return_loses_no_updates() {
    loom::model(|| {
        let cell = Arc::new(AtomicU32::new(7));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || ConditionalSwap::add_return(&*cell, 1))
            })
            .collect();
        let mut results: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        results.sort_unstable();

        assert_eq!(results, vec![8, 9]);
        assert_eq!(cell.load(Ordering::SeqCst), 9);
    });
}

#[test]
fn add_return_races_exchange() {
    loom::model(|| {
        let cell = Arc::new(AtomicU64::new(10));

        let adder = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || ConditionalSwap::add_return(&*cell, 5))
        };
        let swapped = ConditionalSwap::exchange(&*cell, 100);
        let added = adder.join().unwrap();
        let last = cell.load(Ordering::SeqCst);

        match swapped {
            15 => assert_eq!((added, last), (15, 100)),
            10 => assert_eq!((added, last), (105, 105)),
            other => panic!("exchange observed {other}"),
        }
    });
}

#[test]
fn compare_exchange_has_one_winner() {
    loom::model(|| {
        let cell = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (1..=2u32)
            .map(|id| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || ConditionalSwap::compare_exchange(&*cell, 0, id) == 0)
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
        assert_ne!(cell.load(Ordering::SeqCst), 0);
    });
}
