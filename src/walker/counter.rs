//! Outstanding-work counter
//!
//! Counts listing tasks that are scheduled or running. Every increment for a
//! discovered subdirectory is made by its parent before the parent's own
//! decrement and before the child is submitted, so the count can only reach
//! zero once the last task of the walk has finished.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared count of unfinished listing tasks
#[derive(Debug, Default)]
pub struct OutstandingWork {
    count: AtomicUsize,
}

impl OutstandingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more scheduled task
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Record one finished task
    ///
    /// Returns true for exactly the call that brings the count to zero.
    pub fn decrement_and_check_zero(&self) -> bool {
        let previous = self.count.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "outstanding work counter went negative");
        previous == 1
    }

    /// Current count
    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counter_basic() {
        let counter = OutstandingWork::new();
        assert_eq!(counter.get(), 0);

        counter.increment();
        counter.increment();
        assert_eq!(counter.get(), 2);

        assert!(!counter.decrement_and_check_zero());
        assert!(counter.decrement_and_check_zero());
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_counter_zero_observed_once() {
        let counter = Arc::new(OutstandingWork::new());
        let zero_hits = Arc::new(AtomicUsize::new(0));

        // Seed, then grow and shrink concurrently while the seed is held
        counter.increment();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                let zero_hits = Arc::clone(&zero_hits);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.increment();
                        if counter.decrement_and_check_zero() {
                            zero_hits.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(zero_hits.load(Ordering::SeqCst), 0);
        assert!(counter.decrement_and_check_zero());
    }
}
