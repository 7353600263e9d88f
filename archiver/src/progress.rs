use std::sync::atomic::{AtomicUsize, Ordering};

/// Player-level progress shared by all workers.
///
/// Only counts and logs; never blocks a worker.
pub struct Progress {
    total: usize,
    done: AtomicUsize,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            done: AtomicUsize::new(0),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    /// Record one finished player and return the new count.
    pub fn player_done(&self, worker_id: usize, player: &str) -> usize {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(
            worker_id,
            player,
            done,
            total = self.total,
            "Player {}/{} complete",
            done,
            self.total
        );
        done
    }
}
