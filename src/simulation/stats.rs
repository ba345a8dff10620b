use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by every lifecycle.
#[derive(Debug, Default)]
pub struct GarageStats {
    spawned: AtomicU64,
    active: AtomicU64,
    parked: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub spawned: u64,
    pub active: u64,
    pub parked: u64,
    pub completed: u64,
    pub failed: u64,
    pub door_crossings: u64,
}

impl GarageStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_spawn(&self) {
        self.spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registered(&self) {
        self.active.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parked(&self) {
        self.parked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unparked(&self) {
        self.parked.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn record_completed(&self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, door_crossings: u64) -> StatsSnapshot {
        StatsSnapshot {
            spawned: self.spawned.load(Ordering::Relaxed),
            active: self.active.load(Ordering::Relaxed),
            parked: self.parked.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            door_crossings,
        }
    }
}
