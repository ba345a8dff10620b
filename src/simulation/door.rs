use super::Direction;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// The single-lane door between the outer queue and the garage floor.
///
/// At most one car is inside [`DoorGate::cross`] at a time, in either
/// direction. Waiting cars are granted the door in whatever order the lock
/// hands it out.
#[derive(Debug, Default)]
pub struct DoorGate {
    lock: Mutex<()>,
    crossings: AtomicU64,
}

impl DoorGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `drive` while holding the door.
    pub fn cross<R>(&self, direction: Direction, drive: impl FnOnce() -> R) -> R {
        let _door = self.lock.lock();
        log::debug!("Door taken, heading {}", direction);
        let result = drive();
        self.crossings.fetch_add(1, Ordering::Relaxed);
        result
    }

    pub fn crossings(&self) -> u64 {
        self.crossings.load(Ordering::Relaxed)
    }

    pub fn is_occupied(&self) -> bool {
        self.lock.is_locked()
    }
}
