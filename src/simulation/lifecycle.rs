//! The per-car state machine.
//!
//! Every car walks the same fixed sequence of stages, from creation to
//! removal, with no skips:
//!
//! ```text
//! Created → Enqueuing → AwaitingSpot → CrossingDoorIn → TravelingToSpot
//!   → Parked → LeavingSpot → TravelingToExit → CrossingDoorOut
//!   → Departing → Removed
//! ```
//!
//! The spot is held from `AwaitingSpot` until `LeavingSpot` completes and is
//! released exactly once.

use super::{Car, CarId, Direction, Garage, Leg, LegOutcome, SpotId};
use crate::error::LifecycleError;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStage {
    Created,
    Enqueuing,
    AwaitingSpot,
    CrossingDoorIn,
    TravelingToSpot,
    Parked,
    LeavingSpot,
    TravelingToExit,
    CrossingDoorOut,
    Departing,
    Removed,
}

impl LifecycleStage {
    pub const ALL: [LifecycleStage; 11] = [
        LifecycleStage::Created,
        LifecycleStage::Enqueuing,
        LifecycleStage::AwaitingSpot,
        LifecycleStage::CrossingDoorIn,
        LifecycleStage::TravelingToSpot,
        LifecycleStage::Parked,
        LifecycleStage::LeavingSpot,
        LifecycleStage::TravelingToExit,
        LifecycleStage::CrossingDoorOut,
        LifecycleStage::Departing,
        LifecycleStage::Removed,
    ];

    pub fn next(self) -> Option<LifecycleStage> {
        let pos = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(pos + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self == LifecycleStage::Removed
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What one completed lifecycle did.
#[derive(Debug, Clone)]
pub struct TripReport {
    pub car: CarId,
    pub spot: SpotId,
    pub stages: Vec<LifecycleStage>,
    pub movement: LegOutcome,
    pub dwell: Duration,
}

struct StageLog {
    car: CarId,
    stages: Vec<LifecycleStage>,
}

impl StageLog {
    fn new(car: CarId) -> Self {
        Self {
            car,
            stages: vec![LifecycleStage::Created],
        }
    }

    fn enter(&mut self, stage: LifecycleStage) {
        let current = self.stages.last().copied();
        debug_assert_eq!(current.and_then(LifecycleStage::next), Some(stage));
        log::debug!("Car {} -> {}", self.car, stage);
        self.stages.push(stage);
    }
}

/// Run one car from creation to removal.
///
/// Only creation can fail; every later stage either moves, waits or retries.
pub fn run_car_cycle(garage: &Garage, id: CarId, dwell: Duration) -> Result<TripReport, LifecycleError> {
    let area = garage.layout.spawn_area();
    let sprite = match garage.presenter().create_sprite(id, area) {
        Ok(sprite) => sprite,
        Err(source) => {
            garage.stats.record_failed();
            return Err(LifecycleError::Creation { car: id, source });
        }
    };

    let car = Arc::new(Car::new(id, area, sprite));
    garage.registry.add(Arc::clone(&car));
    garage.stats.record_registered();

    let mut trail = StageLog::new(id);
    let mover = garage.mover();
    let layout = &garage.layout;
    let mut movement = LegOutcome::default();

    trail.enter(LifecycleStage::Enqueuing);
    movement += mover.travel(&car, Leg::down(layout.queue_y));

    trail.enter(LifecycleStage::AwaitingSpot);
    let reservation = garage.zone.acquire_spot();
    let spot = reservation.spot().clone();
    log::debug!("Car {} assigned spot {}", id, spot.id);

    trail.enter(LifecycleStage::CrossingDoorIn);
    movement += garage
        .door
        .cross(Direction::Down, || mover.travel(&car, Leg::down(layout.door_y)));

    trail.enter(LifecycleStage::TravelingToSpot);
    movement += mover.travel_route(&car, &spot.parking_legs);

    trail.enter(LifecycleStage::Parked);
    garage.stats.record_parked();
    thread::sleep(dwell);
    garage.stats.record_unparked();

    trail.enter(LifecycleStage::LeavingSpot);
    movement += mover
        .with_tick(garage.timing.backing_tick)
        .back_out(&car, layout.back_out_distance);
    reservation.release();

    trail.enter(LifecycleStage::TravelingToExit);
    movement += mover.travel_route(&car, &spot.leaving_legs);

    trail.enter(LifecycleStage::CrossingDoorOut);
    movement += garage
        .door
        .cross(Direction::Up, || mover.travel(&car, Leg::up(layout.queue_y)));

    trail.enter(LifecycleStage::Departing);
    movement += mover.travel(&car, Leg::up(layout.departure_y));

    trail.enter(LifecycleStage::Removed);
    garage.presenter().destroy_sprite(car.sprite());
    garage.registry.remove(id);
    garage.stats.record_completed();

    Ok(TripReport {
        car: id,
        spot: spot.id,
        stages: trail.stages,
        movement,
        dwell,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_chain_to_removed() {
        let mut stage = LifecycleStage::Created;
        let mut count = 1;
        while let Some(next) = stage.next() {
            stage = next;
            count += 1;
        }
        assert!(stage.is_terminal());
        assert_eq!(count, LifecycleStage::ALL.len());
    }

    #[test]
    fn removed_has_no_successor() {
        assert_eq!(LifecycleStage::Removed.next(), None);
        assert_eq!(LifecycleStage::Parked.next(), Some(LifecycleStage::LeavingSpot));
    }
}
