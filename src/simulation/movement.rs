use super::{Car, CarManager, Direction, Leg, SAFETY_DISTANCE};
use std::ops::AddAssign;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Progress made while driving one or more legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegOutcome {
    /// Unit shifts actually performed.
    pub steps: u64,
    /// Ticks spent waiting behind another car.
    pub blocked_ticks: u64,
}

impl AddAssign for LegOutcome {
    fn add_assign(&mut self, rhs: Self) {
        self.steps += rhs.steps;
        self.blocked_ticks += rhs.blocked_ticks;
    }
}

/// One tick's decision: shift `car` one unit in `direction` unless one of
/// `others` blocks it. Returns whether the car moved.
pub fn try_step(car: &Car, direction: Direction, others: &[Arc<Car>], min_distance: f32) -> bool {
    if car.collides_within(direction, others, min_distance) {
        return false;
    }
    car.shift(direction.unit());
    true
}

/// Drives cars along legs with the poll-based collision protocol: every
/// tick re-check the registry, move one unit if the lane ahead is clear,
/// then sleep. A blocked car retries forever.
#[derive(Debug, Clone, Copy)]
pub struct Mover<'a> {
    registry: &'a CarManager,
    tick: Duration,
    safety_distance: f32,
    stall_warning_ticks: u64,
}

impl<'a> Mover<'a> {
    pub fn new(registry: &'a CarManager, tick: Duration) -> Self {
        Self {
            registry,
            tick,
            safety_distance: SAFETY_DISTANCE,
            stall_warning_ticks: u64::MAX,
        }
    }

    pub fn with_safety_distance(mut self, safety_distance: f32) -> Self {
        self.safety_distance = safety_distance;
        self
    }

    pub fn with_stall_warning(mut self, ticks: u64) -> Self {
        self.stall_warning_ticks = ticks;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn travel(&self, car: &Car, leg: Leg) -> LegOutcome {
        let mut outcome = LegOutcome::default();
        let mut stalled = 0u64;

        while leg.remaining(car.position()) {
            let others = self.registry.snapshot();
            if try_step(car, leg.direction, &others, self.safety_distance) {
                outcome.steps += 1;
                stalled = 0;
            } else {
                outcome.blocked_ticks += 1;
                stalled += 1;
                if stalled == self.stall_warning_ticks {
                    let at = car.position();
                    log::warn!(
                        "Car {} stalled for {} ticks heading {} at ({:.0}, {:.0})",
                        car.id(),
                        stalled,
                        leg.direction,
                        at.x,
                        at.y
                    );
                }
            }
            self.pause();
        }

        outcome
    }

    pub fn travel_route(&self, car: &Car, legs: &[Leg]) -> LegOutcome {
        let mut outcome = LegOutcome::default();
        for leg in legs {
            log::trace!(
                "Car {} turns {} towards {:.0} ({} units)",
                car.id(),
                leg.direction,
                leg.target,
                leg.distance_from(car.position())
            );
            outcome += self.travel(car, *leg);
        }
        outcome
    }

    /// Back out of a spot: a fixed-distance leg to the left.
    pub fn back_out(&self, car: &Car, distance: f32) -> LegOutcome {
        let target = car.x() - distance;
        self.travel(car, Leg::left(target))
    }

    fn pause(&self) {
        if self.tick.is_zero() {
            thread::yield_now();
        } else {
            thread::sleep(self.tick);
        }
    }
}
