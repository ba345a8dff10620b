use super::{Leg, Rect};
use crate::config::LayoutConfig;
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpotId {
    pub row: u32,
    pub index: u32,
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.index)
    }
}

#[derive(Debug, Clone)]
pub struct ParkingSpot {
    pub id: SpotId,
    pub area: Rect,
    /// From the inner door lane into the spot.
    pub parking_legs: Vec<Leg>,
    /// From the backed-out position to the outbound side of the door.
    pub leaving_legs: Vec<Leg>,
}

/// Bounded pool of parking spots.
///
/// Slot states live next to the spots but are only read or changed while
/// holding `slots`. Waiters rescan the whole list after every wake, so there
/// is no FIFO order among competing acquirers.
#[derive(Debug)]
pub struct ParkingZone {
    spots: Vec<ParkingSpot>,
    slots: Mutex<Vec<SlotState>>,
    spot_freed: Condvar,
}

/// `generation` advances on every grant. A reservation only frees its slot
/// while the generation it was handed still matches.
#[derive(Debug, Clone, Copy, Default)]
struct SlotState {
    taken: bool,
    generation: u64,
}

impl ParkingZone {
    pub fn new(spots: Vec<ParkingSpot>) -> Self {
        let slots = Mutex::new(vec![SlotState::default(); spots.len()]);
        Self {
            spots,
            slots,
            spot_freed: Condvar::new(),
        }
    }

    pub fn from_layout(layout: &LayoutConfig) -> Self {
        let spots = layout
            .spots
            .iter()
            .map(|spot| ParkingSpot {
                id: SpotId { row: spot.row, index: spot.index },
                area: spot.area.rect(),
                parking_legs: layout.parking_legs(spot),
                leaving_legs: layout.leaving_legs(spot),
            })
            .collect();

        Self::new(spots)
    }

    pub fn spots(&self) -> &[ParkingSpot] {
        &self.spots
    }

    /// Block until a spot is free, mark it taken and hand it out.
    pub fn acquire_spot(self: &Arc<Self>) -> SpotReservation {
        let mut slots = self.slots.lock();
        loop {
            if let Some((slot, generation)) = take_first(&mut slots) {
                log::debug!("Spot {} reserved", self.spots[slot].id);
                return SpotReservation {
                    zone: Arc::clone(self),
                    slot,
                    generation,
                };
            }
            self.spot_freed.wait(&mut slots);
        }
    }

    pub fn try_acquire_spot(self: &Arc<Self>) -> Option<SpotReservation> {
        let (slot, generation) = take_first(&mut self.slots.lock())?;
        Some(SpotReservation {
            zone: Arc::clone(self),
            slot,
            generation,
        })
    }

    /// Mark `id` available and wake a waiter. Returns `false` when the spot
    /// is unknown or was not reserved.
    ///
    /// A reservation still outstanding for `id` becomes stale and no longer
    /// frees the spot when it is dropped.
    pub fn release_spot(&self, id: SpotId) -> bool {
        let Some(slot) = self.slot_of(id) else {
            log::warn!("Release of unknown spot {}", id);
            return false;
        };

        let mut slots = self.slots.lock();
        if !slots[slot].taken {
            log::warn!("Spot {} released while already available", id);
            return false;
        }

        self.free_slot(&mut slots, slot);
        true
    }

    fn release_reservation(&self, slot: usize, generation: u64) {
        let mut slots = self.slots.lock();
        let state = slots[slot];
        if !state.taken || state.generation != generation {
            log::debug!("Stale reservation for spot {} ignored", self.spots[slot].id);
            return;
        }

        self.free_slot(&mut slots, slot);
    }

    fn free_slot(&self, slots: &mut [SlotState], slot: usize) {
        slots[slot].taken = false;
        self.spot_freed.notify_one();
        log::debug!("Spot {} released", self.spots[slot].id);
    }

    pub fn is_available(&self, id: SpotId) -> Option<bool> {
        let slot = self.slot_of(id)?;
        Some(!self.slots.lock()[slot].taken)
    }

    pub fn available_count(&self) -> usize {
        self.slots.lock().iter().filter(|state| !state.taken).count()
    }

    fn slot_of(&self, id: SpotId) -> Option<usize> {
        self.spots.iter().position(|spot| spot.id == id)
    }
}

fn take_first(slots: &mut [SlotState]) -> Option<(usize, u64)> {
    let slot = slots.iter().position(|state| !state.taken)?;
    let state = &mut slots[slot];
    state.taken = true;
    state.generation += 1;
    Some((slot, state.generation))
}

/// A spot held by one car. Releasing consumes the reservation; dropping it
/// releases too, so a spot is never returned twice through the same hold.
#[derive(Debug)]
pub struct SpotReservation {
    zone: Arc<ParkingZone>,
    slot: usize,
    generation: u64,
}

impl SpotReservation {
    pub fn spot(&self) -> &ParkingSpot {
        &self.zone.spots[self.slot]
    }

    pub fn id(&self) -> SpotId {
        self.spot().id
    }

    pub fn release(self) {
        drop(self);
    }
}

impl Drop for SpotReservation {
    fn drop(&mut self) {
        self.zone.release_reservation(self.slot, self.generation);
    }
}
