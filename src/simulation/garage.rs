use super::{CarManager, DoorGate, GarageStats, Mover, ParkingZone, StatsSnapshot};
use crate::config::{GarageConfig, LayoutConfig};
use crate::presentation::Presenter;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub tick: Duration,
    pub backing_tick: Duration,
    pub stall_warning_ticks: u64,
}

/// Everything the lifecycles share. One `Arc<Garage>` is handed to each
/// lifecycle thread when it is spawned and lives as long as the simulation.
pub struct Garage {
    pub registry: CarManager,
    pub zone: Arc<ParkingZone>,
    pub door: DoorGate,
    pub layout: LayoutConfig,
    pub timing: Timing,
    pub stats: GarageStats,
    presenter: Arc<dyn Presenter>,
}

impl Garage {
    pub fn new(config: &GarageConfig, presenter: Arc<dyn Presenter>) -> Self {
        let timing = Timing {
            tick: config.simulation.tick(),
            backing_tick: config.simulation.backing_tick(),
            stall_warning_ticks: config.simulation.stall_warning_ticks,
        };

        Self {
            registry: CarManager::new(),
            zone: Arc::new(ParkingZone::from_layout(&config.layout)),
            door: DoorGate::new(),
            layout: config.layout.clone(),
            timing,
            stats: GarageStats::new(),
            presenter,
        }
    }

    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    /// Mover over this garage's registry at the regular tick.
    pub fn mover(&self) -> Mover<'_> {
        Mover::new(&self.registry, self.timing.tick)
            .with_safety_distance(self.layout.safety_distance)
            .with_stall_warning(self.timing.stall_warning_ticks)
    }

    pub fn stats_snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot(self.door.crossings())
    }
}
