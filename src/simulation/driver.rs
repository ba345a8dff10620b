use super::{run_car_cycle, CarId, Garage, StatsSnapshot, TripReport};
use crate::config::{GarageConfig, SimulationParams};
use crate::error::{LifecycleError, SimulationError};
use crate::presentation::Presenter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Outcome of a full simulation run.
#[derive(Debug)]
pub struct SimulationReport {
    pub trips: Vec<TripReport>,
    pub failures: Vec<LifecycleError>,
    pub stats: StatsSnapshot,
    pub elapsed: Duration,
}

/// Spawns one lifecycle thread per car at random intervals until the
/// population cap is reached, then waits for all of them to finish.
pub struct SimulationDriver {
    garage: Arc<Garage>,
    params: SimulationParams,
    rng: StdRng,
}

impl SimulationDriver {
    pub fn new(config: &GarageConfig, presenter: Arc<dyn Presenter>) -> Self {
        let rng = if let Some(seed) = config.random.seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        Self {
            garage: Arc::new(Garage::new(config, presenter)),
            params: config.simulation.clone(),
            rng,
        }
    }

    pub fn garage(&self) -> &Arc<Garage> {
        &self.garage
    }

    pub fn run(mut self) -> Result<SimulationReport, SimulationError> {
        let start = Instant::now();
        self.garage.presenter().setup_scene(&self.garage.layout)?;

        let population = self.params.population as usize;
        let mut handles: Vec<(CarId, JoinHandle<Result<TripReport, LifecycleError>>)> =
            Vec::with_capacity(population);
        let mut spawn_error = None;

        for n in 0..population {
            let id = CarId(n);
            let dwell = self.params.dwell.sample(&mut self.rng);
            let garage = Arc::clone(&self.garage);

            let spawned = thread::Builder::new()
                .name(format!("car-{n}"))
                .spawn(move || run_car_cycle(&garage, id, dwell));

            match spawned {
                Ok(handle) => handles.push((id, handle)),
                Err(source) => {
                    log::error!("Could not spawn car {}: {}", id, source);
                    spawn_error = Some(SimulationError::Spawn { car: id, source });
                    break;
                }
            }

            self.garage.stats.record_spawn();
            let stats = self.garage.stats_snapshot();
            log::info!(
                "Spawned car {} ({}/{}): {} active, {} parked, {} spots free",
                id,
                n + 1,
                population,
                stats.active,
                stats.parked,
                self.garage.zone.available_count()
            );

            if n + 1 < population {
                thread::sleep(self.params.spawn_interval.sample(&mut self.rng));
            }
        }

        let mut trips = Vec::with_capacity(handles.len());
        let mut failures = Vec::new();
        let mut panicked = None;

        for (id, handle) in handles {
            match handle.join() {
                Ok(Ok(trip)) => {
                    log::debug!("Car {} finished after {} steps", trip.car, trip.movement.steps);
                    trips.push(trip);
                }
                Ok(Err(err)) => {
                    log::error!("Car {} failed: {}", id, err);
                    failures.push(err);
                }
                Err(_) => {
                    log::error!("Car {} panicked", id);
                    if panicked.is_none() {
                        panicked = Some(SimulationError::LifecyclePanicked(id));
                    }
                }
            }
        }

        if let Some(err) = spawn_error.or(panicked) {
            return Err(err);
        }

        Ok(SimulationReport {
            trips,
            failures,
            stats: self.garage.stats_snapshot(),
            elapsed: start.elapsed(),
        })
    }
}
