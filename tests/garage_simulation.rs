use parking_garage_sim::{
    config::{GarageConfig, IntervalRange, LayoutConfig},
    error::{PresentationError, SimulationError},
    presentation::{ConsolePresenter, Presenter, SpriteHandle},
    simulation::{
        run_car_cycle, Car, CarId, CarManager, Garage, LifecycleStage, ParkingZone, Point, Rect,
        SimulationDriver, SpotId,
    },
};
use anyhow::Result;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Reference garage with every delay collapsed so runs finish quickly.
fn fast_config(population: u32) -> GarageConfig {
    let mut config = GarageConfig::reference();
    config.simulation.population = population;
    config.simulation.tick_ms = 0.0;
    config.simulation.backing_tick_ms = 0.0;
    config.simulation.spawn_interval = IntervalRange::new(0.0, 2.0);
    config.simulation.dwell = IntervalRange::new(0.0, 5.0);
    config.random.seed = Some(12345);
    config
}

/// Presenter that refuses to create sprites for selected cars.
#[derive(Default)]
struct FlakyPresenter {
    refuse: HashSet<CarId>,
    fail_scene: bool,
    panic_for: Option<CarId>,
    next: AtomicU64,
    live: AtomicUsize,
}

impl Presenter for FlakyPresenter {
    fn setup_scene(&self, _layout: &LayoutConfig) -> Result<(), PresentationError> {
        if self.fail_scene {
            return Err(PresentationError::AssetLoad {
                asset: "background.jpg".to_string(),
                reason: "missing".to_string(),
            });
        }
        Ok(())
    }

    fn create_sprite(&self, car: CarId, _area: Rect) -> Result<SpriteHandle, PresentationError> {
        if self.panic_for == Some(car) {
            panic!("renderer crashed while creating car {car}");
        }
        if self.refuse.contains(&car) {
            return Err(PresentationError::Unavailable);
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(SpriteHandle(self.next.fetch_add(1, Ordering::SeqCst)))
    }

    fn destroy_sprite(&self, _handle: SpriteHandle) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }

    fn get_name(&self) -> &'static str {
        "flaky"
    }
}

#[test]
fn shipped_config_matches_reference() -> Result<()> {
    let shipped = GarageConfig::load_from_file("garage.toml")?;
    let reference = GarageConfig::reference();

    assert_eq!(shipped.simulation.population, reference.simulation.population);
    assert_eq!(shipped.simulation.dwell, reference.simulation.dwell);
    assert_eq!(shipped.layout.spots.len(), reference.layout.spots.len());
    for (a, b) in shipped.layout.spots.iter().zip(&reference.layout.spots) {
        assert_eq!((a.row, a.index), (b.row, b.index));
        assert_eq!(a.area, b.area);
    }
    Ok(())
}

#[test]
fn lone_car_runs_every_stage_in_order() {
    let config = fast_config(1);
    let presenter = Arc::new(FlakyPresenter::default());
    let garage = Garage::new(&config, presenter.clone());

    let trip = run_car_cycle(&garage, CarId(0), Duration::from_millis(1)).unwrap();

    assert_eq!(trip.stages, LifecycleStage::ALL.to_vec());
    assert_eq!(trip.spot, SpotId { row: 1, index: 1 });
    // Queue, door, spot 1-1, back out, exit route, door, off the map.
    assert_eq!(trip.movement.steps, 165 + 40 + 60 + 30 + 380 + 40 + 165);
    assert_eq!(trip.movement.blocked_ticks, 0);

    assert!(garage.registry.is_empty());
    assert_eq!(garage.zone.available_count(), 12);
    assert_eq!(garage.door.crossings(), 2);
    assert_eq!(presenter.live.load(Ordering::SeqCst), 0);

    let stats = garage.stats_snapshot();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.active, 0);
    assert_eq!(stats.parked, 0);
}

#[test]
fn deep_spot_uses_its_own_lanes() {
    let config = fast_config(1);
    let garage = Garage::new(&config, Arc::new(ConsolePresenter::new()));
    let held: Vec<_> = (0..11).map(|_| garage.zone.acquire_spot()).collect();

    let trip = run_car_cycle(&garage, CarId(7), Duration::ZERO).unwrap();
    assert_eq!(trip.spot, SpotId { row: 4, index: 12 });
    assert_eq!(trip.movement.blocked_ticks, 0);

    drop(held);
    assert_eq!(garage.zone.available_count(), 12);
}

#[test]
fn driver_completes_a_small_population() -> Result<()> {
    let config = fast_config(5);
    let presenter = Arc::new(ConsolePresenter::new());
    let report = SimulationDriver::new(&config, presenter.clone()).run()?;

    assert_eq!(report.trips.len(), 5);
    assert!(report.failures.is_empty());
    assert_eq!(report.stats.spawned, 5);
    assert_eq!(report.stats.completed, 5);
    assert_eq!(report.stats.active, 0);
    assert_eq!(report.stats.door_crossings, 10);
    assert_eq!(presenter.live_sprites(), 0);

    for trip in &report.trips {
        assert_eq!(trip.stages.last(), Some(&LifecycleStage::Removed));
    }
    Ok(())
}

#[test]
fn more_cars_than_spots_all_complete() -> Result<()> {
    let mut config = fast_config(30);
    config.simulation.tick_ms = 0.05;
    config.simulation.backing_tick_ms = 0.05;
    config.simulation.spawn_interval = IntervalRange::new(0.0, 1.0);
    config.simulation.dwell = IntervalRange::new(0.0, 2.0);

    let presenter = Arc::new(ConsolePresenter::new());
    let driver = SimulationDriver::new(&config, presenter.clone());
    let garage = driver.garage().clone();
    let report = driver.run()?;

    assert_eq!(report.trips.len(), 30);
    assert_eq!(report.stats.completed, 30);
    assert_eq!(report.stats.door_crossings, 60);
    assert!(garage.registry.is_empty());
    assert_eq!(garage.zone.available_count(), 12);
    assert_eq!(presenter.live_sprites(), 0);

    let spots: HashSet<SpotId> = report.trips.iter().map(|t| t.spot).collect();
    assert!(spots.len() <= 12);
    Ok(())
}

#[test]
fn panicking_lifecycle_is_reported_after_the_others_finish() {
    let config = fast_config(3);
    let presenter = Arc::new(FlakyPresenter {
        panic_for: Some(CarId(2)),
        ..Default::default()
    });

    let driver = SimulationDriver::new(&config, presenter.clone());
    let garage = driver.garage().clone();
    let err = driver.run().unwrap_err();

    assert!(matches!(err, SimulationError::LifecyclePanicked(CarId(2))));
    assert_eq!(garage.stats_snapshot().completed, 2);
    assert!(garage.registry.is_empty());
}

#[test]
fn sprite_failure_only_fails_that_car() -> Result<()> {
    let config = fast_config(3);
    let presenter = Arc::new(FlakyPresenter {
        refuse: [CarId(1)].into_iter().collect(),
        ..Default::default()
    });

    let driver = SimulationDriver::new(&config, presenter.clone());
    let garage = driver.garage().clone();
    let report = driver.run()?;

    assert_eq!(report.trips.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].car(), CarId(1));
    assert_eq!(report.stats.failed, 1);
    assert!(garage.registry.is_empty());
    assert_eq!(presenter.live.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn scene_failure_aborts_before_spawning() {
    let config = fast_config(3);
    let presenter = Arc::new(FlakyPresenter {
        fail_scene: true,
        ..Default::default()
    });

    let driver = SimulationDriver::new(&config, presenter.clone());
    let garage = driver.garage().clone();
    let err = driver.run().unwrap_err();

    assert!(matches!(err, SimulationError::Scene(_)));
    assert_eq!(garage.stats_snapshot().spawned, 0);
    assert_eq!(presenter.next.load(Ordering::SeqCst), 0);
}

#[test]
fn contended_spots_are_never_shared() {
    let zone = Arc::new(ParkingZone::from_layout(&LayoutConfig::reference()));
    let holders: Arc<Vec<AtomicUsize>> =
        Arc::new((0..zone.spots().len()).map(|_| AtomicUsize::new(0)).collect());
    let contenders = 24;
    let barrier = Arc::new(Barrier::new(contenders));
    let violation = Arc::new(AtomicBool::new(false));

    let handles: Vec<_> = (0..contenders)
        .map(|_| {
            let (zone, holders, barrier, violation) =
                (zone.clone(), holders.clone(), barrier.clone(), violation.clone());
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..50 {
                    let reservation = zone.acquire_spot();
                    let slot = zone.spots().iter().position(|s| s.id == reservation.id()).unwrap();
                    if holders[slot].fetch_add(1, Ordering::SeqCst) != 0 {
                        violation.store(true, Ordering::SeqCst);
                    }
                    thread::yield_now();
                    holders[slot].fetch_sub(1, Ordering::SeqCst);
                    reservation.release();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(!violation.load(Ordering::SeqCst));
    assert_eq!(zone.available_count(), 12);
}

#[test]
fn snapshots_only_see_whole_cars() {
    let registry = Arc::new(CarManager::new());
    let spawn = Point::new(445.0, -20.0);
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let (registry, done) = (registry.clone(), done.clone());
        thread::spawn(move || {
            for n in 0..500 {
                let car = Arc::new(Car::new(CarId(n), Rect::from_origin(spawn, 20.0, 20.0), SpriteHandle(n as u64)));
                registry.add(car);
                if n % 2 == 1 {
                    registry.remove(CarId(n - 1));
                }
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    while !done.load(Ordering::SeqCst) {
        for car in registry.snapshot() {
            assert_eq!(car.position(), spawn);
            assert_eq!(car.area().width(), 20.0);
        }
    }

    writer.join().unwrap();
    assert_eq!(registry.len(), 250);
}
