use super::Validate;
use anyhow::{anyhow, Result};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationParams {
    /// Number of car lifecycles spawned before the driver stops.
    pub population: u32,
    /// Movement tick for every directional leg, in milliseconds.
    pub tick_ms: f64,
    /// Slower tick used while a car backs out of its spot.
    pub backing_tick_ms: f64,
    /// Consecutive blocked ticks before a stalled car is reported.
    #[serde(default = "default_stall_warning_ticks")]
    pub stall_warning_ticks: u64,
    pub spawn_interval: IntervalRange,
    pub dwell: IntervalRange,
}

fn default_stall_warning_ticks() -> u64 {
    3_000
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct IntervalRange {
    pub min_ms: f64,
    pub max_ms: f64,
}

impl IntervalRange {
    pub fn new(min_ms: f64, max_ms: f64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn fixed(ms: f64) -> Self {
        Self::new(ms, ms)
    }

    /// Uniform millisecond distribution over `[min_ms, max_ms]`.
    ///
    /// Only call on a validated range.
    pub fn distribution(&self) -> Uniform<f64> {
        Uniform::new_inclusive(self.min_ms, self.max_ms)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        millis(self.distribution().sample(rng))
    }

    fn check(&self, name: &str) -> Result<()> {
        if !self.min_ms.is_finite() || !self.max_ms.is_finite() {
            return Err(anyhow!("{} interval must be finite", name));
        }

        if self.min_ms < 0.0 {
            return Err(anyhow!("{} interval must be non-negative, got {}", name, self.min_ms));
        }

        if !fits_duration(self.max_ms) {
            return Err(anyhow!("{} interval maximum {} ms is out of range", name, self.max_ms));
        }

        if self.min_ms > self.max_ms {
            return Err(anyhow!(
                "{} interval minimum {} exceeds maximum {}",
                name,
                self.min_ms,
                self.max_ms
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RandomConfig {
    pub seed: Option<u64>,
}

impl SimulationParams {
    pub fn reference() -> Self {
        Self {
            population: 100,
            tick_ms: 10.0,
            backing_tick_ms: 30.0,
            stall_warning_ticks: default_stall_warning_ticks(),
            spawn_interval: IntervalRange::new(1_000.0, 2_000.0),
            dwell: IntervalRange::new(40_000.0, 50_000.0),
        }
    }

    pub fn tick(&self) -> Duration {
        millis(self.tick_ms)
    }

    pub fn backing_tick(&self) -> Duration {
        millis(self.backing_tick_ms)
    }
}

fn millis(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms.max(0.0) / 1_000.0).unwrap_or(Duration::MAX)
}

fn fits_duration(ms: f64) -> bool {
    Duration::try_from_secs_f64(ms / 1_000.0).is_ok()
}

impl Validate for SimulationParams {
    fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(anyhow!("Population must be greater than zero"));
        }

        if !(self.tick_ms >= 0.0 && fits_duration(self.tick_ms)) {
            return Err(anyhow!("Movement tick must be a non-negative number of milliseconds"));
        }

        if !(self.backing_tick_ms >= 0.0 && fits_duration(self.backing_tick_ms)) {
            return Err(anyhow!("Backing tick must be a non-negative number of milliseconds"));
        }

        if self.stall_warning_ticks == 0 {
            return Err(anyhow!("Stall warning threshold must be greater than zero"));
        }

        self.spawn_interval.check("spawn")?;
        self.dwell.check("dwell")?;

        Ok(())
    }
}
