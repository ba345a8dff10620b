use super::Validate;
use crate::simulation::{Leg, Point, Rect};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PointConfig {
    pub x: f32,
    pub y: f32,
}

impl From<PointConfig> for Point {
    fn from(p: PointConfig) -> Self {
        Point::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RectConfig {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl RectConfig {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { min: [x1, y1], max: [x2, y2] }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.min[0], self.min[1], self.max[0], self.max[1])
    }
}

/// Garage geometry: lanes, door and parking spots.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Side length of the square car footprint.
    pub car_size: f32,
    /// Cars closer than this along a shared lane block each other.
    pub safety_distance: f32,
    /// How far a car backs out of its spot before heading for the exit.
    pub back_out_distance: f32,
    /// Y where arriving cars queue in front of the door.
    pub queue_y: f32,
    /// Y of the inner lane just past the door.
    pub door_y: f32,
    /// Y past which departing cars are off the map.
    pub departure_y: f32,
    /// Offset from a spot's left edge to the vertical lane serving it.
    #[serde(default = "default_lane_offset")]
    pub lane_offset: f32,
    /// Inset of a parked car inside its spot.
    #[serde(default = "default_spot_margin")]
    pub spot_margin: f32,
    /// Spawn point; its X is the inbound lane.
    pub spawn: PointConfig,
    /// Bottom-right corner of the outbound route: X is the outbound lane,
    /// Y the lane running below the spots.
    pub exit_lane: PointConfig,
    pub door: RectConfig,
    pub spots: Vec<SpotConfig>,
}

fn default_lane_offset() -> f32 {
    35.0
}

fn default_spot_margin() -> f32 {
    5.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotConfig {
    pub row: u32,
    pub index: u32,
    pub area: RectConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_legs: Option<Vec<Leg>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaving_legs: Option<Vec<Leg>>,
}

impl SpotConfig {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, row: u32, index: u32) -> Self {
        Self {
            row,
            index,
            area: RectConfig::new(x1, y1, x2, y2),
            parking_legs: None,
            leaving_legs: None,
        }
    }
}

impl LayoutConfig {
    pub fn reference() -> Self {
        let columns = [410.0, 320.0, 230.0, 140.0];
        let tops = [210.0, 255.0, 300.0];

        let mut spots = Vec::with_capacity(columns.len() * tops.len());
        let mut index = 1;
        for (row, x) in columns.iter().enumerate() {
            for y in tops {
                spots.push(SpotConfig::new(*x, y, x + 30.0, y + 30.0, row as u32 + 1, index));
                index += 1;
            }
        }

        Self {
            car_size: 20.0,
            safety_distance: 30.0,
            back_out_distance: 30.0,
            queue_y: 145.0,
            door_y: 185.0,
            departure_y: -20.0,
            lane_offset: default_lane_offset(),
            spot_margin: default_spot_margin(),
            spawn: PointConfig { x: 445.0, y: -20.0 },
            exit_lane: PointConfig { x: 475.0, y: 345.0 },
            door: RectConfig::new(440.0, 170.0, 500.0, 180.0),
            spots,
        }
    }

    pub fn spawn_area(&self) -> Rect {
        Rect::from_origin(self.spawn.into(), self.car_size, self.car_size)
    }

    /// Legs from the inner door lane into `spot`.
    pub fn parking_legs(&self, spot: &SpotConfig) -> Vec<Leg> {
        if let Some(legs) = &spot.parking_legs {
            return legs.clone();
        }

        let area = spot.area.rect();
        vec![
            Leg::left(area.min.x + self.lane_offset),
            Leg::down(area.min.y + self.spot_margin),
            Leg::left(area.min.x + self.spot_margin),
        ]
    }

    /// Legs from the backed-out position to the outbound side of the door.
    pub fn leaving_legs(&self, spot: &SpotConfig) -> Vec<Leg> {
        if let Some(legs) = &spot.leaving_legs {
            return legs.clone();
        }

        vec![
            Leg::down(self.exit_lane.y),
            Leg::right(self.exit_lane.x),
            Leg::up(self.door_y),
        ]
    }
}

impl Validate for LayoutConfig {
    fn validate(&self) -> Result<()> {
        let scalars = [
            ("car_size", self.car_size),
            ("safety_distance", self.safety_distance),
            ("back_out_distance", self.back_out_distance),
            ("queue_y", self.queue_y),
            ("door_y", self.door_y),
            ("departure_y", self.departure_y),
            ("lane_offset", self.lane_offset),
            ("spot_margin", self.spot_margin),
            ("spawn.x", self.spawn.x),
            ("spawn.y", self.spawn.y),
            ("exit_lane.x", self.exit_lane.x),
            ("exit_lane.y", self.exit_lane.y),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(anyhow!("Layout {} must be finite, got {}", name, value));
            }
        }

        let door_corners = self.door.min.iter().chain(&self.door.max);
        if door_corners.copied().any(|v| !v.is_finite()) {
            return Err(anyhow!("Door rectangle must have finite corners"));
        }

        if self.car_size <= 0.0 {
            return Err(anyhow!("Car size must be positive"));
        }

        if self.safety_distance <= 0.0 {
            return Err(anyhow!("Safety distance must be positive"));
        }

        if self.back_out_distance < 0.0 {
            return Err(anyhow!("Back-out distance must be non-negative"));
        }

        if self.queue_y >= self.door_y {
            return Err(anyhow!(
                "Queue Y {} must lie above door Y {}",
                self.queue_y,
                self.door_y
            ));
        }

        if self.departure_y > self.queue_y {
            return Err(anyhow!("Departure Y must not lie below the queue"));
        }

        if self.spawn.x == self.exit_lane.x {
            return Err(anyhow!("Inbound and outbound lanes must not share X {}", self.spawn.x));
        }

        let door = self.door.rect();
        if door.width() <= 0.0 || door.height() <= 0.0 {
            return Err(anyhow!("Door rectangle must have a positive area"));
        }

        if self.spots.is_empty() {
            return Err(anyhow!("At least one parking spot must be defined"));
        }

        let mut seen = HashSet::new();
        for spot in &self.spots {
            if !seen.insert((spot.row, spot.index)) {
                return Err(anyhow!("Duplicate parking spot ({}, {})", spot.row, spot.index));
            }

            let corners = spot.area.min.iter().chain(&spot.area.max);
            if corners.copied().any(|v| !v.is_finite()) {
                return Err(anyhow!(
                    "Parking spot ({}, {}) must have finite corners",
                    spot.row,
                    spot.index
                ));
            }

            let area = spot.area.rect();
            if area.width() <= 0.0 || area.height() <= 0.0 {
                return Err(anyhow!(
                    "Parking spot ({}, {}) has a degenerate area",
                    spot.row,
                    spot.index
                ));
            }

            for legs in [&spot.parking_legs, &spot.leaving_legs].into_iter().flatten() {
                if legs.is_empty() {
                    return Err(anyhow!(
                        "Parking spot ({}, {}) has an empty leg list",
                        spot.row,
                        spot.index
                    ));
                }

                if legs.iter().any(|leg| !leg.target.is_finite()) {
                    return Err(anyhow!(
                        "Parking spot ({}, {}) has a leg with a non-finite target",
                        spot.row,
                        spot.index
                    ));
                }
            }

            // Derived leaving legs run below the spots, then right.
            if spot.leaving_legs.is_none() {
                if self.exit_lane.y < area.max.y {
                    return Err(anyhow!(
                        "Exit lane Y {} must lie below parking spot ({}, {})",
                        self.exit_lane.y,
                        spot.row,
                        spot.index
                    ));
                }

                if self.exit_lane.x < area.max.x {
                    return Err(anyhow!(
                        "Exit lane X {} must lie right of parking spot ({}, {})",
                        self.exit_lane.x,
                        spot.row,
                        spot.index
                    ));
                }
            }
        }

        Ok(())
    }
}
