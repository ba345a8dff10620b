use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Vec2 = Vector2<f32>;
pub type Point = Point2<f32>;

/// Axis-aligned rectangle; `min` is the top-left corner (Y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            min: Point::new(x1.min(x2), y1.min(y2)),
            max: Point::new(x1.max(x2), y1.max(y2)),
        }
    }

    pub fn from_origin(origin: Point, width: f32, height: f32) -> Self {
        Self::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// One movement unit in this direction.
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// One straight movement segment: travel in `direction` until the relevant
/// coordinate reaches `target`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Leg {
    pub direction: Direction,
    pub target: f32,
}

impl Leg {
    pub fn new(direction: Direction, target: f32) -> Self {
        Self { direction, target }
    }

    pub fn up(target: f32) -> Self {
        Self::new(Direction::Up, target)
    }

    pub fn down(target: f32) -> Self {
        Self::new(Direction::Down, target)
    }

    pub fn left(target: f32) -> Self {
        Self::new(Direction::Left, target)
    }

    pub fn right(target: f32) -> Self {
        Self::new(Direction::Right, target)
    }

    /// Whether a car at `position` still has distance to cover on this leg.
    pub fn remaining(&self, position: Point) -> bool {
        match self.direction {
            Direction::Right => position.x < self.target,
            Direction::Left => position.x > self.target,
            Direction::Down => position.y < self.target,
            Direction::Up => position.y > self.target,
        }
    }

    /// Unit steps needed from `position`, used for progress estimates.
    pub fn distance_from(&self, position: Point) -> f32 {
        let along = if self.direction.is_horizontal() { position.x } else { position.y };
        (self.target - along).abs().ceil()
    }
}
