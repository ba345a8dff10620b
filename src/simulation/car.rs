use super::{Direction, Point, Rect, Vec2};
use crate::presentation::SpriteHandle;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Cars closer than this along a shared lane block each other.
pub const SAFETY_DISTANCE: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarId(pub usize);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A simulated vehicle.
///
/// The position is the top-left corner of the car's footprint. It sits behind
/// the car's own lock; every read and shift takes that lock briefly and never
/// holds it across a sleep.
#[derive(Debug)]
pub struct Car {
    id: CarId,
    size: f32,
    sprite: SpriteHandle,
    position: Mutex<Point>,
}

impl Car {
    pub fn new(id: CarId, area: Rect, sprite: SpriteHandle) -> Self {
        Self {
            id,
            size: area.width(),
            sprite,
            position: Mutex::new(area.min),
        }
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn sprite(&self) -> SpriteHandle {
        self.sprite
    }

    pub fn position(&self) -> Point {
        *self.position.lock()
    }

    pub fn x(&self) -> f32 {
        self.position.lock().x
    }

    pub fn y(&self) -> f32 {
        self.position.lock().y
    }

    pub fn area(&self) -> Rect {
        Rect::from_origin(self.position(), self.size, self.size)
    }

    pub fn shift(&self, delta: Vec2) {
        let mut position = self.position.lock();
        *position += delta;
    }

    pub fn shift_x(&self, dx: f32) {
        self.shift(Vec2::new(dx, 0.0));
    }

    pub fn shift_y(&self, dy: f32) {
        self.shift(Vec2::new(0.0, dy));
    }

    /// Whether any of `others` blocks this car from moving in `direction`
    /// using the default [`SAFETY_DISTANCE`].
    pub fn collides(&self, direction: Direction, others: &[Arc<Car>]) -> bool {
        self.collides_within(direction, others, SAFETY_DISTANCE)
    }

    pub fn collides_within(&self, direction: Direction, others: &[Arc<Car>], min_distance: f32) -> bool {
        let me = self.position();
        others
            .iter()
            .filter(|other| other.id != self.id)
            .any(|other| blocks(me, other.position(), direction, min_distance))
    }
}

/// Whether a car at `other` is ahead of a car at `me` on the same lane and
/// closer than `min_distance`. A gap of exactly `min_distance` does not block.
pub fn blocks(me: Point, other: Point, direction: Direction, min_distance: f32) -> bool {
    match direction {
        Direction::Left => other.y == me.y && (me.x - other.x).abs() < min_distance && me.x > other.x,
        Direction::Right => other.y == me.y && (me.x - other.x).abs() < min_distance && me.x < other.x,
        Direction::Up => other.x == me.x && (me.y - other.y).abs() < min_distance && me.y > other.y,
        Direction::Down => other.x == me.x && (me.y - other.y).abs() < min_distance && me.y < other.y,
    }
}
