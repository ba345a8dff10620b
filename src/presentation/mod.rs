//! Boundary to the rendering collaborator.
//!
//! The simulation core never draws anything. It asks a [`Presenter`] for an
//! opaque sprite handle when a car is created and hands it back when the car
//! leaves. Scene setup happens once, before the first car is spawned.

use crate::config::LayoutConfig;
use crate::error::PresentationError;
use crate::simulation::{CarId, Rect};
use std::fmt;

pub mod console;

pub use console::*;

/// Opaque handle owned by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub u64);

impl fmt::Display for SpriteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sprite#{}", self.0)
    }
}

pub trait Presenter: Send + Sync {
    /// Background and static entities. A failure here aborts the simulation.
    fn setup_scene(&self, layout: &LayoutConfig) -> Result<(), PresentationError>;

    /// A failure here only fails the lifecycle of `car`.
    fn create_sprite(&self, car: CarId, area: Rect) -> Result<SpriteHandle, PresentationError>;

    fn destroy_sprite(&self, handle: SpriteHandle);

    fn get_name(&self) -> &'static str;
}
