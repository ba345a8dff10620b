use super::{Presenter, SpriteHandle};
use crate::config::LayoutConfig;
use crate::error::PresentationError;
use crate::simulation::{CarId, Rect};
use std::sync::atomic::{AtomicU64, Ordering};

/// Headless presenter: hands out sequential handles and logs what a renderer
/// would draw.
#[derive(Debug, Default)]
pub struct ConsolePresenter {
    next_handle: AtomicU64,
    live: AtomicU64,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sprites created and not yet destroyed.
    pub fn live_sprites(&self) -> u64 {
        self.live.load(Ordering::Acquire)
    }
}

impl Presenter for ConsolePresenter {
    fn setup_scene(&self, layout: &LayoutConfig) -> Result<(), PresentationError> {
        let door = layout.door.rect();
        log::info!(
            "Scene ready: door ({:.0},{:.0})-({:.0},{:.0}), {} parking spots",
            door.min.x,
            door.min.y,
            door.max.x,
            door.max.y,
            layout.spots.len()
        );
        Ok(())
    }

    fn create_sprite(&self, car: CarId, area: Rect) -> Result<SpriteHandle, PresentationError> {
        let handle = SpriteHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.live.fetch_add(1, Ordering::AcqRel);
        log::trace!("Created {} for car {} at ({:.0}, {:.0})", handle, car, area.min.x, area.min.y);
        Ok(handle)
    }

    fn destroy_sprite(&self, handle: SpriteHandle) {
        self.live.fetch_sub(1, Ordering::AcqRel);
        log::trace!("Destroyed {}", handle);
    }

    fn get_name(&self) -> &'static str {
        "console"
    }
}
