pub mod car;
pub mod door;
pub mod driver;
pub mod garage;
pub mod geometry;
pub mod lifecycle;
pub mod movement;
pub mod parking;
pub mod registry;
pub mod stats;

pub use car::*;
pub use door::*;
pub use driver::*;
pub use garage::*;
pub use geometry::*;
pub use lifecycle::*;
pub use movement::*;
pub use parking::*;
pub use registry::*;
pub use stats::*;
