// crates/engine_shared/src/lib.rs
//! Contracts shared by every engine crate and by script libraries.

pub mod clock;
pub mod input_types;
pub mod logging;
pub mod math;
pub mod render_api;
pub mod script_api;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use clock::Clock;
pub use input_types::{InputSource, Key};
pub use logging::{LogLevel, Logger};
pub use math::Transform3D;
pub use render_api::{Renderer, TextureData, TextureHandle, TextureRef};
