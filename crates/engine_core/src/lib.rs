// crates/engine_core/src/lib.rs
//! Platform layer: window, wgpu quad renderer, frame clock, keyboard polling,
//! configuration and logging setup.

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod time;

// Internal Implementation Modules
mod platform_runner;
pub mod renderer;

pub use app::{load_assets, App};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use input::InputPoller;
pub use platform_runner::PlatformRunner;
pub use renderer::QuadRenderer;
pub use time::FrameClock;
