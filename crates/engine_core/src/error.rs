// crates/engine_core/src/error.rs
use std::io;
use std::path::PathBuf;

use engine_assets::AssetError;
use engine_ecs::EcsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config in {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid log filter '{filter}'")]
    LogFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("event loop error")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create rendering surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no graphics adapter compatible with the window surface")]
    NoAdapter,

    #[error("failed to open graphics device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("out of GPU memory")]
    OutOfMemory,

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Ecs(#[from] EcsError),
}

pub type EngineResult<T> = Result<T, EngineError>;
