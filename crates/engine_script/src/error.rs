// crates/engine_script/src/error.rs
use std::io;
use std::path::PathBuf;

use engine_assets::AssetError;
use engine_ecs::EcsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to load script library '{}'", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("failed to stage script library at '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("script '{0}' is not exported by this library")]
    Missing(String),

    #[error("script '{name}' failed: {reason}")]
    Failed { name: String, reason: String },

    #[error("script '{0}' panicked and has been disabled")]
    PanicDetected(String),

    #[error("not a usable script library: {0}")]
    InvalidLibrary(String),
}

impl ScriptError {
    pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ScriptError::Failed {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<ScriptError> for EcsError {
    fn from(err: ScriptError) -> Self {
        EcsError::component(err)
    }
}

pub type ScriptResult<T> = Result<T, ScriptError>;
