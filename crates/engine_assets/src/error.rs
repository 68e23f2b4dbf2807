// crates/engine_assets/src/error.rs
use std::error::Error;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;
use crate::resource::AssetKind;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode image '{resource}'")]
    Decode {
        resource: String,
        #[source]
        source: image::ImageError,
    },

    #[error("image '{resource}' is {width}x{height}; both sides must fit in 16 bits")]
    ImageTooLarge {
        resource: String,
        width: u32,
        height: u32,
    },

    #[error("malformed asset package")]
    Format(#[from] CodecError),

    #[error("corrupt asset package: {0}")]
    CorruptAsset(String),

    #[error("failed to compress asset package")]
    Compress(#[source] io::Error),

    #[error("failed to compile script '{resource}'")]
    ScriptCompile {
        resource: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    #[error("payload of '{0}' has been released")]
    Released(String),

    #[error("'{resource}' is {actual}, not {expected}")]
    KindMismatch {
        resource: String,
        expected: AssetKind,
        actual: AssetKind,
    },
}

pub type AssetResult<T> = Result<T, AssetError>;
