// crates/engine_assets/src/lib.rs
//! Resource loading and the packed asset format.

pub mod codec;
pub mod compress;
pub mod error;
pub mod ignore;
pub mod resource;
pub mod store;

pub use codec::CodecError;
pub use error::{AssetError, AssetResult};
pub use ignore::AssetIgnore;
pub use resource::{AssetKind, Generic, Image};
pub use store::{normalize_resource, Assets, ScriptCompiler};
