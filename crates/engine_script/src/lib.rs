// crates/engine_script/src/lib.rs
//! Script objects as entity components, and the native library runtime that
//! produces them.

mod component;
mod error;
mod host;
pub mod native;

pub use component::{ScriptComponent, ScriptObject};
pub use error::{ScriptError, ScriptResult};
pub use host::ScriptHost;
pub use native::{NativeLibraryCompiler, NativeScript, NativeScriptRuntime, ScriptLibrary};
