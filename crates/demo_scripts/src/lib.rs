// crates/demo_scripts/src/lib.rs
//! Native script library loaded by the engine at runtime.
//!
//! Build it as a `cdylib`, drop the shared object into the resource folder
//! and point `world.scripts` in `tilegame.toml` at it.

mod scripts;
mod shims;

use engine_shared::script_api::{ScriptApi, ScriptManifest, ScriptStr};

pub use scripts::{Draw, FrameCounter, Heartbeat, Host, Script};

static NAMES: [ScriptStr; 2] = [
    ScriptStr::from_static(scripts::HEARTBEAT),
    ScriptStr::from_static(scripts::FRAME_COUNTER),
];

static MANIFEST: ScriptManifest = ScriptManifest::new(&NAMES);

#[no_mangle]
pub extern "C" fn _script_manifest() -> *const ScriptManifest {
    &MANIFEST
}

/// Creates the script called `name`. Unknown names come back with a null
/// `state`, which the host reports as a missing script.
#[no_mangle]
pub extern "C" fn _create_script(name: ScriptStr) -> ScriptApi {
    let script = unsafe { name.as_str() }.and_then(scripts::create);
    shims::api_for(script)
}
