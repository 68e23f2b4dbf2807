// crates/engine_script/src/native.rs
//! Script libraries compiled to native shared objects.
//!
//! The asset store keeps the library bytes. At load time they are written to
//! a uniquely named temp file (the OS may refuse to map the same path twice)
//! and opened with `libloading`.

use std::collections::BTreeMap;
use std::error::Error;
use std::ffi::{c_void, OsStr};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use engine_assets::{Assets, ScriptCompiler};
use engine_shared::script_api::{
    CreateScriptFn, FFIResult, HostInterface, ManifestFn, ScriptApi, ScriptStr, CREATE_SYMBOL,
    MANIFEST_SYMBOL, SCRIPT_ABI_VERSION,
};
use libloading::{Library, Symbol};
use tracing::{debug, warn};

use crate::component::{ScriptComponent, ScriptObject};
use crate::error::{ScriptError, ScriptResult};
use crate::host::ScriptHost;

// ==================================================================================
// LIBRARY VALIDATION
// ==================================================================================

const ELF_MAGIC: &[u8] = b"\x7fELF";
const PE_MAGIC: &[u8] = b"MZ";
const MACHO_MAGICS: [[u8; 4]; 5] = [
    [0xfe, 0xed, 0xfa, 0xce],
    [0xfe, 0xed, 0xfa, 0xcf],
    [0xce, 0xfa, 0xed, 0xfe],
    [0xcf, 0xfa, 0xed, 0xfe],
    [0xca, 0xfe, 0xba, 0xbe],
];

pub fn is_shared_library(bytes: &[u8]) -> bool {
    bytes.starts_with(ELF_MAGIC)
        || bytes.starts_with(PE_MAGIC)
        || MACHO_MAGICS.iter().any(|m| bytes.starts_with(m))
}

/// Stores library bytes unchanged after checking they look like a shared
/// object for some platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeLibraryCompiler;

impl ScriptCompiler for NativeLibraryCompiler {
    fn compile(
        &self,
        resource: &str,
        source: &[u8],
    ) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        if !is_shared_library(source) {
            return Err(format!("'{resource}' is not a shared library").into());
        }
        Ok(source.to_vec())
    }
}

// ==================================================================================
// LOADED LIBRARY
// ==================================================================================

/// Keeps the mapped library and its staged file alive. Shared by every
/// script object created from it.
struct LoadedLibrary {
    lib: Option<Library>,
    path: PathBuf,
}

impl Drop for LoadedLibrary {
    fn drop(&mut self) {
        // Unmap before deleting; Windows refuses to remove a loaded DLL.
        drop(self.lib.take());
        let _ = fs::remove_file(&self.path);
    }
}

pub struct ScriptLibrary {
    resource: String,
    names: Vec<String>,
    create: CreateScriptFn,
    loaded: Rc<LoadedLibrary>,
}

impl ScriptLibrary {
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Exported script names in manifest order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn staged_path(&self) -> &Path {
        &self.loaded.path
    }

    pub fn create(&self, name: &str) -> ScriptResult<ScriptComponent> {
        if !self.names.iter().any(|n| n == name) {
            return Err(ScriptError::Missing(name.to_owned()));
        }
        let api = unsafe { (self.create)(ScriptStr::borrowed(name)) };
        if api.state.is_null() {
            return Err(ScriptError::Missing(name.to_owned()));
        }
        let object = NativeScript::new(name, api, Some(Rc::clone(&self.loaded)));
        Ok(ScriptComponent::new(name, Box::new(object)))
    }

    /// One fresh component per exported script, keyed by name.
    pub fn load_components(&self) -> ScriptResult<BTreeMap<String, ScriptComponent>> {
        self.names
            .iter()
            .map(|name| Ok((name.clone(), self.create(name)?)))
            .collect()
    }
}

// ==================================================================================
// RUNTIME
// ==================================================================================

static STAGE_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct NativeScriptRuntime {
    stage_dir: PathBuf,
}

impl Default for NativeScriptRuntime {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl NativeScriptRuntime {
    pub fn new(stage_dir: impl Into<PathBuf>) -> Self {
        Self {
            stage_dir: stage_dir.into(),
        }
    }

    /// Loads a script library stored in `assets`, reading it from disk first
    /// if it is not cached.
    pub fn load_from_assets(&self, assets: &mut Assets, resource: &str) -> ScriptResult<ScriptLibrary> {
        let bytes = assets.load_script(resource, &NativeLibraryCompiler)?.bytes().to_vec();
        self.load(resource, &bytes)
    }

    pub fn load(&self, resource: &str, bytes: &[u8]) -> ScriptResult<ScriptLibrary> {
        if !is_shared_library(bytes) {
            return Err(ScriptError::InvalidLibrary(format!(
                "'{resource}' has no shared library header"
            )));
        }

        let path = unique_stage_path(&self.stage_dir, resource);
        fs::write(&path, bytes).map_err(|source| ScriptError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("staged script library '{resource}' at {}", path.display());

        let lib = match unsafe { Library::new(&path) } {
            Ok(lib) => lib,
            Err(source) => {
                let _ = fs::remove_file(&path);
                return Err(ScriptError::Load { path, source });
            }
        };
        let loaded = LoadedLibrary {
            lib: Some(lib),
            path,
        };
        let (names, create) = unsafe { read_exports(&loaded, resource)? };
        debug!("script library '{resource}' exports {names:?}");

        Ok(ScriptLibrary {
            resource: resource.to_owned(),
            names,
            create,
            loaded: Rc::new(loaded),
        })
    }
}

unsafe fn read_exports(
    loaded: &LoadedLibrary,
    resource: &str,
) -> ScriptResult<(Vec<String>, CreateScriptFn)> {
    let Some(lib) = loaded.lib.as_ref() else {
        return Err(ScriptError::InvalidLibrary(format!("'{resource}' is not mapped")));
    };
    let load = |source| ScriptError::Load {
        path: loaded.path.clone(),
        source,
    };

    let manifest_fn: Symbol<ManifestFn> = lib.get(MANIFEST_SYMBOL).map_err(load)?;
    let create_fn: Symbol<CreateScriptFn> = lib.get(CREATE_SYMBOL).map_err(load)?;

    let manifest = manifest_fn();
    if manifest.is_null() {
        return Err(ScriptError::InvalidLibrary(format!("'{resource}' returned no manifest")));
    }
    let manifest = &*manifest;
    if manifest.abi_version != SCRIPT_ABI_VERSION {
        return Err(ScriptError::InvalidLibrary(format!(
            "'{resource}' was built for script ABI {}, engine speaks {}",
            manifest.abi_version, SCRIPT_ABI_VERSION
        )));
    }

    let entries: &[ScriptStr] = if manifest.len == 0 || manifest.names.is_null() {
        &[]
    } else {
        std::slice::from_raw_parts(manifest.names, manifest.len)
    };
    let mut names = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_str() {
            Some(name) => names.push(name.to_owned()),
            None => warn!("'{resource}' exports a script name that is not valid utf-8"),
        }
    }
    Ok((names, *create_fn))
}

fn unique_stage_path(dir: &Path, resource: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = STAGE_COUNTER.fetch_add(1, Ordering::Relaxed);
    let original = Path::new(resource);
    let stem = original
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("script");
    let ext = original.extension().and_then(OsStr::to_str).unwrap_or("so");
    dir.join(format!("{stem}_loaded_{ts}_{seq}.{ext}"))
}

// ==================================================================================
// NATIVE SCRIPT OBJECT
// ==================================================================================

/// One instance created through `_create_script`. A panic inside the library
/// disables the instance for good.
pub struct NativeScript {
    name: String,
    api: ScriptApi,
    poisoned: bool,
    _library: Option<Rc<LoadedLibrary>>,
}

impl NativeScript {
    fn new(name: &str, api: ScriptApi, library: Option<Rc<LoadedLibrary>>) -> Self {
        Self {
            name: name.to_owned(),
            api,
            poisoned: false,
            _library: library,
        }
    }

    /// Wraps an API table whose functions live in this process.
    pub fn from_api(name: &str, api: ScriptApi) -> Self {
        Self::new(name, api, None)
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    fn call(
        &mut self,
        f: extern "C" fn(*mut c_void, *const HostInterface) -> FFIResult,
        host: &mut ScriptHost<'_>,
    ) -> ScriptResult<()> {
        if self.poisoned {
            return Err(ScriptError::PanicDetected(self.name.clone()));
        }
        let ffi = host.as_ffi();
        match f(self.api.state, &ffi) {
            FFIResult::Success => Ok(()),
            FFIResult::Error => Err(ScriptError::failed(&self.name, "script returned an error")),
            FFIResult::PanicDetected => {
                warn!("script '{}' panicked; disabling it", self.name);
                self.poisoned = true;
                Err(ScriptError::PanicDetected(self.name.clone()))
            }
        }
    }
}

impl ScriptObject for NativeScript {
    fn init(&mut self, host: &mut ScriptHost<'_>) -> ScriptResult<()> {
        self.call(self.api.init, host)
    }

    fn update(&mut self, host: &mut ScriptHost<'_>) -> ScriptResult<()> {
        self.call(self.api.update, host)
    }
}

impl Drop for NativeScript {
    fn drop(&mut self) {
        if !self.api.state.is_null() {
            (self.api.drop)(self.api.state);
        }
    }
}
