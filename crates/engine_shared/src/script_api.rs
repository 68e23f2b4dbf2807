// crates/engine_shared/src/script_api.rs
//! C ABI between the engine and native script libraries.
//!
//! A script library is a `cdylib` exporting two symbols:
//! - `_script_manifest() -> *const ScriptManifest`
//! - `_create_script(name: ScriptStr) -> ScriptApi`
//!
//! The host never looks inside `ScriptApi::state`; it only passes it back.

use core::ffi::c_void;

use crate::render_api::{TextureHandle, TextureRef};

/// Bumped whenever any type in this module changes layout.
pub const SCRIPT_ABI_VERSION: u32 = 2;

pub const MANIFEST_SYMBOL: &[u8] = b"_script_manifest";
pub const CREATE_SYMBOL: &[u8] = b"_create_script";

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FFIResult {
    Success = 0,
    Error = 1,
    PanicDetected = 2,
}

// ==================================================================================
// STRINGS
// ==================================================================================

/// Borrowed UTF-8 slice crossing the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ScriptStr {
    pub ptr: *const u8,
    pub len: usize,
}

// Only ever built from `&'static str` or from a borrow that outlives the call.
unsafe impl Send for ScriptStr {}
unsafe impl Sync for ScriptStr {}

impl ScriptStr {
    pub const fn from_static(value: &'static str) -> Self {
        Self {
            ptr: value.as_ptr(),
            len: value.len(),
        }
    }

    pub fn borrowed(value: &str) -> Self {
        Self {
            ptr: value.as_ptr(),
            len: value.len(),
        }
    }

    /// # Safety
    /// `ptr`/`len` must describe memory that is valid for `'a`.
    pub unsafe fn as_str<'a>(&self) -> Option<&'a str> {
        if self.ptr.is_null() {
            return None;
        }
        let bytes = unsafe { core::slice::from_raw_parts(self.ptr, self.len) };
        core::str::from_utf8(bytes).ok()
    }
}

// ==================================================================================
// MANIFEST
// ==================================================================================

#[repr(C)]
pub struct ScriptManifest {
    pub abi_version: u32,
    pub names: *const ScriptStr,
    pub len: usize,
}

unsafe impl Sync for ScriptManifest {}

impl ScriptManifest {
    pub const fn new(names: &'static [ScriptStr]) -> Self {
        Self {
            abi_version: SCRIPT_ABI_VERSION,
            names: names.as_ptr(),
            len: names.len(),
        }
    }
}

// ==================================================================================
// RENDERER
// ==================================================================================

/// `TextureRef` in C layout. `width == 0` means the whole texture.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptTexture {
    pub handle: u32,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl From<TextureRef> for ScriptTexture {
    fn from(texture: TextureRef) -> Self {
        let (x, y) = texture.offset.unwrap_or((0, 0));
        let (width, height) = texture.size.unwrap_or((0, 0));
        Self {
            handle: texture.texture.0,
            x,
            y,
            width,
            height,
        }
    }
}

impl From<ScriptTexture> for TextureRef {
    fn from(texture: ScriptTexture) -> Self {
        let handle = TextureHandle(texture.handle);
        if texture.width == 0 {
            TextureRef::whole(handle)
        } else {
            TextureRef::region(handle, (texture.x, texture.y), (texture.width, texture.height))
        }
    }
}

/// Immediate-mode drawing. `context` is null when the host has no renderer
/// this frame; the functions are then no-ops.
#[repr(C)]
pub struct HostRenderer {
    pub context: *mut c_void,
    pub clear: extern "C" fn(context: *mut c_void),
    pub upload_ortho: extern "C" fn(
        context: *mut c_void,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ),
    pub upload_view: extern "C" fn(context: *mut c_void, x: f32, y: f32, z: f32, zoom: f32),
    /// Column-major 4x4 model matrix.
    pub upload_transform: extern "C" fn(context: *mut c_void, matrix: *const [[f32; 4]; 4]),
    pub bind_texture: extern "C" fn(context: *mut c_void, texture: ScriptTexture),
    pub draw_quad: extern "C" fn(context: *mut c_void),
}

impl HostRenderer {
    /// A table with no renderer behind it.
    pub const fn detached() -> Self {
        Self {
            context: core::ptr::null_mut(),
            clear: ignore_clear,
            upload_ortho: ignore_ortho,
            upload_view: ignore_view,
            upload_transform: ignore_transform,
            bind_texture: ignore_bind_texture,
            draw_quad: ignore_draw_quad,
        }
    }

    pub fn is_available(&self) -> bool {
        !self.context.is_null()
    }
}

extern "C" fn ignore_clear(_: *mut c_void) {}
extern "C" fn ignore_ortho(_: *mut c_void, _: f32, _: f32, _: f32, _: f32, _: f32, _: f32) {}
extern "C" fn ignore_view(_: *mut c_void, _: f32, _: f32, _: f32, _: f32) {}
extern "C" fn ignore_transform(_: *mut c_void, _: *const [[f32; 4]; 4]) {}
extern "C" fn ignore_bind_texture(_: *mut c_void, _: ScriptTexture) {}
extern "C" fn ignore_draw_quad(_: *mut c_void) {}

// ==================================================================================
// HOST INTERFACE
// ==================================================================================

/// What a script can reach on the host side during one call.
#[repr(C)]
pub struct HostInterface {
    /// Opaque host state, passed back into `log`.
    pub context: *mut c_void,
    pub log: extern "C" fn(context: *mut c_void, level: u32, message: ScriptStr),
    pub delta_time: f32,
    pub time: f64,
    pub renderer: HostRenderer,
}

// ==================================================================================
// SCRIPT API
// ==================================================================================

/// One live script instance. `state` is null when the library did not know
/// the requested name.
#[repr(C)]
pub struct ScriptApi {
    pub state: *mut c_void,
    pub init: extern "C" fn(state: *mut c_void, host: *const HostInterface) -> FFIResult,
    pub update: extern "C" fn(state: *mut c_void, host: *const HostInterface) -> FFIResult,
    pub drop: extern "C" fn(state: *mut c_void),
}

pub type ManifestFn = unsafe extern "C" fn() -> *const ScriptManifest;
pub type CreateScriptFn = unsafe extern "C" fn(name: ScriptStr) -> ScriptApi;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_str_reads_back() {
        let s = ScriptStr::from_static("Spinner");
        assert_eq!(unsafe { s.as_str() }, Some("Spinner"));
    }

    #[test]
    fn null_script_str_is_none() {
        let s = ScriptStr {
            ptr: core::ptr::null(),
            len: 0,
        };
        assert_eq!(unsafe { s.as_str() }, None);
    }

    #[test]
    fn texture_refs_cross_the_boundary() {
        let whole = TextureRef::whole(TextureHandle(3));
        assert_eq!(TextureRef::from(ScriptTexture::from(whole)), whole);

        let region = TextureRef::region(TextureHandle(7), (16, 32), (8, 8));
        let raw = ScriptTexture::from(region);
        assert_eq!((raw.handle, raw.x, raw.width), (7, 16, 8));
        assert_eq!(TextureRef::from(raw), region);
    }

    #[test]
    fn manifest_points_at_names() {
        static NAMES: [ScriptStr; 2] = [ScriptStr::from_static("A"), ScriptStr::from_static("B")];
        let manifest = ScriptManifest::new(&NAMES);
        assert_eq!(manifest.len, 2);
        assert_eq!(manifest.abi_version, SCRIPT_ABI_VERSION);
    }
}
