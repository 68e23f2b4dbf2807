// crates/engine_shared/src/render_api.rs
//! The renderer contract components draw through.
//!
//! Only the wgpu backend in `engine_core` talks to the GPU; everything else
//! (tilemap, sprites, cameras, tests) sees this trait.

use crate::math::Transform3D;

/// Opaque id of a texture owned by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// A texture plus an optional pixel sub-rectangle (for atlases).
///
/// Two refs are the same graphic only if handle, offset and size all match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureRef {
    pub texture: TextureHandle,
    pub offset: Option<(u16, u16)>,
    pub size: Option<(u16, u16)>,
}

impl TextureRef {
    pub const fn whole(texture: TextureHandle) -> Self {
        Self {
            texture,
            offset: None,
            size: None,
        }
    }

    pub const fn region(texture: TextureHandle, offset: (u16, u16), size: (u16, u16)) -> Self {
        Self {
            texture,
            offset: Some(offset),
            size: Some(size),
        }
    }
}

/// Raw pixels handed to `Renderer::create_texture`.
#[derive(Clone, Copy, Debug)]
pub struct TextureData<'a> {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: &'a [u8],
}

/// Immediate and batched textured-quad drawing.
///
/// Batched calls are bracketed by `batch_begin`/`batch_end`; the transform and
/// texture bound before each `batch_draw_quad` apply to that quad only.
pub trait Renderer {
    fn clear(&mut self);

    fn upload_ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32);

    /// Camera position and zoom (1.0 = unscaled).
    fn upload_view(&mut self, x: f32, y: f32, z: f32, zoom: f32);

    fn create_texture(&mut self, data: TextureData<'_>, interpolate: bool) -> TextureHandle;

    fn upload_transform(&mut self, transform: &Transform3D);

    fn bind_texture(&mut self, texture: TextureRef);

    fn draw_quad(&mut self);

    fn batch_begin(&mut self);

    fn batch_upload_transform(&mut self, transform: &Transform3D);

    fn batch_bind_texture(&mut self, texture: TextureRef);

    fn batch_draw_quad(&mut self);

    fn batch_end(&mut self);
}
