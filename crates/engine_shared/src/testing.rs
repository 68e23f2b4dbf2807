// crates/engine_shared/src/testing.rs
//! Headless stand-ins for the platform collaborators.

use std::collections::HashSet;

use crate::clock::Clock;
use crate::input_types::{InputSource, Key};
use crate::math::Transform3D;
use crate::render_api::{Renderer, TextureData, TextureHandle, TextureRef};

#[derive(Clone, Debug, PartialEq)]
pub enum RenderCall {
    Clear,
    Ortho {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    View {
        x: f32,
        y: f32,
        z: f32,
        zoom: f32,
    },
    CreateTexture {
        handle: TextureHandle,
        width: u32,
        height: u32,
    },
    Transform(Transform3D),
    BindTexture(TextureRef),
    DrawQuad,
    BatchBegin,
    BatchTransform(Transform3D),
    BatchBindTexture(TextureRef),
    BatchDrawQuad,
    BatchEnd,
}

/// Records every call in order. Texture handles are handed out from 1.
#[derive(Default, Debug)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    next_texture: u32,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn batched_quads(&self) -> usize {
        self.count(|c| matches!(c, RenderCall::BatchDrawQuad))
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.calls.push(RenderCall::Clear);
    }

    fn upload_ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.calls.push(RenderCall::Ortho {
            left,
            right,
            bottom,
            top,
            near,
            far,
        });
    }

    fn upload_view(&mut self, x: f32, y: f32, z: f32, zoom: f32) {
        self.calls.push(RenderCall::View { x, y, z, zoom });
    }

    fn create_texture(&mut self, data: TextureData<'_>, _interpolate: bool) -> TextureHandle {
        self.next_texture += 1;
        let handle = TextureHandle(self.next_texture);
        self.calls.push(RenderCall::CreateTexture {
            handle,
            width: data.width,
            height: data.height,
        });
        handle
    }

    fn upload_transform(&mut self, transform: &Transform3D) {
        self.calls.push(RenderCall::Transform(*transform));
    }

    fn bind_texture(&mut self, texture: TextureRef) {
        self.calls.push(RenderCall::BindTexture(texture));
    }

    fn draw_quad(&mut self) {
        self.calls.push(RenderCall::DrawQuad);
    }

    fn batch_begin(&mut self) {
        self.calls.push(RenderCall::BatchBegin);
    }

    fn batch_upload_transform(&mut self, transform: &Transform3D) {
        self.calls.push(RenderCall::BatchTransform(*transform));
    }

    fn batch_bind_texture(&mut self, texture: TextureRef) {
        self.calls.push(RenderCall::BatchBindTexture(texture));
    }

    fn batch_draw_quad(&mut self) {
        self.calls.push(RenderCall::BatchDrawQuad);
    }

    fn batch_end(&mut self) {
        self.calls.push(RenderCall::BatchEnd);
    }
}

/// Clock whose time only moves when told to.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock {
    pub now: f64,
    pub delta: f32,
}

impl ManualClock {
    pub fn new(delta: f32) -> Self {
        Self { now: 0.0, delta }
    }

    pub fn advance(&mut self) {
        self.now += self.delta as f64;
    }
}

impl Clock for ManualClock {
    fn current(&self) -> f64 {
        self.now
    }

    fn delta_time(&self) -> f32 {
        self.delta
    }
}

#[derive(Clone, Debug, Default)]
pub struct KeySet(pub HashSet<Key>);

impl KeySet {
    pub fn pressed(keys: &[Key]) -> Self {
        Self(keys.iter().copied().collect())
    }
}

impl InputSource for KeySet {
    fn is_key_down(&self, key: Key) -> bool {
        self.0.contains(&key)
    }
}
