// crates/engine_core/src/renderer/draw_list.rs
use std::ops::Range;

use engine_shared::{TextureHandle, TextureRef, Transform3D};
use glam::{Mat4, Vec3};
use tracing::warn;

/// Always-present 1x1 white texture. Quads drawn with nothing bound use it.
pub const WHITE_TEXTURE: TextureHandle = TextureHandle(0);

/// Distance between the eye and the plane it looks at.
const EYE_DISTANCE: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadInstance {
    pub texture: TextureRef,
    pub model: Mat4,
}

/// Consecutive quads sharing one texture; drawn with a single instanced call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawBatch {
    pub texture: TextureHandle,
    pub instances: Range<u32>,
}

#[derive(Clone, Copy, Debug)]
struct Bound {
    transform: Transform3D,
    texture: TextureRef,
}

impl Default for Bound {
    fn default() -> Self {
        Self {
            transform: Transform3D::new(),
            texture: TextureRef::whole(WHITE_TEXTURE),
        }
    }
}

/// CPU side of a frame: camera state plus every quad drawn since `clear`,
/// in call order.
#[derive(Debug)]
pub struct DrawList {
    projection: Mat4,
    view: Mat4,
    immediate: Bound,
    batch: Bound,
    in_batch: bool,
    quads: Vec<QuadInstance>,
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            immediate: Bound::default(),
            batch: Bound::default(),
            in_batch: false,
            quads: Vec::new(),
        }
    }

    /// Starts a new frame. Camera state carries over.
    pub fn clear(&mut self) {
        if self.in_batch {
            warn!("frame cleared inside an unfinished batch");
            self.in_batch = false;
        }
        self.quads.clear();
        self.immediate = Bound::default();
    }

    pub fn set_ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.projection = Mat4::orthographic_rh(left, right, bottom, top, near, far);
    }

    /// The eye sits in front of `(x, y, z)` looking down -z, so quads on that
    /// plane land inside any near/far range that contains `EYE_DISTANCE`.
    pub fn set_view(&mut self, x: f32, y: f32, z: f32, zoom: f32) {
        self.view = Mat4::from_scale(Vec3::new(zoom, zoom, 1.0))
            * Mat4::from_translation(Vec3::new(-x, -y, -(z + EYE_DISTANCE)));
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }

    // --- Immediate ---

    pub fn set_transform(&mut self, transform: Transform3D) {
        self.immediate.transform = transform;
    }

    pub fn bind(&mut self, texture: TextureRef) {
        self.immediate.texture = texture;
    }

    pub fn draw(&mut self) {
        let bound = self.immediate;
        self.push(bound);
    }

    // --- Batched ---

    pub fn begin_batch(&mut self) {
        if self.in_batch {
            warn!("batch_begin called twice without batch_end");
        }
        self.in_batch = true;
        self.batch = Bound::default();
    }

    pub fn set_batch_transform(&mut self, transform: Transform3D) {
        self.batch.transform = transform;
    }

    pub fn bind_batch(&mut self, texture: TextureRef) {
        self.batch.texture = texture;
    }

    pub fn draw_batched(&mut self) {
        if !self.in_batch {
            warn!("batch_draw_quad outside batch_begin/batch_end");
        }
        let bound = self.batch;
        self.push(bound);
    }

    pub fn end_batch(&mut self) {
        if !self.in_batch {
            warn!("batch_end without batch_begin");
        }
        self.in_batch = false;
    }

    pub fn in_batch(&self) -> bool {
        self.in_batch
    }

    pub fn quads(&self) -> &[QuadInstance] {
        &self.quads
    }

    fn push(&mut self, bound: Bound) {
        self.quads.push(QuadInstance {
            texture: bound.texture,
            model: bound.transform.matrix(),
        });
    }
}

/// Groups runs of equal textures into instanced draws, keeping call order.
pub fn group_batches(textures: impl IntoIterator<Item = TextureHandle>) -> Vec<DrawBatch> {
    let mut batches: Vec<DrawBatch> = Vec::new();
    for (i, texture) in textures.into_iter().enumerate() {
        let i = i as u32;
        match batches.last_mut() {
            Some(last) if last.texture == texture => last.instances.end = i + 1,
            _ => batches.push(DrawBatch {
                texture,
                instances: i..i + 1,
            }),
        }
    }
    batches
}

/// `[u, v, width, height]` of `texture` inside a `width` x `height` image.
pub fn uv_rect(width: u32, height: u32, texture: &TextureRef) -> [f32; 4] {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    let (ox, oy) = texture.offset.unwrap_or((0, 0));
    let (sx, sy) = texture.size.unwrap_or((
        width.saturating_sub(ox as u32) as u16,
        height.saturating_sub(oy as u32) as u16,
    ));
    [ox as f32 / w, oy as f32 / h, sx as f32 / w, sy as f32 / h]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(n: u32) -> TextureRef {
        TextureRef::whole(TextureHandle(n))
    }

    #[test]
    fn immediate_and_batched_quads_keep_call_order() {
        let mut list = DrawList::new();
        list.bind(handle(1));
        list.set_transform(Transform3D::new().translate(1.0, 0.0, 0.0));
        list.draw();

        list.begin_batch();
        list.bind_batch(handle(2));
        list.set_batch_transform(Transform3D::new().translate(2.0, 0.0, 0.0));
        list.draw_batched();
        list.set_batch_transform(Transform3D::new().translate(3.0, 0.0, 0.0));
        list.draw_batched();
        list.end_batch();

        let xs: Vec<f32> = list.quads().iter().map(|q| q.model.w_axis.x).collect();
        assert_eq!(xs, [1.0, 2.0, 3.0]);
        assert!(!list.in_batch());

        list.clear();
        assert!(list.quads().is_empty());
    }

    #[test]
    fn unbound_draws_use_white() {
        let mut list = DrawList::new();
        list.draw();
        assert_eq!(list.quads()[0].texture.texture, WHITE_TEXTURE);
    }

    #[test]
    fn view_moves_the_camera_target_to_the_origin() {
        let mut list = DrawList::new();
        list.set_ortho(-1.0, 1.0, -1.0, 1.0, 0.1, 100.0);
        list.set_view(5.0, -2.0, 0.0, 1.0);
        let clip = list.view_proj().project_point3(Vec3::new(5.0, -2.0, 0.0));
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&clip.z));
    }

    #[test]
    fn runs_of_one_texture_share_a_batch() {
        let ids = [1, 1, 2, 2, 2, 1].map(TextureHandle);
        let batches = group_batches(ids);
        assert_eq!(
            batches,
            [
                DrawBatch { texture: TextureHandle(1), instances: 0..2 },
                DrawBatch { texture: TextureHandle(2), instances: 2..5 },
                DrawBatch { texture: TextureHandle(1), instances: 5..6 },
            ]
        );
        assert!(group_batches([]).is_empty());
    }

    #[test]
    fn atlas_regions_map_to_normalized_uvs() {
        assert_eq!(uv_rect(64, 32, &handle(1)), [0.0, 0.0, 1.0, 1.0]);
        let region = TextureRef::region(TextureHandle(1), (16, 8), (16, 8));
        assert_eq!(uv_rect(64, 32, &region), [0.25, 0.25, 0.25, 0.25]);
    }
}
