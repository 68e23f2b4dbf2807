// crates/tilegame/src/camera.rs
use engine_ecs::{Component, EcsResult, Entity, Interface};

use crate::transform::TransformComponent;

/// Orthographic camera. Its position is the sibling `TransformComponent`.
///
/// The projection spans `[-aspect_ratio, aspect_ratio] x [-1, 1]`; the view
/// zooms by `1 / scale`, so larger scales show more of the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraComponent {
    aspect_ratio: f32,
    scale: f32,
}

impl CameraComponent {
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 100.0;

    pub fn new(aspect_ratio: f32, scale: f32) -> Self {
        Self { aspect_ratio, scale }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }
}

impl Component for CameraComponent {
    fn init(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        // Fail early when the transform is missing rather than on first update.
        iface.owner()?.get_single_component::<TransformComponent>()?;
        let ar = self.aspect_ratio;
        iface
            .renderer()?
            .upload_ortho(-ar, ar, -1.0, 1.0, Self::NEAR, Self::FAR);
        Ok(())
    }

    fn update(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        let (x, y) = iface
            .owner()?
            .get_single_component::<TransformComponent>()?
            .position();
        iface.renderer()?.upload_view(x, y, 0.0, 1.0 / self.scale);
        Ok(())
    }

    fn is_unique(&self) -> bool {
        true
    }
}

/// What a camera sees: center plus half extents in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub x: f32,
    pub y: f32,
    pub half_width: f32,
    pub half_height: f32,
}

impl CameraView {
    pub fn new(x: f32, y: f32, camera: &CameraComponent) -> Self {
        Self {
            x,
            y,
            half_width: camera.scale * camera.aspect_ratio,
            half_height: camera.scale,
        }
    }

    /// Reads the camera and its transform off `entity`.
    pub fn of(entity: &Entity) -> EcsResult<Self> {
        let camera = entity.get_single_component::<CameraComponent>()?;
        let (x, y) = entity.get_single_component::<TransformComponent>()?.position();
        Ok(Self::new(x, y, camera))
    }

    /// Closed-interval overlap with the box `[min, max]`.
    pub fn overlaps(&self, min: (f32, f32), max: (f32, f32)) -> bool {
        min.0 <= self.x + self.half_width
            && max.0 >= self.x - self.half_width
            && min.1 <= self.y + self.half_height
            && max.1 >= self.y - self.half_height
    }
}
