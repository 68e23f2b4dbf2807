// crates/tilegame/src/transform.rs
use engine_ecs::Component;
use engine_shared::Transform3D;

/// World position of an entity. Other components on the entity read it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformComponent {
    x: f32,
    y: f32,
}

impl TransformComponent {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Model transform placing a quad of `width` x `height` units here.
    pub fn model(&self, width: f32, height: f32) -> Transform3D {
        Transform3D::new()
            .translate(self.x, self.y, 0.0)
            .scale(width, height, 1.0)
    }
}

impl Component for TransformComponent {
    fn is_unique(&self) -> bool {
        true
    }
}
