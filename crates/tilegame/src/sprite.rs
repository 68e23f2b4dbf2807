// crates/tilegame/src/sprite.rs
use engine_ecs::{Component, EcsError, EcsResult, Interface};
use engine_shared::TextureRef;
use tracing::debug;

use crate::transform::TransformComponent;

/// A texture region and its size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub texture: TextureRef,
    pub width: u16,
    pub height: u16,
}

impl Sprite {
    pub fn new(texture: TextureRef, width: u16, height: u16) -> Self {
        Self {
            texture,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone)]
enum Source {
    Ready(Sprite),
    Asset(String),
}

/// Draws one sprite at the owner's transform.
///
/// `pixels_per_unit` converts the sprite's pixel size to world units. A sprite
/// built from an image resource is uploaded on `init`.
#[derive(Debug, Clone)]
pub struct DrawSpriteComponent {
    source: Source,
    pixels_per_unit: f32,
}

impl DrawSpriteComponent {
    pub fn new(sprite: Sprite, pixels_per_unit: f32) -> Self {
        Self {
            source: Source::Ready(sprite),
            pixels_per_unit,
        }
    }

    pub fn from_image(resource: impl Into<String>, pixels_per_unit: f32) -> Self {
        Self {
            source: Source::Asset(resource.into()),
            pixels_per_unit,
        }
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        match &self.source {
            Source::Ready(sprite) => Some(sprite),
            Source::Asset(_) => None,
        }
    }

    pub fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    /// World size of the quad.
    pub fn size(&self) -> Option<(f32, f32)> {
        self.sprite().map(|s| {
            (
                f32::from(s.width) / self.pixels_per_unit,
                f32::from(s.height) / self.pixels_per_unit,
            )
        })
    }

    fn ensure_loaded(&mut self, iface: &mut Interface<'_>) -> EcsResult<Sprite> {
        let resource = match &self.source {
            Source::Ready(sprite) => return Ok(*sprite),
            Source::Asset(resource) => resource.clone(),
        };
        debug!(resource = %resource, "uploading sprite");
        let image = iface
            .assets()?
            .load_image(&resource)
            .map_err(EcsError::component)?
            .clone();
        let handle = iface.renderer()?.create_texture(image.texture_data(), false);
        let sprite = Sprite::new(TextureRef::whole(handle), image.width(), image.height());
        self.source = Source::Ready(sprite);
        Ok(sprite)
    }
}

impl Component for DrawSpriteComponent {
    fn init(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        self.ensure_loaded(iface)?;
        Ok(())
    }

    fn update(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        let sprite = self.ensure_loaded(iface)?;
        let model = iface
            .owner()?
            .get_single_component::<TransformComponent>()?
            .model(
                f32::from(sprite.width) / self.pixels_per_unit,
                f32::from(sprite.height) / self.pixels_per_unit,
            );
        let renderer = iface.renderer()?;
        renderer.upload_transform(&model);
        renderer.bind_texture(sprite.texture);
        renderer.draw_quad();
        Ok(())
    }

    fn is_unique(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use engine_assets::Assets;
    use engine_ecs::Game;
    use engine_shared::testing::{RecordingRenderer, RenderCall};
    use engine_shared::TextureHandle;

    use super::*;

    #[test]
    fn draws_at_transform_with_pixel_size() {
        let mut game = Game::new();
        let sprite = Sprite::new(TextureRef::whole(TextureHandle(4)), 32, 16);
        let e = game
            .create_entity()
            .with_component(TransformComponent::new(1.0, 2.0))
            .and_then(|e| e.with_component(DrawSpriteComponent::new(sprite, 16.0)))
            .unwrap();
        game.add_entity(e).unwrap();

        let mut renderer = RecordingRenderer::new();
        game.update(&mut Interface::new().with_renderer(&mut renderer))
            .unwrap();

        let expected = TransformComponent::new(1.0, 2.0).model(2.0, 1.0);
        assert_eq!(
            renderer.calls,
            [
                RenderCall::Transform(expected),
                RenderCall::BindTexture(sprite.texture),
                RenderCall::DrawQuad,
            ]
        );
    }

    #[test]
    fn missing_image_resource_fails_init() {
        let dir = tempfile::tempdir().unwrap();
        let mut assets = Assets::new(dir.path());
        let mut game = Game::new();
        let e = game
            .create_entity()
            .with_component(DrawSpriteComponent::from_image("nope.png", 16.0))
            .unwrap();
        game.add_entity(e).unwrap();

        let mut renderer = RecordingRenderer::new();
        let err = game
            .init(
                &mut Interface::new()
                    .with_renderer(&mut renderer)
                    .with_assets(&mut assets),
            )
            .unwrap_err();
        assert!(matches!(err, EcsError::Component(_)));
        assert!(renderer.calls.is_empty());
    }
}
