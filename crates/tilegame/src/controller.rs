// crates/tilegame/src/controller.rs
use engine_ecs::{Component, EcsResult, Interface};
use engine_shared::Key;

use crate::transform::TransformComponent;

/// Pans the owner's transform with WASD or the arrow keys. Shift doubles the
/// speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraControllerComponent {
    /// World units per second.
    speed: f32,
}

impl CameraControllerComponent {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

impl Component for CameraControllerComponent {
    fn update(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        let input = iface.input()?;
        let dt = iface.clock()?.delta_time();

        let dx = (input.axis(Key::A, Key::D) + input.axis(Key::Left, Key::Right)).clamp(-1.0, 1.0);
        let dy = (input.axis(Key::S, Key::W) + input.axis(Key::Down, Key::Up)).clamp(-1.0, 1.0);
        if dx == 0.0 && dy == 0.0 {
            return Ok(());
        }
        let boost = if input.is_key_down(Key::LeftShift) { 2.0 } else { 1.0 };
        let step = self.speed * boost * dt;

        iface
            .owner_mut()?
            .get_single_component_mut::<TransformComponent>()?
            .translate(dx * step, dy * step);
        Ok(())
    }

    fn is_unique(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use engine_ecs::Game;
    use engine_shared::testing::{KeySet, ManualClock};

    use super::*;

    #[test]
    fn moves_by_speed_times_delta() {
        let mut game = Game::new();
        let e = game
            .create_entity()
            .with_component(TransformComponent::default())
            .and_then(|e| e.with_component(CameraControllerComponent::new(2.0)))
            .unwrap();
        let id = game.add_entity(e).unwrap();

        let clock = ManualClock::new(0.5);
        let keys = KeySet::pressed(&[Key::D, Key::Up, Key::LeftShift]);
        game.update(&mut Interface::new().with_clock(&clock).with_input(&keys))
            .unwrap();

        let tf = game
            .get_entity(id)
            .unwrap()
            .get_single_component::<TransformComponent>()
            .unwrap();
        assert_eq!(tf.position(), (2.0, 2.0));
    }

    #[test]
    fn needs_input_and_clock() {
        let mut game = Game::new();
        let e = game
            .create_entity()
            .with_component(CameraControllerComponent::new(1.0))
            .unwrap();
        game.add_entity(e).unwrap();
        assert!(game.update(&mut Interface::new()).is_err());
    }
}
