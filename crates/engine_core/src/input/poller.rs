// crates/engine_core/src/input/poller.rs

use engine_shared::{InputSource, Key};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Low-level input collector that tracks held keys.
/// Keeps raw device state out of the platform runner; components only see
/// it through `InputSource`.
#[derive(Debug, Default)]
pub struct InputPoller {
    active_keys: Vec<Key>,
}

impl InputPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a single winit WindowEvent and update internal key state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                self.handle_keyboard_input(key_event);
            }
            // Keys released while unfocused never report a release.
            WindowEvent::Focused(false) => self.active_keys.clear(),
            _ => {}
        }
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        if let PhysicalKey::Code(code) = key_event.physical_key {
            if let Some(key) = map_key(code) {
                self.set_key(key, key_event.state);
            }
        }
    }

    fn set_key(&mut self, key: Key, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.active_keys.contains(&key) {
                    self.active_keys.push(key);
                }
            }
            ElementState::Released => self.active_keys.retain(|&k| k != key),
        }
    }

    pub fn active_keys(&self) -> &[Key] {
        &self.active_keys
    }
}

impl InputSource for InputPoller {
    fn is_key_down(&self, key: Key) -> bool {
        self.active_keys.contains(&key)
    }
}

/// Physical key to engine key. Keys the engine doesn't track map to `None`.
pub fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,
        KeyCode::ShiftLeft => Key::LeftShift,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_engine_key_has_a_physical_code() {
        let codes = [
            KeyCode::KeyW,
            KeyCode::KeyA,
            KeyCode::KeyS,
            KeyCode::KeyD,
            KeyCode::KeyQ,
            KeyCode::KeyE,
            KeyCode::ArrowUp,
            KeyCode::ArrowDown,
            KeyCode::ArrowLeft,
            KeyCode::ArrowRight,
            KeyCode::Space,
            KeyCode::Escape,
            KeyCode::ShiftLeft,
        ];
        let mapped: Vec<Key> = codes.iter().filter_map(|&c| map_key(c)).collect();
        assert_eq!(mapped, Key::ALL);
        assert_eq!(map_key(KeyCode::F5), None);
    }

    #[test]
    fn press_and_release_track_held_keys() {
        let mut poller = InputPoller::new();
        poller.set_key(Key::D, ElementState::Pressed);
        poller.set_key(Key::D, ElementState::Pressed);
        poller.set_key(Key::W, ElementState::Pressed);
        assert_eq!(poller.active_keys(), [Key::D, Key::W]);
        assert_eq!(poller.axis(Key::A, Key::D), 1.0);

        poller.set_key(Key::D, ElementState::Released);
        assert!(!poller.is_key_down(Key::D));
        assert_eq!(poller.axis(Key::A, Key::D), 0.0);

        poller.handle_event(&WindowEvent::Focused(false));
        assert!(poller.active_keys().is_empty());
    }
}
