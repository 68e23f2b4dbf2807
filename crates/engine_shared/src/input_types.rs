// crates/engine_shared/src/input_types.rs
//! Keyboard state as seen by components. The platform layer owns the polling.

/// Keys the engine tracks. Anything else reported by the platform is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    Up,
    Down,
    Left,
    Right,
    Space,
    Escape,
    LeftShift,
}

impl Key {
    pub const ALL: [Key; 13] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Q,
        Key::E,
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Space,
        Key::Escape,
        Key::LeftShift,
    ];
}

/// Read-only key state for the current frame.
pub trait InputSource {
    fn is_key_down(&self, key: Key) -> bool;

    /// -1.0, 0.0 or 1.0 depending on which of the two keys is held.
    fn axis(&self, negative: Key, positive: Key) -> f32 {
        let mut value = 0.0;
        if self.is_key_down(negative) {
            value -= 1.0;
        }
        if self.is_key_down(positive) {
            value += 1.0;
        }
        value
    }
}
