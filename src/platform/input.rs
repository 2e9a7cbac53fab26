//! Keyboard mapping

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Physical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    A,
    D,
    W,
    E,
    Space,
}

/// Which keys drive each action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left: Vec<Key>,
    pub right: Vec<Key>,
    pub jump: Vec<Key>,
    pub throw: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec![Key::Left, Key::A],
            right: vec![Key::Right, Key::D],
            jump: vec![Key::Space, Key::Up, Key::W],
            throw: vec![Key::E],
        }
    }
}

impl KeyBindings {
    /// Snapshot the pressed key set into one tick of input
    pub fn sample(&self, pressed: &[Key]) -> TickInput {
        let any = |keys: &[Key]| keys.iter().any(|k| pressed.contains(k));
        TickInput {
            left: any(&self.left),
            right: any(&self.right),
            jump: any(&self.jump),
            throw: any(&self.throw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.sample(&[]), TickInput::default());
        assert_eq!(
            bindings.sample(&[Key::A, Key::W]),
            TickInput {
                left: true,
                jump: true,
                ..Default::default()
            }
        );
        let input = bindings.sample(&[Key::Right, Key::Space, Key::E]);
        assert!(input.right && input.jump && input.throw && !input.left);
    }
}
