use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Key that asks the application to shut down.
pub const EXIT_KEY: KeyCode = KeyCode::Escape;

/// Keys currently held, fed from window keyboard events and polled once per frame.
#[derive(Debug)]
pub struct InputState {
    held: HashSet<KeyCode>,
    exit_key: KeyCode,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(EXIT_KEY)
    }
}

impl InputState {
    pub fn new(exit_key: KeyCode) -> Self {
        Self {
            held: HashSet::new(),
            exit_key,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key) = event.physical_key {
            self.handle_key(key, event.state == ElementState::Pressed);
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// True while the exit key is held.
    pub fn exit_requested(&self) -> bool {
        self.is_held(self.exit_key)
    }

    /// Forgets held keys, e.g. when the window loses focus and releases go unseen.
    pub fn reset(&mut self) {
        self.held.clear();
    }
}
