use crate::{input::InputSource, types::KeyboardHandler};
use winit::event::{ElementState, VirtualKeyCode};

/// Tracks which keys are held. The event handler only uses the
/// `KeyboardHandler` trait to register events and the rest is used by the
/// frame loop.
///
/// `VirtualKeyCode` is the symbolic name of a key and does not depend on
/// keyboard layout. The winit `VirtualKeyCode` enum currently has 163
/// entries, so the arrays are sized with some room to spare.
const ARRAY_SIZE: usize = 180;

pub struct Keyboard {
    current_keys: [bool; ARRAY_SIZE],
    previous_keys: [bool; ARRAY_SIZE],
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardHandler for Keyboard {
    fn input(&mut self, keycode: VirtualKeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => self.current_keys[keycode as usize] = true,
            ElementState::Released => {
                self.current_keys[keycode as usize] = false;
            }
        }
    }
}

impl InputSource for Keyboard {
    fn is_key_down(&self, keycode: VirtualKeyCode) -> bool {
        self.is_pressed(keycode)
    }
}

impl Keyboard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current_keys: [false; ARRAY_SIZE],
            previous_keys: [false; ARRAY_SIZE],
        }
    }

    /// Call at the end of a frame to track which keys have changed
    pub fn tick(&mut self) {
        self.previous_keys = self.current_keys;
    }

    /// Releases every key, for example when the window loses focus
    pub fn clear(&mut self) {
        self.current_keys = [false; ARRAY_SIZE];
    }

    #[must_use]
    pub const fn is_pressed(&self, keycode: VirtualKeyCode) -> bool {
        self.current_keys[keycode as usize]
    }

    /// True if a key is pressed now but wasn't last frame
    #[must_use]
    pub const fn is_just_pressed(&self, keycode: VirtualKeyCode) -> bool {
        self.current_keys[keycode as usize]
            && !self.previous_keys[keycode as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::Keyboard;
    use crate::types::KeyboardHandler;
    use winit::event::{ElementState, VirtualKeyCode};

    #[test]
    fn press_and_release() {
        let mut keyboard = Keyboard::new();
        keyboard.input(VirtualKeyCode::Space, ElementState::Pressed);
        assert!(keyboard.is_pressed(VirtualKeyCode::Space));
        assert!(keyboard.is_just_pressed(VirtualKeyCode::Space));
        keyboard.tick();
        assert!(keyboard.is_pressed(VirtualKeyCode::Space));
        assert!(!keyboard.is_just_pressed(VirtualKeyCode::Space));
        keyboard.input(VirtualKeyCode::Space, ElementState::Released);
        assert!(!keyboard.is_pressed(VirtualKeyCode::Space));
    }

    #[test]
    fn clear_releases_all() {
        let mut keyboard = Keyboard::new();
        keyboard.input(VirtualKeyCode::W, ElementState::Pressed);
        keyboard.input(VirtualKeyCode::LShift, ElementState::Pressed);
        keyboard.clear();
        assert!(!keyboard.is_pressed(VirtualKeyCode::W));
        assert!(!keyboard.is_pressed(VirtualKeyCode::LShift));
    }
}
