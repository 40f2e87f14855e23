use crate::{keyboard::Keyboard, mouse::Mouse};
use winit::event::VirtualKeyCode;

pub const KEY_FORWARD: VirtualKeyCode = VirtualKeyCode::W;
pub const KEY_BACKWARD: VirtualKeyCode = VirtualKeyCode::S;
pub const KEY_TURN_LEFT: VirtualKeyCode = VirtualKeyCode::A;
pub const KEY_TURN_RIGHT: VirtualKeyCode = VirtualKeyCode::D;
pub const KEY_JUMP: VirtualKeyCode = VirtualKeyCode::Space;
pub const KEYS_SLIDE: [VirtualKeyCode; 2] =
    [VirtualKeyCode::LShift, VirtualKeyCode::RShift];
pub const KEY_QUIT: VirtualKeyCode = VirtualKeyCode::Escape;
pub const KEY_CAMERA_FORWARD: VirtualKeyCode = VirtualKeyCode::Up;
pub const KEY_CAMERA_BACKWARD: VirtualKeyCode = VirtualKeyCode::Down;
pub const KEY_CAMERA_LEFT: VirtualKeyCode = VirtualKeyCode::Left;
pub const KEY_CAMERA_RIGHT: VirtualKeyCode = VirtualKeyCode::Right;

/// Relative pointer movement accumulated since the previous frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerDelta {
    pub dx: f32,
    pub dy: f32,
    pub scroll: f32,
}

/// Source of raw input queried once per frame
pub trait InputSource {
    fn is_key_down(&self, keycode: VirtualKeyCode) -> bool;

    /// Returns and clears the pointer movement since the last call
    fn take_pointer(&mut self) -> PointerDelta {
        PointerDelta::default()
    }
}

/// Input state for one frame. Every component updated in a frame reads the
/// same snapshot so none of them sees a newer key state than the others.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub jump: bool,
    pub slide: bool,
    pub quit: bool,
    pub camera_forward: bool,
    pub camera_backward: bool,
    pub camera_left: bool,
    pub camera_right: bool,
    pub pointer: PointerDelta,
}

impl InputSnapshot {
    /// Reads the fixed key set from `source`
    pub fn capture(source: &mut impl InputSource) -> Self {
        Self {
            forward: source.is_key_down(KEY_FORWARD),
            backward: source.is_key_down(KEY_BACKWARD),
            turn_left: source.is_key_down(KEY_TURN_LEFT),
            turn_right: source.is_key_down(KEY_TURN_RIGHT),
            jump: source.is_key_down(KEY_JUMP),
            slide: KEYS_SLIDE.iter().any(|k| source.is_key_down(*k)),
            quit: source.is_key_down(KEY_QUIT),
            camera_forward: source.is_key_down(KEY_CAMERA_FORWARD),
            camera_backward: source.is_key_down(KEY_CAMERA_BACKWARD),
            camera_left: source.is_key_down(KEY_CAMERA_LEFT),
            camera_right: source.is_key_down(KEY_CAMERA_RIGHT),
            pointer: source.take_pointer(),
        }
    }
}

/// Keyboard and mouse together, as fed by `platform::handle_event`
#[derive(Default)]
pub struct Controls {
    pub keyboard: Keyboard,
    pub mouse: Mouse,
}

impl InputSource for Controls {
    fn is_key_down(&self, keycode: VirtualKeyCode) -> bool {
        self.keyboard.is_pressed(keycode)
    }

    fn take_pointer(&mut self) -> PointerDelta {
        self.mouse.take()
    }
}
