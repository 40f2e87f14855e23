use crate::{
    animation::{ClipHandle, ClipStore},
    st_error::StError,
    state_machine::AnimationState,
};
use nalgebra_glm as glm;
use winit::event::{ElementState, VirtualKeyCode};

/// Trait for something that handles keyboard input events
pub trait KeyboardHandler {
    fn input(&mut self, keycode: VirtualKeyCode, state: ElementState);
}

/// Trait for something that handles relative mouse motion and wheel events
pub trait MouseHandler {
    fn motion(&mut self, dx: f32, dy: f32);
    fn scroll(&mut self, dy: f32);
}

/// Trait for camera matrices, needed for rendering
pub trait CameraTrait {
    fn view_matrix(&self) -> glm::Mat4;
    fn proj_matrix(&self) -> glm::Mat4;
}

/// Something that can be told to start playing a clip. The state machine
/// only switches clips through this trait.
pub trait ClipPlayer {
    /// # Errors
    /// Returns `StError::InvalidArgument` if `clip` is not in `store`
    fn play_animation(
        &mut self,
        store: &ClipStore,
        clip: ClipHandle,
    ) -> Result<(), StError>;
}

/// Everything the renderer needs to draw the character for one frame
#[derive(Clone, Copy, Debug)]
pub struct RenderFrame<'a> {
    pub projection: glm::Mat4,
    pub view: glm::Mat4,
    pub model: glm::Mat4,
    pub bone_matrices: &'a [glm::Mat4],
    pub state: AnimationState,
}

/// The drawing side of the application. Implementations must not keep the
/// bone matrix slice past the call.
pub trait Renderer {
    fn submit(&mut self, frame: &RenderFrame<'_>);
}
