//! Character movement on the ground plane. Nothing here looks at the
//! animation state, and nothing in the state machine looks at the pose.

use crate::input::InputSnapshot;
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// World units per second
    pub move_speed: f32,
    /// Radians per second
    pub turn_speed: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            turn_speed: 2.0,
        }
    }
}

/// Position and heading of the character. A heading of 0 faces -Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterPose {
    pub position: glm::Vec3,
    pub heading: f32,
}

impl Default for CharacterPose {
    fn default() -> Self {
        Self {
            position: glm::vec3(0.0, -0.5, 0.0),
            heading: 0.0,
        }
    }
}

/// Returns the pose after `dt` seconds of `input`. Movement uses the heading
/// from the start of the frame and is not limited in any way.
#[must_use]
pub fn integrate(
    pose: &CharacterPose,
    input: &InputSnapshot,
    dt: f32,
    config: &LocomotionConfig,
) -> CharacterPose {
    let step = config.move_speed * dt;
    let facing = glm::vec3(pose.heading.sin(), 0.0, pose.heading.cos());
    let mut position = pose.position;
    if input.forward {
        position -= facing * step;
    }
    if input.backward {
        position += facing * step;
    }
    let mut heading = pose.heading;
    if input.turn_left {
        heading += config.turn_speed * dt;
    }
    if input.turn_right {
        heading -= config.turn_speed * dt;
    }
    CharacterPose { position, heading }
}

/// Model matrix placing the character mesh at `pose`
#[must_use]
pub fn model_matrix(pose: &CharacterPose, scale: f32) -> glm::Mat4 {
    let m = glm::translate(&glm::Mat4::identity(), &pose.position);
    let m = glm::rotate_y(&m, pose.heading);
    glm::scale(&m, &glm::vec3(scale, scale, scale))
}
