use crate::{input::InputSnapshot, types::CameraTrait};
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

const NEAR_CLIP_METERS: f32 = 0.1;
const FAR_CLIP_METERS: f32 = 100.0;
const MAX_PITCH_DEGREES: f32 = 89.0;
const MIN_ZOOM_DEGREES: f32 = 1.0;
const MAX_ZOOM_DEGREES: f32 = 45.0;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraProperties {
    pub aspect_ratio: f32,
    pub position: glm::Vec3,
    /// Degrees, -90 looks down -Z
    pub yaw: f32,
    /// Degrees
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
    pub movement_speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraProperties {
    fn default() -> Self {
        Self {
            aspect_ratio: 800.0f32 / 600.0f32,
            position: glm::vec3(0.0f32, 1.0f32, 5.0f32),
            yaw: -90.0f32,
            pitch: 0.0f32,
            zoom: 45.0f32,
            movement_speed: 2.5f32,
            sensitivity: 0.1f32,
        }
    }
}

/// Free-look camera. Arrow keys move it, mouse motion turns it and the
/// wheel zooms. The view and projection matrices are rebuilt whenever the
/// values they depend on change.
#[derive(Debug, Copy, Clone)]
pub struct Camera {
    properties: CameraProperties,
    front: glm::Vec3,
    right: glm::Vec3,
    up: glm::Vec3,
    view: glm::Mat4,
    proj: glm::Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraProperties::default())
    }
}

impl CameraTrait for Camera {
    fn view_matrix(&self) -> glm::Mat4 {
        self.view
    }

    fn proj_matrix(&self) -> glm::Mat4 {
        self.proj
    }
}

impl Camera {
    #[must_use]
    pub fn new(properties: CameraProperties) -> Self {
        let mut camera = Self {
            properties,
            front: glm::vec3(0.0, 0.0, -1.0),
            right: glm::vec3(1.0, 0.0, 0.0),
            up: glm::vec3(0.0, 1.0, 0.0),
            view: glm::Mat4::identity(),
            proj: glm::Mat4::identity(),
        };
        camera.build_view();
        camera.build_proj();
        camera
    }

    #[must_use]
    pub const fn properties(&self) -> &CameraProperties {
        &self.properties
    }

    pub fn aspect_ratio(&mut self, aspect_ratio: f32) {
        self.properties.aspect_ratio = aspect_ratio;
        self.build_proj();
    }

    /// Applies the camera part of one frame of input
    pub fn update(&mut self, input: &InputSnapshot, dt: f32) {
        let velocity = self.properties.movement_speed * dt;
        let mut position = self.properties.position;
        if input.camera_forward {
            position += self.front * velocity;
        }
        if input.camera_backward {
            position -= self.front * velocity;
        }
        if input.camera_left {
            position -= self.right * velocity;
        }
        if input.camera_right {
            position += self.right * velocity;
        }
        self.properties.position = position;

        let p = &input.pointer;
        if p.dx != 0.0 || p.dy != 0.0 {
            self.turn(p.dx, -p.dy);
        }
        if p.scroll != 0.0 {
            self.zoom(p.scroll);
        }
        self.build_view();
    }

    /// Turns by a mouse offset. Positive `dy` looks up.
    pub fn turn(&mut self, dx: f32, dy: f32) {
        let props = &mut self.properties;
        props.yaw += dx * props.sensitivity;
        props.pitch = dy
            .mul_add(props.sensitivity, props.pitch)
            .clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
        self.build_view();
    }

    /// Narrows the field of view for positive wheel movement
    pub fn zoom(&mut self, scroll: f32) {
        self.properties.zoom = (self.properties.zoom - scroll)
            .clamp(MIN_ZOOM_DEGREES, MAX_ZOOM_DEGREES);
        self.build_proj();
    }

    #[must_use]
    pub const fn front(&self) -> glm::Vec3 {
        self.front
    }

    fn build_proj(&mut self) {
        self.proj = glm::perspective(
            self.properties.aspect_ratio,
            self.properties.zoom.to_radians(),
            NEAR_CLIP_METERS,
            FAR_CLIP_METERS,
        );
    }

    fn build_view(&mut self) {
        let yaw = self.properties.yaw.to_radians();
        let pitch = self.properties.pitch.to_radians();
        self.front = glm::normalize(&glm::vec3(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        ));
        self.right =
            glm::normalize(&glm::cross(&self.front, &glm::vec3(0.0, 1.0, 0.0)));
        self.up = glm::normalize(&glm::cross(&self.right, &self.front));
        let position = self.properties.position;
        self.view = glm::look_at(&position, &(position + self.front), &self.up);
    }
}

#[cfg(test)]
mod tests {
    use super::{Camera, CameraProperties};
    use crate::{
        input::{InputSnapshot, PointerDelta},
        types::CameraTrait,
        util,
    };
    use nalgebra_glm as glm;

    const EPSILON: f32 = 0.0005;

    #[test]
    fn default_looks_down_negative_z() {
        let camera = Camera::default();
        let c = glm::equal_eps(&camera.front(), &glm::vec3(0.0, 0.0, -1.0), EPSILON);
        assert!(c.x && c.y && c.z);
        // A point straight ahead ends up on the view axis
        let p = util::transform(&glm::vec3(0.0, 1.0, 0.0), &camera.view_matrix());
        assert!(p.x.abs() < EPSILON && p.y.abs() < EPSILON && p.z < 0.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.turn(0.0, 10_000.0);
        assert!((camera.properties().pitch - 89.0).abs() < EPSILON);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::new(CameraProperties {
            zoom: 10.0,
            ..Default::default()
        });
        camera.zoom(100.0);
        assert!((camera.properties().zoom - 1.0).abs() < EPSILON);
        camera.zoom(-100.0);
        assert!((camera.properties().zoom - 45.0).abs() < EPSILON);
    }

    #[test]
    fn arrow_keys_move_camera() {
        let mut camera = Camera::default();
        let input = InputSnapshot {
            camera_forward: true,
            pointer: PointerDelta::default(),
            ..Default::default()
        };
        camera.update(&input, 1.0);
        let c = glm::equal_eps(
            &camera.properties().position,
            &glm::vec3(0.0, 1.0, 2.5),
            EPSILON,
        );
        assert!(c.x && c.y && c.z);
    }
}
