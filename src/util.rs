use nalgebra_glm as glm;

/// Transforms a 3D position using a 4x4 matrix and return as a `glm::Vec3`
#[must_use]
pub fn transform(position: &glm::Vec3, matrix: &glm::Mat4) -> glm::Vec3 {
    let ws = glm::vec4(position.x, position.y, position.z, 1.0f32);
    let vs = matrix * ws;
    glm::vec3(vs.x, vs.y, vs.z)
}

/// The translation part of an affine 4x4 matrix
#[must_use]
pub fn translation_of(matrix: &glm::Mat4) -> glm::Vec3 {
    glm::vec3(matrix.m14, matrix.m24, matrix.m34)
}

/// Converts a vertical field of view in degrees to an equivalent focal
/// length in mm for a 35mm sensor, for logging camera settings
#[must_use]
pub fn fovy_to_focal_length(fovy_degrees: f32) -> f32 {
    let half = (fovy_degrees.max(0.001f32) * 0.5f32).to_radians();
    12.0f32 / half.tan()
}

#[cfg(test)]
mod tests {
    use nalgebra_glm as glm;

    #[test]
    fn translation_of() {
        let m = glm::translate(&glm::Mat4::identity(), &glm::vec3(1.0, -2.0, 3.5));
        assert_eq!(super::translation_of(&m), glm::vec3(1.0, -2.0, 3.5));
    }

    #[test]
    fn focal_length() {
        // About 29mm for a 45 degree field of view
        let f = super::fovy_to_focal_length(45.0);
        assert!((f - 28.97).abs() < 0.01);
    }
}
