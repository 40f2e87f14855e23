use super::types::{Channel, Clip, Interpolation, Keyframe, Skeleton, Transform};
use nalgebra::UnitQuaternion;
use nalgebra_glm as glm;

/// Helper to calculate the parameter used for interpolation
fn weight(start: f32, end: f32, current: f32) -> f32 {
    const EPSILON: f32 = 0.0005;
    ((current - start) / (end - start).max(EPSILON)).clamp(0.0f32, 1.0f32)
}

/// Shortest path spherical interpolation. Falls back to a normalized linear
/// blend when the quaternions are too close for `try_slerp`.
fn slerp(a: &glm::Quat, b: &glm::Quat, t: f32) -> glm::Quat {
    let b = if glm::quat_dot(a, b) < 0.0 { -*b } else { *b };
    let ua = UnitQuaternion::new_normalize(*a);
    let ub = UnitQuaternion::new_normalize(b);
    ua.try_slerp(&ub, t, 1.0e-6).map_or_else(
        || glm::quat_normalize(&glm::quat_lerp(a, &b, t)),
        UnitQuaternion::into_inner,
    )
}

/// Finds the enclosing pair of keyframes and blends between them with
/// `blend`. Times outside the channel clamp to the first or last frame.
fn calculate<T, F>(
    channel: &Channel<T>,
    current_time: f32,
    blend: F,
) -> Option<T>
where
    T: Copy,
    F: Fn(&T, &T, f32) -> T,
{
    let frames: &[Keyframe<T>] = channel.keys();
    let first = frames.first()?;
    // Index of the first frame with a time after the current time
    let next = frames.partition_point(|f| f.time <= current_time);
    if next == 0 {
        return Some(first.data);
    }
    let frame = &frames[next - 1];
    let Some(f) = frames.get(next) else {
        // Past the end of the channel
        return Some(frame.data);
    };
    if channel.interpolation == Interpolation::Step {
        return Some(frame.data);
    }
    Some(blend(
        &frame.data,
        &f.data,
        weight(frame.time, f.time, current_time),
    ))
}

impl Clip {
    /// Returns the local transform of every bone at `time` ticks, indexed by
    /// bone index. Bones without a track stay at the bind pose.
    #[must_use]
    pub fn sample(&self, skeleton: &Skeleton, time: f32) -> Vec<Transform> {
        let mut output = vec![Transform::default(); skeleton.bone_count()];
        self.sample_into(skeleton, time, &mut output);
        output
    }

    /// Same as `sample` but writes into a caller provided slice. Stops at the
    /// end of the slice or the end of the skeleton, whichever comes first.
    pub fn sample_into(
        &self,
        skeleton: &Skeleton,
        time: f32,
        output: &mut [Transform],
    ) {
        for (index, (out, bone)) in
            output.iter_mut().zip(skeleton.bones()).enumerate()
        {
            let bind = bone.bind;
            let Some(Some(track)) = self.tracks().get(index) else {
                *out = bind;
                continue;
            };
            let translation = track
                .translation
                .as_ref()
                .and_then(|c| calculate(c, time, |a, b, t| glm::lerp(a, b, t)))
                .unwrap_or(bind.translation);
            let rotation = track
                .rotation
                .as_ref()
                .and_then(|c| calculate(c, time, slerp))
                .unwrap_or(bind.rotation);
            let scale = track
                .scale
                .as_ref()
                .and_then(|c| calculate(c, time, |a, b, t| glm::lerp(a, b, t)))
                .unwrap_or(bind.scale);
            *out = Transform::new(translation, rotation, scale);
        }
    }
}
