use super::{
    clip_store::{ClipHandle, ClipStore},
    types::Transform,
};
use crate::{st_error::StError, types::ClipPlayer};
use log::{debug, trace};
use nalgebra_glm as glm;

/// Plays one clip at a time and keeps the resulting bone matrices.
///
/// Time is in clip ticks and always lies in `[0, duration)`. The matrices
/// are the skinning matrices for the last `update_animation` call, one per
/// bone, all identity until then.
#[derive(Clone, Debug)]
pub struct Animator {
    active: Option<ClipHandle>,
    current_time: f32,
    locals: Vec<Transform>,
    globals: Vec<glm::Mat4>,
    final_matrices: Vec<glm::Mat4>,
}

impl Animator {
    /// Creates an animator sized for the store's skeleton with no clip
    /// playing
    #[must_use]
    pub fn new(store: &ClipStore) -> Self {
        let count = store.skeleton().bone_count();
        Self {
            active: None,
            current_time: 0.0,
            locals: vec![Transform::default(); count],
            globals: vec![glm::Mat4::identity(); count],
            final_matrices: vec![glm::Mat4::identity(); count],
        }
    }

    /// Makes `clip` the active clip and rewinds to time 0. Playing the clip
    /// that is already active also rewinds it.
    ///
    /// # Errors
    /// Returns `StError::InvalidArgument` if `clip` is not in `store`
    pub fn play_animation(
        &mut self,
        store: &ClipStore,
        clip: ClipHandle,
    ) -> Result<(), StError> {
        let Some(c) = store.get(clip) else {
            return Err(StError::InvalidArgument);
        };
        debug!("play_animation {:?} ({})", clip, c.name());
        self.active = Some(clip);
        self.current_time = 0.0;
        Ok(())
    }

    /// Advances the active clip by `dt` seconds, wrapping at the end of the
    /// clip, and recomputes the bone matrices
    ///
    /// # Errors
    /// Returns `StError::NoActiveClip` before the first `play_animation` or
    /// `StError::InvalidArgument` if the active clip is no longer in `store`
    pub fn update_animation(
        &mut self,
        store: &ClipStore,
        dt: f32,
    ) -> Result<(), StError> {
        let handle = self.active.ok_or(StError::NoActiveClip)?;
        let clip = store.get(handle).ok_or(StError::InvalidArgument)?;
        let skeleton = store.skeleton();

        let duration = clip.duration();
        self.current_time = if duration > 0.0 {
            let t = dt
                .max(0.0)
                .mul_add(clip.ticks_per_second(), self.current_time)
                .rem_euclid(duration);
            // Rounding in `rem_euclid` can land exactly on the end
            if t < duration {
                t
            } else {
                0.0
            }
        } else {
            0.0
        };
        trace!("update_animation dt={} time={}", dt, self.current_time);

        clip.sample_into(skeleton, self.current_time, &mut self.locals);
        let root = *skeleton.root_transform();
        let bones = skeleton.bones();
        for &index in skeleton.order() {
            let bone = &bones[index];
            let parent = bone.parent.map_or(root, |p| self.globals[p]);
            let global =
                parent * bone.parent_offset * self.locals[index].to_mat4();
            self.globals[index] = global;
            self.final_matrices[index] = global * bone.inv_bind;
        }
        Ok(())
    }

    /// Bone matrices from the last update, indexed by bone index
    #[must_use]
    pub fn get_final_bone_matrices(&self) -> &[glm::Mat4] {
        &self.final_matrices
    }

    /// The bone matrices as raw column major `f32` data for uploading
    #[must_use]
    pub fn final_bone_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.final_matrices)
    }

    #[must_use]
    pub const fn active_clip(&self) -> Option<ClipHandle> {
        self.active
    }

    /// Playback position in ticks
    #[must_use]
    pub const fn current_time(&self) -> f32 {
        self.current_time
    }
}

impl ClipPlayer for Animator {
    fn play_animation(
        &mut self,
        store: &ClipStore,
        clip: ClipHandle,
    ) -> Result<(), StError> {
        Self::play_animation(self, store, clip)
    }
}
