mod animator;
mod clip_store;
mod sample;
mod types;

// Re-exports
pub use {
    animator::Animator,
    clip_store::{ClipHandle, ClipStore},
    types::{
        Bone, BoneTrack, Channel, Clip, Interpolation, Keyframe, Skeleton,
        Transform,
    },
};
