use crate::asset_import::AssetLoadError;
use ahash::{HashMap, HashMapExt};
use log::debug;
use nalgebra_glm as glm;

/// Bone local transform as separate translation, rotation and scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: glm::Vec3,
    pub rotation: glm::Quat,
    pub scale: glm::Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: glm::Vec3::zeros(),
            rotation: glm::Quat::identity(),
            scale: glm::vec3(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    #[must_use]
    pub const fn new(
        translation: glm::Vec3,
        rotation: glm::Quat,
        scale: glm::Vec3,
    ) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Combined matrix applying scale first, then rotation, then translation
    #[must_use]
    pub fn to_mat4(&self) -> glm::Mat4 {
        let m = glm::translate(&glm::Mat4::identity(), &self.translation);
        let m = m * glm::quat_to_mat4(&self.rotation);
        glm::scale(&m, &self.scale)
    }
}

#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    /// Fixed transform between the parent bone (or the skeleton root) and
    /// this bone's local transform. Identity unless the source file has
    /// nodes between the two that are not bones themselves.
    pub parent_offset: glm::Mat4,
    pub bind: Transform,
    pub inv_bind: glm::Mat4,
}

/// Bone hierarchy shared by every clip of one character. Bone indices are
/// dense and stable. A parent may have a higher index than its children, so
/// a parent-before-child processing order is computed once here.
#[derive(Clone, Debug)]
pub struct Skeleton {
    name: String,
    bones: Vec<Bone>,
    order: Vec<usize>,
    by_name: HashMap<String, usize>,
    root_transform: glm::Mat4,
}

impl Skeleton {
    /// # Errors
    /// Returns `AssetLoadError::EmptySkeleton` for no bones or
    /// `AssetLoadError::InvalidHierarchy` if a parent index is out of range
    /// or the parent links form a cycle.
    pub fn new(name: &str, bones: Vec<Bone>) -> Result<Self, AssetLoadError> {
        if bones.is_empty() {
            return Err(AssetLoadError::EmptySkeleton);
        }
        let order = topological_order(&bones)?;
        let mut by_name = HashMap::with_capacity(bones.len());
        for (index, bone) in bones.iter().enumerate() {
            by_name.entry(bone.name.clone()).or_insert(index);
        }
        debug!("skeleton {} order={:?}", name, order);
        Ok(Self {
            name: name.to_string(),
            bones,
            order,
            by_name,
            root_transform: glm::Mat4::identity(),
        })
    }

    /// Sets the transform applied above the root bones
    #[must_use]
    pub fn with_root_transform(mut self, root_transform: glm::Mat4) -> Self {
        self.root_transform = root_transform;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Bone indices with every parent ahead of its children
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub const fn root_transform(&self) -> &glm::Mat4 {
        &self.root_transform
    }
}

/// Kahn's algorithm over the parent links
fn topological_order(bones: &[Bone]) -> Result<Vec<usize>, AssetLoadError> {
    let count = bones.len();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut order = Vec::with_capacity(count);
    for (index, bone) in bones.iter().enumerate() {
        match bone.parent {
            Some(parent) if parent >= count || parent == index => {
                return Err(AssetLoadError::InvalidHierarchy(index));
            }
            Some(parent) => children[parent].push(index),
            None => order.push(index),
        }
    }
    let mut next = 0;
    while next < order.len() {
        let index = order[next];
        order.extend_from_slice(&children[index]);
        next += 1;
    }
    if order.len() == count {
        Ok(order)
    } else {
        // Anything not reached from a root is part of a cycle
        let stuck = (0..count).find(|i| !order.contains(i)).unwrap_or(0);
        Err(AssetLoadError::InvalidHierarchy(stuck))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Interpolation {
    Linear,
    Step,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe<T> {
    pub time: f32,
    pub data: T,
}

/// Time ordered keyframes for one property of one bone. The keys are only
/// reachable through `new`, which sorts them.
#[derive(Clone, Debug)]
pub struct Channel<T> {
    pub interpolation: Interpolation,
    data: Vec<Keyframe<T>>,
}

impl<T> Channel<T> {
    /// Sorts the keyframes by time. NaN times compare as equal.
    #[must_use]
    pub fn new(
        interpolation: Interpolation,
        mut data: Vec<Keyframe<T>>,
    ) -> Self {
        data.sort_by(|a, b| {
            a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal)
        });
        Self {
            interpolation,
            data,
        }
    }

    /// Keyframes in ascending time order
    #[must_use]
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.data
    }

    #[must_use]
    pub fn last_time(&self) -> f32 {
        self.data.last().map_or(0.0, |k| k.time)
    }
}

/// Animation data for a single bone. A missing channel means that property
/// stays at the bind pose.
#[derive(Clone, Debug, Default)]
pub struct BoneTrack {
    pub translation: Option<Channel<glm::Vec3>>,
    pub rotation: Option<Channel<glm::Quat>>,
    pub scale: Option<Channel<glm::Vec3>>,
}

impl BoneTrack {
    fn last_time(&self) -> f32 {
        let t = self.translation.as_ref().map_or(0.0, Channel::last_time);
        let r = self.rotation.as_ref().map_or(0.0, Channel::last_time);
        let s = self.scale.as_ref().map_or(0.0, Channel::last_time);
        t.max(r).max(s)
    }
}

/// A named motion sequence bound to one skeleton. Time is measured in ticks
/// and `ticks_per_second` converts frame time into ticks.
#[derive(Clone, Debug)]
pub struct Clip {
    name: String,
    duration: f32,
    ticks_per_second: f32,
    tracks: Vec<Option<BoneTrack>>,
}

impl Clip {
    /// Builds a clip from tracks keyed by bone name. When `duration` is `None`
    /// it is taken from the last keyframe of any track.
    ///
    /// # Errors
    /// Returns `AssetLoadError::TrackMismatch` if a track names a bone that is
    /// not in `skeleton`.
    pub fn new<I>(
        name: &str,
        skeleton: &Skeleton,
        ticks_per_second: f32,
        duration: Option<f32>,
        tracks: I,
    ) -> Result<Self, AssetLoadError>
    where
        I: IntoIterator<Item = (String, BoneTrack)>,
    {
        let mut by_index = vec![None; skeleton.bone_count()];
        let mut max_time = 0.0_f32;
        for (bone_name, track) in tracks {
            let Some(index) = skeleton.bone_index(&bone_name) else {
                return Err(AssetLoadError::TrackMismatch(bone_name));
            };
            max_time = max_time.max(track.last_time());
            by_index[index] = Some(track);
        }
        Ok(Self {
            name: name.to_string(),
            duration: duration.unwrap_or(max_time).max(0.0),
            ticks_per_second: if ticks_per_second > 0.0 {
                ticks_per_second
            } else {
                1.0
            },
            tracks: by_index,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in ticks
    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    #[must_use]
    pub const fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    /// One entry per skeleton bone, indexed by bone index
    #[must_use]
    pub fn tracks(&self) -> &[Option<BoneTrack>] {
        &self.tracks
    }

    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}
