// Some code inspired by
// https://github.com/KhronosGroup/glTF-Tutorials/

use super::types::{AssetLoadError, AssetLoader};
use crate::animation::{
    Bone, BoneTrack, Channel, Clip, Interpolation, Keyframe, Skeleton,
    Transform,
};
use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use gltf::{
    accessor::Iter,
    animation::util::ReadOutputs,
    buffer,
    Document, Gltf,
};
use itertools::Itertools;
use log::{debug, error, info, warn};
use nalgebra_glm as glm;
use std::{fs, io, path::Path};

/// Node data used while building a skeleton
#[derive(Clone, Debug)]
struct NodeInfo {
    name: String,
    parent: Option<usize>,
    local: Transform,
}

/// `AssetLoader` for glTF 2.0 files, either `.gltf` with separate buffers or
/// `.glb`. The first skin in a file is the skeleton and its joints are the
/// bones, in skin joint order. Keyframe times are seconds, so clips run at
/// one tick per second.
#[derive(Clone, Copy, Debug, Default)]
pub struct GltfLoader;

impl AssetLoader for GltfLoader {
    fn load_skeleton(&self, path: &Path) -> Result<Skeleton, AssetLoadError> {
        load_skeleton(path)
    }

    fn load_clip(
        &self,
        path: &Path,
        skeleton: &Skeleton,
    ) -> Result<Clip, AssetLoadError> {
        load_clip(path, skeleton, None)
    }
}

impl GltfLoader {
    /// Loads the animation called `name` instead of the first one
    ///
    /// # Errors
    /// May return `AssetLoadError`
    pub fn load_clip_named(
        &self,
        path: &Path,
        skeleton: &Skeleton,
        name: &str,
    ) -> Result<Clip, AssetLoadError> {
        load_clip(path, skeleton, Some(name))
    }
}

fn load_impl<P>(
    path: P,
) -> Result<(Document, Vec<buffer::Data>), AssetLoadError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let base = path.parent().unwrap_or_else(|| Path::new("./"));
    let file = fs::File::open(path).map_err(|e| {
        error!("could not open {:?}: {}", path, e);
        if e.kind() == io::ErrorKind::NotFound {
            AssetLoadError::NotFound(path.to_path_buf())
        } else {
            AssetLoadError::StdIoError(e)
        }
    })?;
    let reader = io::BufReader::new(file);
    let gltf = Gltf::from_reader(reader).map_err(|e| {
        error!("could not parse {:?}: {}", path, e);
        AssetLoadError::from(e)
    })?;
    let buffers = gltf::import_buffers(&gltf.document, Some(base), gltf.blob)?;

    // Some info
    info!(
        "{:?}, base path={:?}, buffer count={}",
        path,
        base,
        buffers.len(),
    );

    Ok((gltf.document, buffers))
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("node.{}", node.index()), ToString::to_string)
}

/// Collects names, parents and local transforms for every node
///
/// # Errors
/// Returns `AssetLoadError::InvalidHierarchy` for a node listed as the child
/// of more than one node
fn node_table(document: &Document) -> Result<Vec<NodeInfo>, AssetLoadError> {
    let mut table: Vec<NodeInfo> = document
        .nodes()
        .map(|node| {
            let (t, r, s) = node.transform().decomposed();
            NodeInfo {
                name: node_name(&node),
                parent: None,
                local: Transform::new(t.into(), r.into(), s.into()),
            }
        })
        .collect();
    for node in document.nodes() {
        for child in node.children() {
            let info = &mut table[child.index()];
            if let Some(other) = info.parent {
                error!(
                    "node {} is a child of both node {} and node {}",
                    child.index(),
                    other,
                    node.index()
                );
                return Err(AssetLoadError::InvalidHierarchy(child.index()));
            }
            info.parent = Some(node.index());
        }
    }
    Ok(table)
}

/// Walks up from `node_index` until a node where `stop` is true or the top
/// of the hierarchy. Returns the stopping node and the combined transform of
/// every node passed on the way, `node_index` included.
///
/// # Errors
/// Returns `AssetLoadError::InvalidHierarchy` if the parent links loop
fn walk_up(
    table: &[NodeInfo],
    node_index: Option<usize>,
    stop: impl Fn(usize) -> bool,
) -> Result<(Option<usize>, glm::Mat4), AssetLoadError> {
    let mut m = glm::Mat4::identity();
    let mut current = node_index;
    for _ in 0..=table.len() {
        match current {
            Some(index) if !stop(index) => {
                let info = &table[index];
                m = info.local.to_mat4() * m;
                current = info.parent;
            }
            _ => return Ok((current, m)),
        }
    }
    let start = node_index.unwrap_or_default();
    error!("node {} has a loop in its ancestors", start);
    Err(AssetLoadError::InvalidHierarchy(start))
}

fn load_skeleton(path: &Path) -> Result<Skeleton, AssetLoadError> {
    let (document, buffers) = load_impl(path)?;
    let table = node_table(&document)?;

    let Some(skin) = document.skins().next() else {
        error!("{:?} has no skin", path);
        return Err(AssetLoadError::NoSkin);
    };
    let reader =
        skin.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
    let Some(iter) = reader.read_inverse_bind_matrices() else {
        error!("Missing inverse bind matrices");
        return Err(AssetLoadError::NoInverseBind);
    };
    let inv_binds: Vec<glm::Mat4> = iter.map(Into::into).collect();
    let joints: Vec<usize> = skin.joints().map(|j| j.index()).collect();
    if inv_binds.len() != joints.len() {
        error!(
            "skin {} has {} joints but {} inverse bind matrices",
            skin.index(),
            joints.len(),
            inv_binds.len()
        );
        return Err(AssetLoadError::CountMismatch);
    }

    let mut joint_to_bone =
        HashMap::<usize, usize>::with_capacity(joints.len());
    for (bone_index, node_index) in joints.iter().enumerate() {
        joint_to_bone.insert(*node_index, bone_index);
    }

    // The closest ancestor that is also a joint becomes the parent bone and
    // any nodes in between become the bone's parent offset. For root bones
    // the offset is everything above them; the first root's offset is the
    // skeleton's root transform and the others are stored relative to it.
    let mut bones = Vec::with_capacity(joints.len());
    let mut root_transform: Option<glm::Mat4> = None;
    for (node_index, inv_bind) in joints.iter().zip(&inv_binds) {
        let info = &table[*node_index];
        let (ancestor, offset) =
            walk_up(&table, info.parent, |a| joint_to_bone.contains_key(&a))?;
        let parent = ancestor.and_then(|a| joint_to_bone.get(&a).copied());
        let parent_offset = if parent.is_some() {
            offset
        } else if let Some(root) = root_transform {
            if offset == root {
                glm::Mat4::identity()
            } else {
                debug!("root bone {} is under a different node", info.name);
                root.try_inverse().map_or(offset, |inv| inv * offset)
            }
        } else {
            root_transform = Some(offset);
            glm::Mat4::identity()
        };
        if parent.is_some() && parent_offset != glm::Mat4::identity() {
            debug!("bone {} has non-joint nodes above it", info.name);
        }
        bones.push(Bone {
            name: info.name.clone(),
            parent,
            parent_offset,
            bind: info.local,
            inv_bind: *inv_bind,
        });
    }
    debug!(
        "skin {} bones: {}",
        skin.index(),
        bones.iter().map(|b| b.name.as_str()).join(", ")
    );

    let name = skin
        .name()
        .map_or_else(|| format!("skin.{}", skin.index()), ToString::to_string);
    let root_transform = root_transform.unwrap_or_else(glm::Mat4::identity);
    Ok(Skeleton::new(&name, bones)?.with_root_transform(root_transform))
}

/// Keyframe values as read from one sampler output
enum Values {
    Translations(Vec<glm::Vec3>),
    Rotations(Vec<glm::Quat>),
    Scales(Vec<glm::Vec3>),
}

/// Pairs times with values. Cubic spline output holds an in-tangent, value
/// and out-tangent per key; only the value is kept and the channel is played
/// back linearly.
fn keyframes<T: Copy>(
    times: &[f32],
    values: &[T],
    cubic: bool,
) -> Result<Vec<Keyframe<T>>, AssetLoadError> {
    let stride = if cubic { 3 } else { 1 };
    if values.len() != times.len() * stride {
        error!(
            "{} keyframe times but {} values, stride {}",
            times.len(),
            values.len(),
            stride
        );
        return Err(AssetLoadError::CountMismatch);
    }
    Ok(times
        .iter()
        .zip(values.iter().skip(stride / 2).step_by(stride))
        .map(|(time, data)| Keyframe {
            time: *time,
            data: *data,
        })
        .collect())
}

fn load_clip(
    path: &Path,
    skeleton: &Skeleton,
    wanted: Option<&str>,
) -> Result<Clip, AssetLoadError> {
    let (document, buffers) = load_impl(path)?;
    let table = node_table(&document)?;

    let animation = match wanted {
        Some(name) => document
            .animations()
            .find(|a| a.name() == Some(name))
            .ok_or_else(|| {
                error!("{:?} has no animation named {:?}", path, name);
                AssetLoadError::NamedAnimationMissing(name.to_string())
            })?,
        None => document.animations().next().ok_or_else(|| {
            error!("{:?} has no animation", path);
            AssetLoadError::NoAnimation
        })?,
    };
    let clip_name = animation.name().map_or_else(
        || format!("animation.{}", animation.index()),
        ToString::to_string,
    );
    debug!("animation name={:?}", clip_name);

    // Files exported with a skin only animate joints by intent; anything else
    // they animate (an armature node, say) has no bone to drive.
    let mut joint_nodes = HashSet::new();
    for skin in document.skins() {
        joint_nodes.extend(skin.joints().map(|j| j.index()));
    }

    let mut tracks = HashMap::<String, BoneTrack>::new();
    for channel in animation.channels() {
        let node = channel.target().node();
        let name = &table[node.index()].name;
        if skeleton.bone_index(name).is_none() {
            if !joint_nodes.is_empty() && !joint_nodes.contains(&node.index()) {
                debug!("animation {} skips non-joint node {}", clip_name, name);
                continue;
            }
            error!("animation {} targets unknown bone {}", clip_name, name);
            return Err(AssetLoadError::TrackMismatch(name.clone()));
        }

        let (interpolation, cubic) = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Step => (Interpolation::Step, false),
            gltf::animation::Interpolation::Linear => {
                (Interpolation::Linear, false)
            }
            gltf::animation::Interpolation::CubicSpline => {
                warn!(
                    "animation {} node {} cubic spline played as linear",
                    clip_name, name
                );
                (Interpolation::Linear, true)
            }
        };

        let reader = channel
            .reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let times: Vec<f32> = match reader.read_inputs() {
            Some(Iter::Standard(times)) => times.collect(),
            Some(Iter::Sparse(_)) => {
                error!("Unsupported sparse animation format");
                return Err(AssetLoadError::SparseAnimation);
            }
            None => {
                error!("Animation does not contain a sampler");
                return Err(AssetLoadError::NoSampler);
            }
        };

        let values = match reader.read_outputs() {
            Some(ReadOutputs::Translations(x)) => {
                Values::Translations(x.map(Into::into).collect())
            }
            Some(ReadOutputs::Rotations(x)) => Values::Rotations(
                x.into_f32()
                    .map(|q| glm::quat_normalize(&glm::Quat::from(q)))
                    .collect(),
            ),
            Some(ReadOutputs::Scales(x)) => {
                Values::Scales(x.map(Into::into).collect())
            }
            Some(ReadOutputs::MorphTargetWeights(_)) => {
                error!("Morphing not supported");
                return Err(AssetLoadError::Morphing);
            }
            None => {
                error!("Animation does not contain a sampler output");
                return Err(AssetLoadError::NoSampler);
            }
        };

        let track = tracks.entry(name.clone()).or_default();
        match values {
            Values::Translations(v) => {
                let data = keyframes(&times, &v, cubic)?;
                track.translation = Some(Channel::new(interpolation, data));
            }
            Values::Rotations(v) => {
                let data = keyframes(&times, &v, cubic)?;
                track.rotation = Some(Channel::new(interpolation, data));
            }
            Values::Scales(v) => {
                let data = keyframes(&times, &v, cubic)?;
                track.scale = Some(Channel::new(interpolation, data));
            }
        }
    }

    if tracks.is_empty() {
        warn!("animation {} drives no bones of {}", clip_name, skeleton.name());
    }
    Clip::new(&clip_name, skeleton, 1.0, None, tracks)
}
