use crate::animation::{Clip, Skeleton};
use std::path::{Path, PathBuf};

/// Errors specific to loading skeletons and clips. `StError` has a `From`
/// trait to handle these.
///
/// `NotFound` is kept apart from the other variants so that a missing asset
/// can be reported differently from one that exists but can't be used.
#[derive(Debug)]
pub enum AssetLoadError {
    NotFound(PathBuf),
    StdIoError(std::io::Error),
    Malformed(Box<gltf::Error>),
    NoSkin,
    NoInverseBind,
    CountMismatch,
    NoAnimation,
    NamedAnimationMissing(String),
    SparseAnimation,
    NoSampler,
    Morphing,
    TrackMismatch(String),
    InvalidHierarchy(usize),
    EmptySkeleton,
}

impl AssetLoadError {
    /// True when the asset file itself does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl std::error::Error for AssetLoadError {}

impl std::fmt::Display for AssetLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotFound(p) => write!(f, "asset {} not found", p.display()),
            Self::StdIoError(e) => write!(f, "std::io::Error: {}", e.kind()),
            Self::Malformed(e) => write!(f, "malformed asset: {e}"),
            Self::NoSkin => write!(f, "a skin is required for the skeleton"),
            Self::NoInverseBind => {
                write!(f, "inverse bind matrices are required for a skin")
            }
            Self::CountMismatch => {
                write!(f, "there is a mismatch in the count of bones")
            }
            Self::NoAnimation => write!(f, "file contains no animation"),
            Self::NamedAnimationMissing(name) => {
                write!(f, "file contains no animation named {name:?}")
            }
            Self::SparseAnimation => {
                write!(f, "sparse animation data is not supported")
            }
            Self::NoSampler => {
                write!(f, "a sampler is required for animation")
            }
            Self::Morphing => {
                write!(f, "morphing animation is not supported")
            }
            Self::TrackMismatch(name) => {
                write!(f, "track targets {name:?} which is not in skeleton")
            }
            Self::InvalidHierarchy(a) => {
                write!(f, "bone {a} has an invalid or cyclic parent")
            }
            Self::EmptySkeleton => write!(f, "skeleton has no bones"),
        }
    }
}

impl From<gltf::Error> for AssetLoadError {
    fn from(e: gltf::Error) -> Self {
        Self::Malformed(Box::new(e))
    }
}

/// Something that can produce skeletons and clips from files. The clip store
/// only depends on this trait so tests can substitute an in-memory source.
pub trait AssetLoader {
    /// # Errors
    /// May return `AssetLoadError`
    fn load_skeleton(&self, path: &Path) -> Result<Skeleton, AssetLoadError>;

    /// # Errors
    /// May return `AssetLoadError`
    fn load_clip(
        &self,
        path: &Path,
        skeleton: &Skeleton,
    ) -> Result<Clip, AssetLoadError>;
}
