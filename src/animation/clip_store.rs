use super::types::{Clip, Skeleton};
use crate::{
    asset_import::{AssetLoadError, AssetLoader},
    st_error::StError,
};
use log::{error, info};
use std::path::Path;

/// Identifies a clip inside the `ClipStore` that created it
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ClipHandle(usize);

impl ClipHandle {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Owns the skeleton and every clip built against it. Other parts of the
/// crate keep `ClipHandle`s, which stay valid when a clip is replaced.
#[derive(Clone, Debug)]
pub struct ClipStore {
    skeleton: Skeleton,
    clips: Vec<Clip>,
}

impl ClipStore {
    #[must_use]
    pub const fn new(skeleton: Skeleton) -> Self {
        Self {
            skeleton,
            clips: Vec::new(),
        }
    }

    #[must_use]
    pub const fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// # Errors
    /// Returns `AssetLoadError::CountMismatch` if the clip was built for a
    /// skeleton with a different number of bones
    pub fn insert(&mut self, clip: Clip) -> Result<ClipHandle, AssetLoadError> {
        self.check(&clip)?;
        let handle = ClipHandle(self.clips.len());
        info!(
            "clip {:?} stored as {:?}, duration={} ticks at {} ticks/s",
            clip.name(),
            handle,
            clip.duration(),
            clip.ticks_per_second()
        );
        self.clips.push(clip);
        Ok(handle)
    }

    /// Loads a clip through `loader` and stores it
    ///
    /// # Errors
    /// May return `AssetLoadError`
    pub fn load(
        &mut self,
        loader: &impl AssetLoader,
        path: &Path,
    ) -> Result<ClipHandle, AssetLoadError> {
        let clip = loader.load_clip(path, &self.skeleton).map_err(|e| {
            error!("failed to load clip {:?}: {}", path, e);
            e
        })?;
        self.insert(clip)
    }

    /// Swaps in a new version of an existing clip
    ///
    /// # Errors
    /// Returns `StError::InvalidArgument` if the handle is not from this
    /// store, or `AssetLoadError::CountMismatch` (wrapped) if the clip was
    /// built for a skeleton with a different number of bones
    pub fn replace(
        &mut self,
        handle: ClipHandle,
        clip: Clip,
    ) -> Result<(), StError> {
        let Some(slot) = self.clips.get(handle.0) else {
            error!("replace with unknown clip {:?}", handle);
            return Err(StError::InvalidArgument);
        };
        self.check(&clip)?;
        info!("clip {:?} replaced by {:?}", slot.name(), clip.name());
        self.clips[handle.0] = clip;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, handle: ClipHandle) -> Option<&Clip> {
        self.clips.get(handle.0)
    }

    /// Handle of the first clip with the given name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ClipHandle> {
        self.clips
            .iter()
            .position(|c| c.name() == name)
            .map(ClipHandle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClipHandle, &Clip)> {
        self.clips
            .iter()
            .enumerate()
            .map(|(i, c)| (ClipHandle(i), c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    fn check(&self, clip: &Clip) -> Result<(), AssetLoadError> {
        if clip.track_count() == self.skeleton.bone_count() {
            Ok(())
        } else {
            error!(
                "clip {:?} has {} tracks but skeleton {} has {} bones",
                clip.name(),
                clip.track_count(),
                self.skeleton.name(),
                self.skeleton.bone_count()
            );
            Err(AssetLoadError::CountMismatch)
        }
    }
}
