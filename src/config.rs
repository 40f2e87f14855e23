use crate::{
    camera::CameraProperties, locomotion::LocomotionConfig, st_error::StError,
    state_machine::AnimationState,
};
use log::info;
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Files for each animation state. Only `running` is required since it is
/// the initial state; a missing clip just keeps the character in its
/// previous state when that state is requested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipPaths {
    pub running: String,
    pub jumping: Option<String>,
    pub sliding: Option<String>,
}

impl Default for ClipPaths {
    fn default() -> Self {
        Self {
            running: "Run.gltf".to_string(),
            jumping: Some("Jump.gltf".to_string()),
            sliding: Some("Slide.gltf".to_string()),
        }
    }
}

impl ClipPaths {
    /// File for `state`, if one is configured
    #[must_use]
    pub fn for_state(&self, state: AnimationState) -> Option<&str> {
        match state {
            AnimationState::Running => Some(self.running.as_str()),
            AnimationState::Jumping => self.jumping.as_deref(),
            AnimationState::Sliding => self.sliding.as_deref(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub start_position: glm::Vec3,
    /// Radians
    pub start_heading: f32,
    /// Uniform scale applied to the character mesh
    pub scale: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            start_position: glm::vec3(0.0, -0.5, 0.0),
            start_heading: 0.0,
            scale: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Upper limit for a frame's `dt` in seconds
    pub max_frame_dt: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { max_frame_dt: 0.25 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Character Animation Control - WASD to move, Space to \
                    jump, Shift to slide"
                .to_string(),
        }
    }
}

/// Settings for a `CharacterDriver`. Every field has a default so a config
/// file only needs the values that differ.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Directory that asset file names are relative to
    pub asset_root: PathBuf,
    /// File containing the skeleton, usually the same as the running clip
    pub skeleton: Option<String>,
    pub clips: ClipPaths,
    pub locomotion: LocomotionConfig,
    pub character: CharacterConfig,
    pub camera: CameraProperties,
    pub timing: TimingConfig,
    pub window: WindowConfig,
}

impl DriverConfig {
    /// # Errors
    /// May return `StError::SerdeYamlError`
    pub fn from_yaml_str(yaml: &str) -> Result<Self, StError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads a YAML config file. A relative `asset_root` is taken relative
    /// to the directory containing the file.
    ///
    /// # Errors
    /// May return `StError::StdIoError` or `StError::SerdeYamlError`
    pub fn from_file(path: &Path) -> Result<Self, StError> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&text)?;
        if config.asset_root.is_relative() {
            if let Some(dir) = path.parent() {
                config.asset_root = dir.join(&config.asset_root);
            }
        }
        info!("config {:?} asset_root={:?}", path, config.asset_root);
        Ok(config)
    }

    /// # Errors
    /// May return `StError::SerdeYamlError`
    pub fn to_yaml_string(&self) -> Result<String, StError> {
        Ok(serde_yaml::to_string(self)?)
    }

    #[must_use]
    pub fn asset_path(&self, file: &str) -> PathBuf {
        self.asset_root.join(file)
    }

    /// Path of the file providing the skeleton
    #[must_use]
    pub fn skeleton_path(&self) -> PathBuf {
        self.asset_path(self.skeleton.as_deref().unwrap_or(&self.clips.running))
    }
}
