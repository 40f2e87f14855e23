use crate::{asset_import::AssetLoadError, state_machine::AnimationState};
use std::{error, fmt};
use winit::error::OsError;

/// Unified error type
///
/// Loader failures are wrapped as `AssetLoad` so that a caller can tell a
/// missing file from a malformed one without matching on every variant here.
/// `NoActiveClip` and `InvalidArgument` indicate a caller bug rather than
/// anything recoverable at runtime.
#[derive(Debug)]
pub enum StError {
    NoActiveClip,
    InvalidArgument,
    MissingClip(AnimationState),
    AssetLoad(AssetLoadError),
    SerdeYamlError(Box<serde_yaml::Error>),
    StdIoError(std::io::Error),
    WinitOsError(OsError),
}

impl error::Error for StError {}

impl fmt::Display for StError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoActiveClip => {
                write!(f, "animation updated before any clip was played")
            }
            Self::InvalidArgument => {
                write!(f, "clip handle does not belong to this store")
            }
            Self::MissingClip(state) => {
                write!(f, "no clip bound for animation state {state:?}")
            }
            Self::AssetLoad(e) => write!(f, "asset load error: {e}"),
            Self::SerdeYamlError(e) => write!(f, "serde_yaml::Error: {e}"),
            Self::StdIoError(e) => write!(f, "std::io::Error: {}", e.kind()),
            Self::WinitOsError(e) => write!(f, "OsError {e}"),
        }
    }
}

impl From<AssetLoadError> for StError {
    fn from(e: AssetLoadError) -> Self {
        Self::AssetLoad(e)
    }
}

impl From<serde_yaml::Error> for StError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::SerdeYamlError(Box::new(e))
    }
}

impl From<std::io::Error> for StError {
    fn from(e: std::io::Error) -> Self {
        Self::StdIoError(e)
    }
}

impl From<OsError> for StError {
    fn from(e: OsError) -> Self {
        Self::WinitOsError(e)
    }
}
