pub mod gltf_file;
mod types;

// Re-exports
pub use {
    gltf_file::GltfLoader,
    types::{AssetLoadError, AssetLoader},
};
