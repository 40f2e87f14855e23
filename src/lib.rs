//! Animation state driver for a skeletal character that runs, jumps and
//! slides under keyboard control.
//!
//! Each frame the [`driver::CharacterDriver`] takes one
//! [`input::InputSnapshot`], picks the animation state, moves the character,
//! advances the active clip and hands the bone matrices to a
//! [`types::Renderer`].

pub mod animation;
pub mod asset_import;
pub mod camera;
pub mod config;
pub mod driver;
pub mod frame_control;
pub mod input;
pub mod keyboard;
pub mod locomotion;
pub mod mouse;
pub mod platform;
pub mod st_error;
pub mod state_machine;
pub mod types;
pub mod util;
