//! Per-frame orchestration of input, animation state, locomotion and
//! animation playback.

use crate::{
    animation::{Animator, ClipStore},
    asset_import::{AssetLoader, GltfLoader},
    camera::Camera,
    config::DriverConfig,
    frame_control::{Clock, FrameContext, FrameTimer},
    input::InputSnapshot,
    locomotion::{self, CharacterPose},
    st_error::StError,
    state_machine::{AnimationState, StateMachine},
    types::{CameraTrait, RenderFrame, Renderer},
};
use log::{info, trace};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// Where the frame loop gets its input from
pub trait Platform {
    /// Input for the next frame, or `None` once the window has been closed
    fn poll_input(&mut self) -> Option<InputSnapshot>;
}

/// Owns everything needed to animate and move one character
pub struct CharacterDriver {
    store: ClipStore,
    animator: Animator,
    state_machine: StateMachine,
    pose: CharacterPose,
    camera: Camera,
    config: DriverConfig,
    frames: u64,
}

impl CharacterDriver {
    /// Loads the skeleton and clips named in `config` with the glTF loader
    ///
    /// # Errors
    /// Returns `StError::AssetLoad` if any asset can't be loaded
    pub fn load(config: DriverConfig) -> Result<Self, StError> {
        Self::load_with(&GltfLoader, config)
    }

    /// Loads the skeleton and clips named in `config` through `loader`
    ///
    /// # Errors
    /// Returns `StError::AssetLoad` if any asset can't be loaded
    pub fn load_with(
        loader: &impl AssetLoader,
        config: DriverConfig,
    ) -> Result<Self, StError> {
        let skeleton = loader.load_skeleton(&config.skeleton_path())?;
        info!(
            "skeleton {} with {} bones",
            skeleton.name(),
            skeleton.bone_count()
        );
        let mut store = ClipStore::new(skeleton);
        let mut state_machine = StateMachine::new();
        for state in AnimationState::ALL {
            let Some(file) = config.clips.for_state(state) else {
                info!("no clip configured for {:?}", state);
                continue;
            };
            let handle = store.load(loader, &config.asset_path(file))?;
            state_machine.bind(state, handle);
        }
        Self::new(store, state_machine, config)
    }

    /// Builds a driver from clips that are already loaded and bound, and
    /// starts the initial state's clip
    ///
    /// # Errors
    /// Returns `StError::MissingClip` if the running state has no clip
    pub fn new(
        store: ClipStore,
        mut state_machine: StateMachine,
        config: DriverConfig,
    ) -> Result<Self, StError> {
        let mut animator = Animator::new(&store);
        state_machine.start(&mut animator, &store)?;
        let pose = CharacterPose {
            position: config.character.start_position,
            heading: config.character.start_heading,
        };
        let camera = Camera::new(config.camera);
        Ok(Self {
            store,
            animator,
            state_machine,
            pose,
            camera,
            config,
            frames: 0,
        })
    }

    /// Convenience for loading a YAML config file and its assets
    ///
    /// # Errors
    /// May return any `StError`
    pub fn from_config_file(path: &Path) -> Result<Self, StError> {
        Self::load(DriverConfig::from_file(path)?)
    }

    /// Runs one frame. Quit is checked first so a frame either happens
    /// completely or not at all. The renderer is only called after the state
    /// machine, locomotion and animator have all seen `ctx`.
    ///
    /// # Errors
    /// Passes on animator errors, which indicate a bug rather than bad input
    pub fn frame(
        &mut self,
        ctx: &FrameContext,
        renderer: &mut impl Renderer,
    ) -> Result<FrameOutcome, StError> {
        if ctx.input.quit {
            info!("quit requested at frame {}", ctx.frame);
            return Ok(FrameOutcome::Quit);
        }
        self.update(ctx)?;
        renderer.submit(&self.render_frame());
        Ok(FrameOutcome::Continue)
    }

    /// The update half of `frame`, without rendering
    ///
    /// # Errors
    /// Passes on animator errors
    pub fn update(&mut self, ctx: &FrameContext) -> Result<(), StError> {
        self.state_machine
            .update(&ctx.input, &mut self.animator, &self.store)?;
        self.pose = locomotion::integrate(
            &self.pose,
            &ctx.input,
            ctx.dt,
            &self.config.locomotion,
        );
        self.camera.update(&ctx.input, ctx.dt);
        self.animator.update_animation(&self.store, ctx.dt)?;
        self.frames += 1;
        trace!(
            "frame {} state={:?} time={} pos={:?} heading={}",
            ctx.frame,
            self.state_machine.current_state(),
            self.animator.current_time(),
            self.pose.position,
            self.pose.heading
        );
        Ok(())
    }

    /// What the renderer gets for the current frame
    #[must_use]
    pub fn render_frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            projection: self.camera.proj_matrix(),
            view: self.camera.view_matrix(),
            model: locomotion::model_matrix(
                &self.pose,
                self.config.character.scale,
            ),
            bone_matrices: self.animator.get_final_bone_matrices(),
            state: self.state_machine.current_state(),
        }
    }

    /// Call when the window size changes
    #[allow(clippy::cast_precision_loss)]
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect_ratio(width as f32 / height as f32);
        }
    }

    /// Logs a summary of the session
    pub fn finish(&self) {
        info!(
            "session finished: {} frames, {} animation transitions, final \
             state {:?}",
            self.frames,
            self.state_machine.transition_count(),
            self.state_machine.current_state()
        );
    }

    #[must_use]
    pub const fn store(&self) -> &ClipStore {
        &self.store
    }

    #[must_use]
    pub const fn animator(&self) -> &Animator {
        &self.animator
    }

    #[must_use]
    pub const fn state_machine(&self) -> &StateMachine {
        &self.state_machine
    }

    #[must_use]
    pub const fn pose(&self) -> &CharacterPose {
        &self.pose
    }

    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Frames updated so far
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frames
    }
}

/// Pulls input from `platform` and runs frames until it reports the window
/// closed or the quit key is held. Returns the number of frames rendered.
///
/// # Errors
/// Passes on errors from `CharacterDriver::frame`
pub fn run(
    driver: &mut CharacterDriver,
    platform: &mut impl Platform,
    renderer: &mut impl Renderer,
    clock: &impl Clock,
) -> Result<u64, StError> {
    let mut timer = FrameTimer::new(driver.config().timing.max_frame_dt);
    let mut rendered = 0;
    while let Some(input) = platform.poll_input() {
        let ctx = timer.next_frame(clock, input);
        if driver.frame(&ctx, renderer)? == FrameOutcome::Quit {
            break;
        }
        rendered += 1;
    }
    driver.finish();
    Ok(rendered)
}
