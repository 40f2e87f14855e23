//! Drives the character from a real window. Nothing is drawn; each frame's
//! render data is logged instead, so run with `RUST_LOG=stride=trace` to
//! watch it.
use log::{info, trace};
use std::path::Path;
use stride::{
    config::DriverConfig,
    driver::{CharacterDriver, FrameOutcome},
    frame_control::{FrameTimer, SystemClock},
    input::{Controls, InputSnapshot},
    platform::{self, Action},
    types::{RenderFrame, Renderer},
    util,
};
use winit::event_loop::EventLoop;

const CONFIG: &str = "./demos/assets/character.yaml";

/// Logs what would be drawn
#[derive(Default)]
struct LogRenderer {
    frames: u64,
}

impl Renderer for LogRenderer {
    fn submit(&mut self, frame: &RenderFrame<'_>) {
        self.frames += 1;
        trace!(
            "render {} state={:?} bones={} model={:?}",
            self.frames,
            frame.state,
            frame.bone_matrices.len(),
            util::translation_of(&frame.model)
        );
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = if args.len() < 2 {
        CONFIG.to_string()
    } else {
        args[1].clone()
    };
    let config = DriverConfig::from_file(Path::new(&config_path)).unwrap();
    info!(
        "focal length {}mm",
        util::fovy_to_focal_length(config.camera.zoom)
    );

    let event_loop = EventLoop::new();
    let _window = platform::create_window(&event_loop, &config.window).unwrap();
    let mut timer = FrameTimer::new(config.timing.max_frame_dt);
    let mut driver = CharacterDriver::load(config).unwrap();

    let clock = SystemClock::new();
    let mut controls = Controls::default();
    let mut renderer = LogRenderer::default();

    event_loop.run(move |event, _, control_flow| {
        control_flow.set_poll();
        match platform::handle_event(
            &event,
            &mut controls.keyboard,
            &mut controls.mouse,
        ) {
            Action::Continue => {}
            Action::Resize(width, height) => driver.resize(width, height),
            Action::FocusLost => controls.keyboard.clear(),
            Action::Quit => {
                driver.finish();
                control_flow.set_exit();
            }
            Action::Frame => {
                let input = InputSnapshot::capture(&mut controls);
                controls.keyboard.tick();
                let ctx = timer.next_frame(&clock, input);
                if driver.frame(&ctx, &mut renderer).unwrap()
                    == FrameOutcome::Quit
                {
                    driver.finish();
                    control_flow.set_exit();
                }
            }
        }
    });
}
