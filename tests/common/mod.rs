//! Fixtures shared by the integration tests
//!
//! The skeleton deliberately lists a child before its parent:
//!
//! | index | name  | parent | bind translation |
//! |-------|-------|--------|------------------|
//! | 0     | Spine | 1      | (0, 0.5, 0)      |
//! | 1     | Hips  | none   | (0, 1, 0)        |
//! | 2     | Head  | 0      | (0, 0.25, 0)     |
//!
//! Only Spine has a non-identity inverse bind matrix, so its final matrix
//! differs from its global matrix.
#![allow(dead_code)]

use nalgebra_glm as glm;
use std::{cell::Cell, collections::VecDeque, sync::Once, time::Duration};
use stride::{
    animation::{
        Bone, BoneTrack, Channel, Clip, ClipHandle, ClipStore, Interpolation,
        Keyframe, Skeleton, Transform,
    },
    driver::Platform,
    frame_control::Clock,
    input::InputSnapshot,
    st_error::StError,
    state_machine::{AnimationState, StateMachine},
    types::{ClipPlayer, RenderFrame, Renderer},
};

pub const EPSILON: f32 = 0.0001f32; // Small value for float comparisons
static INIT: Once = Once::new();

/// Initializes logging in a "once per test run" manner. Call at the start of
/// each test that needs logging.
pub fn init_tests() {
    INIT.call_once(|| {
        env_logger::init();
    });
}

pub const RUN_DURATION: f32 = 1.0;
pub const JUMP_DURATION: f32 = 2.0;
pub const SLIDE_DURATION: f32 = 0.5;

fn bone(
    name: &str,
    parent: Option<usize>,
    y: f32,
    inv_bind: glm::Mat4,
) -> Bone {
    Bone {
        name: name.to_string(),
        parent,
        parent_offset: glm::Mat4::identity(),
        bind: Transform {
            translation: glm::vec3(0.0, y, 0.0),
            ..Default::default()
        },
        inv_bind,
    }
}

pub fn skeleton() -> Skeleton {
    let spine_inv_bind =
        glm::translate(&glm::Mat4::identity(), &glm::vec3(0.0, -1.5, 0.0));
    Skeleton::new(
        "rig",
        vec![
            bone("Spine", Some(1), 0.5, spine_inv_bind),
            bone("Hips", None, 1.0, glm::Mat4::identity()),
            bone("Head", Some(0), 0.25, glm::Mat4::identity()),
        ],
    )
    .unwrap()
}

/// Clip moving the hips from y=1 to y=`top` and back over `duration` ticks
pub fn bounce_clip(
    name: &str,
    skeleton: &Skeleton,
    duration: f32,
    top: f32,
) -> Clip {
    let hips = BoneTrack {
        translation: Some(Channel::new(
            Interpolation::Linear,
            vec![
                Keyframe {
                    time: 0.0,
                    data: glm::vec3(0.0, 1.0, 0.0),
                },
                Keyframe {
                    time: duration / 2.0,
                    data: glm::vec3(0.0, top, 0.0),
                },
                Keyframe {
                    time: duration,
                    data: glm::vec3(0.0, 1.0, 0.0),
                },
            ],
        )),
        ..Default::default()
    };
    Clip::new(
        name,
        skeleton,
        1.0,
        Some(duration),
        [("Hips".to_string(), hips)],
    )
    .unwrap()
}

pub struct Handles {
    pub running: ClipHandle,
    pub jumping: ClipHandle,
    pub sliding: ClipHandle,
}

/// Store holding a run, jump and slide clip for `skeleton()`
pub fn store() -> (ClipStore, Handles) {
    let skeleton = skeleton();
    let run = bounce_clip("Run", &skeleton, RUN_DURATION, 1.2);
    let jump = bounce_clip("Jump", &skeleton, JUMP_DURATION, 3.0);
    let slide = bounce_clip("Slide", &skeleton, SLIDE_DURATION, 0.5);
    let mut store = ClipStore::new(skeleton);
    let handles = Handles {
        running: store.insert(run).unwrap(),
        jumping: store.insert(jump).unwrap(),
        sliding: store.insert(slide).unwrap(),
    };
    (store, handles)
}

/// State machine with every state bound
pub fn state_machine(handles: &Handles) -> StateMachine {
    let mut sm = StateMachine::new();
    sm.bind(AnimationState::Running, handles.running);
    sm.bind(AnimationState::Jumping, handles.jumping);
    sm.bind(AnimationState::Sliding, handles.sliding);
    sm
}

pub fn forward() -> InputSnapshot {
    InputSnapshot {
        forward: true,
        ..Default::default()
    }
}

pub fn jump() -> InputSnapshot {
    InputSnapshot {
        jump: true,
        ..Default::default()
    }
}

pub fn slide() -> InputSnapshot {
    InputSnapshot {
        slide: true,
        ..Default::default()
    }
}

pub fn quit() -> InputSnapshot {
    InputSnapshot {
        quit: true,
        ..Default::default()
    }
}

/// `ClipPlayer` that only records which clips it was asked to play
#[derive(Default)]
pub struct RecordingPlayer {
    pub plays: Vec<ClipHandle>,
}

impl ClipPlayer for RecordingPlayer {
    fn play_animation(
        &mut self,
        store: &ClipStore,
        clip: ClipHandle,
    ) -> Result<(), StError> {
        if store.get(clip).is_none() {
            return Err(StError::InvalidArgument);
        }
        self.plays.push(clip);
        Ok(())
    }
}

/// Something the renderer received
pub struct Submitted {
    pub state: AnimationState,
    pub model: glm::Mat4,
    pub bone_count: usize,
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub frames: Vec<Submitted>,
}

impl Renderer for RecordingRenderer {
    fn submit(&mut self, frame: &RenderFrame<'_>) {
        self.frames.push(Submitted {
            state: frame.state,
            model: frame.model,
            bone_count: frame.bone_matrices.len(),
        });
    }
}

/// Platform replaying a fixed list of inputs, then reporting the window
/// closed
pub struct ScriptedPlatform {
    inputs: VecDeque<InputSnapshot>,
}

impl ScriptedPlatform {
    pub fn new(inputs: impl IntoIterator<Item = InputSnapshot>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
        }
    }
}

impl Platform for ScriptedPlatform {
    fn poll_input(&mut self) -> Option<InputSnapshot> {
        self.inputs.pop_front()
    }
}

/// Clock that moves forward by `step` every time it is read
pub struct StepClock {
    now: Cell<Duration>,
    step: Duration,
}

impl StepClock {
    pub fn new(step: Duration) -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            step,
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

pub fn assert_vec3_eq(actual: &glm::Vec3, expected: &glm::Vec3) {
    assert!(
        glm::equal_eps(actual, expected, EPSILON).iter().all(|b| *b),
        "{actual:?} != {expected:?}"
    );
}
