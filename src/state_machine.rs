use crate::{
    animation::{ClipHandle, ClipStore},
    input::InputSnapshot,
    st_error::StError,
    types::ClipPlayer,
};
use ahash::{HashMap, HashMapExt};
use log::{info, warn};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum AnimationState {
    #[default]
    Running,
    Jumping,
    Sliding,
}

impl AnimationState {
    pub const ALL: [Self; 3] = [Self::Running, Self::Jumping, Self::Sliding];

    /// The state the input asks for. Jump wins over slide, and running is
    /// what happens with neither held.
    #[must_use]
    pub const fn resolve(input: &InputSnapshot) -> Self {
        if input.jump {
            Self::Jumping
        } else if input.slide {
            Self::Sliding
        } else {
            Self::Running
        }
    }
}

/// Chooses which clip plays. The current state is the only record of what
/// is playing; the clip for it is always looked up through `clip_for`.
#[derive(Clone, Debug)]
pub struct StateMachine {
    current: AnimationState,
    bindings: HashMap<AnimationState, ClipHandle>,
    transitions: u64,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: AnimationState::default(),
            bindings: HashMap::new(),
            transitions: 0,
        }
    }

    /// Associates a clip with a state, replacing any previous binding
    pub fn bind(&mut self, state: AnimationState, clip: ClipHandle) {
        self.bindings.insert(state, clip);
    }

    #[must_use]
    pub fn clip_for(&self, state: AnimationState) -> Option<ClipHandle> {
        self.bindings.get(&state).copied()
    }

    #[must_use]
    pub const fn current_state(&self) -> AnimationState {
        self.current
    }

    /// Number of clip switches since `start`
    #[must_use]
    pub const fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Enters the initial state and starts its clip
    ///
    /// # Errors
    /// Returns `StError::MissingClip` if no clip is bound for the initial
    /// state, or whatever `player` returns
    pub fn start(
        &mut self,
        player: &mut impl ClipPlayer,
        store: &ClipStore,
    ) -> Result<(), StError> {
        let initial = AnimationState::default();
        let clip = self
            .clip_for(initial)
            .ok_or(StError::MissingClip(initial))?;
        player.play_animation(store, clip)?;
        self.current = initial;
        self.transitions = 0;
        info!("state machine started in {:?}", initial);
        Ok(())
    }

    /// Resolves the state for this frame's input and switches to it
    ///
    /// # Errors
    /// Passes on errors from `player`
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        player: &mut impl ClipPlayer,
        store: &ClipStore,
    ) -> Result<bool, StError> {
        self.switch_animation(AnimationState::resolve(input), player, store)
    }

    /// Switches to `desired`, playing its clip from the start. Returns true
    /// if a switch happened. Asking for the current state does nothing, so
    /// a held key does not restart its clip every frame. A state with no
    /// clip bound is refused and the current state kept.
    ///
    /// # Errors
    /// Passes on errors from `player`
    pub fn switch_animation(
        &mut self,
        desired: AnimationState,
        player: &mut impl ClipPlayer,
        store: &ClipStore,
    ) -> Result<bool, StError> {
        if desired == self.current {
            return Ok(false);
        }
        let Some(clip) = self.clip_for(desired) else {
            warn!(
                "no clip bound for {:?}, staying in {:?}",
                desired, self.current
            );
            return Ok(false);
        };
        player.play_animation(store, clip)?;
        info!("animation state {:?} -> {:?}", self.current, desired);
        self.current = desired;
        self.transitions += 1;
        Ok(true)
    }
}
