//! Input abstraction
//!
//! The platform layer translates keys and buttons into [`Action`]s and feeds
//! them into an [`InputState`] once per frame. Gameplay only ever reads the
//! snapshot through [`InputSource`].

use serde::{Deserialize, Serialize};
use strafe_math::Vec2;

/// Gameplay actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
    Sprint,
    Crouch,
    Fire,
    Aim,
    Reload,
}

impl Action {
    /// Number of actions
    pub const COUNT: usize = 10;

    /// Every action, in index order
    pub const ALL: [Action; Self::COUNT] = [
        Self::MoveForward,
        Self::MoveBackward,
        Self::MoveLeft,
        Self::MoveRight,
        Self::Jump,
        Self::Sprint,
        Self::Crouch,
        Self::Fire,
        Self::Aim,
        Self::Reload,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Action for a raw index, if in range
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveForward => "move_forward",
            Self::MoveBackward => "move_backward",
            Self::MoveLeft => "move_left",
            Self::MoveRight => "move_right",
            Self::Jump => "jump",
            Self::Sprint => "sprint",
            Self::Crouch => "crouch",
            Self::Fire => "fire",
            Self::Aim => "aim",
            Self::Reload => "reload",
        }
    }
}

/// Read-only view of this tick's input
pub trait InputSource {
    /// Went down this tick
    fn pressed(&self, action: Action) -> bool;

    /// Currently down
    fn held(&self, action: Action) -> bool;

    /// Look movement since last tick; positive x turns right, positive y looks up
    fn look_delta(&self) -> Vec2;

    /// Movement intent: x is strafe (right positive), y is forward
    fn move_axis(&self) -> Vec2 {
        let axis = |positive: Action, negative: Action| {
            (self.held(positive) as i32 - self.held(negative) as i32) as f32
        };
        Vec2::new(
            axis(Action::MoveRight, Action::MoveLeft),
            axis(Action::MoveForward, Action::MoveBackward),
        )
    }
}

impl<T: InputSource + ?Sized> InputSource for &T {
    fn pressed(&self, action: Action) -> bool {
        (**self).pressed(action)
    }

    fn held(&self, action: Action) -> bool {
        (**self).held(action)
    }

    fn look_delta(&self) -> Vec2 {
        (**self).look_delta()
    }
}

/// Per-frame input snapshot with edge detection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    held: [bool; Action::COUNT],
    pressed: [bool; Action::COUNT],
    look_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an action's level. A rising edge also marks it pressed for this frame.
    pub fn set_held(&mut self, action: Action, down: bool) {
        let index = action.index();
        if down && !self.held[index] {
            self.pressed[index] = true;
        }
        self.held[index] = down;
    }

    /// Press and hold an action
    pub fn press(&mut self, action: Action) {
        self.set_held(action, true);
    }

    pub fn release(&mut self, action: Action) {
        self.set_held(action, false);
    }

    /// Set by raw index. Out-of-range indices are ignored; returns whether it applied.
    pub fn set_held_index(&mut self, index: usize, down: bool) -> bool {
        match Action::from_index(index) {
            Some(action) => {
                self.set_held(action, down);
                true
            }
            None => {
                log::trace!("Ignoring input index {}", index);
                false
            }
        }
    }

    /// Query by raw index. Out-of-range indices read as up.
    pub fn held_index(&self, index: usize) -> bool {
        self.held.get(index).copied().unwrap_or(false)
    }

    pub fn set_look_delta(&mut self, delta: Vec2) {
        self.look_delta = delta;
    }

    /// Accumulate look movement within a frame
    pub fn add_look_delta(&mut self, delta: Vec2) {
        self.look_delta = self.look_delta + delta;
    }

    /// Clear per-frame data (press edges, look delta). Held levels persist.
    pub fn end_frame(&mut self) {
        self.pressed = [false; Action::COUNT];
        self.look_delta = Vec2::ZERO;
    }

    /// Release everything
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl InputSource for InputState {
    fn pressed(&self, action: Action) -> bool {
        self.pressed[action.index()]
    }

    fn held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    fn look_delta(&self) -> Vec2 {
        self.look_delta
    }
}
