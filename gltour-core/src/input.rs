//! Logical input actions and the [`InputSource`] trait.
//!
//! The camera never sees raw key codes. A windowing layer maps its keyboard and mouse
//! state onto [`Action`]s and exposes cursor control through [`InputSource`].

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A bindable input action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Ascend,
    Descend,
    /// Multiplies movement speed while held.
    Sprint,
    /// Turns cursor motion into camera rotation while held.
    Look,
}

impl Action {
    /// Every action, in binding order.
    pub const ALL: [Action; 8] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::Ascend,
        Action::Descend,
        Action::Sprint,
        Action::Look,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::MoveForward => "move_forward",
            Action::MoveBackward => "move_backward",
            Action::StrafeLeft => "strafe_left",
            Action::StrafeRight => "strafe_right",
            Action::Ascend => "ascend",
            Action::Descend => "descend",
            Action::Sprint => "sprint",
            Action::Look => "look",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}

/// Source of per-frame input state and cursor control.
pub trait InputSource {
    /// Returns `true` while the binding for `action` is held.
    fn is_down(&self, action: Action) -> bool;

    /// Current cursor position in window pixels, origin at the top left.
    fn cursor_position(&self) -> Vec2;

    /// Moves the system cursor to `position` in window pixels.
    fn warp_cursor(&mut self, position: Vec2);

    /// Shows or hides the system cursor.
    fn set_cursor_visible(&mut self, visible: bool);
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;

    use super::*;

    /// Scripted input used by the camera and session tests.
    #[derive(Default)]
    pub struct FakeInput {
        pub down: HashSet<Action>,
        pub cursor: Vec2,
        pub warps: Vec<Vec2>,
        pub cursor_visible: bool,
    }

    impl FakeInput {
        pub fn holding(actions: &[Action]) -> Self {
            Self {
                down: actions.iter().copied().collect(),
                cursor_visible: true,
                ..Default::default()
            }
        }
    }

    impl InputSource for FakeInput {
        fn is_down(&self, action: Action) -> bool {
            self.down.contains(&action)
        }

        fn cursor_position(&self) -> Vec2 {
            self.cursor
        }

        fn warp_cursor(&mut self, position: Vec2) {
            self.cursor = position;
            self.warps.push(position);
        }

        fn set_cursor_visible(&mut self, visible: bool) {
            self.cursor_visible = visible;
        }
    }

    #[test]
    fn test_action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }
        assert!("jump".parse::<Action>().is_err());
    }
}
