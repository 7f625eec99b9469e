//! SDL2 keyboard and mouse state, and the [`InputSource`] the camera samples from.

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;
use gltour_core::{Action, InputSource};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::{MouseButton, MouseUtil};
use sdl2::video::Window;

/// The current state of the keyboard.
#[derive(Default)]
pub struct KeyboardState {
    pub down: HashSet<Keycode>,
}

/// The current state of the mouse.
#[derive(Default)]
pub struct MouseState {
    pub position: Vec2,
    pub down: HashSet<MouseButton>,
}

/// Held keys, held buttons and cursor position, fed from the event pump.
#[derive(Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
}

impl InputState {
    /// Folds one SDL event into the held-state sets.
    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::KeyDown {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => {
                self.keyboard.down.insert(keycode);
            }
            Event::KeyUp {
                keycode: Some(keycode),
                ..
            } => {
                self.keyboard.down.remove(&keycode);
            }
            Event::MouseMotion { x, y, .. } => {
                self.mouse.position = Vec2::new(x as f32, y as f32);
            }
            Event::MouseButtonDown { mouse_btn, .. } => {
                self.mouse.down.insert(mouse_btn);
            }
            Event::MouseButtonUp { mouse_btn, .. } => {
                self.mouse.down.remove(&mouse_btn);
            }
            // Keys released while unfocused never send KeyUp.
            Event::Window {
                win_event: sdl2::event::WindowEvent::FocusLost,
                ..
            } => {
                self.keyboard.down.clear();
                self.mouse.down.clear();
            }
            _ => {}
        }
    }
}

/// A physical key or mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    Key(Keycode),
    Mouse(MouseButton),
}

impl Binding {
    /// Parses an SDL key name such as `"W"` or `"Left Shift"`, or `"Mouse Left"`,
    /// `"Mouse Right"`, `"Mouse Middle"`.
    pub fn parse(name: &str) -> Result<Self, String> {
        if let Some(button) = name.strip_prefix("Mouse ") {
            let button = match button {
                "Left" => MouseButton::Left,
                "Right" => MouseButton::Right,
                "Middle" => MouseButton::Middle,
                "X1" => MouseButton::X1,
                "X2" => MouseButton::X2,
                _ => return Err(format!("Unknown mouse button: {}", name)),
            };
            return Ok(Binding::Mouse(button));
        }
        Keycode::from_name(name)
            .map(Binding::Key)
            .ok_or_else(|| format!("Unknown key: {}", name))
    }
}

/// Action to physical input mapping.
pub struct Bindings {
    map: BTreeMap<Action, Binding>,
}

impl Bindings {
    pub fn from_names(names: &BTreeMap<Action, String>) -> Result<Self, String> {
        let map = names
            .iter()
            .map(|(action, name)| {
                let binding = Binding::parse(name).map_err(|e| format!("{}: {}", action, e))?;
                log::debug!("Bound {} to {:?}", action, binding);
                Ok((*action, binding))
            })
            .collect::<Result<BTreeMap<_, _>, String>>()?;
        Ok(Self { map })
    }

    pub fn get(&self, action: Action) -> Option<Binding> {
        self.map.get(&action).copied()
    }
}

/// The per-frame [`InputSource`] handed to the session.
pub struct SdlInput<'a> {
    pub state: &'a mut InputState,
    pub bindings: &'a Bindings,
    pub mouse_util: &'a MouseUtil,
    pub window: &'a Window,
}

impl InputSource for SdlInput<'_> {
    fn is_down(&self, action: Action) -> bool {
        match self.bindings.get(action) {
            Some(Binding::Key(key)) => self.state.keyboard.down.contains(&key),
            Some(Binding::Mouse(button)) => self.state.mouse.down.contains(&button),
            None => false,
        }
    }

    fn cursor_position(&self) -> Vec2 {
        self.state.mouse.position
    }

    fn warp_cursor(&mut self, position: Vec2) {
        self.mouse_util
            .warp_mouse_in_window(self.window, position.x as i32, position.y as i32);
        self.state.mouse.position = position;
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.mouse_util.show_cursor(visible);
    }
}
