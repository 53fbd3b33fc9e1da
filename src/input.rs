//! Keyboard state polled once per frame.
//!
//! Window events only record which keys are held; the frame orchestrator turns
//! that snapshot into [`Direction`] commands for the camera and the scene
//! objects in a fixed order, whatever order the OS delivered the events in.
//! Mouse motion goes straight to the camera controller.

use std::collections::HashSet;

use winit::{event::ElementState, keyboard::KeyCode};

/// A movement command understood by the camera and by scene objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    SpeedBoostOn,
    SpeedBoostOff,
}

/// Camera bindings, polled in this order every frame.
pub const CAMERA_BINDINGS: [(KeyCode, Direction); 6] = [
    (KeyCode::KeyW, Direction::Forward),
    (KeyCode::KeyS, Direction::Backward),
    (KeyCode::KeyA, Direction::Left),
    (KeyCode::KeyD, Direction::Right),
    (KeyCode::Space, Direction::Up),
    (KeyCode::ControlLeft, Direction::Down),
];

/// Bindings for the interactive scene objects (the ball).
pub const OBJECT_BINDINGS: [(KeyCode, Direction); 4] = [
    (KeyCode::ArrowUp, Direction::Forward),
    (KeyCode::ArrowDown, Direction::Backward),
    (KeyCode::ArrowLeft, Direction::Left),
    (KeyCode::ArrowRight, Direction::Right),
];

pub const BOOST_KEY: KeyCode = KeyCode::ShiftLeft;
pub const EXIT_KEY: KeyCode = KeyCode::Escape;

/// Snapshot of held keys.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    close_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.held.insert(key);
            }
            ElementState::Released => {
                self.held.remove(&key);
            }
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Forgets every held key; releases that happen while unfocused never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// True once the window asked to close or the exit key is down.
    pub fn exit_requested(&self) -> bool {
        self.close_requested || self.is_held(EXIT_KEY)
    }

    /// Directions bound in `bindings` whose key is currently held, in binding order.
    pub fn held_directions<'a>(
        &'a self,
        bindings: &'a [(KeyCode, Direction)],
    ) -> impl Iterator<Item = Direction> + 'a {
        bindings
            .iter()
            .filter(|(key, _)| self.is_held(*key))
            .map(|(_, direction)| *direction)
    }

    /// Speed modifier for this frame; sent every frame, like a level signal.
    pub fn boost(&self) -> Direction {
        if self.is_held(BOOST_KEY) {
            Direction::SpeedBoostOn
        } else {
            Direction::SpeedBoostOff
        }
    }
}
