use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseFlip {
    Paused,
    Resumed,
}

/// Playback pause flag shared by every toggle command across all viewers.
/// The host delivers interactions one at a time, so the flag carries no
/// lock; a concurrent host must serialize access to it.
#[derive(Debug, Default, Clone, Serialize)]
pub struct PauseState {
    active: bool,
    history: Vec<PauseFlip>,
}

impl PauseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    #[allow(dead_code)]
    pub fn is_paused(&self) -> bool {
        self.active
    }

    /// Flip the flag, record the flip, and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.history.push(if self.active {
            PauseFlip::Paused
        } else {
            PauseFlip::Resumed
        });
        self.active
    }

    #[allow(dead_code)]
    pub fn history(&self) -> &[PauseFlip] {
        &self.history
    }
}
