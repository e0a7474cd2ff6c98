use std::{cell::RefCell, rc::Rc};

use serde::Serialize;

/// Host audio seam. Download, caching and actual playback live on the
/// engine side; the module only issues fire-and-forget requests.
pub trait PlaybackService {
    fn request_track(&self, query: &str, clip: &str);
    fn stop(&self);
    fn pause(&self, active: bool);
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaybackEvent {
    TrackRequest { query: String, clip: String },
    Stop,
    Pause { active: bool },
}

/// Records every playback request so tests and the demo host can inspect
/// what the module asked the engine to do.
#[derive(Clone, Default)]
pub struct RecordingPlayback {
    events: Rc<RefCell<Vec<PlaybackEvent>>>,
}

impl RecordingPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.events.borrow().clone()
    }
}

impl PlaybackService for RecordingPlayback {
    fn request_track(&self, query: &str, clip: &str) {
        self.events.borrow_mut().push(PlaybackEvent::TrackRequest {
            query: query.to_string(),
            clip: clip.to_string(),
        });
    }

    fn stop(&self) {
        self.events.borrow_mut().push(PlaybackEvent::Stop);
    }

    fn pause(&self, active: bool) {
        self.events.borrow_mut().push(PlaybackEvent::Pause { active });
    }
}
