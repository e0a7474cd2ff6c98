use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Result};
use jukebox_formats::{PlaylistTable, SongRecord};
use rand::Rng;

use super::MenuCommand;
use crate::messages::Message;
use crate::pause::PauseState;
use crate::playback::PlaybackService;
use crate::prompt::Prompter;
use crate::session::Viewer;

/// Viewer-state key holding the most recently played "Title - Artist".
pub const LAST_SONG_STATE: &str = "last_song";

const ADD_SONG_PROMPT: &str = "Enter new song details in the following format:\n\
    title,artist,genre,popularity,rating\n\
    Example: CN TOWER,Drake,Pop,100,4.5\n> ";

/// Plays a song from the backing table: the title bound at construction
/// when one was, otherwise a uniformly random pick. An unmatched title
/// also falls back to a random pick.
pub struct PlaySong {
    table: PlaylistTable,
    selected: Option<String>,
    playback: Rc<dyn PlaybackService>,
}

impl PlaySong {
    pub fn any(table: PlaylistTable, playback: Rc<dyn PlaybackService>) -> Self {
        PlaySong {
            table,
            selected: None,
            playback,
        }
    }

    pub fn titled(
        table: PlaylistTable,
        title: impl Into<String>,
        playback: Rc<dyn PlaybackService>,
    ) -> Self {
        PlaySong {
            table,
            selected: Some(title.into()),
            playback,
        }
    }

    fn choose(&self, songs: &[SongRecord]) -> SongRecord {
        if let Some(wanted) = self.selected.as_deref() {
            let wanted = wanted.trim();
            if let Some(song) = songs
                .iter()
                .find(|song| song.title.eq_ignore_ascii_case(wanted))
            {
                return song.clone();
            }
        }
        songs[rand::thread_rng().gen_range(0..songs.len())].clone()
    }
}

impl MenuCommand for PlaySong {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
        let songs = self.table.load()?;
        if songs.is_empty() {
            bail!("playlist {} has no songs", self.table.name());
        }

        let song = self.choose(&songs);
        viewer.set_state(LAST_SONG_STATE, song.display_name());

        let query = format!("{} {} audio", song.title, song.artist);
        let clip = format!("{}.wav", song.display_name());
        self.playback.request_track(&query, &clip);

        Ok(vec![Message::sound(viewer.name(), clip)])
    }
}

/// Tells the viewer what they played last, if anything.
pub struct ShowLastPlayed;

impl MenuCommand for ShowLastPlayed {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
        let message = match viewer.state(LAST_SONG_STATE) {
            Some(last) => {
                Message::server_text(viewer.name(), format!("Last song you played: {last}"))
            }
            None => Message::server_text(viewer.name(), "You haven't played any songs yet!"),
        };
        Ok(vec![message])
    }
}

/// Flips the shared pause flag and forwards the new state to the engine.
/// The flag is terminal-wide, not per viewer.
pub struct PauseToggle {
    pause: Rc<RefCell<PauseState>>,
    playback: Rc<dyn PlaybackService>,
}

impl PauseToggle {
    pub fn new(pause: Rc<RefCell<PauseState>>, playback: Rc<dyn PlaybackService>) -> Self {
        PauseToggle { pause, playback }
    }
}

impl MenuCommand for PauseToggle {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
        let active = self.pause.borrow_mut().toggle();
        self.playback.pause(active);

        let text = if active { "Song paused!" } else { "Song unpaused!" };
        Ok(vec![Message::server_text(viewer.name(), text)])
    }
}

/// Stops whatever is playing, unconditionally.
pub struct SkipSong {
    playback: Rc<dyn PlaybackService>,
}

impl SkipSong {
    pub fn new(playback: Rc<dyn PlaybackService>) -> Self {
        SkipSong { playback }
    }
}

impl MenuCommand for SkipSong {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
        self.playback.stop();
        Ok(vec![Message::server_text(viewer.name(), "Song skipped!")])
    }
}

/// Prompts for a new 5-field song row and appends it to the table.
/// Malformed input is answered with a text message and mutates nothing.
pub struct AddSong {
    table: PlaylistTable,
    prompter: Rc<RefCell<dyn Prompter>>,
}

impl AddSong {
    pub fn new(table: PlaylistTable, prompter: Rc<RefCell<dyn Prompter>>) -> Self {
        AddSong { table, prompter }
    }
}

impl MenuCommand for AddSong {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
        let entry = self.prompter.borrow_mut().prompt(ADD_SONG_PROMPT)?;

        let fields: Vec<&str> = entry.split(',').map(str::trim).collect();
        if fields.len() != 5 {
            return Ok(vec![Message::server_text(
                viewer.name(),
                "Invalid input format. Please use: title,artist,genre,popularity,rating",
            )]);
        }
        if fields[0].is_empty() {
            return Ok(vec![Message::server_text(
                viewer.name(),
                "Song title must not be empty.",
            )]);
        }

        let (popularity, rating) = match (fields[3].parse::<u32>(), fields[4].parse::<f32>()) {
            (Ok(popularity), Ok(rating)) if rating.is_finite() => (popularity, rating),
            _ => {
                return Ok(vec![Message::server_text(
                    viewer.name(),
                    "Invalid popularity or rating value. \
                     Popularity must be an integer and rating a float.",
                )]);
            }
        };

        let record = SongRecord::new(fields[0], fields[1], fields[2], popularity, rating)?;
        self.table.append(&record)?;

        Ok(vec![Message::server_text(
            viewer.name(),
            format!("Added song: {}", record.title),
        )])
    }
}
