use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use jukebox_formats::{discover_playlists, PlaylistTable, SongRecord};

use super::music::PlaySong;
use super::MenuCommand;
use crate::menu::{MainMenu, MenuHandle, MenuOption};
use crate::messages::Message;
use crate::playback::PlaybackService;
use crate::session::Viewer;
use crate::sort::SortStrategy;

pub const BACK_LABEL: &str = "Back";

/// File name used when the player asks for a fresh playlist.
pub const NEW_PLAYLIST_FILE: &str = "new_playlist.csv";

/// Build the song-browsing option set: `Back` first, then one entry per
/// title bound to playing exactly that song. Duplicate titles keep their
/// first occurrence so labels stay unique.
fn song_options(
    songs: &[SongRecord],
    table: &PlaylistTable,
    menu: &MenuHandle,
    main_menu: &Rc<MainMenu>,
    playback: &Rc<dyn PlaybackService>,
) -> Vec<MenuOption> {
    let mut options = vec![MenuOption::new(
        BACK_LABEL,
        Rc::new(BackToMainMenu::new(menu.clone(), main_menu.clone())) as Rc<dyn MenuCommand>,
    )];
    for song in songs {
        if options.iter().any(|option| option.label() == song.title) {
            continue;
        }
        options.push(MenuOption::new(
            song.title.as_str(),
            Rc::new(PlaySong::titled(
                table.clone(),
                song.title.as_str(),
                playback.clone(),
            )),
        ));
    }
    options
}

/// Rebuilds the menu with every song in the table as a playable entry.
pub struct SeeSongs {
    table: PlaylistTable,
    menu: MenuHandle,
    main_menu: Rc<MainMenu>,
    playback: Rc<dyn PlaybackService>,
}

impl SeeSongs {
    pub fn new(
        table: PlaylistTable,
        menu: MenuHandle,
        main_menu: Rc<MainMenu>,
        playback: Rc<dyn PlaybackService>,
    ) -> Self {
        SeeSongs {
            table,
            menu,
            main_menu,
            playback,
        }
    }
}

impl MenuCommand for SeeSongs {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
        let songs = self.table.load()?;
        let options = song_options(
            &songs,
            &self.table,
            &self.menu,
            &self.main_menu,
            &self.playback,
        );
        self.menu.set_options(options);
        Ok(vec![self.menu.render(viewer)])
    }
}

/// Creates a fresh empty playlist table, then drops the player back on the
/// main menu.
pub struct CreatePlaylist {
    playlist_root: PathBuf,
    file_name: String,
    menu: MenuHandle,
    main_menu: Rc<MainMenu>,
}

impl CreatePlaylist {
    pub fn new(
        playlist_root: PathBuf,
        file_name: impl Into<String>,
        menu: MenuHandle,
        main_menu: Rc<MainMenu>,
    ) -> Self {
        CreatePlaylist {
            playlist_root,
            file_name: file_name.into(),
            menu,
            main_menu,
        }
    }
}

impl MenuCommand for CreatePlaylist {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
        PlaylistTable::create(self.playlist_root.join(&self.file_name))?;

        let mut messages = vec![Message::server_text(
            viewer.name(),
            format!("Playlist created: {}.", self.file_name),
        )];
        self.menu.set_options(self.main_menu.options());
        messages.push(self.menu.render(viewer));
        Ok(messages)
    }
}

/// Sub-menu over the playlist catalog: create a new table, or browse one
/// of the tables currently on disk.
pub struct OpenPlaylist {
    playlist_root: PathBuf,
    menu: MenuHandle,
    main_menu: Rc<MainMenu>,
    playback: Rc<dyn PlaybackService>,
}

impl OpenPlaylist {
    pub fn new(
        playlist_root: PathBuf,
        menu: MenuHandle,
        main_menu: Rc<MainMenu>,
        playback: Rc<dyn PlaybackService>,
    ) -> Self {
        OpenPlaylist {
            playlist_root,
            menu,
            main_menu,
            playback,
        }
    }
}

impl MenuCommand for OpenPlaylist {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
        let mut options = vec![MenuOption::new(
            "Create Playlist",
            Rc::new(CreatePlaylist::new(
                self.playlist_root.clone(),
                NEW_PLAYLIST_FILE,
                self.menu.clone(),
                self.main_menu.clone(),
            )) as Rc<dyn MenuCommand>,
        )];

        for table in discover_playlists(&self.playlist_root)? {
            options.push(MenuOption::new(
                format!("Browse {}", table.name()),
                Rc::new(SeeSongs::new(
                    table,
                    self.menu.clone(),
                    self.main_menu.clone(),
                    self.playback.clone(),
                )),
            ));
        }

        options.push(MenuOption::new(
            BACK_LABEL,
            Rc::new(BackToMainMenu::new(self.menu.clone(), self.main_menu.clone()))
                as Rc<dyn MenuCommand>,
        ));

        self.menu.set_options(options);
        Ok(vec![self.menu.render(viewer)])
    }
}

/// Puts the captured main-menu option set back on the terminal.
pub struct BackToMainMenu {
    menu: MenuHandle,
    main_menu: Rc<MainMenu>,
}

impl BackToMainMenu {
    pub fn new(menu: MenuHandle, main_menu: Rc<MainMenu>) -> Self {
        BackToMainMenu { menu, main_menu }
    }
}

impl MenuCommand for BackToMainMenu {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
        self.menu.set_options(self.main_menu.options());
        Ok(vec![self.menu.render(viewer)])
    }
}

/// Loads the table, orders it with the bound strategy, and rebuilds the
/// menu in sorted order. One command type covers every sort entry; the
/// strategy is the constructor parameter.
pub struct SortSongs {
    table: PlaylistTable,
    strategy: Box<dyn SortStrategy>,
    menu: MenuHandle,
    main_menu: Rc<MainMenu>,
    playback: Rc<dyn PlaybackService>,
}

impl SortSongs {
    pub fn new(
        table: PlaylistTable,
        strategy: Box<dyn SortStrategy>,
        menu: MenuHandle,
        main_menu: Rc<MainMenu>,
        playback: Rc<dyn PlaybackService>,
    ) -> Self {
        SortSongs {
            table,
            strategy,
            menu,
            main_menu,
            playback,
        }
    }
}

impl MenuCommand for SortSongs {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
        let songs = self.table.load()?;
        let sorted = self.strategy.sort(&songs);
        let options = song_options(
            &sorted,
            &self.table,
            &self.menu,
            &self.main_menu,
            &self.playback,
        );
        self.menu.set_options(options);
        Ok(vec![self.menu.render(viewer)])
    }
}
