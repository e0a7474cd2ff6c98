use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use jukebox_formats::PlaylistTable;

use crate::commands::music::{AddSong, PauseToggle, PlaySong, ShowLastPlayed, SkipSong};
use crate::commands::playlist::{OpenPlaylist, SortSongs};
use crate::commands::vote::VoteForSong;
use crate::commands::MenuCommand;
use crate::menu::{MainMenu, MenuHandle, MenuOption};
use crate::messages::Message;
use crate::pause::PauseState;
use crate::playback::PlaybackService;
use crate::prompt::Prompter;
use crate::session::Viewer;
use crate::sort::{SortByGenre, SortByPopularity, SortByUserRating};
use crate::votes::VoteAggregator;

pub const MENU_TITLE: &str = "Select an option";

/// A fully wired jukebox terminal: one menu controller, the captured main
/// menu commands restore when navigating back, and the shared vote/pause
/// state handed to every command that needs it. This is the composition
/// root; nothing in the module reaches for globals.
pub struct MusicTerminal {
    pub menu: MenuHandle,
    pub main_menu: Rc<MainMenu>,
    pub votes: Rc<RefCell<VoteAggregator>>,
    pub pause: Rc<RefCell<PauseState>>,
}

impl MusicTerminal {
    pub fn compose(
        playlist_root: &Path,
        default_playlist: &str,
        playback: Rc<dyn PlaybackService>,
        prompter: Rc<RefCell<dyn Prompter>>,
        page_size: usize,
    ) -> Self {
        let table = PlaylistTable::open(playlist_root.join(default_playlist));
        let menu = MenuHandle::new(MENU_TITLE, page_size);
        let main_menu = Rc::new(MainMenu::new());
        let votes = VoteAggregator::shared();
        let pause = PauseState::shared();

        let options = vec![
            MenuOption::new(
                "Play Song",
                Rc::new(PlaySong::any(table.clone(), playback.clone())) as Rc<dyn MenuCommand>,
            ),
            MenuOption::new("Last Played Song", Rc::new(ShowLastPlayed)),
            MenuOption::new(
                "Pause Song",
                Rc::new(PauseToggle::new(pause.clone(), playback.clone())),
            ),
            MenuOption::new("Skip Song", Rc::new(SkipSong::new(playback.clone()))),
            MenuOption::new(
                "Add Song",
                Rc::new(AddSong::new(table.clone(), prompter.clone())),
            ),
            MenuOption::new(
                "Open Playlist",
                Rc::new(OpenPlaylist::new(
                    playlist_root.to_path_buf(),
                    menu.clone(),
                    main_menu.clone(),
                    playback.clone(),
                )),
            ),
            MenuOption::new(
                "Sort by Genre",
                Rc::new(SortSongs::new(
                    table.clone(),
                    Box::new(SortByGenre),
                    menu.clone(),
                    main_menu.clone(),
                    playback.clone(),
                )),
            ),
            MenuOption::new(
                "Sort by Popularity",
                Rc::new(SortSongs::new(
                    table.clone(),
                    Box::new(SortByPopularity),
                    menu.clone(),
                    main_menu.clone(),
                    playback.clone(),
                )),
            ),
            MenuOption::new(
                "Sort by User Rating",
                Rc::new(SortSongs::new(
                    table.clone(),
                    Box::new(SortByUserRating),
                    menu.clone(),
                    main_menu.clone(),
                    playback.clone(),
                )),
            ),
            MenuOption::new(
                "Vote for Song",
                Rc::new(VoteForSong::new(table, votes.clone(), prompter)),
            ),
        ];

        main_menu.install(options.clone());
        menu.set_options(options);

        MusicTerminal {
            menu,
            main_menu,
            votes,
            pause,
        }
    }

    /// What the host calls when a player walks up to the terminal.
    pub fn player_interacted(&self, viewer: &mut dyn Viewer) -> Message {
        self.menu.render(viewer)
    }
}
