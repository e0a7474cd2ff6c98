use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use crate::commands::MenuCommand;
use crate::messages::Message;
use crate::session::Viewer;

/// Synthetic entry shown when options are hidden above the current page.
pub const SCROLL_UP_LABEL: &str = "Scroll Up";
/// Synthetic entry shown when options remain below the current page.
pub const SCROLL_DOWN_LABEL: &str = "Scroll Down";

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One selectable entry: a display label bound to the command it triggers.
/// Entry order defines pagination order.
#[derive(Clone)]
pub struct MenuOption {
    label: String,
    command: Rc<dyn MenuCommand>,
}

impl MenuOption {
    pub fn new(label: impl Into<String>, command: Rc<dyn MenuCommand>) -> Self {
        MenuOption {
            label: label.into(),
            command,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

struct MenuController {
    title: String,
    options: Vec<MenuOption>,
    scroll_index: usize,
    page_size: usize,
}

impl MenuController {
    fn bottom(&self) -> usize {
        self.options.len().saturating_sub(self.page_size)
    }
}

/// Shared handle to one terminal's menu. Commands keep clones so they can
/// reconfigure the menu they were selected from; viewers keep a clone as
/// their active menu so free-form selections route back here.
#[derive(Clone)]
pub struct MenuHandle(Rc<RefCell<MenuController>>);

impl MenuHandle {
    pub fn new(title: impl Into<String>, page_size: usize) -> Self {
        MenuHandle(Rc::new(RefCell::new(MenuController {
            title: title.into(),
            options: Vec::new(),
            scroll_index: 0,
            page_size: page_size.max(1),
        })))
    }

    /// Replace the whole option set and snap the scroll back to the top.
    pub fn set_options(&self, options: Vec<MenuOption>) {
        let mut inner = self.0.borrow_mut();
        inner.options = options;
        inner.scroll_index = 0;
    }

    /// Build the menu-display message for the current page and mark this
    /// menu as the viewer's active one.
    pub fn render(&self, viewer: &mut dyn Viewer) -> Message {
        viewer.set_active_menu(self.clone());

        let inner = self.0.borrow();
        let end = (inner.scroll_index + inner.page_size).min(inner.options.len());
        let mut entries: Vec<String> = inner.options[inner.scroll_index..end]
            .iter()
            .map(|option| option.label.clone())
            .collect();
        if inner.scroll_index > 0 {
            entries.insert(0, SCROLL_UP_LABEL.to_string());
        }
        if inner.scroll_index + inner.page_size < inner.options.len() {
            entries.push(SCROLL_DOWN_LABEL.to_string());
        }

        Message::MenuDisplay {
            recipient: viewer.name().to_string(),
            title: inner.title.clone(),
            entries,
        }
    }

    /// Route a selection: scroll markers move the page, bound labels
    /// dispatch to their command, anything else is ignored (the terminal
    /// answers unknown labels with silence).
    pub fn select(&self, viewer: &mut dyn Viewer, label: &str) -> Result<Vec<Message>> {
        if label == SCROLL_DOWN_LABEL {
            {
                let mut inner = self.0.borrow_mut();
                let bottom = inner.bottom();
                inner.scroll_index = (inner.scroll_index + inner.page_size).min(bottom);
            }
            return Ok(vec![self.render(viewer)]);
        }

        if label == SCROLL_UP_LABEL {
            {
                let mut inner = self.0.borrow_mut();
                inner.scroll_index = inner.scroll_index.saturating_sub(inner.page_size);
            }
            return Ok(vec![self.render(viewer)]);
        }

        let command = self
            .0
            .borrow()
            .options
            .iter()
            .find(|option| option.label == label)
            .map(|option| option.command.clone());

        match command {
            Some(command) => command.execute(viewer),
            None => Ok(Vec::new()),
        }
    }

    /// Whether two handles point at the same controller.
    pub fn same_menu(&self, other: &MenuHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[cfg(test)]
    pub(crate) fn scroll_index(&self) -> usize {
        self.0.borrow().scroll_index
    }
}

/// The captured main-menu option set commands restore when the player
/// navigates back. Filled in by the composition root after the commands
/// that reference it are built.
#[derive(Default)]
pub struct MainMenu {
    options: RefCell<Vec<MenuOption>>,
}

impl MainMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, options: Vec<MenuOption>) {
        *self.options.borrow_mut() = options;
    }

    pub fn options(&self) -> Vec<MenuOption> {
        self.options.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PlayerSession;

    struct RecordingCommand {
        tag: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl MenuCommand for RecordingCommand {
        fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
            self.log.borrow_mut().push(self.tag.to_string());
            Ok(vec![Message::server_text(viewer.name(), self.tag)])
        }
    }

    fn numbered_options(count: usize, log: &Rc<RefCell<Vec<String>>>) -> Vec<MenuOption> {
        (1..=count)
            .map(|index| {
                MenuOption::new(
                    format!("Song {index:02}"),
                    Rc::new(RecordingCommand {
                        tag: "selected",
                        log: log.clone(),
                    }) as Rc<dyn MenuCommand>,
                )
            })
            .collect()
    }

    fn entries(message: &Message) -> Vec<String> {
        match message {
            Message::MenuDisplay { entries, .. } => entries.clone(),
            other => panic!("expected menu display, got {other:?}"),
        }
    }

    #[test]
    fn scrolling_clamps_and_marks_pages() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = MenuHandle::new("Select an option", 5);
        menu.set_options(numbered_options(12, &log));
        let mut viewer = PlayerSession::new("player_one");

        let first = entries(&menu.render(&mut viewer));
        assert_eq!(
            first,
            vec![
                "Song 01", "Song 02", "Song 03", "Song 04", "Song 05", "Scroll Down"
            ]
        );

        let page = menu.select(&mut viewer, SCROLL_DOWN_LABEL).expect("scrolled");
        assert_eq!(menu.scroll_index(), 5);
        assert_eq!(
            entries(&page[0]),
            vec![
                "Scroll Up", "Song 06", "Song 07", "Song 08", "Song 09", "Song 10", "Scroll Down"
            ]
        );

        let page = menu.select(&mut viewer, SCROLL_DOWN_LABEL).expect("scrolled");
        assert_eq!(menu.scroll_index(), 7);
        assert_eq!(
            entries(&page[0]),
            vec!["Scroll Up", "Song 08", "Song 09", "Song 10", "Song 11", "Song 12"]
        );

        // Already clamped at the bottom; another scroll stays put.
        menu.select(&mut viewer, SCROLL_DOWN_LABEL).expect("scrolled");
        assert_eq!(menu.scroll_index(), 7);

        let page = menu.select(&mut viewer, SCROLL_UP_LABEL).expect("scrolled");
        assert_eq!(menu.scroll_index(), 2);
        assert_eq!(
            entries(&page[0]),
            vec![
                "Scroll Up", "Song 03", "Song 04", "Song 05", "Song 06", "Song 07", "Scroll Down"
            ]
        );

        menu.select(&mut viewer, SCROLL_UP_LABEL).expect("scrolled");
        assert_eq!(menu.scroll_index(), 0);
    }

    #[test]
    fn replacing_options_resets_scroll() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = MenuHandle::new("Select an option", 5);
        menu.set_options(numbered_options(12, &log));
        let mut viewer = PlayerSession::new("player_one");

        menu.select(&mut viewer, SCROLL_DOWN_LABEL).expect("scrolled");
        assert_eq!(menu.scroll_index(), 5);

        menu.set_options(numbered_options(3, &log));
        assert_eq!(menu.scroll_index(), 0);

        let page = entries(&menu.render(&mut viewer));
        assert_eq!(page, vec!["Song 01", "Song 02", "Song 03"]);
    }

    #[test]
    fn short_menu_shows_no_scroll_markers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = MenuHandle::new("Select an option", 5);
        menu.set_options(numbered_options(5, &log));
        let mut viewer = PlayerSession::new("player_one");

        let page = entries(&menu.render(&mut viewer));
        assert_eq!(page.len(), 5);
        assert!(!page.contains(&SCROLL_UP_LABEL.to_string()));
        assert!(!page.contains(&SCROLL_DOWN_LABEL.to_string()));
    }

    #[test]
    fn selection_dispatches_to_bound_command() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = MenuHandle::new("Select an option", 5);
        menu.set_options(numbered_options(3, &log));
        let mut viewer = PlayerSession::new("player_one");

        let messages = menu.select(&mut viewer, "Song 02").expect("dispatched");
        assert_eq!(messages, vec![Message::server_text("player_one", "selected")]);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn unknown_label_is_silently_ignored() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = MenuHandle::new("Select an option", 5);
        menu.set_options(numbered_options(3, &log));
        let mut viewer = PlayerSession::new("player_one");

        let messages = menu.select(&mut viewer, "No Such Entry").expect("ignored");
        assert!(messages.is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn render_marks_viewer_active_menu() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = MenuHandle::new("Select an option", 5);
        menu.set_options(numbered_options(1, &log));
        let mut viewer = PlayerSession::new("player_one");

        menu.render(&mut viewer);
        let active = viewer.active_menu().expect("active menu");
        assert!(active.same_menu(&menu));
    }
}
