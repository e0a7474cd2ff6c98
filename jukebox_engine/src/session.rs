use std::collections::BTreeMap;

use crate::menu::MenuHandle;

/// The host-side player handle this module needs: named state values and
/// the menu currently capturing the player's selections. The real host
/// owns richer player objects; this trait is the slice the terminal sees.
pub trait Viewer {
    fn name(&self) -> &str;
    fn state(&self, key: &str) -> Option<String>;
    fn set_state(&mut self, key: &str, value: String);
    fn active_menu(&self) -> Option<MenuHandle>;
    fn set_active_menu(&mut self, menu: MenuHandle);
}

/// In-process viewer used by the demo host and tests.
#[derive(Default)]
pub struct PlayerSession {
    name: String,
    states: BTreeMap<String, String>,
    active_menu: Option<MenuHandle>,
}

impl PlayerSession {
    pub fn new(name: impl Into<String>) -> Self {
        PlayerSession {
            name: name.into(),
            states: BTreeMap::new(),
            active_menu: None,
        }
    }
}

impl Viewer for PlayerSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self, key: &str) -> Option<String> {
        self.states.get(key).cloned()
    }

    fn set_state(&mut self, key: &str, value: String) {
        self.states.insert(key.to_string(), value);
    }

    fn active_menu(&self) -> Option<MenuHandle> {
        self.active_menu.clone()
    }

    fn set_active_menu(&mut self, menu: MenuHandle) {
        self.active_menu = Some(menu);
    }
}
