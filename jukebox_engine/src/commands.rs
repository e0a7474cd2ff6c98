pub mod music;
pub mod playlist;
pub mod vote;

use anyhow::Result;

use crate::messages::Message;
use crate::session::Viewer;

/// A single selectable terminal behavior. Construction captures everything
/// the command needs (tables, menu handles, shared state); execution runs
/// one complete action and returns the outbound messages for the host.
pub trait MenuCommand {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>>;
}
