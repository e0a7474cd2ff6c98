use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use anyhow::Result;
use jukebox_formats::PlaylistTable;

use super::MenuCommand;
use crate::messages::Message;
use crate::prompt::Prompter;
use crate::session::Viewer;
use crate::votes::VoteAggregator;

/// Prompts with the 1-based song list and casts one vote for a valid
/// numeric choice. Anything else is answered with an error message and no
/// tally changes.
pub struct VoteForSong {
    table: PlaylistTable,
    votes: Rc<RefCell<VoteAggregator>>,
    prompter: Rc<RefCell<dyn Prompter>>,
}

impl VoteForSong {
    pub fn new(
        table: PlaylistTable,
        votes: Rc<RefCell<VoteAggregator>>,
        prompter: Rc<RefCell<dyn Prompter>>,
    ) -> Self {
        VoteForSong {
            table,
            votes,
            prompter,
        }
    }
}

impl MenuCommand for VoteForSong {
    fn execute(&self, viewer: &mut dyn Viewer) -> Result<Vec<Message>> {
        let songs = self.table.load()?;

        let mut prompt = String::from("Vote for a song:\n");
        for (index, song) in songs.iter().enumerate() {
            let _ = writeln!(prompt, "{}. {}", index + 1, song.title);
        }
        prompt.push_str("Enter the number of the song you want to vote for: ");

        let choice = self.prompter.borrow_mut().prompt(&prompt)?;
        let selected = choice
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| songs.get(index));

        let Some(song) = selected else {
            return Ok(vec![Message::server_text(
                viewer.name(),
                "Invalid choice. Try again.",
            )]);
        };

        self.votes.borrow_mut().cast_vote(&song.title);
        Ok(vec![Message::server_text(
            viewer.name(),
            format!("You voted for '{}'", song.title),
        )])
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::prompt::ScriptedPrompter;
    use crate::session::PlayerSession;
    use crate::votes::RecordingVoteObserver;

    fn seeded_table(dir: &Path) -> PlaylistTable {
        let path = dir.join("mix.csv");
        fs::write(
            &path,
            "title,artist,genre,popularity,rating\n\
             A,Artist1,Rock,1,1.0\n\
             B,Artist2,Jazz,2,2.0\n\
             C,Artist3,Pop,3,3.0\n",
        )
        .expect("seed playlist");
        PlaylistTable::open(path)
    }

    fn command_with_reply(
        table: PlaylistTable,
        votes: Rc<RefCell<VoteAggregator>>,
        reply: &str,
    ) -> VoteForSong {
        VoteForSong::new(
            table,
            votes,
            Rc::new(RefCell::new(ScriptedPrompter::new([reply]))),
        )
    }

    #[test]
    fn numeric_choice_casts_one_vote() {
        let dir = tempfile::tempdir().expect("tempdir");
        let votes = VoteAggregator::shared();
        let observer = RecordingVoteObserver::new();
        votes.borrow_mut().add_observer(Rc::new(observer.clone()));
        let mut viewer = PlayerSession::new("player_one");

        let command = command_with_reply(seeded_table(dir.path()), votes.clone(), "2");
        let messages = command.execute(&mut viewer).expect("voted");

        assert_eq!(
            messages,
            vec![Message::server_text("player_one", "You voted for 'B'")]
        );
        assert_eq!(votes.borrow().tallies().get("B"), Some(&1));
        assert_eq!(observer.updates().len(), 1);
    }

    #[test]
    fn out_of_range_choice_casts_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let votes = VoteAggregator::shared();
        let mut viewer = PlayerSession::new("player_one");

        for reply in ["9", "0", "abc", ""] {
            let command = command_with_reply(seeded_table(dir.path()), votes.clone(), reply);
            let messages = command.execute(&mut viewer).expect("rejected");
            assert_eq!(
                messages,
                vec![Message::server_text("player_one", "Invalid choice. Try again.")]
            );
        }

        assert!(votes.borrow().tallies().is_empty());
    }

    #[test]
    fn repeated_votes_accumulate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let table = seeded_table(dir.path());
        let votes = VoteAggregator::shared();
        let mut viewer = PlayerSession::new("player_one");

        for _ in 0..3 {
            command_with_reply(table.clone(), votes.clone(), "1")
                .execute(&mut viewer)
                .expect("voted");
        }

        assert_eq!(votes.borrow().tallies().get("A"), Some(&3));
    }
}
