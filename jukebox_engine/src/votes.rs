use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;

/// Broadcast record pushed to observers after each accepted vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoteUpdate {
    Vote { song: String, votes: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoteError {
    #[error("observer is not registered")]
    ObserverNotRegistered,
}

/// Receives tally updates. Implementations use interior mutability when
/// they need to record anything.
pub trait VoteObserver {
    fn update(&self, update: &VoteUpdate);
}

/// Tallies votes per song and pushes updates to registered observers in
/// registration order. One aggregator is built by the composition root and
/// shared by handle across every command that votes; counts only grow for
/// the life of the instance.
#[derive(Default)]
pub struct VoteAggregator {
    tallies: BTreeMap<String, u32>,
    observers: Vec<Rc<dyn VoteObserver>>,
}

impl VoteAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Count one vote for `song` and notify every observer synchronously.
    /// Returns the new tally.
    pub fn cast_vote(&mut self, song: &str) -> u32 {
        let entry = self.tallies.entry(song.to_string()).or_insert(0);
        *entry += 1;
        let votes = *entry;

        let update = VoteUpdate::Vote {
            song: song.to_string(),
            votes,
        };
        for observer in &self.observers {
            observer.update(&update);
        }
        votes
    }

    /// Snapshot of the current tallies; mutating it cannot touch the
    /// aggregator's own state.
    pub fn tallies(&self) -> BTreeMap<String, u32> {
        self.tallies.clone()
    }

    pub fn add_observer(&mut self, observer: Rc<dyn VoteObserver>) {
        self.observers.push(observer);
    }

    #[allow(dead_code)]
    pub fn remove_observer(&mut self, observer: &Rc<dyn VoteObserver>) -> Result<(), VoteError> {
        let position = self
            .observers
            .iter()
            .position(|existing| Rc::ptr_eq(existing, observer))
            .ok_or(VoteError::ObserverNotRegistered)?;
        self.observers.remove(position);
        Ok(())
    }
}

/// Records every update it receives, for tests and JSON dumps.
#[derive(Clone, Default)]
pub struct RecordingVoteObserver {
    updates: Rc<RefCell<Vec<VoteUpdate>>>,
}

impl RecordingVoteObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<VoteUpdate> {
        self.updates.borrow().clone()
    }
}

impl VoteObserver for RecordingVoteObserver {
    fn update(&self, update: &VoteUpdate) {
        self.updates.borrow_mut().push(update.clone());
    }
}

/// Prints vote updates to the host console, the terminal's vote board.
pub struct ConsoleVoteObserver;

impl VoteObserver for ConsoleVoteObserver {
    fn update(&self, update: &VoteUpdate) {
        let VoteUpdate::Vote { song, votes } = update;
        println!("VOTE UPDATE: '{song}' now has {votes} votes!");
    }
}
