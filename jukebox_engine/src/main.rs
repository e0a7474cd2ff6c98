use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

mod commands;
mod menu;
mod messages;
mod pause;
mod playback;
mod prompt;
mod session;
mod sort;
mod terminal;
mod votes;

use menu::DEFAULT_PAGE_SIZE;
use messages::Message;
use playback::RecordingPlayback;
use prompt::{Prompter, ScriptedPrompter, StdinPrompter};
use session::{PlayerSession, Viewer};
use terminal::MusicTerminal;
use votes::{ConsoleVoteObserver, RecordingVoteObserver};

/// Demo host that drives the jukebox terminal the way the game engine
/// would: render the menu, feed it selections, collect the outbound
/// messages.
#[derive(Parser, Debug)]
#[command(about = "Drive the jukebox terminal through a scripted session", version)]
struct Args {
    /// Directory holding the playlist CSV tables
    #[arg(long, default_value = "resources/playlists")]
    playlist_root: PathBuf,

    /// Playlist table the main menu is bound to
    #[arg(long, default_value = "house_party.csv")]
    playlist: String,

    /// Name of the interacting player
    #[arg(long, default_value = "player_one")]
    viewer: String,

    /// Options visible per menu page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Menu label to select, in order (may repeat)
    #[arg(long = "select", value_name = "LABEL")]
    selections: Vec<String>,

    /// Scripted reply for prompted commands, in order (may repeat;
    /// prompts read stdin when none are given)
    #[arg(long = "input", value_name = "LINE")]
    inputs: Vec<String>,

    /// Path to write the outbound message transcript as JSON
    #[arg(long)]
    messages_json: Option<PathBuf>,

    /// Path to write the recorded playback event log as JSON
    #[arg(long)]
    playback_log_json: Option<PathBuf>,

    /// Path to write the final vote tallies as JSON
    #[arg(long)]
    vote_tally_json: Option<PathBuf>,

    /// Path to write every broadcast vote update as JSON
    #[arg(long)]
    vote_log_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let playback = RecordingPlayback::new();
    let prompter: Rc<RefCell<dyn Prompter>> = if args.inputs.is_empty() {
        Rc::new(RefCell::new(StdinPrompter))
    } else {
        Rc::new(RefCell::new(ScriptedPrompter::new(args.inputs.clone())))
    };

    let terminal = MusicTerminal::compose(
        &args.playlist_root,
        &args.playlist,
        Rc::new(playback.clone()),
        prompter,
        args.page_size,
    );
    let vote_log = RecordingVoteObserver::new();
    {
        let mut votes = terminal.votes.borrow_mut();
        votes.add_observer(Rc::new(ConsoleVoteObserver));
        votes.add_observer(Rc::new(vote_log.clone()));
    }

    let mut session = PlayerSession::new(args.viewer.as_str());
    let mut transcript = vec![terminal.player_interacted(&mut session)];

    for label in &args.selections {
        let menu = session
            .active_menu()
            .context("viewer has no active menu")?;
        let messages = menu
            .select(&mut session, label)
            .with_context(|| format!("selecting {label:?}"))?;
        if messages.is_empty() {
            println!("!! selection {label:?} matched nothing");
        }
        transcript.extend(messages);
    }

    for message in &transcript {
        describe_message(message);
    }

    if let Some(path) = args.messages_json.as_ref() {
        let json = serde_json::to_string_pretty(&transcript)
            .context("serializing message transcript")?;
        fs::write(path, json)
            .with_context(|| format!("writing message transcript to {}", path.display()))?;
        println!("Saved message transcript JSON to {}", path.display());
    }

    if let Some(path) = args.playback_log_json.as_ref() {
        let json = serde_json::to_string_pretty(&playback.events())
            .context("serializing playback event log")?;
        fs::write(path, json)
            .with_context(|| format!("writing playback log to {}", path.display()))?;
        println!("Saved playback event log JSON to {}", path.display());
    }

    if let Some(path) = args.vote_tally_json.as_ref() {
        let json = serde_json::to_string_pretty(&terminal.votes.borrow().tallies())
            .context("serializing vote tallies")?;
        fs::write(path, json)
            .with_context(|| format!("writing vote tallies to {}", path.display()))?;
        println!("Saved vote tally JSON to {}", path.display());
    }

    if let Some(path) = args.vote_log_json.as_ref() {
        let json = serde_json::to_string_pretty(&vote_log.updates())
            .context("serializing vote update log")?;
        fs::write(path, json)
            .with_context(|| format!("writing vote update log to {}", path.display()))?;
        println!("Saved vote update log JSON to {}", path.display());
    }

    Ok(())
}

fn describe_message(message: &Message) {
    match message {
        Message::ServerText { recipient, text } => println!("[text -> {recipient}] {text}"),
        Message::MenuDisplay {
            recipient,
            title,
            entries,
        } => {
            println!("[menu -> {recipient}] {title}");
            for entry in entries {
                println!("    - {entry}");
            }
        }
        Message::SoundPlayback { recipient, clip } => {
            println!("[sound -> {recipient}] {clip}")
        }
    }
}
