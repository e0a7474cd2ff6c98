use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use jukebox_formats::{SongRecord, discover_playlists};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Export playlist tables beneath a directory as JSON", version)]
struct Args {
    /// Directory scanned recursively for playlist CSV tables
    #[arg(long, value_name = "DIR", default_value = "resources/playlists")]
    root: PathBuf,

    /// Path to write the JSON manifest (stdout when omitted)
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

#[derive(Serialize)]
struct PlaylistManifest {
    playlist: String,
    path: String,
    songs: Vec<SongRecord>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let tables = discover_playlists(&args.root)?;
    if tables.is_empty() {
        bail!("no playlist tables under {}", args.root.display());
    }

    let mut manifest = Vec::with_capacity(tables.len());
    for table in &tables {
        let songs = table
            .load()
            .with_context(|| format!("loading {}", table.path().display()))?;
        manifest.push(PlaylistManifest {
            playlist: table.name(),
            path: table.path().display().to_string(),
            songs,
        });
    }

    let json =
        serde_json::to_string_pretty(&manifest).context("serializing playlist manifest")?;
    match args.json.as_ref() {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("writing manifest to {}", path.display()))?;
            println!("Saved playlist manifest to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
